//! Migration file stubs.
//!
//! Anonymous-class migration files with `{up}`/`{down}` body tokens.
//! The blueprint stub covers table and foreign-key artifacts, the raw
//! stub covers views, and the squash stub imports everything because a
//! combined file can contain any artifact kind.

pub const BLUEPRINT_STUB: &str = r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
{up}    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
{down}    }
};
"#;

pub const RAW_STUB: &str = r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Support\Facades\DB;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
{up}    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
{down}    }
};
"#;

pub const SQUASH_STUB: &str = r#"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\DB;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
{up}    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
{down}    }
};
"#;

/// Fill a stub's body tokens.
pub fn fill(stub: &str, up: &str, down: &str) -> String {
    stub.replace("{up}", up).replace("{down}", down)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_tokens() {
        let out = fill(BLUEPRINT_STUB, "        // up\n", "        // down\n");
        assert!(out.contains("        // up\n    }"));
        assert!(out.contains("        // down\n    }"));
        assert!(!out.contains("{up}"));
        assert!(!out.contains("{down}"));
    }

    #[test]
    fn test_stub_imports() {
        assert!(BLUEPRINT_STUB.contains("use Illuminate\\Database\\Schema\\Blueprint;"));
        assert!(RAW_STUB.contains("use Illuminate\\Support\\Facades\\DB;"));
        assert!(SQUASH_STUB.contains("Blueprint"));
        assert!(SQUASH_STUB.contains("Facades\\DB"));
    }
}
