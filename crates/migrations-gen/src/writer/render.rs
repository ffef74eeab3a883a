//! Rendering of declarative statements into the target DSL's concrete
//! (PHP/Blueprint) syntax. This is the only module that knows how a
//! [`Statement`] serializes.

use crate::generate::{ForeignKeyArtifact, Statement, TableArtifact, Value, ViewArtifact};

const BODY_INDENT: &str = "        "; // inside up()/down()
const STMT_INDENT: &str = "            "; // inside the Blueprint closure

/// Render a PHP single-quoted string literal.
pub fn php_string(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Render a PHP double-quoted string literal (used for raw SQL bodies).
pub fn php_dq_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Str(s) => php_string(s),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => {
            let inner: Vec<String> = items.iter().map(render_value).collect();
            format!("[{}]", inner.join(", "))
        }
        Value::Expression(expr) => format!("DB::raw({})", php_string(expr)),
        Value::Raw(raw) => raw.clone(),
    }
}

fn render_args(args: &[Value]) -> String {
    args.iter()
        .map(render_value)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render one statement as a `$table->...;` line (without indentation).
pub fn render_statement(stmt: &Statement) -> String {
    let mut line = format!("$table->{}({})", stmt.operation, render_args(&stmt.args));
    for modifier in &stmt.modifiers {
        line.push_str(&format!("->{}({})", modifier.name, render_args(&modifier.args)));
    }
    line.push(';');
    line
}

fn push_statements(out: &mut String, statements: &[Statement]) {
    for stmt in statements {
        if let Some(warning) = &stmt.warning {
            out.push_str(STMT_INDENT);
            out.push_str(&format!("// Warning: {}\n", warning));
        }
        out.push_str(STMT_INDENT);
        out.push_str(&render_statement(stmt));
        out.push('\n');
    }
}

/// Render the up body of a create-table block.
pub fn table_up(block: &TableArtifact) -> String {
    let mut out = format!(
        "{}Schema::create({}, function (Blueprint $table) {{\n",
        BODY_INDENT,
        php_string(&block.name)
    );

    if let Some(charset) = &block.charset {
        out.push_str(&format!(
            "{}$table->charset = {};\n",
            STMT_INDENT,
            php_string(charset)
        ));
    }
    if let Some(collation) = &block.collation {
        out.push_str(&format!(
            "{}$table->collation = {};\n",
            STMT_INDENT,
            php_string(collation)
        ));
    }

    push_statements(&mut out, &block.statements);
    out.push_str(BODY_INDENT);
    out.push_str("});\n");
    out
}

/// Render the down body of a create-table block.
pub fn table_down(name: &str) -> String {
    format!(
        "{}Schema::dropIfExists({});\n",
        BODY_INDENT,
        php_string(name)
    )
}

/// Render a foreign-key body (up or down) as a `Schema::table` block.
pub fn foreign_keys_body(table: &str, statements: &[Statement]) -> String {
    let mut out = format!(
        "{}Schema::table({}, function (Blueprint $table) {{\n",
        BODY_INDENT,
        php_string(table)
    );
    push_statements(&mut out, statements);
    out.push_str(BODY_INDENT);
    out.push_str("});\n");
    out
}

/// Render the up body of a view block.
pub fn view_up(block: &ViewArtifact) -> String {
    format!(
        "{}DB::statement({});\n",
        BODY_INDENT,
        php_dq_string(&block.create_sql)
    )
}

/// Render the down body of a view block.
pub fn view_down(block: &ViewArtifact) -> String {
    format!(
        "{}DB::statement({});\n",
        BODY_INDENT,
        php_dq_string(&block.drop_sql)
    )
}

/// Render the up body of a foreign-key block.
pub fn foreign_keys_up(block: &ForeignKeyArtifact) -> String {
    foreign_keys_body(&block.table, &block.up)
}

/// Render the down body of a foreign-key block.
pub fn foreign_keys_down(block: &ForeignKeyArtifact) -> String {
    foreign_keys_body(&block.table, &block.down)
}
