//! Default-name computation for indexes and foreign keys.
//!
//! The target DSL auto-names constraints with a deterministic formula:
//! `lowercase(table _ col1 _ col2 ... _ typetag)`, with `-` and `.`
//! replaced by `_`. When a database object's stored name is exactly what
//! the DSL would generate anyway, the generated migration omits the name
//! argument so the output stays as close as possible to what a human
//! author would write.

use crate::config::GeneratorConfig;
use crate::schema::{ForeignKey, Index, IndexKind};

/// Compute the default name for an index on `table` over `columns`.
pub fn default_index_name(table: &str, columns: &[String], kind: IndexKind) -> String {
    compose(table, columns, kind.type_tag())
}

/// Compute the default name for a foreign key on `table` over `columns`.
///
/// Composite keys use the same formula generalized over all columns:
/// `orders_tenant_id_customer_id_foreign`.
pub fn default_foreign_key_name(table: &str, columns: &[String]) -> String {
    compose(table, columns, "foreign")
}

/// Whether the generated index statement may omit the name argument.
///
/// True when:
/// 1. the index is a primary key (the DSL's primary-key declaration is
///    never named), or
/// 2. the user opted out of explicit index names entirely, or
/// 3. the stored name is indistinguishable from the computed default.
pub fn should_skip_index_name(config: &GeneratorConfig, table: &str, index: &Index) -> bool {
    if index.kind == IndexKind::Primary {
        return true;
    }

    if config.default_index_names {
        return true;
    }

    default_index_name(table, &index.columns, index.kind) == index.name
}

/// Whether the generated foreign key statement may omit the name argument.
pub fn should_skip_foreign_key_name(config: &GeneratorConfig, table: &str, fk: &ForeignKey) -> bool {
    if config.default_fk_names {
        return true;
    }

    default_foreign_key_name(table, &fk.columns) == fk.name
}

fn compose(table: &str, columns: &[String], tag: &str) -> String {
    let mut name = String::with_capacity(table.len() + columns.len() * 8 + tag.len());
    name.push_str(table);
    for column in columns {
        name.push('_');
        name.push_str(column);
    }
    name.push('_');
    name.push_str(tag);

    name.to_lowercase().replace(['-', '.'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn index(name: &str, kind: IndexKind, columns: &[&str]) -> Index {
        Index {
            name: name.to_string(),
            kind,
            columns: cols(columns),
            algorithm: None,
        }
    }

    #[test]
    fn test_default_index_name() {
        assert_eq!(
            default_index_name("posts", &cols(&["slug"]), IndexKind::Unique),
            "posts_slug_unique"
        );
        assert_eq!(
            default_index_name("posts", &cols(&["a", "b"]), IndexKind::Index),
            "posts_a_b_index"
        );
        assert_eq!(
            default_index_name("places", &cols(&["position"]), IndexKind::Spatial),
            "places_position_spatialindex"
        );
    }

    #[test]
    fn test_default_name_sanitizes_separators() {
        assert_eq!(
            default_index_name("my-app.users", &cols(&["Email"]), IndexKind::Unique),
            "my_app_users_email_unique"
        );
    }

    #[test]
    fn test_primary_always_skipped() {
        let config = GeneratorConfig::default();
        let idx = index("users_pkey", IndexKind::Primary, &["id"]);
        assert!(should_skip_index_name(&config, "users", &idx));
    }

    #[test]
    fn test_skip_when_name_matches_default() {
        let config = GeneratorConfig::default();
        let idx = index("posts_slug_unique", IndexKind::Unique, &["slug"]);
        assert!(should_skip_index_name(&config, "posts", &idx));
    }

    #[test]
    fn test_keep_custom_name() {
        let config = GeneratorConfig::default();
        let idx = index("custom_idx", IndexKind::Unique, &["slug"]);
        assert!(!should_skip_index_name(&config, "posts", &idx));
    }

    #[test]
    fn test_opt_out_flag_skips_all() {
        let config = GeneratorConfig {
            default_index_names: true,
            ..Default::default()
        };
        let idx = index("custom_idx", IndexKind::Unique, &["slug"]);
        assert!(should_skip_index_name(&config, "posts", &idx));
    }

    #[test]
    fn test_foreign_key_default_name() {
        assert_eq!(
            default_foreign_key_name("posts", &cols(&["user_id"])),
            "posts_user_id_foreign"
        );
    }

    #[test]
    fn test_foreign_key_skip_policy() {
        let config = GeneratorConfig::default();

        let fk = ForeignKey {
            name: "posts_user_id_foreign".to_string(),
            columns: cols(&["user_id"]),
            ref_table: "users".to_string(),
            ref_columns: cols(&["id"]),
            on_update: None,
            on_delete: None,
        };
        assert!(should_skip_foreign_key_name(&config, "posts", &fk));

        let custom = ForeignKey {
            name: "fk_posts_users".to_string(),
            ..fk.clone()
        };
        assert!(!should_skip_foreign_key_name(&config, "posts", &custom));

        let opted_out = GeneratorConfig {
            default_fk_names: true,
            ..Default::default()
        };
        assert!(should_skip_foreign_key_name(&opted_out, "posts", &custom));
    }

    #[test]
    fn test_composite_foreign_key_same_formula() {
        let config = GeneratorConfig::default();
        let fk = ForeignKey {
            name: "orders_tenant_id_customer_id_foreign".to_string(),
            columns: cols(&["tenant_id", "customer_id"]),
            ref_table: "customers".to_string(),
            ref_columns: cols(&["tenant_id", "id"]),
            on_update: None,
            on_delete: None,
        };
        assert!(should_skip_foreign_key_name(&config, "orders", &fk));
    }
}
