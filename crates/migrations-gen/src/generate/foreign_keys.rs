//! The foreign key mapper.
//!
//! Foreign keys are generated as a separate artifact from the table body:
//! they can only be applied once every referenced table exists, so the
//! inter-table ordering is a correctness requirement.

use std::collections::HashSet;

use tracing::warn;

use crate::config::GeneratorConfig;
use crate::naming;
use crate::schema::ForeignKey;

use super::statement::{Modifier, Statement, Value};

/// Map the foreign keys of one table into (up, down) statement lists.
///
/// `known_tables` is the set of table names present in the snapshot; a
/// reference to a table outside it attaches a data-integrity warning to
/// the statement instead of aborting the run.
pub fn generate(
    table: &str,
    foreign_keys: &[ForeignKey],
    known_tables: &HashSet<String>,
    config: &GeneratorConfig,
) -> (Vec<Statement>, Vec<Statement>) {
    let mut up = Vec::with_capacity(foreign_keys.len());
    let mut down = Vec::with_capacity(foreign_keys.len());

    for fk in foreign_keys {
        let skip_name = naming::should_skip_foreign_key_name(config, table, fk);
        up.push(generate_up(table, fk, skip_name, known_tables));
        down.push(generate_down(fk, skip_name));
    }

    (up, down)
}

fn generate_up(
    table: &str,
    fk: &ForeignKey,
    skip_name: bool,
    known_tables: &HashSet<String>,
) -> Statement {
    let mut stmt = Statement::new("foreign", &fk.name).arg(Value::columns(&fk.columns));

    if !skip_name {
        stmt = stmt.arg(Value::str(&fk.name));
    }

    stmt = stmt
        .chain(Modifier::with_arg(
            "references",
            Value::columns(&fk.ref_columns),
        ))
        .chain(Modifier::with_arg("on", Value::str(&fk.ref_table)));

    if let Some(action) = normalized_action(fk.on_update.as_deref()) {
        stmt = stmt.chain(Modifier::with_arg("onUpdate", Value::str(action)));
    }
    if let Some(action) = normalized_action(fk.on_delete.as_deref()) {
        stmt = stmt.chain(Modifier::with_arg("onDelete", Value::str(action)));
    }

    if !known_tables.contains(&fk.ref_table) {
        let message = format!(
            "{}.{} references missing table '{}'",
            table, fk.name, fk.ref_table
        );
        warn!("{}", message);
        stmt = stmt.with_warning(message);
    }

    stmt
}

fn generate_down(fk: &ForeignKey, skip_name: bool) -> Statement {
    let stmt = Statement::new("dropForeign", &fk.name);
    if skip_name {
        // Without a stored name the DSL recomputes it from the column list.
        stmt.arg(Value::str_array(&fk.columns))
    } else {
        stmt.arg(Value::str(&fk.name))
    }
}

/// Normalize a driver-reported referential action to the DSL vocabulary.
///
/// Returns None for absent actions and for "no action" (the implicit
/// default, emitting it would be redundant).
fn normalized_action(action: Option<&str>) -> Option<String> {
    let action = action?.trim().to_lowercase();
    match action.as_str() {
        "" | "no action" => None,
        _ => Some(action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fk(name: &str) -> ForeignKey {
        ForeignKey {
            name: name.to_string(),
            columns: cols(&["user_id"]),
            ref_table: "users".to_string(),
            ref_columns: cols(&["id"]),
            on_update: None,
            on_delete: Some("CASCADE".to_string()),
        }
    }

    fn known() -> HashSet<String> {
        ["users".to_string(), "posts".to_string()].into()
    }

    #[test]
    fn test_up_statement_shape() {
        let config = GeneratorConfig::default();
        let (up, _) = generate("posts", &[fk("fk_custom")], &known(), &config);

        let stmt = &up[0];
        assert_eq!(stmt.operation, "foreign");
        assert_eq!(
            stmt.args,
            vec![Value::str("user_id"), Value::str("fk_custom")]
        );
        let names: Vec<&str> = stmt.modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["references", "on", "onDelete"]);
        assert_eq!(stmt.modifiers[2].args[0], Value::str("cascade"));
        assert!(stmt.warning.is_none());
    }

    #[test]
    fn test_default_name_skipped() {
        let config = GeneratorConfig::default();
        let (up, down) = generate("posts", &[fk("posts_user_id_foreign")], &known(), &config);

        assert_eq!(up[0].args, vec![Value::str("user_id")]);
        // Nameless drop falls back to the column list.
        assert_eq!(
            down[0].args,
            vec![Value::Array(vec![Value::str("user_id")])]
        );
    }

    #[test]
    fn test_down_uses_name_when_kept() {
        let config = GeneratorConfig::default();
        let (_, down) = generate("posts", &[fk("fk_custom")], &known(), &config);
        assert_eq!(down[0].operation, "dropForeign");
        assert_eq!(down[0].args, vec![Value::str("fk_custom")]);
    }

    #[test]
    fn test_no_action_omitted() {
        let mut key = fk("fk_custom");
        key.on_delete = Some("NO ACTION".to_string());
        key.on_update = Some("SET NULL".to_string());

        let config = GeneratorConfig::default();
        let (up, _) = generate("posts", &[key], &known(), &config);
        let names: Vec<&str> = up[0].modifiers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["references", "on", "onUpdate"]);
        assert_eq!(up[0].modifiers[2].args[0], Value::str("set null"));
    }

    #[test]
    fn test_missing_reference_attaches_warning() {
        let mut key = fk("fk_custom");
        key.ref_table = "archived_users".to_string();

        let config = GeneratorConfig::default();
        let (up, _) = generate("posts", &[key], &known(), &config);
        let warning = up[0].warning.as_deref().unwrap();
        assert!(warning.contains("archived_users"));
    }

    #[test]
    fn test_composite_foreign_key() {
        let key = ForeignKey {
            name: "orders_tenant_id_customer_id_foreign".to_string(),
            columns: cols(&["tenant_id", "customer_id"]),
            ref_table: "users".to_string(),
            ref_columns: cols(&["tenant_id", "id"]),
            on_update: None,
            on_delete: None,
        };

        let config = GeneratorConfig::default();
        let (up, _) = generate("orders", &[key], &known(), &config);

        // Name matches the generalized default formula and is skipped.
        assert_eq!(
            up[0].args,
            vec![Value::Array(vec![
                Value::str("tenant_id"),
                Value::str("customer_id")
            ])]
        );
        assert_eq!(
            up[0].modifiers[0].args[0],
            Value::Array(vec![Value::str("tenant_id"), Value::str("id")])
        );
    }
}
