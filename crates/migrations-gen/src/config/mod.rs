//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;

use crate::error::Result;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_yaml_minimal() {
        let yaml = r#"
connection:
  type: mysql
  host: localhost
  database: app
  user: root
  password: secret
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.connection.normalized_type().unwrap(), "mysql");
        assert_eq!(config.connection.effective_port(), 3306);
        assert!(!config.generator.squash);
        assert_eq!(config.generator.path.to_str().unwrap(), "migrations");
    }

    #[test]
    fn test_from_yaml_generator_flags() {
        let yaml = r#"
connection:
  type: postgres
  host: db.internal
  database: app
  user: app
  password: secret
  schema: tenant
generator:
  squash: true
  skip_views: true
  use_db_collation: true
  default_index_names: true
  ignore:
    - audit_log
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.generator.squash);
        assert!(config.generator.skip_views);
        assert!(config.generator.default_index_names);
        assert!(!config.generator.default_fk_names);
        assert_eq!(config.connection.effective_schema(), "tenant");
        assert_eq!(config.generator.ignore, vec!["audit_log"]);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let yaml = r#"
connection:
  type: mysql
  host: ""
  database: app
  user: root
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }
}
