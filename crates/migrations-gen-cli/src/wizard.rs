//! Interactive configuration wizard for creating/editing config files.

use std::path::Path;

use dialoguer::{Confirm, Input, Password, Select};
use migrations_gen::{Config, ConnectionConfig, Generator, GeneratorConfig};

/// Result type for wizard operations.
pub type WizardResult<T> = Result<T, WizardError>;

/// Errors that can occur during wizard execution.
#[derive(Debug)]
pub enum WizardError {
    /// User cancelled the wizard.
    Cancelled,
    /// IO error (file read/write).
    Io(std::io::Error),
    /// Validation error.
    Validation(String),
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cancelled => write!(f, "Configuration cancelled"),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for WizardError {}

impl From<std::io::Error> for WizardError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<dialoguer::Error> for WizardError {
    fn from(e: dialoguer::Error) -> Self {
        Self::Io(std::io::Error::other(e.to_string()))
    }
}

/// Action to take when config file already exists.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ExistingFileAction {
    Edit,
    Overwrite,
    Abort,
}

/// Run the configuration wizard.
pub async fn run_wizard(output: &Path, force: bool) -> WizardResult<()> {
    println!();
    println!("migrations-gen - Configuration Wizard");
    println!("=====================================");
    println!();

    // Check if file exists and determine action
    let existing_config = if output.exists() && !force {
        match prompt_existing_file_action(output)? {
            ExistingFileAction::Edit => {
                println!("Loading existing configuration...");
                match Config::load(output) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        println!("Warning: Could not parse existing file: {}", e);
                        println!("Starting with fresh configuration.\n");
                        None
                    }
                }
            }
            ExistingFileAction::Overwrite => {
                println!("Starting with fresh configuration.\n");
                None
            }
            ExistingFileAction::Abort => {
                return Err(WizardError::Cancelled);
            }
        }
    } else {
        None
    };

    let connection = prompt_connection_config(existing_config.as_ref().map(|c| &c.connection))?;
    let generator = prompt_generator_config(existing_config.as_ref().map(|c| &c.generator))?;

    let config = Config {
        connection,
        generator,
    };

    if let Err(e) = config.validate() {
        return Err(WizardError::Validation(e.to_string()));
    }

    print_summary(&config);

    if prompt_connection_test()? {
        test_connection(&config).await;
    }

    if !prompt_save_confirm(output)? {
        return Err(WizardError::Cancelled);
    }

    write_config(&config, output)?;

    println!("\nConfiguration saved to {}", output.display());
    println!("Run 'migrations-gen generate' to generate the migrations.");

    Ok(())
}

fn prompt_existing_file_action(path: &Path) -> WizardResult<ExistingFileAction> {
    println!("File already exists: {}\n", path.display());

    let options = &["Edit existing configuration", "Overwrite with new", "Abort"];
    let selection = Select::new()
        .with_prompt("What would you like to do?")
        .items(options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => ExistingFileAction::Edit,
        1 => ExistingFileAction::Overwrite,
        _ => ExistingFileAction::Abort,
    })
}

fn prompt_connection_config(existing: Option<&ConnectionConfig>) -> WizardResult<ConnectionConfig> {
    println!("Source Database");
    println!("---------------");

    let types = &["mysql", "postgres"];
    let default_type = existing
        .and_then(|c| c.normalized_type().ok())
        .map(|t| if t == "postgres" { 1 } else { 0 })
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt("  Database type")
        .items(types)
        .default(default_type)
        .interact()?;
    let db_type = types[selection].to_string();

    let host: String = Input::new()
        .with_prompt("  Host")
        .default(
            existing
                .map(|c| c.host.clone())
                .unwrap_or_else(|| "localhost".to_string()),
        )
        .interact_text()?;

    let default_port = if db_type == "postgres" { 5432 } else { 3306 };
    let port: u16 = Input::new()
        .with_prompt("  Port")
        .default(existing.and_then(|c| c.port).unwrap_or(default_port))
        .interact_text()?;

    let database: String = Input::new()
        .with_prompt("  Database")
        .default(existing.map(|c| c.database.clone()).unwrap_or_default())
        .interact_text()?;

    let user: String = Input::new()
        .with_prompt("  User")
        .default(existing.map(|c| c.user.clone()).unwrap_or_default())
        .interact_text()?;

    let prompt = if existing.is_some() {
        "  Password (blank keeps current)"
    } else {
        "  Password"
    };
    let password: String = Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()?;
    let password = if password.is_empty() {
        existing.map(|c| c.password.clone()).unwrap_or(password)
    } else {
        password
    };

    let (schema, ssl_mode) = if db_type == "postgres" {
        let schema: String = Input::new()
            .with_prompt("  Schema")
            .default(
                existing
                    .and_then(|c| c.schema.clone())
                    .unwrap_or_else(|| "public".to_string()),
            )
            .interact_text()?;

        let modes = &["disable", "require", "verify-ca", "verify-full"];
        let default_mode = existing
            .map(|c| c.ssl_mode.as_str())
            .and_then(|m| modes.iter().position(|&v| v == m))
            .unwrap_or(0);
        let selection = Select::new()
            .with_prompt("  SSL mode")
            .items(modes)
            .default(default_mode)
            .interact()?;

        (Some(schema), modes[selection].to_string())
    } else {
        (None, "disable".to_string())
    };

    println!();
    Ok(ConnectionConfig {
        r#type: db_type,
        host,
        port: Some(port),
        database,
        user,
        password,
        schema,
        ssl_mode,
    })
}

fn prompt_generator_config(existing: Option<&GeneratorConfig>) -> WizardResult<GeneratorConfig> {
    println!("Generation Options");
    println!("------------------");

    let defaults = GeneratorConfig::default();
    let base = existing.unwrap_or(&defaults);

    let path: String = Input::new()
        .with_prompt("  Output directory")
        .default(base.path.display().to_string())
        .interact_text()?;

    let squash = Confirm::new()
        .with_prompt("  Squash everything into a single migration file?")
        .default(base.squash)
        .interact()?;

    let skip_views = Confirm::new()
        .with_prompt("  Skip views?")
        .default(base.skip_views)
        .interact()?;

    let use_db_collation = Confirm::new()
        .with_prompt("  Emit table/column collation?")
        .default(base.use_db_collation)
        .interact()?;

    let default_index_names = Confirm::new()
        .with_prompt("  Always rely on default index names (never emit explicit names)?")
        .default(base.default_index_names)
        .interact()?;

    let default_fk_names = Confirm::new()
        .with_prompt("  Always rely on default foreign key names?")
        .default(base.default_fk_names)
        .interact()?;

    println!();
    Ok(GeneratorConfig {
        path: path.into(),
        squash,
        skip_views,
        use_db_collation,
        default_index_names,
        default_fk_names,
        ..base.clone()
    })
}

fn print_summary(config: &Config) {
    println!("Configuration Summary");
    println!("---------------------");
    // ConnectionConfig's Debug impl redacts the password.
    println!("{:#?}", config.connection);
    println!("{:#?}", config.generator);
    println!();
}

fn prompt_connection_test() -> WizardResult<bool> {
    Ok(Confirm::new()
        .with_prompt("Test the connection now?")
        .default(true)
        .interact()?)
}

async fn test_connection(config: &Config) {
    println!("Testing connection...");
    match Generator::new(config.clone()).await {
        Ok(generator) => match generator.health_check().await {
            Ok(health) => {
                println!(
                    "  OK: {} tables, {} views visible ({}ms)",
                    health.tables, health.views, health.latency_ms
                );
            }
            Err(e) => println!("  Introspection failed: {}", e),
        },
        Err(e) => println!("  Connection failed: {}", e),
    }
    println!();
}

fn prompt_save_confirm(output: &Path) -> WizardResult<bool> {
    Ok(Confirm::new()
        .with_prompt(format!("Save configuration to {}?", output.display()))
        .default(true)
        .interact()?)
}

fn write_config(config: &Config, output: &Path) -> WizardResult<()> {
    let yaml = serde_yaml::to_string(config)
        .map_err(|e| WizardError::Validation(format!("serializing configuration: {}", e)))?;
    std::fs::write(output, yaml)?;
    Ok(())
}
