//! migrations-gen CLI - generate Laravel migrations from an existing database.

mod wizard;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use migrations_gen::{Config, GenerateError, Generator};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "migrations-gen")]
#[command(about = "Generate Laravel migration files from an existing database schema")]
#[command(version)]
struct Cli {
    /// Path to YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Output JSON result to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: debug, info, warn, error
    #[arg(long, default_value = "info")]
    verbosity: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate migration files from the configured database
    Generate {
        /// Only generate these tables/views (comma separated)
        #[arg(long, value_delimiter = ',')]
        tables: Option<Vec<String>>,

        /// Tables/views to exclude (comma separated)
        #[arg(long, value_delimiter = ',')]
        ignore: Option<Vec<String>>,

        /// Output directory for migration files
        #[arg(long)]
        path: Option<PathBuf>,

        /// Fixed datetime for filename prefixes ("YYYY-MM-DD" or "YYYY-MM-DD HH:MM:SS")
        #[arg(long)]
        date: Option<String>,

        /// Table migration filename pattern
        #[arg(long)]
        table_filename: Option<String>,

        /// View migration filename pattern
        #[arg(long)]
        view_filename: Option<String>,

        /// Foreign key migration filename pattern
        #[arg(long)]
        fk_filename: Option<String>,

        /// Never emit explicit index names
        #[arg(long)]
        default_index_names: bool,

        /// Never emit explicit foreign key names
        #[arg(long)]
        default_fk_names: bool,

        /// Emit table/column collation when it differs from the default
        #[arg(long)]
        use_db_collation: bool,

        /// Don't generate view migrations
        #[arg(long)]
        skip_views: bool,

        /// Generate all migrations into a single file
        #[arg(long)]
        squash: bool,
    },

    /// Test the database connection and catalog visibility
    HealthCheck,

    /// Create or edit a configuration file interactively
    Init {
        /// Output path for configuration file [default: config.yaml]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force overwrite existing file without confirmation
        #[arg(long, short)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<(), GenerateError> {
    let cli = Cli::parse();

    // Handle init separately: no logging setup keeps the terminal clean
    // for interactive prompts, and no existing config is needed.
    if let Commands::Init { output, force } = cli.command {
        let output_path = output.unwrap_or_else(|| PathBuf::from("config.yaml"));
        wizard::run_wizard(&output_path, force)
            .await
            .map_err(|e| GenerateError::Config(e.to_string()))?;
        return Ok(());
    }

    setup_logging(&cli.verbosity, &cli.log_format);

    let mut config = Config::load(&cli.config)?;
    info!("Loaded configuration from {:?}", cli.config);

    match cli.command {
        Commands::Init { .. } => unreachable!(), // Handled above
        Commands::Generate {
            tables,
            ignore,
            path,
            date,
            table_filename,
            view_filename,
            fk_filename,
            default_index_names,
            default_fk_names,
            use_db_collation,
            skip_views,
            squash,
        } => {
            // Apply overrides
            let gen = &mut config.generator;
            if tables.is_some() {
                gen.tables = tables;
            }
            if let Some(ignore) = ignore {
                gen.ignore = ignore;
            }
            if let Some(path) = path {
                gen.path = path;
            }
            if date.is_some() {
                gen.date = date;
            }
            if let Some(pattern) = table_filename {
                gen.table_filename = pattern;
            }
            if let Some(pattern) = view_filename {
                gen.view_filename = pattern;
            }
            if let Some(pattern) = fk_filename {
                gen.fk_filename = pattern;
            }
            gen.default_index_names |= default_index_names;
            gen.default_fk_names |= default_fk_names;
            gen.use_db_collation |= use_db_collation;
            gen.skip_views |= skip_views;
            gen.squash |= squash;
            config.validate()?;

            let generator = Generator::new(config).await?;
            let result = generator.run().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("\nGeneration completed!");
                println!("  Source: {}", result.db_type);
                println!("  Tables: {}", result.tables);
                println!("  Views: {}", result.views);
                println!("  Foreign key sets: {}", result.foreign_key_sets);
                println!("  Files written: {}", result.files.len());
                if result.warnings > 0 {
                    println!("  Warnings: {} (see log output)", result.warnings);
                }
            }
        }

        Commands::HealthCheck => {
            let generator = Generator::new(config).await?;
            let result = generator.health_check().await?;

            if cli.output_json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("Health Check Results:");
                println!(
                    "  Connection ({}): {} ({}ms)",
                    result.db_type,
                    if result.connected { "OK" } else { "FAILED" },
                    result.latency_ms
                );
                println!("  Tables visible: {}", result.tables);
                println!("  Views visible: {}", result.views);
            }
        }
    }

    Ok(())
}

fn setup_logging(verbosity: &str, format: &str) {
    let level = match verbosity.to_lowercase().as_str() {
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    if format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
