use anyhow::Result;
use clap::Parser;
use datafactory_core::config::Config;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod connection;
mod error;
mod output;

use cli::{ActivityTypeCommands, Cli, Commands, ProfileCommands};
use connection::ConnectionManager;
use error::AdfCtlError;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level
    init_tracing(cli.verbose);

    let conn_mgr = match load_connection_manager(&cli) {
        Ok(conn_mgr) => conn_mgr,
        Err(e) => {
            e.print_diagnostic();
            std::process::exit(e.exit_code());
        }
    };

    if let Err(e) = execute_command(&cli, &conn_mgr).await {
        e.print_diagnostic();
        std::process::exit(e.exit_code());
    }

    Ok(())
}

/// Load configuration from `--config-file` or the default location
fn load_connection_manager(cli: &Cli) -> Result<ConnectionManager, AdfCtlError> {
    let (config, config_path) = if let Some(config_file) = &cli.config_file {
        let path = std::path::PathBuf::from(config_file);
        debug!("Loading config from explicit path: {:?}", path);
        let config = Config::load_from_path(&path)?;
        (config, Some(path))
    } else {
        debug!("Loading config from default location");
        (Config::load()?, None)
    };

    Ok(ConnectionManager::with_config_path(config, config_path))
}

fn init_tracing(verbose: u8) {
    // RUST_LOG wins over -v
    let filter = if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::EnvFilter::from_default_env()
    } else {
        let level = match verbose {
            0 => "adfctl=warn,datafactory_core=warn",
            1 => "adfctl=info,datafactory_core=info",
            2 => "adfctl=debug,datafactory_core=debug",
            _ => "adfctl=trace,datafactory_core=trace",
        };
        tracing_subscriber::EnvFilter::new(level)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .compact(),
        )
        .init();

    debug!("Tracing initialized with verbosity level: {}", verbose);
}

async fn execute_command(cli: &Cli, conn_mgr: &ConnectionManager) -> Result<(), AdfCtlError> {
    info!("Command: {}", format_command(&cli.command));

    let start = std::time::Instant::now();
    let result = match &cli.command {
        Commands::Version => {
            debug!("Showing version information");
            match cli.output {
                cli::OutputFormat::Json | cli::OutputFormat::Yaml => {
                    let output_data = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "name": env!("CARGO_PKG_NAME"),
                    });

                    let fmt = match cli.output {
                        cli::OutputFormat::Yaml => output::OutputFormat::Yaml,
                        _ => output::OutputFormat::Json,
                    };

                    output::print_result(&output_data, fmt, cli.query.as_deref())?;
                }
                _ => {
                    println!("adfctl {}", env!("CARGO_PKG_VERSION"));
                }
            }
            Ok(())
        }

        Commands::Profile(profile_cmd) => {
            debug!("Executing profile command");
            commands::profile::handle_profile_command(profile_cmd, conn_mgr, cli.output).await
        }

        Commands::ActivityType(activity_cmd) => {
            debug!("Executing activity-type command");
            commands::activity_type::handle_activity_type_command(
                activity_cmd,
                conn_mgr,
                cli.profile.as_deref(),
                cli.output,
                cli.query.as_deref(),
            )
            .await
        }
    };

    let duration = start.elapsed();
    match &result {
        Ok(_) => info!("Command completed successfully in {:?}", duration),
        Err(e) => debug!("Command failed after {:?}: {}", duration, e),
    }

    result
}

/// Command name for logging; arguments are left out since they may carry tokens
fn format_command(command: &Commands) -> String {
    match command {
        Commands::Version => "version".to_string(),
        Commands::Profile(cmd) => {
            let sub = match cmd {
                ProfileCommands::List => "list",
                ProfileCommands::Path => "path",
                ProfileCommands::Show { .. } => "show",
                ProfileCommands::Set { .. } => "set",
                ProfileCommands::Remove { .. } => "remove",
                ProfileCommands::Default { .. } => "default",
            };
            format!("profile {}", sub)
        }
        Commands::ActivityType(cmd) => {
            let sub = match cmd {
                ActivityTypeCommands::Get { .. } => "get",
                ActivityTypeCommands::List { .. } => "list",
                ActivityTypeCommands::Create { .. } => "create",
                ActivityTypeCommands::CreateRaw { .. } => "create-raw",
                ActivityTypeCommands::Delete { .. } => "delete",
            };
            format!("activity-type {}", sub)
        }
    }
}
