//! Ferry CLI - Inspect and validate migration job definitions
//!
//! Usage:
//!   ferry validate <config.json>
//!   ferry show <config.json>
//!   ferry fingerprint <config.json>
//!   ferry jobs [--endpoint <host:port>]
//!   ferry connections [--endpoint <host:port>]
//!
//! Examples:
//!   ferry validate drafts/nightly-sync.json
//!   ferry show drafts/nightly-sync.json
//!   ferry jobs --endpoint backend.internal:7171

use clap::{Parser, Subcommand};
use ferry::api::{ApiClient, MigrationBackend, RemoteBackend};
use ferry::api::protocol::MigrationConfigWire;
use ferry::config::Settings;
use ferry::expr::render;
use ferry::job::MigrationConfig;
use ferry::validation::validate;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ferry")]
#[command(about = "Ferry - Console core for configuring and monitoring data-migration jobs")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a job definition file
    Validate {
        /// Path to the job definition JSON
        file: PathBuf,
    },

    /// Print a human-readable summary of a job definition file
    Show {
        /// Path to the job definition JSON
        file: PathBuf,
    },

    /// Print the fingerprint of a job definition file
    Fingerprint {
        /// Path to the job definition JSON
        file: PathBuf,
    },

    /// List job definitions stored on the backend
    Jobs {
        /// Backend endpoint (host:port); defaults to the ferry.toml setting
        #[arg(short, long)]
        endpoint: Option<String>,
    },

    /// List connections configured on the backend
    Connections {
        /// Backend endpoint (host:port); defaults to the ferry.toml setting
        #[arg(short, long)]
        endpoint: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    ferry::logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { file } => cmd_validate(file),
        Commands::Show { file } => cmd_show(file),
        Commands::Fingerprint { file } => cmd_fingerprint(file),
        Commands::Jobs { endpoint } => cmd_jobs(endpoint).await,
        Commands::Connections { endpoint } => cmd_connections(endpoint).await,
    }
}

/// Read and decode a wire-format job definition.
fn load_config(file: &PathBuf) -> Result<MigrationConfig, String> {
    let source = fs::read_to_string(file)
        .map_err(|e| format!("Error reading file '{}': {}", file.display(), e))?;

    let wire: MigrationConfigWire = serde_json::from_str(&source)
        .map_err(|e| format!("Error parsing '{}': {}", file.display(), e))?;

    Ok(wire.decode())
}

fn cmd_validate(file: PathBuf) -> ExitCode {
    let config = match load_config(&file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let errors = validate(&config);
    if errors.is_empty() {
        println!("OK: '{}' is valid", config.name);
        ExitCode::SUCCESS
    } else {
        for error in &errors {
            eprintln!("error: {}", error);
        }
        eprintln!("{} problem(s) found", errors.len());
        ExitCode::FAILURE
    }
}

fn cmd_show(file: PathBuf) -> ExitCode {
    let config = match load_config(&file) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Job: {} (created {})", config.name, config.creation_date);
    if !config.description.is_empty() {
        println!("  {}", config.description);
    }
    println!(
        "Connections: {} ({}) -> {} ({})",
        config.connections.source.name,
        config.connections.source.driver,
        config.connections.destination.name,
        config.connections.destination.driver,
    );

    for (i, item) in config.migration.migrate_items.iter().enumerate() {
        println!();
        println!(
            "Item {}: {} -> {}",
            i,
            item.source.names.join(", "),
            item.destination.names.join(", "),
        );

        if !item.load.entities.is_empty() {
            println!("  Joins:");
            for (entity, cond) in item.load.entities.iter().zip(&item.load.matches) {
                println!(
                    "    {} ON {} = {}",
                    entity,
                    render(Some(&cond.left)),
                    render(Some(&cond.right)),
                );
            }
        }

        if let Some(expr) = &item.filter.expression {
            println!("  Filter:");
            for line in ferry::expr::render_tree(expr).to_text().lines() {
                println!("    {}", line);
            }
        }

        if !item.map.mappings.is_empty() {
            println!("  Mappings:");
            for mapping in &item.map.mappings {
                println!("    {} -> {}", render(Some(&mapping.source)), mapping.target);
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_fingerprint(file: PathBuf) -> ExitCode {
    match load_config(&file) {
        Ok(config) => {
            println!("{}", config.fingerprint());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Connect to the backend, logging in when credentials are configured.
async fn connect(endpoint: Option<String>) -> Result<RemoteBackend, String> {
    let settings = Settings::load().map_err(|e| format!("Settings error: {}", e))?;

    let endpoint = match endpoint {
        Some(e) => e,
        None => settings
            .backend
            .resolved_endpoint()
            .map_err(|e| format!("Settings error: {}", e))?,
    };

    let client = ApiClient::connect_with_timeout(&endpoint, settings.backend.request_timeout())
        .await
        .map_err(|e| format!("Connection error: {}", e))?;
    let backend = RemoteBackend::with_client(client);

    if let Some(auth) = &settings.auth {
        let username = auth
            .resolved_username()
            .map_err(|e| format!("Settings error: {}", e))?;
        let password = auth
            .resolved_password()
            .map_err(|e| format!("Settings error: {}", e))?;
        backend
            .login(&username, &password)
            .await
            .map_err(|e| format!("Login failed: {}", e))?;
    }

    Ok(backend)
}

async fn cmd_jobs(endpoint: Option<String>) -> ExitCode {
    let backend = match connect(endpoint).await {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match backend.get_job_definitions().await {
        Ok(definitions) => {
            if definitions.is_empty() {
                println!("No job definitions");
            }
            for def in definitions {
                println!("{}  {}  ({})", def.id, def.name, def.creation_date);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error listing jobs: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_connections(endpoint: Option<String>) -> ExitCode {
    let backend = match connect(endpoint).await {
        Ok(b) => b,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match backend.list_connections().await {
        Ok(connections) => {
            if connections.is_empty() {
                println!("No connections");
            }
            for conn in connections {
                println!("{}  {}  ({})", conn.id, conn.name, conn.driver);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error listing connections: {}", e);
            ExitCode::FAILURE
        }
    }
}
