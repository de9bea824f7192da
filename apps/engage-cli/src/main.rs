mod commands;
mod config;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use secrecy::SecretString;

use crate::commands::{Identity, Runtime};
use crate::config::AppConfig;

/// Engage - tenant, language and route resolution against the backend API
#[derive(Parser)]
#[command(name = "engage")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Print effective configuration (JSON) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Serve data from the `static_backend` section instead of the REST API
    #[arg(long, global = true)]
    mock: bool,

    /// Bearer token sent to the backend
    #[arg(long, global = true)]
    token: Option<String>,

    /// User id of the session
    #[arg(long, global = true, default_value = "cli")]
    user: String,

    /// Role held by the session user; repeatable
    #[arg(long = "role", global = true)]
    roles: Vec<String>,

    /// Language stored in the session before the command runs
    #[arg(long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate configuration and exit
    Check,
    /// Resolve a tenant by short-name
    Resolve {
        tenant: String,
        /// Redirect to the configured default tenant when unknown
        #[arg(long)]
        fallback: bool,
    },
    /// Show the enabled languages and the active one
    Languages { tenant: String },
    /// Switch the session language
    SelectLanguage { tenant: String, code: String },
    /// Show the global language catalog
    Catalog,
    /// Enable a language for a tenant
    AddLanguage { tenant: String, code: String },
    /// Disable a language for a tenant
    RemoveLanguage { tenant: String, code: String },
    /// Match a URL path and check its required scopes
    Route {
        path: String,
        /// Prefix the application is served under
        #[arg(long)]
        basename: Option<String>,
    },
    /// Load the data of a matched route
    Load {
        path: String,
        #[arg(long)]
        basename: Option<String>,
    },
    /// Move a widget and persist the order
    Reorder {
        engagement_id: i64,
        from: usize,
        to: usize,
    },
    /// Document tree of an engagement's documents widget
    Documents { slug: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);

    if cli.print_config {
        println!("{}", config.to_json()?);
        return Ok(());
    }

    logging::init(&config.logging)?;

    let Some(command) = cli.command else {
        anyhow::bail!("no command given; see --help");
    };

    let identity = Identity {
        token: cli.token.map(SecretString::from),
        user_id: cli.user,
        roles: cli.roles,
        language: cli.language,
    };
    let runtime = Runtime::new(&config, cli.mock, identity)?;

    let output = match command {
        Commands::Check => {
            tracing::info!("configuration is valid");
            println!("Configuration is valid");
            return Ok(());
        }
        Commands::Resolve { tenant, fallback } => runtime.resolve(&tenant, fallback).await?,
        Commands::Languages { tenant } => runtime.languages(&tenant).await?,
        Commands::SelectLanguage { tenant, code } => {
            runtime.select_language(&tenant, &code).await?
        }
        Commands::Catalog => runtime.catalog().await?,
        Commands::AddLanguage { tenant, code } => runtime.add_language(&tenant, &code).await?,
        Commands::RemoveLanguage { tenant, code } => {
            runtime.remove_language(&tenant, &code).await?
        }
        Commands::Route { path, basename } => runtime.route(&path, basename.as_deref())?,
        Commands::Load { path, basename } => runtime.load(&path, basename.as_deref()).await?,
        Commands::Reorder {
            engagement_id,
            from,
            to,
        } => runtime.reorder(engagement_id, from, to).await?,
        Commands::Documents { slug } => runtime.documents(&slug).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
