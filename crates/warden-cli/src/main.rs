//! Warden CLI - run and administer the Warden auth gateway.

mod commands;
mod ui;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "warden")]
#[command(about = "Warden - user registration, login, and JWT auth gateway")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address
        #[arg(long)]
        bind: Option<String>,
    },

    /// Check whether a gateway is running
    Status {
        /// Port to probe (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// User management against the local database
    Admin {
        #[command(subcommand)]
        action: AdminCommands,
    },

    /// Configuration inspection
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Create a new user
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Email address
        #[arg(long)]
        email: String,

        /// Password (prompted if neither this nor --generate-password is given)
        #[arg(long)]
        password: Option<String>,

        /// Generate a random password
        #[arg(long)]
        generate_password: bool,

        /// User role: user or admin
        #[arg(long, default_value = "user")]
        role: String,
    },

    /// List all users
    List,

    /// Delete a user
    Delete {
        /// Email of the user to delete
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show effective configuration (secrets redacted)
    Show,

    /// Print the configuration file path
    Path,

    /// Print a fresh random JWT secret
    GenerateSecret,
}

fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().with_target(false)).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.json_logs);

    match cli.command {
        Commands::Serve { port, bind } => {
            commands::run_serve(commands::serve::ServeArgs { port, bind }).await?;
        }

        Commands::Status { port } => {
            commands::run_status(commands::status::StatusArgs { port }).await?;
        }

        Commands::Admin { action } => {
            let action = match action {
                AdminCommands::Create {
                    name,
                    email,
                    password,
                    generate_password,
                    role,
                } => commands::admin::AdminAction::Create {
                    name,
                    email,
                    password,
                    generate_password,
                    role,
                },
                AdminCommands::List => commands::admin::AdminAction::List,
                AdminCommands::Delete { email } => commands::admin::AdminAction::Delete { email },
            };
            commands::run_admin(commands::admin::AdminArgs { action }).await?;
        }

        Commands::Config { action } => {
            let action = match action {
                Some(ConfigCommands::Show) | None => commands::config::ConfigAction::Show,
                Some(ConfigCommands::Path) => commands::config::ConfigAction::Path,
                Some(ConfigCommands::GenerateSecret) => {
                    commands::config::ConfigAction::GenerateSecret
                }
            };
            commands::run_config(&commands::config::ConfigArgs { action })?;
        }
    }

    Ok(())
}
