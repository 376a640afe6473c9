//! Userbase CLI - serve the user API or inspect the store directly

use clap::{Args, Parser, Subcommand};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use userbase::config::{self, Overrides, ServerSettings, UserbaseConfig};
use userbase::{NewUser, UserStore};
use userbase::ui::{self, Icons};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "userbase")]
#[command(version)]
#[command(about = "Minimal user directory service backed by SQLite")]
#[command(long_about = r#"
Userbase stores users (id, name, unique email) in a single SQLite table and
exposes them over HTTP:
  GET  /api/users        list all users
  GET  /api/users/{id}   fetch one user
  POST /api/users        create a user from {"name", "email"}

Example usage:
  userbase serve --port 3001
  userbase add --name "John Doe" --email john@example.com
  userbase list --format json
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Path to the database file (defaults to the config value, then database.sqlite)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl StoreArgs {
    fn load_config(&self) -> anyhow::Result<Option<UserbaseConfig>> {
        config::load_config(self.config.as_deref())
    }

    fn open_store(&self) -> anyhow::Result<(UserStore, PathBuf)> {
        let cfg = self.load_config()?;
        let database = config::resolve_database(self.database.clone(), cfg.as_ref());
        config::ensure_db_dir(&database)?;
        Ok((UserStore::open(&database)?, database))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<IpAddr>,

        /// Port to listen on (overrides the PORT environment variable)
        #[arg(short, long)]
        port: Option<u16>,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Write a config file and create the database schema
    Init {
        #[command(flatten)]
        store: StoreArgs,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Create a user
    Add {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// List all users
    List {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,

        #[command(flatten)]
        store: StoreArgs,
    },

    /// Show a single user
    Show {
        /// User id
        #[arg(short, long)]
        id: i64,

        #[command(flatten)]
        store: StoreArgs,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve { host, port, store } => {
            let cfg = store.load_config()?;
            let settings = ServerSettings::resolve(
                Overrides { host, port, database: store.database },
                cfg.as_ref(),
            )?;

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(userbase::server::start_server(settings))?;
        }

        Commands::Init { store, force } => {
            let config_path = store.config.clone().unwrap_or_else(config::default_config_path);
            let database = store
                .database
                .clone()
                .unwrap_or_else(|| PathBuf::from(config::DEFAULT_DATABASE));

            let cfg = UserbaseConfig {
                database: Some(database.to_string_lossy().to_string()),
                host: None,
                port: Some(config::DEFAULT_PORT),
            };
            config::write_config(&config_path, &cfg, force)?;
            ui::success(&format!("Wrote config to {}", config_path.display()));

            config::ensure_db_dir(&database)?;
            UserStore::open(&database)?.close()?;
            ui::info("Database", &database.display().to_string());
        }

        Commands::Add { name, email, store } => {
            let (store, database) = store.open_store()?;
            let new_user = NewUser::new(name, email)?;
            let id = store.insert_user(&new_user)?;

            ui::success(&format!("Created user {} ({})", id, new_user.email()));
            ui::info("Total users", &store.count_users()?.to_string());
            print_database(&database);
            store.close()?;
        }

        Commands::List { format, store } => {
            let (store, database) = store.open_store()?;
            let users = store.list_users()?;

            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                ui::warn("No users found.");
                print_database(&database);
            } else {
                ui::header(&format!("{} user(s)", users.len()));
                println!("{}", ui::users_table(&users));
            }
            store.close()?;
        }

        Commands::Show { id, store } => {
            let (store, _) = store.open_store()?;
            let user = store.get_user(id)?.ok_or(userbase::Error::NotFound(id))?;

            ui::section(&format!("{} User {}", Icons::PERSON, user.id));
            ui::summary_row("Name: ", &user.name);
            ui::summary_row("Email:", &user.email);
            store.close()?;
        }
    }

    Ok(())
}

fn print_database(database: &Path) {
    ui::status(Icons::DATABASE, "Database", &database.display().to_string());
}
