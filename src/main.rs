use std::fs;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wayfare::auth::PasswordHasher;
use wayfare::config::{OPENWEATHER_KEY_ENV, ServerConfig};
use wayfare::server::{AppState, create_router};
use wayfare::store::{SqliteStore, Store};
use wayfare::types::{NewUser, Role};
use wayfare::weather::{DEFAULT_BASE_URL, OpenWeatherClient};

#[derive(Parser)]
#[command(name = "wayfare")]
#[command(about = "A travel planning and weather server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Administrative commands
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },

    /// Start the server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, short, default_value = "8080")]
        port: u16,

        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// OpenWeather API key. Falls back to WAYFARE_OPENWEATHER_API_KEY.
        /// Weather routes answer 503 when neither is set.
        #[arg(long)]
        openweather_api_key: Option<String>,

        /// OpenWeather base URL, overridable for testing
        #[arg(long, default_value = DEFAULT_BASE_URL)]
        openweather_base_url: String,
    },
}

#[derive(Subcommand)]
enum AdminCommands {
    /// Initialize the database and create the bootstrap admin account
    Init {
        /// Data directory for the database
        #[arg(long, default_value = "./data")]
        data_dir: String,

        /// Admin account email
        #[arg(long)]
        email: String,

        /// Admin account password (6 to 64 characters)
        #[arg(long)]
        password: String,

        /// Admin first name
        #[arg(long, default_value = "Admin")]
        first_name: String,

        /// Admin last name
        #[arg(long, default_value = "User")]
        last_name: String,
    },
}

fn run_init(
    data_dir: String,
    email: String,
    password: String,
    first_name: String,
    last_name: String,
) -> anyhow::Result<()> {
    let data_path: std::path::PathBuf = data_dir.into();
    fs::create_dir_all(&data_path)?;

    let db_path = data_path.join("wayfare.db");
    let store = SqliteStore::new(&db_path)?;
    store.initialize()?;

    if store.has_admin_user()? {
        bail!("Server already initialized: an admin account exists in {}", db_path.display());
    }

    if password.chars().count() < 6 || password.chars().count() > 64 {
        bail!("Password must be between 6 and 64 characters");
    }

    let hasher = PasswordHasher::new();
    let admin = store.create_user(&NewUser {
        email,
        password_hash: hasher.hash(&password)?,
        first_name,
        last_name,
        role: Role::Admin,
    })?;

    println!("Created admin account '{}' (id {})", admin.email, admin.id);
    println!("Database at: {}", db_path.display());

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wayfare=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Admin { command } => match command {
            AdminCommands::Init {
                data_dir,
                email,
                password,
                first_name,
                last_name,
            } => {
                run_init(data_dir, email, password, first_name, last_name)?;
            }
        },
        Commands::Serve {
            host,
            port,
            data_dir,
            openweather_api_key,
            openweather_base_url,
        } => {
            let config = ServerConfig {
                host,
                port,
                data_dir: data_dir.into(),
                openweather_api_key: openweather_api_key
                    .or_else(|| std::env::var(OPENWEATHER_KEY_ENV).ok()),
                openweather_base_url,
            };

            fs::create_dir_all(&config.data_dir)?;
            let store = SqliteStore::new(config.db_path())?;
            store.initialize()?;

            let weather = match &config.openweather_api_key {
                Some(key) => Some(OpenWeatherClient::new(
                    key.clone(),
                    config.openweather_base_url.clone(),
                )?),
                None => {
                    info!("No OpenWeather API key configured; weather routes disabled");
                    None
                }
            };

            let state = Arc::new(AppState::new(Arc::new(store), weather));

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
