//! Dirgate - LDAP-backed authentication gateway
//!
//! Authenticates users against an LDAP directory by DN pattern and bcrypt
//! password comparison, then requires full authentication for every request.

use clap::{Parser, Subcommand};
use dirgate_core::DirgateConfig;
use dirgate_server::GatewayServer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dirgate")]
#[command(author = "Dirgate Team")]
#[command(version = dirgate_core::VERSION)]
#[command(about = "LDAP-backed authentication gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Bind address
    #[arg(long, env = "DIRGATE_BIND_ADDRESS")]
    bind: Option<String>,

    /// Port number
    #[arg(short, long, env = "DIRGATE_PORT")]
    port: Option<u16>,

    /// Directory server URL (ldap:// or ldaps://)
    #[arg(long, env = "DIRGATE_DIRECTORY_URL")]
    directory_url: Option<String>,

    /// Root DN under which people and groups are resolved
    #[arg(long, env = "DIRGATE_BASE_DN")]
    base_dn: Option<String>,

    /// Session lifetime in seconds
    #[arg(long, env = "DIRGATE_SESSION_TTL")]
    session_ttl: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DIRGATE_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway server
    Server,

    /// Validate the configuration and exit
    CheckConfig,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    // Load or create config
    let mut config = if let Some(config_path) = &cli.config {
        DirgateConfig::from_file(config_path)?
    } else {
        DirgateConfig::from_env()
    };

    // Override with CLI args
    if let Some(bind) = cli.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = cli.directory_url {
        config.directory.url = url;
    }
    if let Some(base_dn) = cli.base_dn {
        config.directory.base_dn = base_dn;
    }
    if let Some(ttl) = cli.session_ttl {
        config.session.ttl_seconds = ttl;
    }

    match cli.command {
        Some(Commands::Version) => {
            println!("dirgate {}", dirgate_core::VERSION);
        }
        Some(Commands::CheckConfig) => {
            config.validate()?;
            println!("configuration ok");
        }
        Some(Commands::Server) | None => {
            run_server(config).await?;
        }
    }

    Ok(())
}

async fn run_server(config: DirgateConfig) -> anyhow::Result<()> {
    info!("Starting Dirgate {}...", dirgate_core::VERSION);
    info!("Directory: {}", config.directory.url);
    info!(
        "People pattern: {} under {}",
        config.directory.people_pattern, config.directory.base_dn
    );

    let server = GatewayServer::new(config);
    server.run().await?;

    Ok(())
}
