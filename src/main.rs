use clap::{Parser, Subcommand};
use database::AdminRepository;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

/// Backend for the rasoi home-kitchen order business.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
    /// Create an admin account for the mobile app's login.
    CreateAdmin(CreateAdminArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the configured bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the configured bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Parser)]
struct CreateAdminArgs {
    /// The admin's login email.
    #[arg(long)]
    email: String,

    /// The admin's password (at least 8 characters).
    #[arg(long)]
    password: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from the .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Migrate => migrate().await,
        Commands::CreateAdmin(args) => create_admin(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let settings = configuration::load_settings()?;
    let host = args.host.unwrap_or(settings.server.host);
    let port = args.port.unwrap_or(settings.server.port);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    web_server::run_server(addr).await
}

async fn migrate() -> anyhow::Result<()> {
    let pool = database::connect().await?;
    database::run_migrations(&pool).await?;
    tracing::info!("Migrations applied.");
    Ok(())
}

async fn create_admin(args: CreateAdminArgs) -> anyhow::Result<()> {
    let pool = database::connect().await?;
    database::run_migrations(&pool).await?;
    let profile = AdminRepository::new(pool).create(&args.email, &args.password).await?;
    tracing::info!(email = %profile.email, "Admin account created.");
    Ok(())
}
