use clap::{Parser, Subcommand};
use coursehub::config::Config;
use coursehub::seed::{SeedAdmin, authorize_cli, seed_admin};
use coursehub::server::{HubState, hub_router};
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser, Debug)]
#[command(name = "coursehub", version, about = "Course platform backend")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Create the bootstrap administrator from SEED_ADMIN_* and exit
    SeedAdmin {
        /// Allow seeding when APP_ENV=production
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = Config::from_env()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        app_env = %cfg.app_env,
        listen_addr = %cfg.listen_addr,
        database_configured = cfg.database_url.is_some(),
        bcrypt_cost = cfg.bcrypt_cost,
        seed_route = cfg.enable_seed_route,
        loglevel = %cfg.loglevel
    );

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(&cfg).await,
        Command::SeedAdmin { force } => seed(&cfg, force).await,
    }
}

async fn serve(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = HubState::new(cfg)?;
    // Fail startup on a missing or unreachable database.
    state.db.init().await?;

    let db = state.db.clone();
    let app = hub_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.shutdown().await;
    Ok(())
}

async fn seed(cfg: &Config, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    authorize_cli(cfg, force)?;
    let admin = SeedAdmin::from_config(cfg)?;
    let state = HubState::new(cfg)?;
    let result = seed_admin(&state.auth, &admin).await;
    state.db.shutdown().await;
    let user = result?;
    info!(user_id = user.id, "bootstrap administrator ready");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
