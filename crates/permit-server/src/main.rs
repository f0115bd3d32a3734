use clap::Parser;
use permit_core::PermitConfig;

mod auth;
mod error;
mod handlers;
mod routes;
mod state;

use state::AppState;

/// Permit licensing registry server.
#[derive(Debug, Parser)]
#[command(name = "permit-server", version, about)]
struct Args {
    /// Path to the configuration file.
    #[arg(short, long, env = "PERMIT_CONFIG", default_value = "permit.yaml")]
    config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        )
        .init();

    let args = Args::parse();
    let config = PermitConfig::from_file(&args.config)?;

    let state = AppState::init(config).await?;
    let app = routes::build_router(state.clone());

    let addr = state.config.server.bind_addr.clone();
    tracing::info!("permit-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
