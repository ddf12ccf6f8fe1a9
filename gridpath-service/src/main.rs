mod config;
mod errors;
mod routes;
mod state;

use crate::config::Config;
use crate::state::AppState;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,gridpath_service=debug,axum=info"))
        .expect("failed to init EnvFilter");
    fmt().with_env_filter(env_filter).init();

    let config = Config::from_env();
    let app = routes::build_router(AppState::new());

    info!(addr = %config.addr, version = env!("CARGO_PKG_VERSION"), "starting gridpath-service");

    let listener = match tokio::net::TcpListener::bind(config.addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, "failed to bind address");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app.into_make_service()).await {
        error!(error = %e, "server error");
    }
}
