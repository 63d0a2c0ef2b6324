use std::{
    env,
    net::{Ipv4Addr, SocketAddrV4},
    sync::Arc,
};

use gateway::{AppState, config::Config, router, tasks};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    let filter =
        env::var(EnvFilter::DEFAULT_ENV).unwrap_or_else(|_| String::new()) + ",hyper_util=off,info";
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::builder().parse_lossy(filter))
        .compact()
        .init();

    if let Err(err) = dotenv {
        tracing::warn!("failed to read .env: {err}");
    }

    let config = Config::from_env()?;
    let app_state = Arc::new(AppState::new(&config)?);

    if config.accept_invalid_certs {
        tracing::info!("upstream certificates are not verified");
    }

    let ip = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port);
    tracing::info!("serving on :{}", config.port);

    let listener = TcpListener::bind(ip).await?;
    axum::serve(listener, router(app_state))
        .with_graceful_shutdown(tasks::shutdown())
        .await?;

    Ok(())
}
