use std::time::Duration;

use clap::Parser;

use coindrop::{Gateway, QueryServer, ServerError, Settings};
use coindrop_room::{CoinLifecycle, RoomDirectory};
use coindrop_store::{MemoryStore, RoomStateStore};

#[derive(Parser, Debug)]
#[command(name = "coindrop")]
struct Args {
    #[arg(long, default_value = "config/coindrop.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(&args.config)?;
    settings.override_from_env();

    let directory =
        RoomDirectory::new(settings.rooms.clone()).map_err(ServerError::Settings)?;
    tracing::info!(rooms = directory.len(), "configuration loaded");

    let store = RoomStateStore::new(MemoryStore::new());
    let lifecycle = CoinLifecycle::new(
        directory,
        store,
        Duration::from_secs(settings.coin_ttl_secs),
    );

    // One generation per room per process lifetime, armed for expiry.
    lifecycle.generate_all().await?;

    let query = QueryServer::bind(&settings.query_addr, lifecycle.clone()).await?;
    tokio::spawn(async move {
        if let Err(e) = query.run().await {
            tracing::error!(error = %e, "query endpoint exited");
        }
    });

    let gateway = Gateway::bind(&settings.listen_addr, lifecycle).await?;
    gateway.run().await
}
