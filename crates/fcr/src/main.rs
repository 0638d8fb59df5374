use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use fcr_core::{
    catalog::CatalogStore,
    config::Config,
    relay::{RelayClient, RelayOrchestrator},
};
use fcr_http::{AppState, CatalogSettings, HttpServer};
use fcr_mongo::MongoCatalog;
use fcr_telegram::TelegramChannel;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fcr_core::logging::init("fcr")?;

    let cfg = Config::load().context("invalid configuration")?;

    let catalog: Arc<dyn CatalogStore> = Arc::new(
        MongoCatalog::connect(&cfg.mongo_uri, &cfg.db_name, &cfg.collection_name)
            .await
            .context("failed to connect to MongoDB")?,
    );
    info!(db = %cfg.db_name, collection = %cfg.collection_name, "MongoDB connection successful");

    let channel = Arc::new(TelegramChannel::from_credentials(&cfg.telegram));
    let relay = Arc::new(RelayClient::new(
        channel,
        cfg.bin_channel_id,
        cfg.relay.clone(),
    ));

    // Connect eagerly so the first request does not pay for it. Not fatal:
    // relays connect lazily anyway.
    match relay.connect().await {
        Ok(()) => info!("telegram client started"),
        Err(e) => warn!(error = %e, "failed to start telegram client, will retry on first relay"),
    }

    let state = AppState {
        catalog,
        relay: Arc::new(RelayOrchestrator::new(
            relay.clone(),
            cfg.public_base_url.clone(),
        )),
        settings: Arc::new(CatalogSettings {
            search_field: cfg.search_field.clone(),
            max_per_page: cfg.max_per_page,
            deeplink: cfg.deeplink.clone(),
        }),
    };

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    HttpServer::new(cfg.port, state, cfg.static_dir.clone())
        .run(shutdown)
        .await
        .context("HTTP server failed")?;

    match relay.shutdown().await {
        Ok(()) => info!("telegram client stopped"),
        Err(e) => warn!(error = %e, "error stopping telegram client"),
    }

    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received");
    shutdown.cancel();
}
