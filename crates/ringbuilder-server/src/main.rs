mod api;
mod middleware;

use std::sync::Arc;

use ringbuilder_core::load_builder_settings;
use ringbuilder_engine::load_catalog;
use ringbuilder_storefront::StorefrontClient;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Arc::new(ringbuilder_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let settings = load_builder_settings(&config.settings_path)?;
    let products = load_catalog(&config.catalog_path)?;
    let storefront = StorefrontClient::from_app_config(&config)?;
    if storefront.is_none() {
        tracing::warn!(
            "RINGBUILDER_STOREFRONT_URL not set; inference uses the catalog and handles only"
        );
    }

    tracing::info!(
        env = %config.env,
        products = products.len(),
        per_page = settings.per_page,
        "starting ring builder server"
    );

    let app = build_app(AppState {
        products: products.into(),
        settings: Arc::new(settings),
        storefront: storefront.map(Arc::new),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
