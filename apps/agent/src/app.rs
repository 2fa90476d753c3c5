//! Application orchestrator: wires the characteristic table to the GATT server.

use std::sync::Arc;

use hivegatt_gatt_server::{ServiceRegistry, build_registry};
use hivegatt_media::FfmpegRenderer;
use tokio_util::sync::CancellationToken;

use crate::config::Config;

/// Runs the agent until shutdown is requested.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let renderer = Arc::new(FfmpegRenderer::new(&config.ffmpeg));
    let registry = Arc::new(build_registry(&config.service_settings(), renderer));
    log_table(&registry);

    let server = spawn_server(&config, Arc::clone(&registry), cancel.clone());

    tracing::info!("agent ready");

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::info!("shutdown signal received");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("SIGINT received, shutting down");
        }
    }

    cancel.cancel();
    server.await??;
    Ok(())
}

fn log_table(registry: &ServiceRegistry) {
    tracing::info!(service = %registry.service_uuid(), "hive service");
    for entry in registry.entries() {
        tracing::debug!(
            uuid = %entry.uuid,
            name = %entry.name,
            access = entry.access.as_str(),
            "characteristic"
        );
    }
}

#[cfg(feature = "bluez")]
fn spawn_server(
    config: &Config,
    registry: Arc<ServiceRegistry>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<anyhow::Result<()>> {
    use hivegatt_gatt_server::{GattServer, GattServerConfig};

    let server = GattServer::new(
        registry,
        GattServerConfig {
            name: config.name.clone(),
            adapter: config.adapter.clone(),
        },
    );
    tokio::spawn(async move {
        let result = server.run(cancel.clone()).await;
        if let Err(e) = &result {
            tracing::error!("GATT server error: {e}");
            // Nothing left to serve; bring the agent down.
            cancel.cancel();
        }
        Ok(result?)
    })
}

#[cfg(not(feature = "bluez"))]
fn spawn_server(
    config: &Config,
    registry: Arc<ServiceRegistry>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<anyhow::Result<()>> {
    tracing::warn!(
        name = %config.name,
        characteristics = registry.entries().len(),
        "built without the `bluez` feature; characteristics are not advertised"
    );
    tokio::spawn(async move {
        cancel.cancelled().await;
        Ok(())
    })
}
