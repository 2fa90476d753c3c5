//! Serves a [`ServiceRegistry`] over BlueZ.

use std::sync::Arc;

use bluer::adv::Advertisement;
use bluer::gatt::local::{
    Application, Characteristic, CharacteristicRead, CharacteristicReadRequest,
    CharacteristicWrite, CharacteristicWriteMethod, CharacteristicWriteRequest, Service,
};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::registry::{Access, CharacteristicEntry, ServiceRegistry};
use crate::ServerError;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct GattServerConfig {
    /// Advertised local name and adapter alias.
    pub name: String,
    /// Adapter to use (e.g. `hci0`); the default adapter when `None`.
    pub adapter: Option<String>,
}

/// BlueZ GATT server for one registry.
pub struct GattServer {
    registry: Arc<ServiceRegistry>,
    config: GattServerConfig,
}

impl GattServer {
    pub fn new(registry: Arc<ServiceRegistry>, config: GattServerConfig) -> Self {
        Self { registry, config }
    }

    /// Registers the service, advertises it and serves until `cancel` fires.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), ServerError> {
        let session = bluer::Session::new().await?;
        let adapter = match &self.config.adapter {
            Some(name) => session.adapter(name)?,
            None => session.default_adapter().await?,
        };
        tracing::info!(adapter = adapter.name(), "using Bluetooth adapter");

        if !adapter.is_powered().await? {
            adapter.set_powered(true).await?;
        }
        adapter.set_alias(self.config.name.clone()).await?;

        let _app_handle = adapter.serve_gatt_application(self.application()).await?;
        tracing::info!(
            service = %self.registry.service_uuid(),
            characteristics = self.registry.entries().len(),
            "GATT service registered"
        );

        let adv = Advertisement {
            service_uuids: vec![self.registry.service_uuid()].into_iter().collect(),
            discoverable: Some(true),
            local_name: Some(self.config.name.clone()),
            ..Default::default()
        };
        let _adv_handle = adapter.advertise(adv).await?;
        tracing::info!(name = %self.config.name, "advertising");

        cancel.cancelled().await;
        tracing::info!("GATT server shutting down");
        Ok(())
    }

    fn application(&self) -> Application {
        let characteristics = self
            .registry
            .entries()
            .iter()
            .map(|entry| self.characteristic(entry))
            .collect();

        Application {
            services: vec![Service {
                uuid: self.registry.service_uuid(),
                primary: true,
                characteristics,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn characteristic(&self, entry: &CharacteristicEntry) -> Characteristic {
        let uuid = entry.uuid;
        let registry = Arc::clone(&self.registry);

        match entry.access {
            Access::Read(_) => {
                // Payload of the last offset-0 read, for BlueZ long reads
                // that continue at a non-zero offset.
                let last = Arc::new(Mutex::new(Vec::<u8>::new()));
                Characteristic {
                    uuid,
                    read: Some(CharacteristicRead {
                        read: true,
                        fun: Box::new(move |req: CharacteristicReadRequest| {
                            let registry = Arc::clone(&registry);
                            let last = Arc::clone(&last);
                            Box::pin(async move {
                                let mut last = last.lock().await;
                                if req.offset == 0 {
                                    *last = registry.read(uuid).await;
                                }
                                let offset = usize::from(req.offset).min(last.len());
                                Ok(last[offset..].to_vec())
                            })
                        }),
                        ..Default::default()
                    }),
                    ..Default::default()
                }
            }
            Access::Write(_) => Characteristic {
                uuid,
                write: Some(CharacteristicWrite {
                    write: true,
                    write_without_response: true,
                    method: CharacteristicWriteMethod::Fun(Box::new(
                        move |value: Vec<u8>, _req: CharacteristicWriteRequest| {
                            let registry = Arc::clone(&registry);
                            Box::pin(async move {
                                registry.write(uuid, &value).await;
                                Ok(())
                            })
                        },
                    )),
                    ..Default::default()
                }),
                ..Default::default()
            },
        }
    }
}
