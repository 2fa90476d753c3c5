//! Characteristic table of the hive service.

use std::sync::Arc;

use uuid::Uuid;

use crate::boundary::collapse;
use crate::endpoint::{ReadEndpoint, WriteEndpoint};
use crate::ServerError;

/// What a characteristic supports.
#[derive(Clone)]
pub enum Access {
    Read(Arc<dyn ReadEndpoint>),
    Write(Arc<dyn WriteEndpoint>),
}

impl Access {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read(_) => "read",
            Self::Write(_) => "write",
        }
    }
}

/// One registered characteristic.
#[derive(Clone)]
pub struct CharacteristicEntry {
    pub uuid: Uuid,
    /// Human-readable name, used in logs.
    pub name: String,
    pub access: Access,
}

/// The service and its characteristics, in registration order.
pub struct ServiceRegistry {
    service_uuid: Uuid,
    entries: Vec<CharacteristicEntry>,
}

impl ServiceRegistry {
    pub fn new(service_uuid: Uuid) -> Self {
        Self {
            service_uuid,
            entries: Vec::new(),
        }
    }

    /// Registers a readable characteristic. A later registration with the
    /// same UUID replaces the earlier one.
    pub fn add_read(
        &mut self,
        uuid: Uuid,
        name: impl Into<String>,
        endpoint: impl ReadEndpoint,
    ) -> &mut Self {
        self.insert(uuid, name.into(), Access::Read(Arc::new(endpoint)))
    }

    /// Registers a writable characteristic.
    pub fn add_write(
        &mut self,
        uuid: Uuid,
        name: impl Into<String>,
        endpoint: impl WriteEndpoint,
    ) -> &mut Self {
        self.insert(uuid, name.into(), Access::Write(Arc::new(endpoint)))
    }

    fn insert(&mut self, uuid: Uuid, name: String, access: Access) -> &mut Self {
        let entry = CharacteristicEntry { uuid, name, access };
        match self.entries.iter_mut().find(|e| e.uuid == uuid) {
            Some(existing) => {
                tracing::warn!(%uuid, old = %existing.name, new = %entry.name, "characteristic replaced");
                *existing = entry;
            }
            None => self.entries.push(entry),
        }
        self
    }

    pub fn service_uuid(&self) -> Uuid {
        self.service_uuid
    }

    pub fn entries(&self) -> &[CharacteristicEntry] {
        &self.entries
    }

    pub fn get(&self, uuid: Uuid) -> Option<&CharacteristicEntry> {
        self.entries.iter().find(|e| e.uuid == uuid)
    }

    /// Serves a read. Never fails: errors are logged and collapse to an
    /// empty payload.
    pub async fn read(&self, uuid: Uuid) -> Vec<u8> {
        let Some(entry) = self.get(uuid) else {
            return collapse("unknown", uuid, Err(ServerError::UnknownCharacteristic(uuid)));
        };
        let result = match &entry.access {
            Access::Read(endpoint) => endpoint.read().await,
            Access::Write(_) => Err(ServerError::UnsupportedOperation(uuid)),
        };
        collapse(&entry.name, uuid, result)
    }

    /// Serves a write. The acknowledgement is always empty.
    pub async fn write(&self, uuid: Uuid, value: &[u8]) -> Vec<u8> {
        let Some(entry) = self.get(uuid) else {
            return collapse("unknown", uuid, Err(ServerError::UnknownCharacteristic(uuid)));
        };
        let result = match &entry.access {
            Access::Write(endpoint) => endpoint.write(value).await,
            Access::Read(_) => Err(ServerError::UnsupportedOperation(uuid)),
        };
        collapse(&entry.name, uuid, result)
    }
}
