//! GATT service layout and chunked transfer wire types.
//!
//! Shared by the agent and its tests: characteristic UUIDs, the default
//! MTU, the line-transfer `EOF` sentinel, and the chunk type that carries
//! the end-of-transfer rule.

pub mod constants;
pub mod types;

pub use constants::{DEFAULT_MTU, EOF_SENTINEL, RESET_COMMAND, SERVICE_UUID, hive_uuid};
pub use types::{ContentKind, LineAdvance, TransferChunk};
