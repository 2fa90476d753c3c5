//! Where typed errors become empty payloads.

use uuid::Uuid;

use crate::ServerError;

/// Returns the payload, or logs the failure and returns an empty payload.
///
/// The client cannot tell "no data" from "error"; the log line is the only
/// record of what went wrong.
pub fn collapse(name: &str, uuid: Uuid, result: Result<Vec<u8>, ServerError>) -> Vec<u8> {
    match result {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(
                characteristic = name,
                %uuid,
                kind = e.kind(),
                error = %e,
                "characteristic failed, returning empty payload"
            );
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hivegatt_transfer::TransferError;
    use std::path::PathBuf;

    #[test]
    fn ok_passes_through() {
        assert_eq!(collapse("x", Uuid::nil(), Ok(b"data".to_vec())), b"data");
    }

    #[test]
    fn errors_become_empty() {
        let err = ServerError::Transfer(TransferError::SourceUnavailable(PathBuf::from(
            "/home/bee/GATT_server/picture.jpg",
        )));
        assert_eq!(err.kind(), "source_unavailable");
        assert!(collapse("picture", Uuid::nil(), Err(err)).is_empty());
    }
}
