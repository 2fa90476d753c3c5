use hivegatt_protocol::RESET_COMMAND;

use crate::SessionHandle;

/// Which written values trigger a reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetTrigger {
    /// Any write, including an empty one.
    AnyWrite,
    /// Only a write whose bytes equal the command exactly.
    Command(String),
}

impl ResetTrigger {
    /// The `reset` literal used by the line-log characteristics.
    pub fn reset_command() -> Self {
        Self::Command(RESET_COMMAND.to_string())
    }

    pub fn accepts(&self, value: &[u8]) -> bool {
        match self {
            Self::AnyWrite => true,
            Self::Command(command) => value == command.as_bytes(),
        }
    }
}

/// Write-side companion of a transfer: rewinds the shared session.
#[derive(Clone)]
pub struct ResetControl {
    target: SessionHandle,
    trigger: ResetTrigger,
    purge_artifact: bool,
}

impl ResetControl {
    /// Creates a control that purges transient artifacts on reset.
    pub fn new(target: SessionHandle, trigger: ResetTrigger) -> Self {
        Self {
            target,
            trigger,
            purge_artifact: true,
        }
    }

    pub fn with_purge_artifact(mut self, purge: bool) -> Self {
        self.purge_artifact = purge;
        self
    }

    /// Handles a write. The acknowledgement is always empty; a value that
    /// does not match the trigger leaves the session alone.
    pub async fn reset(&self, value: &[u8]) -> Vec<u8> {
        if !self.trigger.accepts(value) {
            tracing::debug!(len = value.len(), "reset write ignored");
            return Vec::new();
        }
        self.target.lock().await.reset(self.purge_artifact);
        Vec::new()
    }

    pub fn trigger(&self) -> &ResetTrigger {
        &self.trigger
    }
}
