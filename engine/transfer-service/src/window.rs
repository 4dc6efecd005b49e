//! Transfer window lock

use serde::{Deserialize, Serialize};

/// Transfers are refused while the window is locked, e.g. during a live matchday
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransferWindow {
    locked_reason: Option<String>,
}

impl TransferWindow {
    pub fn open() -> Self {
        Self { locked_reason: None }
    }

    pub fn locked(reason: impl Into<String>) -> Self {
        Self { locked_reason: Some(reason.into()) }
    }

    pub fn is_open(&self) -> bool {
        self.locked_reason.is_none()
    }

    pub fn ensure_open(&self) -> crate::Result<()> {
        match &self.locked_reason {
            None => Ok(()),
            Some(reason) => Err(crate::TransferError::WindowClosed(reason.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_window_refuses() {
        assert!(TransferWindow::open().ensure_open().is_ok());

        let err = TransferWindow::locked("Matchday 4 in progress").ensure_open().unwrap_err();
        assert_eq!(err.kind(), squad_core::ErrorKind::TransferWindowClosed);
        assert!(err.to_string().contains("Matchday 4"));
    }
}
