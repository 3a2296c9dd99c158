//! Tooltip errors

use core::fmt;

/// Failures of [`Tooltips::create`](crate::Tooltips::create)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipError {
    /// The popup window already exists
    AlreadyCreated,
    /// The host refused to create the popup window
    PopupCreationFailed,
}

impl fmt::Display for TipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TipError::AlreadyCreated => write!(f, "tooltip window already created"),
            TipError::PopupCreationFailed => write!(f, "failed to create tooltip window"),
        }
    }
}
