//! Dialog error taxonomy

use crate::dom::DomError;
use thiserror::Error;

/// Errors surfaced by the dialog lifecycle.
///
/// Errors during the open sequence are returned synchronously to the caller
/// and leave the document untouched (or fully rolled back). Errors during
/// teardown are logged and never propagate — see `DialogService`.
#[derive(Debug, Error)]
pub enum DialogError {
    /// The configured container node is missing from the document. Raised
    /// before any document mutation at open time.
    #[error("dialog container node '{0}' not found in the document")]
    ContainerNotFound(String),

    /// Caller contract violation: missing or failed host/content.
    #[error("dialog contract violation: {0}")]
    ContractViolation(String),

    /// A document mutation failed underneath the controller.
    #[error("document operation failed: {0}")]
    Dom(#[from] DomError),
}

impl DialogError {
    pub(crate) fn contract(message: impl Into<String>) -> Self {
        Self::ContractViolation(message.into())
    }
}
