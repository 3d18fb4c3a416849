//! Per-dialog injection contexts
//!
//! Each open call builds two short-lived contexts: one for the mounted
//! content and one for the host component. They carry the same handle and
//! resolved config but different data bags, so host and content can depend on
//! different data without leaking one into the other. Contexts are plain
//! parameter structs, created by the service and passed down by value.

use crate::dialog::config::{DialogData, ResolvedConfig};
use crate::dialog::handle::DialogRef;

/// Dependencies injected into mounted dialog content.
#[derive(Clone)]
pub struct DialogContext {
    /// Handle for closing the dialog and observing closure.
    pub dialog_ref: DialogRef,

    /// The dialog's resolved configuration.
    pub config: ResolvedConfig,

    /// Caller-supplied `dialog_data`, passed through unchanged.
    pub data: DialogData,
}

/// Dependencies injected into the host component.
#[derive(Clone)]
pub struct HostContext {
    /// Handle for closing the dialog and observing closure.
    pub dialog_ref: DialogRef,

    /// The dialog's resolved configuration.
    pub config: ResolvedConfig,

    /// Caller-supplied `host_data`, passed through unchanged.
    pub host_data: DialogData,
}
