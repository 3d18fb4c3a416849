//! Dialog lifecycle system
//!
//! A modal dialog here is a `dialog` surface element appended under a
//! registered container node, carrying a host component (the chrome: backdrop
//! behavior, insertion point) and the caller's content (a template closure or
//! a [`DialogComponent`]). Opening is orchestrated by [`DialogService`];
//! closing flows through [`DialogRef`] and settles the [`Closed`] future with
//! the close value exactly once, after which teardown removes everything the
//! open call created.
//!
//! Module layout:
//! - [`service`]: the open operation and teardown wiring
//! - [`handle`]: per-dialog close handle and animated-close transition
//! - [`completion`]: one-shot close-value primitive
//! - [`config`]: per-call and process-wide configuration, normalization
//! - [`content`]: template and component content, mounting
//! - [`host`]: host views, backdrop-click behavior, default host
//! - [`context`]: parameter structs handed to content and hosts

pub mod completion;
pub mod config;
pub mod content;
pub mod context;
pub mod error;
pub mod handle;
pub mod host;
pub mod service;

pub use completion::{Closed, Completion};
pub use config::{DialogConfig, DialogData, ResolvedConfig, ZeroDialogConfig};
pub use content::{ComponentFactory, Content, DialogComponent, TemplateRef};
pub use context::{DialogContext, HostContext};
pub use error::DialogError;
pub use handle::DialogRef;
pub use host::{default_host, HostBehavior, HostFactory, HostView, CONTENT_CLASS, HOST_CLASS};
pub use service::DialogService;

/// Value a dialog settles with: `None` for a dismissal, `Some` for a result
/// chosen by the content. Dynamically typed so one service can serve dialogs
/// with unrelated result shapes.
pub type DialogResult = Option<serde_json::Value>;

/// Class present on every dialog surface.
pub const SURFACE_CLASS: &str = "zero-dialog";

/// Initial state class of an animated surface; the enter transition runs from
/// here to [`VISIBLE_CLASS`].
pub const HIDDEN_CLASS: &str = "zero-dialog-hidden";

/// State class of a revealed surface. An animated close removes it and waits
/// for the resulting transition to end.
pub const VISIBLE_CLASS: &str = "zero-dialog-visible";
