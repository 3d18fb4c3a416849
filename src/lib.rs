//! zero-dialog: a headless modal dialog lifecycle controller
//!
//! The crate separates three concerns. The [`dom`] module is a retained
//! element tree with the small surface dialogs need (id lookup, attachment,
//! classes, click and transition-end events, bounding rects, modal flags).
//! The [`dialog`] module is the lifecycle itself: [`DialogService::open`]
//! builds a surface, instantiates a host, mounts content and reveals the
//! dialog; [`DialogRef::close`] runs the optional leave animation and settles
//! the [`Closed`] future with the close value exactly once, after which
//! teardown removes every node the open call created.
//!
//! ```no_run
//! use zero_dialog::{
//!     new_document, Content, DialogService, ZeroDialogConfig,
//! };
//!
//! # fn build_container(doc: &zero_dialog::DocumentHandle) {}
//! # async fn run() {
//! let doc = new_document();
//! build_container(&doc); // an element with id "dialog-root"
//!
//! let dialogs = DialogService::new(doc.clone(), ZeroDialogConfig::new("dialog-root"));
//! let closed = dialogs
//!     .open(
//!         Content::template(|_doc, _slot, ctx| {
//!             ctx.dialog_ref.close_with("dismissed");
//!             Ok(Vec::new())
//!         }),
//!         None,
//!     )
//!     .unwrap();
//! let result = closed.await;
//! # let _ = result;
//! # }
//! ```

pub mod dialog;
pub mod dom;

pub use dialog::{
    default_host, Closed, Completion, ComponentFactory, Content, DialogComponent, DialogConfig,
    DialogContext, DialogData, DialogError, DialogRef, DialogResult, DialogService, HostBehavior,
    HostContext, HostFactory, HostView, ResolvedConfig, TemplateRef, ZeroDialogConfig,
    CONTENT_CLASS, HIDDEN_CLASS, HOST_CLASS, SURFACE_CLASS, VISIBLE_CLASS,
};
pub use dom::{
    events, new_document, Document, DocumentHandle, DomError, Element, NodeId, Rect,
};
