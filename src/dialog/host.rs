//! Host components: the chrome between surface and content
//!
//! A host wraps the mounted content inside the surface and exposes the
//! insertion point content is mounted into. Hosts are plain factory
//! functions; the shared behavior every host wants (backdrop-click closing,
//! access to handle/config/host data) lives in [`HostBehavior`] and is called
//! into rather than inherited.

use std::sync::Arc;

use tracing::debug;

use crate::dialog::context::HostContext;
use crate::dialog::error::DialogError;
use crate::dom::{events, DocumentHandle, NodeId};

/// Class carried by the built-in host's root node.
pub const HOST_CLASS: &str = "zero-dialog-host";

/// Class carried by the built-in host's insertion point.
pub const CONTENT_CLASS: &str = "zero-dialog-content";

/// Factory instantiating a host component for one dialog.
pub type HostFactory =
    Arc<dyn Fn(&DocumentHandle, &HostContext) -> Result<HostView, DialogError> + Send + Sync>;

/// A constructed host: its root node (attached into the surface by the
/// service) and the insertion point content mounts into.
pub struct HostView {
    root: NodeId,
    insertion_point: NodeId,
    on_destroy: Option<Box<dyn FnOnce(&DocumentHandle) + Send>>,
}

impl HostView {
    pub fn new(root: NodeId, insertion_point: NodeId) -> Self {
        Self {
            root,
            insertion_point,
            on_destroy: None,
        }
    }

    /// Register a hook that runs at teardown, before the host's nodes are
    /// removed.
    pub fn with_on_destroy(mut self, hook: impl FnOnce(&DocumentHandle) + Send + 'static) -> Self {
        self.on_destroy = Some(Box::new(hook));
        self
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn insertion_point(&self) -> NodeId {
        self.insertion_point
    }

    /// Run the destroy hook and remove the host's nodes.
    pub(crate) fn destroy(mut self, doc: &DocumentHandle) -> Result<(), DialogError> {
        if let Some(hook) = self.on_destroy.take() {
            hook(doc);
        }
        doc.lock()
            .expect("document lock")
            .remove_subtree(self.root)?;
        Ok(())
    }
}

/// Shared host wiring, used by the built-in host and available to custom
/// hosts via composition.
pub struct HostBehavior;

impl HostBehavior {
    /// Wire backdrop-click closing when the resolved config asks for it.
    ///
    /// The listener is persistent and performs a geometric hit test per
    /// click: coordinates outside the surface's bounding rect close the
    /// dialog (with no value), coordinates inside do nothing and leave the
    /// listener armed. The backdrop is not a distinct hit-testable node, so
    /// this is coordinate math, not a target check. The listener dies with
    /// the surface node at teardown; `close` is idempotent, so a late click
    /// during an animated close is a no-op.
    pub fn attach(doc: &DocumentHandle, ctx: &HostContext) {
        if !ctx.config.close_on_backdrop_click {
            return;
        }

        let dialog_ref = ctx.dialog_ref.clone();
        let doc_for_listener = doc.clone();
        let surface = dialog_ref.surface();
        events::add_click_listener(doc, surface, false, move |event| {
            let rect = match doc_for_listener
                .lock()
                .expect("document lock")
                .element(surface)
            {
                Some(element) => element.bounding_rect(),
                None => return,
            };
            if !rect.contains(event.client_x, event.client_y) {
                debug!(dialog = %dialog_ref.dialog_id(), "backdrop click, closing");
                dialog_ref.close(None);
            }
        });
    }
}

/// The built-in host: a plain wrapper node with a content slot, plus the
/// shared backdrop-click behavior.
pub fn default_host() -> HostFactory {
    Arc::new(|doc, ctx| {
        let (root, slot) = {
            let mut d = doc.lock().expect("document lock");
            let root = d.create_element("div");
            d.add_class(root, HOST_CLASS)?;
            let slot = d.create_element("div");
            d.add_class(slot, CONTENT_CLASS)?;
            d.append_child(root, slot)?;
            (root, slot)
        };
        HostBehavior::attach(doc, ctx);
        Ok(HostView::new(root, slot))
    })
}
