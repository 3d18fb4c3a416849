//! Dialog service: the open operation and its teardown guarantee
//!
//! [`DialogService::open`] is the only operation external collaborators call.
//! It builds the surface, instantiates the host, mounts the content, reveals
//! the dialog and wires a teardown that runs exactly once after the close
//! value is emitted — regardless of how the dialog was closed and regardless
//! of whether the caller keeps the returned [`Closed`] future.

use tracing::{debug, error};
use uuid::Uuid;

use crate::dialog::completion::Closed;
use crate::dialog::config::{DialogConfig, ResolvedConfig, ZeroDialogConfig};
use crate::dialog::content::{Content, ContentView};
use crate::dialog::context::{DialogContext, HostContext};
use crate::dialog::error::DialogError;
use crate::dialog::handle::DialogRef;
use crate::dialog::host::HostView;
use crate::dialog::{HIDDEN_CLASS, SURFACE_CLASS, VISIBLE_CLASS};
use crate::dom::{DocumentHandle, NodeId};

/// Dialog lifecycle controller bound to one document and one process-wide
/// configuration.
pub struct DialogService {
    doc: DocumentHandle,
    config: ZeroDialogConfig,
}

impl DialogService {
    /// Create a service. The process-wide config is read at every open call
    /// and never mutated.
    pub fn new(doc: DocumentHandle, config: ZeroDialogConfig) -> Self {
        Self { doc, config }
    }

    /// The document dialogs render into.
    pub fn document(&self) -> &DocumentHandle {
        &self.doc
    }

    /// Open a dialog with the given content.
    ///
    /// Side effects run in a fixed order: normalize, verify container, create
    /// surface and handle, build contexts, instantiate host, attach host into
    /// surface and surface into container, mount content, reveal. A failure
    /// anywhere rolls the document back to its pre-open state and is returned
    /// as the error; nothing keeps running.
    ///
    /// The returned [`Closed`] future yields the close value at most once.
    /// Teardown (content view, host view, surface node) is attached to the
    /// completion itself, so dropping the future leaves the dialog open and
    /// its eventual cleanup intact.
    pub fn open(
        &self,
        content: Content,
        config: Option<DialogConfig>,
    ) -> Result<Closed, DialogError> {
        let resolved = ResolvedConfig::normalize(&self.config, config);

        // Fail before any document mutation when the container is missing.
        let container = self
            .doc
            .lock()
            .expect("document lock")
            .element_by_id(&self.config.container_node_id)
            .ok_or_else(|| {
                DialogError::ContainerNotFound(self.config.container_node_id.clone())
            })?;

        let dialog_ref = self.create_dialog_ref(&resolved)?;
        let surface = dialog_ref.surface();
        debug!(dialog = %dialog_ref.dialog_id(), animated = resolved.animated, "opening dialog");

        let dialog_ctx = DialogContext {
            dialog_ref: dialog_ref.clone(),
            config: resolved.clone(),
            data: resolved.dialog_data.clone(),
        };
        let host_ctx = HostContext {
            dialog_ref: dialog_ref.clone(),
            config: resolved.clone(),
            host_data: resolved.host_data.clone(),
        };

        let host_view = match (resolved.host_component)(&self.doc, &host_ctx) {
            Ok(view) => view,
            Err(err) => {
                self.abort_open(surface, None, None);
                return Err(err);
            }
        };

        let attach = {
            let mut d = self.doc.lock().expect("document lock");
            d.append_child(surface, host_view.root())
                .and_then(|_| d.append_child(container, surface))
        };
        if let Err(err) = attach {
            self.abort_open(surface, Some(host_view), None);
            return Err(err.into());
        }

        let content_view = match content.mount(&self.doc, host_view.insertion_point(), &dialog_ctx)
        {
            Ok(view) => view,
            Err(err) => {
                self.abort_open(surface, Some(host_view), None);
                return Err(err);
            }
        };

        // Reveal after attachment so an animated dialog can transition out of
        // its hidden state.
        {
            let mut d = self.doc.lock().expect("document lock");
            d.show_modal(surface);
            if resolved.animated {
                d.add_class(surface, VISIBLE_CLASS)?;
            }
        }

        self.register_teardown(&dialog_ref, host_view, content_view);
        Ok(dialog_ref.closed())
    }

    /// Create the surface element and its handle: fresh unique id, ARIA
    /// attributes, base and state classes.
    fn create_dialog_ref(&self, resolved: &ResolvedConfig) -> Result<DialogRef, DialogError> {
        let mut d = self.doc.lock().expect("document lock");
        let surface = d.create_element("dialog");
        let dialog_id = format!("dialog-{}", Uuid::new_v4());
        d.set_id(surface, dialog_id.clone())?;
        d.set_attribute(surface, "aria-modal", "true")?;
        d.set_attribute(surface, "role", "dialog")?;
        d.add_class(surface, SURFACE_CLASS)?;
        if let Some(class) = &resolved.dialog_node_class {
            d.add_class(surface, class)?;
        }
        if resolved.animated {
            d.add_class(surface, HIDDEN_CLASS)?;
        } else {
            d.add_class(surface, VISIBLE_CLASS)?;
        }
        drop(d);

        Ok(DialogRef::new(
            self.doc.clone(),
            surface,
            dialog_id,
            resolved.animated,
            self.config.close_fallback,
        ))
    }

    /// Roll back a partially-opened dialog. Best effort; used only on the
    /// open path, before the dialog was revealed.
    fn abort_open(
        &self,
        surface: NodeId,
        host_view: Option<HostView>,
        content_view: Option<ContentView>,
    ) {
        if let Some(view) = content_view {
            view.destroy(&self.doc);
        }
        if let Some(view) = host_view {
            if let Err(err) = view.destroy(&self.doc) {
                error!(error = %err, "failed to destroy host during open rollback");
            }
        }
        if let Err(err) = self.doc.lock().expect("document lock").remove_subtree(surface) {
            error!(error = %err, "failed to remove surface during open rollback");
        }
    }

    /// Attach the teardown finalizer to the dialog's completion. Steps run
    /// independently: a failure in one is logged and never skips the others.
    fn register_teardown(
        &self,
        dialog_ref: &DialogRef,
        host_view: HostView,
        content_view: ContentView,
    ) {
        let doc = self.doc.clone();
        let container_id = self.config.container_node_id.clone();
        let surface = dialog_ref.surface();
        let dialog_id = dialog_ref.dialog_id().to_string();

        dialog_ref.completion().on_settled(move || {
            debug!(dialog = %dialog_id, "tearing down dialog");

            content_view.destroy(&doc);

            if let Err(err) = host_view.destroy(&doc) {
                error!(dialog = %dialog_id, error = %err, "failed to destroy dialog host");
            }

            let mut d = doc.lock().expect("document lock");
            if d.element_by_id(&container_id).is_none() {
                error!(dialog = %dialog_id, container = %container_id, "container node missing at teardown");
            }
            if let Err(err) = d.remove_subtree(surface) {
                error!(dialog = %dialog_id, error = %err, "failed to remove dialog surface");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialog::content::DialogComponent;
    use crate::dom::{new_document, Document};
    use std::sync::Arc;

    const CONTAINER_ID: &str = "dialog-root";

    fn document_with_container() -> DocumentHandle {
        let doc = new_document();
        {
            let mut d = doc.lock().unwrap();
            let root = d.root();
            let container = d.create_element("div");
            d.set_id(container, CONTAINER_ID).unwrap();
            d.append_child(root, container).unwrap();
        }
        doc
    }

    fn container_child_count(doc: &DocumentHandle) -> usize {
        let d = doc.lock().unwrap();
        let container = d.element_by_id(CONTAINER_ID).unwrap();
        d.child_count(container)
    }

    struct EmptyContent;
    impl DialogComponent for EmptyContent {
        fn mount(
            &mut self,
            _doc: &DocumentHandle,
            _slot: NodeId,
            _ctx: &DialogContext,
        ) -> Result<Vec<NodeId>, DialogError> {
            Ok(Vec::new())
        }
    }

    fn service(doc: &DocumentHandle) -> DialogService {
        DialogService::new(doc.clone(), ZeroDialogConfig::new(CONTAINER_ID))
    }

    fn total_nodes(doc: &Document) -> usize {
        // Root plus container.
        doc.child_count(doc.root()) + 1
    }

    #[test]
    fn open_appends_exactly_one_surface() {
        let doc = document_with_container();
        let svc = service(&doc);

        let _closed = svc
            .open(Content::component(|| EmptyContent), None)
            .unwrap();
        assert_eq!(container_child_count(&doc), 1);
    }

    #[test]
    fn surface_carries_identity_and_state() {
        let doc = document_with_container();
        let svc = service(&doc);

        let _closed = svc
            .open(
                Content::component(|| EmptyContent),
                Some(DialogConfig::new().with_dialog_node_class("confirm-dialog")),
            )
            .unwrap();

        let d = doc.lock().unwrap();
        let container = d.element_by_id(CONTAINER_ID).unwrap();
        let surface = d.element(container).unwrap().children()[0];
        let element = d.element(surface).unwrap();

        assert_eq!(element.tag(), "dialog");
        assert_eq!(element.attribute("aria-modal"), Some("true"));
        assert_eq!(element.attribute("role"), Some("dialog"));
        assert!(element.has_class(SURFACE_CLASS));
        assert!(element.has_class("confirm-dialog"));
        // Animated by default: hidden at creation, visible after reveal.
        assert!(element.has_class(HIDDEN_CLASS));
        assert!(element.has_class(VISIBLE_CLASS));
        assert!(element.is_open());
    }

    #[test]
    fn non_animated_surface_is_visible_from_creation() {
        let doc = document_with_container();
        let svc = service(&doc);

        let _closed = svc
            .open(
                Content::component(|| EmptyContent),
                Some(DialogConfig::new().animated(false)),
            )
            .unwrap();

        let d = doc.lock().unwrap();
        let container = d.element_by_id(CONTAINER_ID).unwrap();
        let surface = d.element(container).unwrap().children()[0];
        let element = d.element(surface).unwrap();
        assert!(element.has_class(VISIBLE_CLASS));
        assert!(!element.has_class(HIDDEN_CLASS));
    }

    #[test]
    fn missing_container_fails_before_any_mutation() {
        let doc = new_document();
        let svc = DialogService::new(doc.clone(), ZeroDialogConfig::new("nowhere"));

        let before = {
            let d = doc.lock().unwrap();
            d.child_count(d.root())
        };
        let result = svc.open(Content::component(|| EmptyContent), None);
        assert!(matches!(result, Err(DialogError::ContainerNotFound(id)) if id == "nowhere"));

        let d = doc.lock().unwrap();
        assert_eq!(d.child_count(d.root()), before);
    }

    #[test]
    fn failing_host_rolls_back_the_document() {
        let doc = document_with_container();
        let svc = service(&doc);

        let host: crate::dialog::host::HostFactory = Arc::new(|_doc, _ctx| {
            Err(DialogError::contract("host exploded"))
        });
        let result = svc.open(
            Content::component(|| EmptyContent),
            Some(DialogConfig::new().with_host_component(host)),
        );

        assert!(matches!(result, Err(DialogError::ContractViolation(_))));
        assert_eq!(container_child_count(&doc), 0);
        let d = doc.lock().unwrap();
        assert_eq!(total_nodes(&d), 2);
    }

    #[test]
    fn failing_content_rolls_back_the_document() {
        let doc = document_with_container();
        let svc = service(&doc);

        let result = svc.open(
            Content::template(|_doc, _slot, _ctx| Err(DialogError::contract("bad template"))),
            None,
        );

        assert!(matches!(result, Err(DialogError::ContractViolation(_))));
        assert_eq!(container_child_count(&doc), 0);
    }

    #[test]
    fn sequential_opens_get_distinct_ids() {
        let doc = document_with_container();
        let svc = service(&doc);

        let _first = svc.open(Content::component(|| EmptyContent), None).unwrap();
        let _second = svc.open(Content::component(|| EmptyContent), None).unwrap();

        let d = doc.lock().unwrap();
        let container = d.element_by_id(CONTAINER_ID).unwrap();
        let children = d.element(container).unwrap().children().to_vec();
        assert_eq!(children.len(), 2);

        let id_a = d.element(children[0]).unwrap().id.clone().unwrap();
        let id_b = d.element(children[1]).unwrap().id.clone().unwrap();
        assert_ne!(id_a, id_b);
    }
}
