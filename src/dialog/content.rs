//! Dialog content: templates and components
//!
//! An open call supplies exactly one kind of content, dispatched explicitly
//! on the [`Content`] variant:
//!
//! - [`Content::Template`] — a reusable render function, invoked with the
//!   dialog context (handle, data, config) each time it is mounted.
//! - [`Content::Component`] — a freshly instantiated [`DialogComponent`],
//!   which may hold state and observe its own destruction.
//!
//! Either way the mounted view is owned by the controller, tracked as a
//! [`ContentView`], and destroyed exactly once at teardown.

use std::sync::Arc;

use tracing::error;

use crate::dialog::context::DialogContext;
use crate::dialog::error::DialogError;
use crate::dom::{DocumentHandle, NodeId};

/// Reusable template: renders nodes under the insertion point and returns the
/// roots it created.
pub type TemplateRef = Arc<
    dyn Fn(&DocumentHandle, NodeId, &DialogContext) -> Result<Vec<NodeId>, DialogError>
        + Send
        + Sync,
>;

/// Stateful dialog content with an explicit destroy hook.
pub trait DialogComponent: Send {
    /// Render under the insertion point; return the root nodes created.
    fn mount(
        &mut self,
        doc: &DocumentHandle,
        slot: NodeId,
        ctx: &DialogContext,
    ) -> Result<Vec<NodeId>, DialogError>;

    /// Called once at teardown, before the component's nodes are removed.
    fn on_destroy(&mut self, _doc: &DocumentHandle) {}
}

/// Factory producing a fresh component instance per open call.
pub type ComponentFactory = Arc<dyn Fn() -> Box<dyn DialogComponent> + Send + Sync>;

/// What gets mounted inside the host.
#[derive(Clone)]
pub enum Content {
    /// Reusable parameterized template.
    Template(TemplateRef),
    /// Freshly instantiated component.
    Component(ComponentFactory),
}

impl Content {
    /// Wrap a render closure as template content.
    pub fn template(
        render: impl Fn(&DocumentHandle, NodeId, &DialogContext) -> Result<Vec<NodeId>, DialogError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::Template(Arc::new(render))
    }

    /// Wrap a component constructor as component content.
    pub fn component<C: DialogComponent + 'static>(make: impl Fn() -> C + Send + Sync + 'static) -> Self {
        Self::Component(Arc::new(move || Box::new(make())))
    }

    /// Mount this content into the insertion point.
    pub(crate) fn mount(
        &self,
        doc: &DocumentHandle,
        slot: NodeId,
        ctx: &DialogContext,
    ) -> Result<ContentView, DialogError> {
        match self {
            Content::Template(template) => {
                let roots = template(doc, slot, ctx)?;
                Ok(ContentView {
                    roots,
                    component: None,
                })
            }
            Content::Component(factory) => {
                let mut component = factory();
                let roots = component.mount(doc, slot, ctx)?;
                Ok(ContentView {
                    roots,
                    component: Some(component),
                })
            }
        }
    }
}

/// A mounted content view: the nodes it created plus, for component content,
/// the owning instance.
pub(crate) struct ContentView {
    roots: Vec<NodeId>,
    component: Option<Box<dyn DialogComponent>>,
}

impl ContentView {
    /// Destroy the view: run the component's destroy hook, then remove every
    /// root subtree. Node removal failures are logged and do not stop the
    /// remaining removals.
    pub(crate) fn destroy(mut self, doc: &DocumentHandle) {
        if let Some(component) = self.component.as_mut() {
            component.on_destroy(doc);
        }
        let mut d = doc.lock().expect("document lock");
        for root in self.roots.drain(..) {
            if let Err(err) = d.remove_subtree(root) {
                error!(error = %err, "failed to remove content node");
            }
        }
    }
}
