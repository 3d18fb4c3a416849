//! Event listeners and dispatch for the headless document
//!
//! Listeners are registered per node and invoked by explicit dispatch calls
//! from the embedder (an event loop, a test, the demo binary). Callbacks run
//! with the document lock released so they are free to mutate the document
//! through their own [`DocumentHandle`] — the same discipline a browser event
//! loop gives DOM event handlers.

use super::{DocumentHandle, NodeId};

/// Pointer coordinates of a click, in the same space as element rects.
#[derive(Debug, Clone, Copy)]
pub struct ClickEvent {
    pub client_x: f64,
    pub client_y: f64,
}

pub(crate) struct ClickListener {
    callback: Box<dyn FnMut(ClickEvent) + Send>,
    once: bool,
}

pub(crate) struct TransitionEndListener {
    callback: Box<dyn FnMut() + Send>,
    once: bool,
}

/// Register a click listener on a node.
///
/// With `once` set the listener auto-removes after its first invocation.
/// Registration on an unknown node is silently dropped, matching listener
/// registration on a detached DOM node that is never clicked.
pub fn add_click_listener(
    doc: &DocumentHandle,
    node: NodeId,
    once: bool,
    callback: impl FnMut(ClickEvent) + Send + 'static,
) {
    let mut doc = doc.lock().expect("document lock");
    if let Some(element) = doc.nodes.get_mut(&node) {
        element.click_listeners.push(ClickListener {
            callback: Box::new(callback),
            once,
        });
    }
}

/// Register a transition-end listener on a node. Same semantics as
/// [`add_click_listener`].
pub fn add_transition_end_listener(
    doc: &DocumentHandle,
    node: NodeId,
    once: bool,
    callback: impl FnMut() + Send + 'static,
) {
    let mut doc = doc.lock().expect("document lock");
    if let Some(element) = doc.nodes.get_mut(&node) {
        element.transition_listeners.push(TransitionEndListener {
            callback: Box::new(callback),
            once,
        });
    }
}

/// Dispatch a click at the given coordinates to a node's listeners.
///
/// Returns the number of listeners invoked. One-shot listeners are removed
/// before their callback runs, so re-entrant dispatch cannot fire them twice.
pub fn dispatch_click(doc: &DocumentHandle, node: NodeId, client_x: f64, client_y: f64) -> usize {
    let mut listeners = {
        let mut doc = doc.lock().expect("document lock");
        match doc.nodes.get_mut(&node) {
            Some(element) => std::mem::take(&mut element.click_listeners),
            None => return 0,
        }
    };

    let event = ClickEvent { client_x, client_y };
    let invoked = listeners.len();
    let mut keep = Vec::new();
    for mut listener in listeners.drain(..) {
        (listener.callback)(event);
        if !listener.once {
            keep.push(listener);
        }
    }

    // Listeners registered during dispatch land after the retained ones.
    let mut doc = doc.lock().expect("document lock");
    if let Some(element) = doc.nodes.get_mut(&node) {
        keep.append(&mut element.click_listeners);
        element.click_listeners = keep;
    }
    invoked
}

/// Dispatch a transition-end signal to a node's listeners.
///
/// Returns the number of listeners invoked.
pub fn dispatch_transition_end(doc: &DocumentHandle, node: NodeId) -> usize {
    let mut listeners = {
        let mut doc = doc.lock().expect("document lock");
        match doc.nodes.get_mut(&node) {
            Some(element) => std::mem::take(&mut element.transition_listeners),
            None => return 0,
        }
    };

    let invoked = listeners.len();
    let mut keep = Vec::new();
    for mut listener in listeners.drain(..) {
        (listener.callback)();
        if !listener.once {
            keep.push(listener);
        }
    }

    let mut doc = doc.lock().expect("document lock");
    if let Some(element) = doc.nodes.get_mut(&node) {
        keep.append(&mut element.transition_listeners);
        element.transition_listeners = keep;
    }
    invoked
}
