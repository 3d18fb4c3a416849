//! Per-dialog handle: close operation and completion signal
//!
//! A [`DialogRef`] is the single source of truth for "is this dialog closed,
//! and with what value". Close follows a small state machine:
//!
//! ```text
//! Open ──(close, animated)──► Closing ──(transition-end)──► Closed
//!   └───(close, not animated)──────────────────────────────► Closed
//! ```
//!
//! `Closing` has exactly one outgoing transition, taken by a one-shot
//! transition-end listener (or the optional fallback timer). The first
//! `close` call wins; later calls are no-ops.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::dialog::completion::{Closed, Completion};
use crate::dialog::{DialogResult, VISIBLE_CLASS};
use crate::dom::{events, DocumentHandle, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CloseState {
    Open,
    Closing,
    Closed,
}

struct Inner {
    doc: DocumentHandle,
    surface: NodeId,
    dialog_id: String,
    animated: bool,
    close_fallback: Option<Duration>,
    completion: Completion,
    close_state: Mutex<CloseState>,
}

/// Handle to one open dialog. Cheap to clone; all clones share state.
#[derive(Clone)]
pub struct DialogRef {
    inner: Arc<Inner>,
}

impl DialogRef {
    pub(crate) fn new(
        doc: DocumentHandle,
        surface: NodeId,
        dialog_id: String,
        animated: bool,
        close_fallback: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                doc,
                surface,
                dialog_id,
                animated,
                close_fallback,
                completion: Completion::new(),
                close_state: Mutex::new(CloseState::Open),
            }),
        }
    }

    /// The surface node this dialog renders into.
    pub fn surface(&self) -> NodeId {
        self.inner.surface
    }

    /// Generated unique id of the surface element.
    pub fn dialog_id(&self) -> &str {
        &self.inner.dialog_id
    }

    /// Whether this dialog sequences its close through a transition.
    pub fn animated(&self) -> bool {
        self.inner.animated
    }

    /// Whether the close value has been emitted.
    pub fn is_closed(&self) -> bool {
        self.inner.completion.is_resolved()
    }

    /// Subscribe to the close value.
    pub fn closed(&self) -> Closed {
        self.inner.completion.subscribe()
    }

    pub(crate) fn completion(&self) -> &Completion {
        &self.inner.completion
    }

    /// Close the dialog, optionally with a result value.
    ///
    /// When animated, the visibility class is removed now and the dialog
    /// finalizes on the surface's next transition-end. Otherwise the native
    /// close and the emission happen synchronously in this call. A second
    /// call (in any state past `Open`) is a no-op.
    pub fn close(&self, value: DialogResult) {
        {
            let mut state = self.inner.close_state.lock().expect("close state lock");
            match *state {
                CloseState::Open => {
                    *state = if self.inner.animated {
                        CloseState::Closing
                    } else {
                        CloseState::Closed
                    };
                }
                CloseState::Closing | CloseState::Closed => {
                    debug!(dialog = %self.inner.dialog_id, "ignoring duplicate close");
                    return;
                }
            }
        }

        if self.inner.animated {
            self.close_animated(value);
        } else {
            self.finalize(value);
        }
    }

    /// Close with any serializable result value.
    pub fn close_with<T: Serialize>(&self, value: T) {
        match serde_json::to_value(value) {
            Ok(value) => self.close(Some(value)),
            Err(error) => {
                warn!(dialog = %self.inner.dialog_id, %error, "close value failed to serialize");
                self.close(None);
            }
        }
    }

    fn close_animated(&self, value: DialogResult) {
        debug!(dialog = %self.inner.dialog_id, "starting animated close");
        {
            let mut doc = self.inner.doc.lock().expect("document lock");
            if let Err(error) = doc.remove_class(self.inner.surface, VISIBLE_CLASS) {
                // Surface already gone; nothing will transition, finalize now.
                debug!(dialog = %self.inner.dialog_id, %error, "surface missing, closing directly");
                drop(doc);
                self.take_closing_transition(value);
                return;
            }
        }

        let this = self.clone();
        let mut pending = Some(value.clone());
        events::add_transition_end_listener(
            &self.inner.doc,
            self.inner.surface,
            true,
            move || {
                if let Some(value) = pending.take() {
                    this.take_closing_transition(value);
                }
            },
        );

        if let Some(fallback) = self.inner.close_fallback {
            if let Ok(runtime) = tokio::runtime::Handle::try_current() {
                let this = self.clone();
                runtime.spawn(async move {
                    tokio::time::sleep(fallback).await;
                    if this.take_closing_transition_if_pending(value) {
                        warn!(dialog = %this.inner.dialog_id, "transition-end never fired, fallback close");
                    }
                });
            } else {
                warn!(dialog = %self.inner.dialog_id, "close fallback configured but no tokio runtime");
            }
        }
    }

    /// Transition `Closing -> Closed` and finalize. No-op in any other state,
    /// which makes the transition-end listener and the fallback timer race
    /// safely.
    fn take_closing_transition(&self, value: DialogResult) {
        self.take_closing_transition_if_pending(value);
    }

    fn take_closing_transition_if_pending(&self, value: DialogResult) -> bool {
        {
            let mut state = self.inner.close_state.lock().expect("close state lock");
            if *state != CloseState::Closing {
                return false;
            }
            *state = CloseState::Closed;
        }
        self.finalize(value);
        true
    }

    /// Native close plus emission. Emission happens after the surface is
    /// closed; teardown finalizers run inside `resolve`, after emission.
    fn finalize(&self, value: DialogResult) {
        debug!(dialog = %self.inner.dialog_id, "finalizing dialog");
        self.inner
            .doc
            .lock()
            .expect("document lock")
            .close(self.inner.surface);
        self.inner.completion.resolve(value);
    }
}
