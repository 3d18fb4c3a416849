//! Single-assignment completion cell for dialog results
//!
//! A dialog closes at most once. The close value travels through a
//! [`Completion`]: a cell that can be resolved exactly once and then never
//! changes. Consumers observe it through [`Closed`], a future yielding the
//! close value; the service attaches teardown finalizers directly to the cell
//! so cleanup runs after emission even when nobody is awaiting.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use crate::dialog::DialogResult;

enum State {
    Pending {
        wakers: Vec<Waker>,
        finalizers: Vec<Box<dyn FnOnce() + Send>>,
    },
    Resolved(DialogResult),
}

/// Resolver side of the cell. Cloning shares the same underlying state.
#[derive(Clone)]
pub struct Completion {
    state: Arc<Mutex<State>>,
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

impl Completion {
    /// Create an unresolved cell.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::Pending {
                wakers: Vec::new(),
                finalizers: Vec::new(),
            })),
        }
    }

    /// Subscribe to the close value.
    pub fn subscribe(&self) -> Closed {
        Closed {
            state: self.state.clone(),
        }
    }

    /// Register a finalizer that runs exactly once, after the value has been
    /// emitted. If the cell is already resolved the finalizer runs now.
    pub fn on_settled(&self, finalizer: impl FnOnce() + Send + 'static) {
        let run_now = {
            let mut state = self.state.lock().expect("completion lock");
            match &mut *state {
                State::Pending { finalizers, .. } => {
                    finalizers.push(Box::new(finalizer));
                    None
                }
                State::Resolved(_) => Some(finalizer),
            }
        };
        if let Some(finalizer) = run_now {
            finalizer();
        }
    }

    /// Resolve the cell. The first call wins and returns `true`; later calls
    /// leave the stored value untouched and return `false`.
    ///
    /// Ordering: the value is stored and subscribers are woken before any
    /// finalizer runs. Finalizers run in registration order with the lock
    /// released, so they may subscribe or re-resolve (a no-op) freely.
    pub fn resolve(&self, value: DialogResult) -> bool {
        let (wakers, finalizers) = {
            let mut state = self.state.lock().expect("completion lock");
            match std::mem::replace(&mut *state, State::Resolved(value.clone())) {
                State::Pending { wakers, finalizers } => (wakers, finalizers),
                resolved @ State::Resolved(_) => {
                    // Put the original value back; second resolve loses.
                    *state = resolved;
                    return false;
                }
            }
        };

        for waker in wakers {
            waker.wake();
        }
        for finalizer in finalizers {
            finalizer();
        }
        true
    }

    /// Whether a value has been emitted.
    pub fn is_resolved(&self) -> bool {
        matches!(
            *self.state.lock().expect("completion lock"),
            State::Resolved(_)
        )
    }
}

/// One-shot future yielding the dialog's close value.
///
/// Dropping a `Closed` does not close the dialog and does not run teardown;
/// cleanup is bound to resolution, not to subscription.
pub struct Closed {
    state: Arc<Mutex<State>>,
}

impl Closed {
    /// Non-blocking read: `Some(value)` once resolved, `None` while pending.
    pub fn try_result(&self) -> Option<DialogResult> {
        match &*self.state.lock().expect("completion lock") {
            State::Resolved(value) => Some(value.clone()),
            State::Pending { .. } => None,
        }
    }
}

impl Future for Closed {
    type Output = DialogResult;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.lock().expect("completion lock");
        match &mut *state {
            State::Resolved(value) => Poll::Ready(value.clone()),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn resolves_exactly_once() {
        let completion = Completion::new();
        assert!(completion.resolve(Some(json!("first"))));
        assert!(!completion.resolve(Some(json!("second"))));

        let closed = completion.subscribe();
        assert_eq!(closed.try_result(), Some(Some(json!("first"))));
    }

    #[test]
    fn subscriber_receives_value() {
        let completion = Completion::new();
        let closed = completion.subscribe();
        completion.resolve(Some(json!(42)));
        assert_eq!(futures::executor::block_on(closed), Some(json!(42)));
    }

    #[test]
    fn await_before_resolve() {
        let completion = Completion::new();
        let closed = completion.subscribe();

        let resolver = completion.clone();
        let handle = std::thread::spawn(move || {
            resolver.resolve(None);
        });
        assert_eq!(futures::executor::block_on(closed), None);
        handle.join().unwrap();
    }

    #[test]
    fn finalizer_runs_once_after_emission() {
        let completion = Completion::new();
        let runs = Arc::new(AtomicUsize::new(0));

        let observer = completion.clone();
        let counter = runs.clone();
        completion.on_settled(move || {
            // Value must already be visible when the finalizer runs.
            assert!(observer.is_resolved());
            counter.fetch_add(1, Ordering::SeqCst);
        });

        completion.resolve(Some(json!("done")));
        completion.resolve(Some(json!("again")));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_finalizer_runs_immediately() {
        let completion = Completion::new();
        completion.resolve(None);

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        completion.on_settled(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn finalizers_run_in_registration_order() {
        let completion = Completion::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["content", "host", "surface"] {
            let order = order.clone();
            completion.on_settled(move || order.lock().unwrap().push(label));
        }
        completion.resolve(None);
        assert_eq!(*order.lock().unwrap(), vec!["content", "host", "surface"]);
    }

    #[test]
    fn dropping_subscriber_does_not_settle() {
        let completion = Completion::new();
        drop(completion.subscribe());
        assert!(!completion.is_resolved());

        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        completion.on_settled(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }
}
