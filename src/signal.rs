//! Cancellation signalling for in-flight calls.
//!
//! [`AbortController`] owns the abort decision; [`AbortSignal`] is the
//! pollable, subscribable view handed to a request. Subscribing returns an
//! [`AbortRegistration`] guard that detaches the listener when dropped, so
//! cleanup is scoped rather than bookkept across callbacks.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

type Listener = Box<dyn FnOnce() + Send + 'static>;

#[derive(Default)]
struct SignalState {
    aborted: bool,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Locks without propagating poisoning; the guarded state stays coherent
/// because every mutation is a single assignment or list edit.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Owns the abort decision for its [`AbortSignal`]s.
#[derive(Default)]
pub struct AbortController {
    state: Arc<Mutex<SignalState>>,
}

impl AbortController {
    /// Creates a controller whose signal has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the signal view of this controller.
    #[must_use]
    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            state: Arc::clone(&self.state),
        }
    }

    /// Flips the signal to aborted and fires each pending listener once.
    ///
    /// Aborting twice is a no-op. Listeners run outside the state lock so
    /// they may freely touch the signal again.
    pub fn abort(&self) {
        let listeners = {
            let mut state = lock(&self.state);
            if state.aborted {
                return;
            }
            state.aborted = true;
            std::mem::take(&mut state.listeners)
        };
        for (_, listener) in listeners {
            listener();
        }
    }
}

impl fmt::Debug for AbortController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortController")
            .field("aborted", &lock(&self.state).aborted)
            .finish_non_exhaustive()
    }
}

/// Pollable cancellation token with one-shot notification.
#[derive(Clone)]
pub struct AbortSignal {
    state: Arc<Mutex<SignalState>>,
}

impl AbortSignal {
    /// Returns `true` once the owning controller has aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        lock(&self.state).aborted
    }

    /// Subscribes a one-shot abort listener.
    ///
    /// The listener fires at most once. If the signal has already fired it
    /// runs immediately, so a poll-then-subscribe caller cannot miss the
    /// notification. Dropping the returned registration detaches the
    /// listener if it has not fired.
    pub fn on_abort(&self, listener: impl FnOnce() + Send + 'static) -> AbortRegistration {
        let mut state = lock(&self.state);
        if state.aborted {
            drop(state);
            listener();
            return AbortRegistration {
                state: Weak::new(),
                id: 0,
            };
        }

        let id = state.next_id;
        state.next_id += 1;
        state.listeners.push((id, Box::new(listener)));
        AbortRegistration {
            state: Arc::downgrade(&self.state),
            id,
        }
    }
}

impl fmt::Debug for AbortSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortSignal")
            .field("aborted", &self.is_aborted())
            .finish_non_exhaustive()
    }
}

/// Guard for one subscribed abort listener.
///
/// Dropping the guard removes the listener if it has not fired; detaching an
/// already-fired or already-detached listener is a no-op.
pub struct AbortRegistration {
    state: Weak<Mutex<SignalState>>,
    id: u64,
}

impl AbortRegistration {
    /// Detaches the listener now instead of at drop time.
    pub fn detach(self) {}
}

impl Drop for AbortRegistration {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            lock(&state).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl fmt::Debug for AbortRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbortRegistration")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
