//! Navigation generations and cancellation.
//!
//! Starting a navigation cancels the previous one. Fetches issued under a
//! superseded guard resolve to `Cancelled`, and values committed under it
//! are dropped.

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::debug;

struct NavigationState {
    generation: u64,
    token: CancellationToken,
}

/// Issues one [`NavigationGuard`] per navigation.
pub struct Navigator {
    state: Mutex<NavigationState>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(NavigationState {
                generation: 0,
                token: CancellationToken::new(),
            }),
        }
    }

    /// Cancel the in-flight navigation, if any, and start a new one.
    pub fn begin(&self) -> NavigationGuard {
        let mut state = self.state.lock();
        state.token.cancel();
        state.generation += 1;
        state.token = CancellationToken::new();
        debug!(generation = state.generation, "navigation started");
        NavigationGuard {
            generation: state.generation,
            token: state.token.clone(),
        }
    }

    /// Cancel the current navigation without starting another.
    pub fn cancel(&self) {
        let state = self.state.lock();
        state.token.cancel();
        debug!(generation = state.generation, "navigation cancelled");
    }

    #[must_use]
    pub fn current_generation(&self) -> u64 {
        self.state.lock().generation
    }

    #[must_use]
    pub fn is_current(&self, guard: &NavigationGuard) -> bool {
        guard.generation == self.current_generation() && !guard.is_cancelled()
    }

    /// Hand `value` to the view only if `guard` still owns the page.
    pub fn commit<T>(&self, guard: &NavigationGuard, value: T) -> Option<T> {
        if self.is_current(guard) {
            Some(value)
        } else {
            debug!(generation = guard.generation, "dropping stale navigation result");
            None
        }
    }
}

/// Handle of one navigation.
#[derive(Debug, Clone)]
pub struct NavigationGuard {
    generation: u64,
    token: CancellationToken,
}

impl NavigationGuard {
    /// Guard that is never superseded, for one-shot loads outside a navigator.
    #[must_use]
    pub fn detached() -> Self {
        Self {
            generation: 0,
            token: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
