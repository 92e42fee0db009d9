use std::sync::Arc;

use parking_lot::Mutex;

use crate::cart::{
    model::{CartItem, CartItemId, CartSummary},
    patch::{CartCommand, CartPatch},
};

#[derive(Debug, Default)]
struct CacheState {
    summary: Option<CartSummary>,
    stale: bool,
}

/// Shared, cloneable handle to the cached cart projection.
///
/// All writes go through one mutex, which serializes optimistic patches and their reverts.
/// Readers get cloned snapshots.
#[derive(Clone, Debug, Default)]
pub struct CartCache {
    state: Arc<Mutex<CacheState>>,
}

impl CartCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the cache with a server response and mark it fresh.
    pub fn replace(&self, summary: CartSummary) {
        let mut state = self.state.lock();
        state.summary = Some(summary);
        state.stale = false;
    }

    /// Drop the cached value (used on sign-out).
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.summary = None;
        state.stale = false;
    }

    /// Mark the projection stale so the next read refetches from the server.
    pub fn invalidate(&self) {
        self.state.lock().stale = true;
    }

    /// `true` when there is no value or it was invalidated.
    pub fn needs_refresh(&self) -> bool {
        let state = self.state.lock();
        state.summary.is_none() || state.stale
    }

    pub fn snapshot(&self) -> Option<CartSummary> {
        self.state.lock().summary.clone()
    }

    pub fn item(&self, id: CartItemId) -> Option<CartItem> {
        self.state.lock().summary.as_ref()?.item(id).cloned()
    }

    /// Apply `patch` under the gate and return the command carrying its inverse.
    pub fn apply(&self, patch: CartPatch) -> CartCommand {
        let mut state = self.state.lock();
        let inverse = state
            .summary
            .as_mut()
            .and_then(|summary| patch.apply(summary));
        CartCommand {
            forward: patch,
            inverse,
        }
    }

    /// Undo a previously applied command. Tolerates a cache that was replaced or cleared in the
    /// meantime: a revert whose target line is gone is a no-op.
    pub fn revert(&self, command: &CartCommand) -> bool {
        let Some(inverse) = &command.inverse else {
            return false;
        };
        let mut state = self.state.lock();
        state
            .summary
            .as_mut()
            .and_then(|summary| inverse.apply(summary))
            .is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cart/cache.rs"]
mod tests;
