//! Single-fire completion for one pick session.

use std::fmt;

type Callback = Box<dyn FnOnce() + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionState {
    #[default]
    Pending,
    Succeeded,
    Cancelled,
}

/// Resolves exactly once, to success or cancellation.
///
/// Cancellation wins: once cancelled, `success` is ignored. Callbacks registered
/// for the outcome that happens run once, in registration order; callbacks
/// registered after resolution never run.
#[derive(Default)]
pub struct CompletionController {
    state: CompletionState,
    on_completed: Vec<Callback>,
    on_cancelled: Vec<Callback>,
}

impl fmt::Debug for CompletionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionController")
            .field("state", &self.state)
            .field("on_completed", &self.on_completed.len())
            .field("on_cancelled", &self.on_cancelled.len())
            .finish()
    }
}

impl CompletionController {
    pub fn state(&self) -> CompletionState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state != CompletionState::Pending
    }

    pub fn on_completed(&mut self, callback: impl FnOnce() + Send + Sync + 'static) {
        if !self.is_resolved() {
            self.on_completed.push(Box::new(callback));
        }
    }

    pub fn on_cancelled(&mut self, callback: impl FnOnce() + Send + Sync + 'static) {
        if !self.is_resolved() {
            self.on_cancelled.push(Box::new(callback));
        }
    }

    /// Returns false if already resolved.
    pub fn success(&mut self) -> bool {
        self.resolve(CompletionState::Succeeded)
    }

    /// Returns false if already resolved.
    pub fn cancel(&mut self) -> bool {
        self.resolve(CompletionState::Cancelled)
    }

    fn resolve(&mut self, outcome: CompletionState) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.state = outcome;
        let completed = std::mem::take(&mut self.on_completed);
        let cancelled = std::mem::take(&mut self.on_cancelled);
        let callbacks = if outcome == CompletionState::Succeeded {
            completed
        } else {
            cancelled
        };
        for callback in callbacks {
            callback();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_success_fires_completed_once() {
        let mut controller = CompletionController::default();
        let (completed, on_completed) = counter();
        let (cancelled, on_cancelled) = counter();
        controller.on_completed(on_completed);
        controller.on_cancelled(on_cancelled);

        assert!(controller.success());
        assert!(!controller.success());

        assert_eq!(completed.load(Ordering::SeqCst), 1);
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
        assert_eq!(controller.state(), CompletionState::Succeeded);
    }

    #[test]
    fn test_cancel_blocks_later_success() {
        let mut controller = CompletionController::default();
        let (completed, on_completed) = counter();
        let (cancelled, on_cancelled) = counter();
        controller.on_completed(on_completed);
        controller.on_cancelled(on_cancelled);

        assert!(controller.cancel());
        assert!(!controller.success());
        assert!(!controller.cancel());

        assert_eq!(completed.load(Ordering::SeqCst), 0);
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        assert_eq!(controller.state(), CompletionState::Cancelled);
    }

    #[test]
    fn test_callbacks_after_resolution_are_dropped() {
        let mut controller = CompletionController::default();
        controller.success();
        let (completed, on_completed) = counter();
        controller.on_completed(on_completed);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }
}
