use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Latched, cooperative cancellation shared by every worker.
///
/// Workers poll [`CancelToken::is_cancelled`] at their checkpoints; nothing is interrupted
/// mid-operation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; there is no way to reset it.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_is_visible_through_clones() {
        let token = CancelToken::new();
        let seen_by_worker = token.clone();
        assert!(!seen_by_worker.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(seen_by_worker.is_cancelled());
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let token = CancelToken::new();
        let t = token.clone();
        std::thread::spawn(move || t.cancel()).join().unwrap();
        assert!(token.is_cancelled());
    }
}
