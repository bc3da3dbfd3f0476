use std::sync::Arc;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};

/// Process-wide cancellation flag handed to every engine operation.
///
/// One token is created at startup and shared between the shell loop and the
/// signal handlers. Once cancelled it stays cancelled for the remainder of
/// the process.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The shared flag, in the form signal registration wants it.
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.flag.clone()
    }
}

impl Default for CancelToken {
    fn default() -> CancelToken {
        CancelToken::new()
    }
}

#[cfg(test)]
mod tests {
    use super::CancelToken;

    #[test]
    fn test_cancel_sticks() {
        let ctx = CancelToken::new();
        assert!(!ctx.is_cancelled());

        let other = ctx.clone();
        other.cancel();
        assert!(ctx.is_cancelled());
        assert!(other.is_cancelled());
    }
}
