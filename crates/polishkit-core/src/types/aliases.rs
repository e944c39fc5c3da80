//! Type aliases for shared state.
//!
//! Simulated adapters are shared between the caller and the motion task, so
//! the state behind them is wrapped in `Arc<Mutex<T>>`.

use parking_lot::Mutex;
use std::sync::Arc;

/// A thread-safe, reference-counted mutex wrapper.
pub type ThreadSafe<T> = Arc<Mutex<T>>;

/// Create a new [`ThreadSafe`] value
pub fn thread_safe<T>(value: T) -> ThreadSafe<T> {
    Arc::new(Mutex::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_safe_shared_between_clones() {
        let a = thread_safe(1);
        let b = Arc::clone(&a);
        *b.lock() += 1;
        assert_eq!(*a.lock(), 2);
    }
}
