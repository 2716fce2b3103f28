//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions that decide whether a transition may
//! fire for a given message. The engine may evaluate a guard several times
//! while looking for the eligible transition, so guards must not have side
//! effects.

use std::fmt;

/// Pure predicate over a message that decides whether a transition fires.
///
/// Completion transitions have no triggering message and use `Guard<()>`.
///
/// # Example
///
/// ```rust
/// use statechart::core::Guard;
///
/// #[derive(Debug)]
/// enum Signal {
///     Start,
///     Stop,
/// }
///
/// let on_start = Guard::new(|m: &Signal| matches!(m, Signal::Start));
///
/// assert!(on_start.check(&Signal::Start));
/// assert!(!on_start.check(&Signal::Stop));
/// ```
pub struct Guard<M> {
    predicate: Box<dyn Fn(&M) -> bool + Send + Sync>,
}

impl<M> Guard<M> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&M) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// A guard that is satisfied by every message.
    pub fn always() -> Self {
        Guard::new(|_| true)
    }

    /// Check if the guard allows the transition for this message.
    pub fn check(&self, message: &M) -> bool {
        (self.predicate)(message)
    }
}

impl<M> Default for Guard<M> {
    fn default() -> Self {
        Self::always()
    }
}

impl<M> fmt::Debug for Guard<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, PartialEq)]
    enum Message {
        Open,
        Close,
        Tick(u32),
    }

    #[test]
    fn guard_allows_matching_messages() {
        let guard = Guard::new(|m: &Message| matches!(m, Message::Open));

        assert!(guard.check(&Message::Open));
        assert!(!guard.check(&Message::Close));
    }

    #[test]
    fn always_accepts_everything() {
        let guard: Guard<Message> = Guard::always();

        assert!(guard.check(&Message::Open));
        assert!(guard.check(&Message::Tick(9)));
    }

    #[test]
    fn completion_guard_checks_unit() {
        let guard: Guard<()> = Guard::new(|_| false);
        assert!(!guard.check(&()));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::new(|m: &Message| matches!(m, Message::Tick(n) if *n > 3));

        let message = Message::Tick(5);
        let result1 = guard.check(&message);
        let result2 = guard.check(&message);

        assert_eq!(result1, result2);
    }

    #[test]
    fn guard_can_capture_shared_state() {
        let threshold = Arc::new(AtomicUsize::new(10));
        let captured = Arc::clone(&threshold);
        let guard = Guard::new(move |m: &Message| match m {
            Message::Tick(n) => *n as usize >= captured.load(Ordering::SeqCst),
            _ => false,
        });

        assert!(!guard.check(&Message::Tick(5)));
        threshold.store(5, Ordering::SeqCst);
        assert!(guard.check(&Message::Tick(5)));
    }
}
