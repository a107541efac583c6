//! Thread-scoped stack of acting users.
//!
//! Each thread owns an independent stack, created lazily on first access.
//! Threads spawned from inside a scope start with an empty stack.

use std::cell::RefCell;
use std::marker::PhantomData;

thread_local! {
    static ACTOR_STACK: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Access point for the calling thread's actor stack.
///
/// # Examples
///
/// ```
/// use widget_audit::audit::ActorContext;
///
/// let seen = ActorContext::run_as("alice", || {
///     ActorContext::run_as("bob", ActorContext::current)
/// });
///
/// assert_eq!(seen.as_deref(), Some("bob"));
/// assert_eq!(ActorContext::current(), None);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ActorContext;

impl ActorContext {
    /// Runs `action` with `actor` pushed onto the calling thread's stack.
    ///
    /// Exactly one frame is popped when `action` finishes, whether it returns
    /// normally, returns an error value or unwinds.
    pub fn run_as<T, F>(actor: impl Into<String>, action: F) -> T
    where
        F: FnOnce() -> T,
    {
        let _scope = Self::enter(actor);
        action()
    }

    /// Pushes `actor` and returns a guard that pops it when dropped.
    ///
    /// Dropping the guard restores the stack to the depth it had before the
    /// push, so releasing an outer guard early also ends every scope entered
    /// after it.
    #[must_use = "the actor is popped as soon as the scope guard is dropped"]
    pub fn enter(actor: impl Into<String>) -> ActorScope {
        let frame = actor.into();
        let base_depth = ACTOR_STACK.with(|stack| {
            let mut frames = stack.borrow_mut();
            let depth = frames.len();
            frames.push(frame);
            depth
        });
        ActorScope {
            base_depth,
            _not_send: PhantomData,
        }
    }

    /// Returns the innermost actor for the calling thread, if any.
    #[must_use]
    pub fn current() -> Option<String> {
        ACTOR_STACK.with(|stack| stack.borrow().last().cloned())
    }

    /// Returns the number of frames on the calling thread's stack.
    #[must_use]
    pub fn depth() -> usize {
        ACTOR_STACK.with(|stack| stack.borrow().len())
    }

    /// Empties the calling thread's stack.
    pub fn clear() {
        ACTOR_STACK.with(|stack| stack.borrow_mut().clear());
    }

    // No-op when the stack is already at or below `depth`, e.g. after `clear`.
    fn unwind_to(depth: usize) {
        ACTOR_STACK.with(|stack| stack.borrow_mut().truncate(depth));
    }
}

/// Guard returned by [`ActorContext::enter`].
///
/// Removes its own frame, and any frame pushed above it, from the thread that
/// created it when dropped. The guard is neither `Send` nor `Sync`.
#[derive(Debug)]
pub struct ActorScope {
    base_depth: usize,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ActorScope {
    fn drop(&mut self) {
        ActorContext::unwind_to(self.base_depth);
    }
}
