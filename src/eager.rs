//! Pre-constructed strategy.

use std::ops::Deref;

use crate::singleton::Singleton;

/// A singleton constructed before any caller can request it.
///
/// Placed in a `static`, the value is materialized during const evaluation,
/// ahead of `main` and of every thread the program will ever spawn. Statics
/// are visible to all threads without synchronization, so `get_instance` is a
/// plain reference: no branching, no locking, no state to check.
///
/// The cost is paid unconditionally: the value exists whether or not it is
/// ever used, and it must be constructible in a const context. For values too
/// expensive or impossible to build at compile time, use
/// [`Lazy`](crate::Lazy) or [`Holder`](crate::Holder).
///
/// # Examples
///
/// ```rust
/// use singleton_slot::Eager;
///
/// static LIMITS: Eager<u32> = Eager::new(64);
///
/// assert_eq!(*LIMITS.get_instance(), 64);
/// assert!(std::ptr::eq(LIMITS.get_instance(), LIMITS.get_instance()));
/// ```
pub struct Eager<T> {
    value: T,
}

impl<T> Eager<T> {
    /// Wraps an already-constructed value.
    pub const fn new(value: T) -> Self {
        Self { value }
    }

    /// Returns the instance.
    pub fn get_instance(&self) -> &T {
        &self.value
    }
}

impl<T> Singleton for Eager<T> {
    type Instance = T;

    fn get_instance(&self) -> &T {
        &self.value
    }

    fn is_initialized(&self) -> bool {
        true
    }
}

impl<T> Deref for Eager<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
