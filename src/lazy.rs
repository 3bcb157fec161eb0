//! Declaration-site lazy strategies over the double-checked slot.

use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use crate::singleton::Singleton;
use crate::slot::Slot;
use crate::slot_error::SlotError;
use crate::slot_state::SlotState;

/// A singleton constructed on first access by a stored recipe.
///
/// The construction recipe is captured at the declaration site, so every call
/// site reads `INSTANCE.get_instance()` with no arguments. Synchronization is
/// the double-checked protocol of [`Slot`]: one atomic acquire load when the
/// value exists, lock plus re-check plus release publish when it does not.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::Lazy;
///
/// static GREETING: Lazy<String> = Lazy::new(|| "hello".to_string());
///
/// assert!(!GREETING.is_initialized());
/// assert_eq!(GREETING.get_instance(), "hello");
/// assert!(GREETING.is_initialized());
/// ```
pub struct Lazy<T, F = fn() -> T> {
    slot: Slot<T>,
    construct: F,
}

impl<T, F: Fn() -> T> Lazy<T, F> {
    /// Creates an empty slot paired with its construction recipe.
    pub const fn new(construct: F) -> Self {
        Self {
            slot: Slot::new(),
            construct,
        }
    }

    /// Returns the instance, constructing it on first call.
    ///
    /// # Panics
    ///
    /// Panics if the recipe panics (the slot rolls back and a later call
    /// retries) or if the recipe re-enters this singleton's construction.
    pub fn get_instance(&self) -> &T {
        self.slot.get_or_init(|| (self.construct)())
    }

    /// Returns the instance if it has already been constructed.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Current lifecycle state of the backing slot.
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    /// Returns true once the instance has been constructed and published.
    pub fn is_initialized(&self) -> bool {
        self.slot.is_initialized()
    }
}

impl<T, F: Fn() -> T> Singleton for Lazy<T, F> {
    type Instance = T;

    fn get_instance(&self) -> &T {
        Lazy::get_instance(self)
    }

    fn is_initialized(&self) -> bool {
        self.slot.is_initialized()
    }
}

impl<T, F: Fn() -> T> Deref for Lazy<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get_instance()
    }
}

impl<T: fmt::Debug, F> fmt::Debug for Lazy<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("state", &self.slot.state())
            .field("value", &self.slot.get())
            .finish()
    }
}

/// The fallible form of [`Lazy`].
///
/// The recipe returns `Result`, and so does `get_instance`: the caller whose
/// call triggered a failing construction receives the error, the slot rolls
/// back, and any later call retries the recipe. A successful construction
/// still happens at most once for the life of the process.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::TryLazy;
///
/// static PORT: TryLazy<u16, std::num::ParseIntError> =
///     TryLazy::new(|| "8080".parse());
///
/// assert_eq!(PORT.get_instance().copied(), Ok(8080));
/// ```
pub struct TryLazy<T, E, F = fn() -> Result<T, E>> {
    slot: Slot<T>,
    construct: F,
    marker: PhantomData<fn() -> E>,
}

impl<T, E, F: Fn() -> Result<T, E>> TryLazy<T, E, F> {
    /// Creates an empty slot paired with its fallible construction recipe.
    pub const fn new(construct: F) -> Self {
        Self {
            slot: Slot::new(),
            construct,
            marker: PhantomData,
        }
    }

    /// Returns the instance, constructing it on first call.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::ConstructionFailed` wrapping the recipe's error;
    /// the slot rolls back to `Uninitialized` and calling again retries.
    pub fn get_instance(&self) -> Result<&T, SlotError<E>> {
        self.slot.get_or_try_init(|| (self.construct)())
    }

    /// Returns the instance if a construction has already succeeded.
    pub fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Current lifecycle state of the backing slot.
    pub fn state(&self) -> SlotState {
        self.slot.state()
    }

    /// Returns true once the instance has been constructed and published.
    pub fn is_initialized(&self) -> bool {
        self.slot.is_initialized()
    }
}

impl<T: fmt::Debug, E, F> fmt::Debug for TryLazy<T, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryLazy")
            .field("state", &self.slot.state())
            .field("value", &self.slot.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_construction_is_deferred_to_first_access() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        static VALUE: Lazy<u32> = Lazy::new(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            10
        });

        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(VALUE.state(), SlotState::Uninitialized);

        assert_eq!(*VALUE.get_instance(), 10);
        assert_eq!(*VALUE.get_instance(), 10);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_repeated_calls_return_the_same_reference() {
        static VALUE: Lazy<String> = Lazy::new(|| "fixed".to_string());

        let first = VALUE.get_instance();
        let second = VALUE.get_instance();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_deref_constructs() {
        static VALUE: Lazy<Vec<u8>> = Lazy::new(|| vec![1, 2, 3]);
        assert_eq!(VALUE.len(), 3);
        assert!(VALUE.is_initialized());
    }

    #[test]
    fn test_get_before_construction() {
        static VALUE: Lazy<u32> = Lazy::new(|| 5);
        assert_eq!(VALUE.get(), None);
        VALUE.get_instance();
        assert_eq!(VALUE.get(), Some(&5));
    }

    #[test]
    fn test_closure_recipes_are_supported() {
        let offset = 40;
        let local: Lazy<i32, _> = Lazy::new(move || offset + 2);
        assert_eq!(*local.get_instance(), 42);
    }

    #[test]
    fn test_try_lazy_failure_then_retry() {
        static ATTEMPTS: AtomicUsize = AtomicUsize::new(0);
        static VALUE: TryLazy<u32, &'static str> = TryLazy::new(|| {
            if ATTEMPTS.fetch_add(1, Ordering::SeqCst) == 0 {
                Err("not ready")
            } else {
                Ok(77)
            }
        });

        assert_eq!(
            VALUE.get_instance(),
            Err(SlotError::ConstructionFailed("not ready"))
        );
        assert_eq!(VALUE.state(), SlotState::Uninitialized);

        assert_eq!(VALUE.get_instance().copied(), Ok(77));
        assert!(VALUE.is_initialized());

        // Further calls take the fast path without running the recipe again.
        assert_eq!(VALUE.get_instance().copied(), Ok(77));
        assert_eq!(ATTEMPTS.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_debug_format() {
        static VALUE: Lazy<u32> = Lazy::new(|| 1);
        assert_eq!(
            format!("{:?}", VALUE),
            "Lazy { state: Uninitialized, value: None }"
        );
        VALUE.get_instance();
        assert_eq!(
            format!("{:?}", VALUE),
            "Lazy { state: Initialized, value: Some(1) }"
        );
    }
}
