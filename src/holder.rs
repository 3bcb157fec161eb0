//! Construction deferred to the standard library's once primitive.

use std::any;
use std::ops::Deref;
use std::sync::OnceLock;

use crate::singleton::Singleton;
use crate::slot_event::{self, SlotEvent};
use crate::slot_state::SlotState;

/// A singleton whose one-time initialization is arbitrated by
/// [`std::sync::OnceLock`] instead of this crate's own lock.
///
/// Same laziness and thread-safety as [`Lazy`](crate::Lazy), with the
/// exactly-once guarantee delegated to the host. Prefer it when the standard
/// library should own the synchronization; prefer [`Lazy`](crate::Lazy) when
/// the construction protocol itself needs to stay observable (the
/// `Constructing` state, rollback on failure).
///
/// # Examples
///
/// ```rust
/// use singleton_slot::Holder;
///
/// static REGISTRY: Holder<Vec<&'static str>> = Holder::new(|| vec!["a", "b"]);
///
/// assert_eq!(REGISTRY.get_instance().len(), 2);
/// assert!(REGISTRY.is_initialized());
/// ```
pub struct Holder<T, F = fn() -> T> {
    cell: OnceLock<T>,
    construct: F,
}

impl<T, F: Fn() -> T> Holder<T, F> {
    /// Creates an empty holder paired with its construction recipe.
    pub const fn new(construct: F) -> Self {
        Self {
            cell: OnceLock::new(),
            construct,
        }
    }

    /// Returns the instance, constructing it on first call.
    ///
    /// The winning thread emits the construction trace event after the
    /// standard library publishes the value.
    pub fn get_instance(&self) -> &T {
        let mut constructed = false;
        let value = self.cell.get_or_init(|| {
            constructed = true;
            (self.construct)()
        });
        if constructed {
            slot_event::emit(&SlotEvent::Constructed {
                type_name: any::type_name::<T>(),
            });
        }
        value
    }

    /// Returns the instance if it has already been constructed.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Current lifecycle state.
    ///
    /// `Constructing` is never reported; that intermediate state belongs to
    /// the standard library's primitive.
    pub fn state(&self) -> SlotState {
        if self.cell.get().is_some() {
            SlotState::Initialized
        } else {
            SlotState::Uninitialized
        }
    }

    /// Returns true once the instance has been constructed and published.
    pub fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T, F: Fn() -> T> Singleton for Holder<T, F> {
    type Instance = T;

    fn get_instance(&self) -> &T {
        Holder::get_instance(self)
    }

    fn is_initialized(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T, F: Fn() -> T> Deref for Holder<T, F> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get_instance()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn test_construction_is_deferred_to_first_access() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        static VALUE: Holder<u32> = Holder::new(|| {
            CALLS.fetch_add(1, Ordering::SeqCst);
            21
        });

        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert_eq!(VALUE.state(), SlotState::Uninitialized);

        assert_eq!(*VALUE.get_instance(), 21);
        assert_eq!(*VALUE.get_instance(), 21);
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(VALUE.state(), SlotState::Initialized);
    }

    #[test]
    fn test_concurrent_access_constructs_once() {
        static CONSTRUCTIONS: AtomicUsize = AtomicUsize::new(0);
        static VALUE: Holder<String> = Holder::new(|| {
            CONSTRUCTIONS.fetch_add(1, Ordering::SeqCst);
            "shared".to_string()
        });

        let barrier = Arc::new(Barrier::new(8));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    VALUE.get_instance() as *const String as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(CONSTRUCTIONS.load(Ordering::SeqCst), 1);
        assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_deref() {
        static VALUE: Holder<Vec<u8>> = Holder::new(|| vec![9, 9]);
        assert_eq!(VALUE.len(), 2);
    }

    #[test]
    fn test_get_before_construction() {
        static VALUE: Holder<u32> = Holder::new(|| 4);
        assert_eq!(VALUE.get(), None);
        assert!(!VALUE.is_initialized());
        VALUE.get_instance();
        assert_eq!(VALUE.get(), Some(&4));
    }
}
