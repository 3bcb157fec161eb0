//! The double-checked construction core.
//!
//! `Slot<T>` owns at most one `T` for its lifetime and arbitrates which thread
//! gets to construct it. Every strategy in this crate that defers construction
//! to first use runs through this protocol:
//!
//! 1. Lock-free acquire load of the state; `Initialized` returns immediately.
//! 2. Acquire the construction lock.
//! 3. Re-check the state under the lock.
//! 4. Mark `Constructing`, run the constructor, write the value, publish with
//!    a release store.
//! 5. Release the lock on every exit path.
//!
//! A failed or panicking constructor rolls the state back to `Uninitialized`
//! so a later call can retry; the slot is never left stuck in `Constructing`.

use std::any;
use std::cell::UnsafeCell;
use std::convert::Infallible;
use std::fmt;
use std::mem::{self, MaybeUninit};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::slot_error::SlotError;
use crate::slot_event::{self, SlotEvent};
use crate::slot_state::{AtomicState, SlotState};

/// Returns a process-unique token for the calling thread.
///
/// Token 0 is reserved for "no thread".
fn thread_token() -> u64 {
    static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);
    thread_local! {
        static TOKEN: u64 = NEXT_TOKEN.fetch_add(1, Ordering::Relaxed);
    }
    TOKEN.with(|token| *token)
}

/// A process-lifetime container for exactly one constructed `T`.
///
/// The slot is created empty, populated exactly once, and read for the rest
/// of its life. Callers only ever receive `&T`; in a `static`, that reference
/// is `&'static T`. There is no way to clear or replace the value.
///
/// Once a thread observes the `Initialized` state it also observes the fully
/// constructed value: the publish store is `Release` and the fast-path load
/// is `Acquire`, never a plain flag.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::Slot;
///
/// static MESSAGE: Slot<String> = Slot::new();
///
/// let value = MESSAGE.get_or_init(|| "ready".to_string());
/// assert_eq!(value, "ready");
/// assert!(MESSAGE.is_initialized());
/// ```
pub struct Slot<T> {
    state: AtomicState,
    // Token of the thread currently constructing, 0 otherwise.
    constructing: AtomicU64,
    // Serializes constructors; never touched on the initialized fast path.
    lock: Mutex<()>,
    value: UnsafeCell<MaybeUninit<T>>,
}

// SAFETY: a published slot hands out `&T` to any thread, and moving a slot
// moves its owned value. Same bounds as `std::sync::RwLock<T>`.
unsafe impl<T: Send + Sync> Sync for Slot<T> {}
unsafe impl<T: Send> Send for Slot<T> {}

impl<T> Slot<T> {
    /// Creates an empty slot.
    pub const fn new() -> Self {
        Self {
            state: AtomicState::uninitialized(),
            constructing: AtomicU64::new(0),
            lock: Mutex::new(()),
            value: UnsafeCell::new(MaybeUninit::uninit()),
        }
    }

    /// Creates a slot already holding `value`, skipping the protocol entirely.
    pub const fn with_value(value: T) -> Self {
        Self {
            state: AtomicState::initialized(),
            constructing: AtomicU64::new(0),
            lock: Mutex::new(()),
            value: UnsafeCell::new(MaybeUninit::new(value)),
        }
    }

    /// Returns the published value, or `None` before first construction.
    ///
    /// This is the lock-free fast path: a single atomic acquire load.
    pub fn get(&self) -> Option<&T> {
        if self.state.load(Ordering::Acquire) == SlotState::Initialized {
            // SAFETY: the acquire load observed the release publish, so the
            // cell holds a fully constructed value that is never written again.
            Some(unsafe { self.value_ref() })
        } else {
            None
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> SlotState {
        self.state.load(Ordering::Acquire)
    }

    /// Returns true once a value has been constructed and published.
    pub fn is_initialized(&self) -> bool {
        self.state.load(Ordering::Acquire) == SlotState::Initialized
    }

    /// Returns the value, running `construct` first if the slot is empty.
    ///
    /// At most one caller ever runs `construct`. Every other caller either
    /// takes the fast path or blocks on the construction lock until the
    /// winner publishes, then returns the same reference.
    ///
    /// # Panics
    ///
    /// Panics if `construct` panics (the slot rolls back to `Uninitialized`
    /// and a later call retries) or if `construct` re-enters this slot's
    /// construction path from the same thread.
    pub fn get_or_init<F>(&self, construct: F) -> &T
    where
        F: FnOnce() -> T,
    {
        match self.get_or_try_init(|| Ok::<T, Infallible>(construct())) {
            Ok(value) => value,
            Err(SlotError::ConstructionFailed(never)) => match never {},
            // get_or_try_init returns the existing value, never this error
            Err(SlotError::AlreadyInitialized) => unreachable!(),
        }
    }

    /// Returns the value, running the fallible `construct` first if the slot
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::ConstructionFailed` if `construct` returns `Err`.
    /// The error goes to the caller whose attempt failed, the slot rolls back
    /// to `Uninitialized`, and any later call (including from threads that
    /// were blocked on the lock during the failure) runs its own attempt.
    pub fn get_or_try_init<F, E>(&self, construct: F) -> Result<&T, SlotError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some(value) = self.get() {
            return Ok(value);
        }
        self.initialize(construct)?;
        // SAFETY: `initialize` returned Ok, so a value has been published.
        Ok(unsafe { self.value_ref() })
    }

    /// Installs a ready-made value, failing if the slot is already populated.
    ///
    /// This is the bypass guard: a second construction smuggled past
    /// `get_or_init` (the reflection-style attack on singletons) is detected
    /// and rejected instead of replacing or duplicating the instance. On
    /// rejection the offered value is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::AlreadyInitialized` if a value was already
    /// published.
    pub fn try_init(&self, value: T) -> Result<&T, SlotError> {
        self.reject_reentry();

        let rejected = {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            if self.state.load(Ordering::Acquire) == SlotState::Initialized {
                true
            } else {
                // SAFETY: the construction lock is held and the check above
                // showed the cell empty; no other thread touches it.
                unsafe { (*self.value.get()).write(value) };
                self.state.store(SlotState::Initialized, Ordering::Release);
                false
            }
        };

        let type_name = any::type_name::<T>();
        if rejected {
            slot_event::emit(&SlotEvent::BypassRejected { type_name });
            return Err(SlotError::AlreadyInitialized);
        }
        slot_event::emit(&SlotEvent::Constructed { type_name });
        // SAFETY: this call published the value just above.
        Ok(unsafe { self.value_ref() })
    }

    /// Panics if the calling thread is already constructing this slot.
    ///
    /// Construction re-entered from its own constructor would deadlock on the
    /// construction lock; it is rejected up front instead.
    fn reject_reentry(&self) {
        if self.constructing.load(Ordering::Relaxed) == thread_token() {
            panic!(
                "recursive construction of singleton {}",
                any::type_name::<T>()
            );
        }
    }

    /// The slow path: serialize, re-check, construct, publish.
    #[cold]
    fn initialize<F, E>(&self, construct: F) -> Result<(), SlotError<E>>
    where
        F: FnOnce() -> Result<T, E>,
    {
        self.reject_reentry();

        let result = {
            // A panicking constructor poisons the mutex; the state machine is
            // the source of truth, so the lock is recovered and reused.
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

            // Mandatory second check: another thread may have published while
            // this one waited for the lock.
            if self.state.load(Ordering::Acquire) == SlotState::Initialized {
                return Ok(());
            }

            self.state.store(SlotState::Constructing, Ordering::Relaxed);
            self.constructing.store(thread_token(), Ordering::Relaxed);
            let rollback = ConstructionGuard {
                state: &self.state,
                constructing: &self.constructing,
            };

            match construct() {
                Ok(value) => {
                    // SAFETY: the construction lock is held and the re-check
                    // above showed the cell empty; no other thread touches it.
                    unsafe { (*self.value.get()).write(value) };
                    rollback.commit();
                    Ok(())
                }
                Err(err) => {
                    // The guard returns the slot to `Uninitialized` so a
                    // later call can retry.
                    drop(rollback);
                    Err(SlotError::ConstructionFailed(err))
                }
            }
        };

        // The construction lock is released before any callback runs.
        let type_name = any::type_name::<T>();
        match &result {
            Ok(()) => slot_event::emit(&SlotEvent::Constructed { type_name }),
            Err(_) => slot_event::emit(&SlotEvent::ConstructionFailed { type_name }),
        }
        result
    }

    /// # Safety
    ///
    /// The slot must be in the `Initialized` state.
    unsafe fn value_ref(&self) -> &T {
        unsafe { (*self.value.get()).assume_init_ref() }
    }
}

/// Rolls the slot back to `Uninitialized` unless the construction commits.
///
/// Covers both the `Err` return and a panicking constructor: the slot is
/// never left in `Constructing` after the constructing thread unwinds.
struct ConstructionGuard<'a> {
    state: &'a AtomicState,
    constructing: &'a AtomicU64,
}

impl ConstructionGuard<'_> {
    /// Publishes the constructed value and disarms the rollback.
    fn commit(self) {
        self.constructing.store(0, Ordering::Relaxed);
        // Paired with the acquire load on the fast path.
        self.state.store(SlotState::Initialized, Ordering::Release);
        mem::forget(self);
    }
}

impl Drop for ConstructionGuard<'_> {
    fn drop(&mut self) {
        self.constructing.store(0, Ordering::Relaxed);
        self.state.store(SlotState::Uninitialized, Ordering::Relaxed);
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("state", &self.state())
            .field("value", &self.get())
            .finish()
    }
}

impl<T> Drop for Slot<T> {
    fn drop(&mut self) {
        if self.state.load(Ordering::Acquire) == SlotState::Initialized {
            // SAFETY: `&mut self` is exclusive and the state says the cell
            // holds a value.
            unsafe { self.value.get_mut().assume_init_drop() };
        }
    }
}
