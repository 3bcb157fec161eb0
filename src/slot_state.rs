use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

const UNINITIALIZED: u8 = 0;
const CONSTRUCTING: u8 = 1;
const INITIALIZED: u8 = 2;

/// Lifecycle of a slot's one permitted instance.
///
/// A slot starts `Uninitialized`, passes through `Constructing` while exactly
/// one thread runs the constructor, and ends `Initialized` once the value is
/// published. A failed construction returns the slot to `Uninitialized`;
/// `Initialized` is final for the rest of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// No value yet; the next `get_instance` call may construct one.
    Uninitialized,
    /// Exactly one thread is inside the constructor.
    Constructing,
    /// The value is constructed and published; reads are lock-free from here.
    Initialized,
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotState::Uninitialized => write!(f, "uninitialized"),
            SlotState::Constructing => write!(f, "constructing"),
            SlotState::Initialized => write!(f, "initialized"),
        }
    }
}

/// Atomic container for a `SlotState`.
///
/// Orderings are the caller's contract: the publish store must be `Release`
/// and the fast-path load `Acquire`, so a reader that observes `Initialized`
/// also observes the constructed value.
pub(crate) struct AtomicState(AtomicU8);

impl AtomicState {
    pub(crate) const fn uninitialized() -> Self {
        Self(AtomicU8::new(UNINITIALIZED))
    }

    pub(crate) const fn initialized() -> Self {
        Self(AtomicU8::new(INITIALIZED))
    }

    pub(crate) fn load(&self, order: Ordering) -> SlotState {
        match self.0.load(order) {
            UNINITIALIZED => SlotState::Uninitialized,
            CONSTRUCTING => SlotState::Constructing,
            _ => SlotState::Initialized,
        }
    }

    pub(crate) fn store(&self, state: SlotState, order: Ordering) {
        let raw = match state {
            SlotState::Uninitialized => UNINITIALIZED,
            SlotState::Constructing => CONSTRUCTING,
            SlotState::Initialized => INITIALIZED,
        };
        self.0.store(raw, order);
    }
}
