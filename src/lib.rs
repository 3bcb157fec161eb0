//! # Singleton Slot
//!
//! Race-free process-wide singletons: one `get_instance()` contract over
//! three interchangeable construction strategies.
//!
//! Every strategy guarantees the same two invariants: at most one instance is
//! ever constructed for a given slot, and a thread that observes the
//! initialized state observes the fully constructed value (release publish
//! paired with acquire reads). What varies is *when* construction happens and
//! *who* arbitrates the race.
//!
//! ## Quick Start
//!
//! ```rust
//! use singleton_slot::define_singleton;
//!
//! define_singleton!(greeting: String = "Hello, World!".to_string());
//!
//! // Constructed on the first call, shared for the rest of the process.
//! let message = greeting::get_instance();
//! assert_eq!(message, "Hello, World!");
//! assert!(std::ptr::eq(message, greeting::get_instance()));
//! ```
//!
//! ## Strategies
//!
//! - [`Eager`] - built during const evaluation, before `main`; access is
//!   branch-free and lock-free, the cost is paid whether or not the value is
//!   used
//! - [`Lazy`] / [`TryLazy`] - built on first access through this crate's
//!   double-checked protocol: an atomic fast path, a construction lock, a
//!   mandatory re-check, and rollback on failure so construction can be
//!   retried
//! - [`Holder`] - built on first access with the exactly-once arbitration
//!   delegated to [`std::sync::OnceLock`]
//!
//! ## Main Types
//!
//! - [`Slot`] - the double-checked protocol core, usable directly
//! - [`Singleton`] - the trait all infallible strategies implement
//! - [`SlotState`] - observable lifecycle (`Uninitialized` / `Constructing` /
//!   `Initialized`)
//! - [`SlotError`] - construction failure and bypass rejection
//! - [`set_trace_callback`] - tracing hook for construction-path transitions,
//!   mirrored to the `log` facade
//! - [`define_singleton!`] - declare a global singleton behind a generated
//!   module

mod eager;
mod holder;
mod lazy;
mod macros;
mod singleton;
mod slot;
mod slot_error;
mod slot_event;
mod slot_state;

// Re-export the main public API
pub use eager::Eager;
pub use holder::Holder;
pub use lazy::{Lazy, TryLazy};
pub use singleton::Singleton;
pub use slot::Slot;
pub use slot_error::SlotError;
pub use slot_event::{clear_trace_callback, set_trace_callback, SlotEvent, TraceCallback};
pub use slot_state::SlotState;
