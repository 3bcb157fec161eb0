//! Trace events for construction-path transitions.
//!
//! Events are passed to the tracing callback set via `set_trace_callback` and
//! mirrored to the `log` facade. They fire on the construction slow path only;
//! the initialized fast path stays a single atomic read and emits nothing.

use std::fmt;
use std::sync::{Arc, LazyLock, Mutex};

/// Events emitted while a slot changes state.
///
/// The `Clone` derive allows callbacks to store or forward events if needed.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::SlotEvent;
///
/// let event = SlotEvent::Constructed { type_name: "i32" };
/// println!("{:?}", event);
/// ```
#[derive(Debug, Clone)]
pub enum SlotEvent {
    /// A constructor ran to completion and the value was published.
    Constructed {
        /// The type name of the constructed value (e.g., "i32", "alloc::string::String")
        type_name: &'static str,
    },

    /// A constructor returned an error and the slot was rolled back.
    ConstructionFailed {
        /// The type name whose construction failed
        type_name: &'static str,
    },

    /// A second construction attempt was rejected on a populated slot.
    BypassRejected {
        /// The type name of the already-present value
        type_name: &'static str,
    },
}

impl fmt::Display for SlotEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotEvent::Constructed { type_name } => {
                write!(f, "constructed {{ type_name: {type_name} }}")
            }
            SlotEvent::ConstructionFailed { type_name } => {
                write!(f, "construction_failed {{ type_name: {type_name} }}")
            }
            SlotEvent::BypassRejected { type_name } => {
                write!(f, "bypass_rejected {{ type_name: {type_name} }}")
            }
        }
    }
}

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives a reference to a `SlotEvent` for every construction,
/// construction failure, and rejected bypass in the process. It must be
/// thread-safe because slots are globally shared.
pub type TraceCallback = dyn Fn(&SlotEvent) + Send + Sync + 'static;

/// Holds an optional user-defined tracing callback.
static TRACE_CALLBACK: LazyLock<Mutex<Option<Arc<TraceCallback>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Sets a tracing callback that will be invoked on every slot transition.
///
/// Call `clear_trace_callback` to disable tracing.
///
/// # Safety Restrictions
///
/// The callback must NOT call `set_trace_callback` or `clear_trace_callback`;
/// it is invoked while the trace lock is held. Construction locks of the
/// emitting slot are released before the callback runs.
///
/// # Example
/// ```rust
/// use singleton_slot::set_trace_callback;
///
/// set_trace_callback(|event| println!("[singleton-trace] {:?}", event));
/// # singleton_slot::clear_trace_callback();
/// ```
pub fn set_trace_callback(callback: impl Fn(&SlotEvent) + Send + Sync + 'static) {
    let mut guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    *guard = Some(Arc::new(callback));
}

/// Clears the tracing callback (disables slot tracing).
pub fn clear_trace_callback() {
    let mut guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    *guard = None;
}

/// Emits an event to the `log` facade and the current callback.
pub(crate) fn emit(event: &SlotEvent) {
    match event {
        SlotEvent::Constructed { type_name } => log::debug!("singleton constructed: {type_name}"),
        SlotEvent::ConstructionFailed { type_name } => {
            log::warn!("singleton construction failed: {type_name}")
        }
        SlotEvent::BypassRejected { type_name } => {
            log::warn!("singleton bypass rejected: {type_name}")
        }
    }

    // lock poisoning unlikely; if poisoned, keep emitting with recovered lock
    let guard = TRACE_CALLBACK.lock().unwrap_or_else(|p| p.into_inner());
    if let Some(callback) = guard.as_ref() {
        callback(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_slot_event_display() {
        let event = SlotEvent::Constructed { type_name: "i32" };
        assert_eq!(event.to_string(), "constructed { type_name: i32 }");

        let event = SlotEvent::ConstructionFailed {
            type_name: "String",
        };
        assert_eq!(
            event.to_string(),
            "construction_failed { type_name: String }"
        );

        let event = SlotEvent::BypassRejected { type_name: "u8" };
        assert_eq!(event.to_string(), "bypass_rejected { type_name: u8 }");
    }

    #[test]
    fn test_slot_event_clone() {
        let event = SlotEvent::Constructed { type_name: "i32" };
        let cloned = event.clone();
        assert_eq!(format!("{:?}", event), format!("{:?}", cloned));
    }

    #[test]
    #[serial]
    fn test_emit_reaches_callback() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        static COUNT: AtomicUsize = AtomicUsize::new(0);

        // Filter on a marker name so unrelated slots constructed by parallel
        // tests cannot skew the count.
        set_trace_callback(|event| {
            if let SlotEvent::Constructed { type_name: "emit_marker" } = event {
                COUNT.fetch_add(1, Ordering::SeqCst);
            }
        });

        emit(&SlotEvent::Constructed {
            type_name: "emit_marker",
        });
        assert_eq!(COUNT.load(Ordering::SeqCst), 1);

        clear_trace_callback();
        emit(&SlotEvent::Constructed {
            type_name: "emit_marker",
        });
        assert_eq!(COUNT.load(Ordering::SeqCst), 1);
    }
}
