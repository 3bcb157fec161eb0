//! Macros for declaring global singletons.
//!
//! This module provides a macro-based approach to declare thread-safe global
//! singletons with the construction strategy chosen at the declaration site.

/// Declares a global singleton with a single macro invocation.
///
/// The macro generates a module containing:
/// - The strategy static (hidden)
/// - `get_instance()` plus the `is_initialized()` / `state()` observers
///
/// The leading keyword selects the construction strategy; with no keyword the
/// double-checked lazy strategy is used.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::define_singleton;
///
/// pub struct AppConfig {
///     pub threads: usize,
/// }
///
/// define_singleton!(config: AppConfig = AppConfig { threads: 4 });
///
/// fn main() {
///     // Constructed on the first call, shared ever after.
///     let config = config::get_instance();
///     assert_eq!(config.threads, 4);
///     assert!(std::ptr::eq(config, config::get_instance()));
/// }
/// ```
///
/// # Strategy Selection
///
/// ```rust
/// use singleton_slot::define_singleton;
///
/// // Built during const evaluation, before main; access is branch-free.
/// define_singleton!(eager retries: u32 = 3);
///
/// // First-use initialization arbitrated by std::sync::OnceLock.
/// define_singleton!(holder motd: String = "welcome".to_string());
///
/// fn main() {
///     assert!(retries::is_initialized());
///     assert_eq!(motd::get_instance(), "welcome");
/// }
/// ```
///
/// # Fallible Construction
///
/// A `fallible` singleton names its error type and returns `Result`; a failed
/// construction leaves the slot empty so a later call can retry.
///
/// ```rust
/// use singleton_slot::define_singleton;
///
/// define_singleton!(fallible port: u16, std::num::ParseIntError = "8080".parse()?);
///
/// fn main() {
///     assert_eq!(port::get_instance().copied(), Ok(8080));
/// }
/// ```
#[macro_export]
macro_rules! define_singleton {
    (eager $name:ident: $ty:ty = $construct:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static INSTANCE: $crate::Eager<$ty> = $crate::Eager::new($construct);

            /// Returns the pre-constructed process-wide instance.
            pub fn get_instance() -> &'static $ty {
                INSTANCE.get_instance()
            }

            /// Always true: the instance is materialized before `main`.
            pub fn is_initialized() -> bool {
                true
            }

            /// Always `Initialized`.
            pub fn state() -> $crate::SlotState {
                $crate::SlotState::Initialized
            }
        }
    };
    (holder $name:ident: $ty:ty = $construct:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static INSTANCE: $crate::Holder<$ty> = $crate::Holder::new(|| $construct);

            /// Returns the process-wide instance, constructing it on first call.
            pub fn get_instance() -> &'static $ty {
                INSTANCE.get_instance()
            }

            /// Returns true once the instance has been constructed.
            pub fn is_initialized() -> bool {
                INSTANCE.is_initialized()
            }

            /// Current lifecycle state of the backing cell.
            pub fn state() -> $crate::SlotState {
                INSTANCE.state()
            }
        }
    };
    (fallible $name:ident: $ty:ty, $err:ty = $construct:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static INSTANCE: $crate::TryLazy<$ty, $err> =
                $crate::TryLazy::new(|| Ok($construct));

            /// Returns the process-wide instance, constructing it on first
            /// call. A failed construction may be retried by calling again.
            pub fn get_instance() -> Result<&'static $ty, $crate::SlotError<$err>> {
                INSTANCE.get_instance()
            }

            /// Returns true once a construction has succeeded.
            pub fn is_initialized() -> bool {
                INSTANCE.is_initialized()
            }

            /// Current lifecycle state of the backing slot.
            pub fn state() -> $crate::SlotState {
                INSTANCE.state()
            }
        }
    };
    ($name:ident: $ty:ty = $construct:expr) => {
        pub mod $name {
            #[allow(unused_imports)]
            use super::*;

            static INSTANCE: $crate::Lazy<$ty> = $crate::Lazy::new(|| $construct);

            /// Returns the process-wide instance, constructing it on first call.
            pub fn get_instance() -> &'static $ty {
                INSTANCE.get_instance()
            }

            /// Returns true once the instance has been constructed.
            pub fn is_initialized() -> bool {
                INSTANCE.is_initialized()
            }

            /// Current lifecycle state of the backing slot.
            pub fn state() -> $crate::SlotState {
                INSTANCE.state()
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::SlotState;

    pub struct Settings {
        pub name: &'static str,
        pub workers: usize,
    }

    define_singleton!(settings: Settings = Settings {
        name: "app",
        workers: 4,
    });

    define_singleton!(eager window_title: &'static str = "main");

    define_singleton!(holder banner: String = format!("{}-{}", "v", 2));

    define_singleton!(fallible parsed: u32, std::num::ParseIntError = "17".parse()?);

    #[test]
    fn test_lazy_singleton_module() {
        assert_eq!(settings::get_instance().name, "app");
        assert_eq!(settings::get_instance().workers, 4);
        assert!(settings::is_initialized());
        assert_eq!(settings::state(), SlotState::Initialized);
        assert!(std::ptr::eq(
            settings::get_instance(),
            settings::get_instance()
        ));
    }

    #[test]
    fn test_eager_singleton_module() {
        assert!(window_title::is_initialized());
        assert_eq!(window_title::state(), SlotState::Initialized);
        assert_eq!(*window_title::get_instance(), "main");
    }

    #[test]
    fn test_holder_singleton_module() {
        assert_eq!(banner::get_instance(), "v-2");
        assert!(banner::is_initialized());
    }

    #[test]
    fn test_fallible_singleton_module() {
        let value = parsed::get_instance().expect("\"17\" parses");
        assert_eq!(*value, 17);
        assert!(parsed::is_initialized());
        assert_eq!(parsed::state(), SlotState::Initialized);
    }

    #[test]
    fn test_declaration_inside_a_function() {
        define_singleton!(local_message: String = "generated".to_string());

        assert!(!local_message::is_initialized());
        assert_eq!(local_message::get_instance(), "generated");
        assert!(local_message::is_initialized());
    }

    #[test]
    fn test_singletons_are_isolated() {
        define_singleton!(counter_a: u32 = 1);
        define_singleton!(counter_b: u32 = 2);

        assert_eq!(*counter_a::get_instance(), 1);
        assert_eq!(*counter_b::get_instance(), 2);
        assert!(!std::ptr::eq(
            counter_a::get_instance(),
            counter_b::get_instance()
        ));
    }
}
