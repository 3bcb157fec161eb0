//! The shared contract over construction-timing strategies.

/// One interface over the construction strategies.
///
/// [`Eager`](crate::Eager) pre-constructs the value, [`Lazy`](crate::Lazy)
/// runs the double-checked protocol on first call, and
/// [`Holder`](crate::Holder) defers to the standard library's once primitive.
/// From the caller's side the contract is identical: at most one instance is
/// ever constructed, and every returned reference points at it.
///
/// The fallible [`TryLazy`](crate::TryLazy) stays off this trait because its
/// accessor returns `Result`.
///
/// # Examples
///
/// ```rust
/// use singleton_slot::{Lazy, Singleton};
///
/// fn shared_len<S: Singleton<Instance = String>>(source: &S) -> usize {
///     source.get_instance().len()
/// }
///
/// static GREETING: Lazy<String> = Lazy::new(|| "hello".to_string());
/// assert_eq!(shared_len(&GREETING), 5);
/// ```
pub trait Singleton {
    /// The type of the process-wide instance.
    type Instance;

    /// Returns the shared instance, constructing it first if this strategy
    /// defers construction.
    fn get_instance(&self) -> &Self::Instance;

    /// Returns true once the instance exists.
    fn is_initialized(&self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Eager, Holder, Lazy};

    fn instance_of<S: Singleton>(source: &S) -> &S::Instance {
        source.get_instance()
    }

    #[test]
    fn test_all_strategies_satisfy_the_contract() {
        static EAGER: Eager<u32> = Eager::new(1);
        static LAZY: Lazy<u32> = Lazy::new(|| 2);
        static HOLDER: Holder<u32> = Holder::new(|| 3);

        assert_eq!(*instance_of(&EAGER), 1);
        assert_eq!(*instance_of(&LAZY), 2);
        assert_eq!(*instance_of(&HOLDER), 3);
    }

    #[test]
    fn test_get_instance_is_idempotent_through_the_trait() {
        static LAZY: Lazy<String> = Lazy::new(|| "stable".to_string());

        let first = instance_of(&LAZY);
        let second = instance_of(&LAZY);
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_is_initialized_reporting() {
        static EAGER: Eager<u8> = Eager::new(0);
        static LAZY: Lazy<u8> = Lazy::new(|| 0);

        assert!(Singleton::is_initialized(&EAGER));
        assert!(!Singleton::is_initialized(&LAZY));
        LAZY.get_instance();
        assert!(Singleton::is_initialized(&LAZY));
    }
}
