//! Capability contract for calculator plugins.
//!
//! Hosts request instances against this trait; plugin types implement it.
//! Both sides must depend on the same version of this crate so the boxed
//! trait object downcast in the loader succeeds.

/// A calculator operating on two integers.
pub trait Calculator: Send + Sync {
    /// Perform the calculator's operation on two integers.
    fn calculate(&self, i1: i64, i2: i64) -> i64;
}

/// The boxed form hosts request from the loader.
pub type BoxedCalculator = Box<dyn Calculator>;
