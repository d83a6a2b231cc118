//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Targeting
/// criteria, forecast requests and forecast results are all value objects: two
/// requests with the same budget, timeline and criteria are the same request,
/// and the engine must produce the same result for both.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct Budget(f64);
///
/// impl ValueObject for Budget {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
