//! Numeric traits shared across the engine.

/// Generic floating-point trait for return and moment computations.
///
/// The statistics primitives are written against this trait so they work
/// for `f64` (the engine default) as well as `f32`.
///
/// # Examples
/// ```
/// use finrisk_core::traits::Float;
///
/// fn gross<T: Float>(r: T) -> T {
///     T::one() + r
/// }
///
/// assert_eq!(gross(0.25_f64), 1.25);
/// ```
pub use num_traits::Float;
