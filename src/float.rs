//! Clamped floating-point arithmetic shared by all controllers.
//!
//! Unlike [`f32::max`]/[`f32::min`], the helpers here propagate `NaN`: a `NaN`
//! in any operand comes out the other side. A `NaN` in controller state means
//! a broken configuration or input upstream (for example a zero time
//! constant), and clamping must never hide it behind a finite bound.

use core::time::Duration;
use num_traits::float::FloatCore;
use num_traits::NumCast;

/// Largest finite `f32`. The controllers keep their error, integrand,
/// integral and derivative state within `[-MAX_FLOAT32, MAX_FLOAT32]` when
/// running on `f32`.
pub const MAX_FLOAT32: f32 = f32::MAX;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// Smaller of `a` and `b`, `NaN` if either is `NaN`. `min(-0.0, 0.0)` is `-0.0`.
#[inline]
pub fn min<T: FloatCore>(a: T, b: T) -> T {
    if a.is_nan() || b.is_nan() {
        T::nan()
    } else if a < b || (a == b && a.is_sign_negative()) {
        a
    } else {
        b
    }
}

/// Larger of `a` and `b`, `NaN` if either is `NaN`. `max(-0.0, 0.0)` is `0.0`.
#[inline]
pub fn max<T: FloatCore>(a: T, b: T) -> T {
    if a.is_nan() || b.is_nan() {
        T::nan()
    } else if a > b || (a == b && a.is_sign_positive()) {
        a
    } else {
        b
    }
}

/// Clamps `value` to `[lo, hi]` as `max(lo, min(hi, value))`.
///
/// The upper bound is applied first, so a flipped range (`lo > hi`) yields
/// `lo`. Never panics.
#[inline]
pub fn clamp<T: FloatCore>(value: T, lo: T, hi: T) -> T {
    max(lo, min(hi, value))
}

/// Clamps `value` to the finite range of `T`, turning `±inf` into
/// `±T::max_value()` and letting `NaN` through.
#[inline]
pub fn saturate<T: FloatCore>(value: T) -> T {
    clamp(value, -T::max_value(), T::max_value())
}

/// Converts a duration to seconds in `T`, as whole nanoseconds divided by 1e9.
#[inline]
pub fn seconds<T: FloatCore>(duration: Duration) -> T {
    cast::<T, _>(duration.as_nanos()) / cast::<T, _>(NANOS_PER_SEC)
}

/// Fraction of the integral left after discharging for `dt` with the given
/// time constant: linear decay, bounded to `[0, 1]`.
pub(crate) fn discharge_factor<T: FloatCore>(dt: Duration, time_constant: Duration) -> T {
    clamp(
        T::one() - seconds::<T>(dt) / seconds::<T>(time_constant),
        T::zero(),
        T::one(),
    )
}

// Integer to float conversions always succeed; `NaN` keeps the failure visible
// should a custom `T` ever refuse one.
fn cast<T: FloatCore, N: NumCast>(n: N) -> T {
    <T as NumCast>::from(n).unwrap_or_else(T::nan)
}
