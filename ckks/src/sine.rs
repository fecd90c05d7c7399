use crate::chebyshev::{double_angle_constants, ChebyshevInterpolation};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Interpolant on [-1, 1] of sin(2 pi k u) / (2 pi), which for u = t / k is close to
/// t - round(t) whenever t is close to an integer.
pub fn sine_approximation(k: f64, degree: usize) -> ChebyshevInterpolation {
    ChebyshevInterpolation::approximate(
        |u| Complex64::new((2.0 * PI * k * u).sin() / (2.0 * PI), 0.0),
        -1.0,
        1.0,
        degree,
    )
}

/// Interpolant on [-1, 1] of beta_0 cos(2 pi k u / 2^r). After r double-angle steps the
/// evaluation yields cos(2 pi k u) / (2 pi), which equals sin(2 pi k (u + 1/(4k))) / (2 pi).
pub fn better_sine_approximation(k: f64, degree: usize, r: usize) -> ChebyshevInterpolation {
    let beta_0: f64 = double_angle_constants(r)[0];
    let scale: f64 = (r as f64).exp2();
    ChebyshevInterpolation::approximate(
        |u| Complex64::new(beta_0 * (2.0 * PI * k * u / scale).cos(), 0.0),
        -1.0,
        1.0,
        degree,
    )
}
