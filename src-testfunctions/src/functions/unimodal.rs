//! Unimodal test functions
//!
//! One basin each. These mostly measure how fast a swarm contracts onto the
//! optimum.

use ndarray::Array1;

/// Sphere function - bowl-shaped
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-100, 100]
pub fn sphere(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| xi * xi).sum()
}

/// Sum of squares, weighted by 1-based index
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-10, 10]
pub fn sum_squares(x: &Array1<f64>) -> f64 {
    x.iter().enumerate().map(|(i, &xi)| (i + 1) as f64 * xi * xi).sum()
}

/// Quartic function, deterministic (no noise term)
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-1.28, 1.28]
pub fn quartic(x: &Array1<f64>) -> f64 {
    x.iter().enumerate().map(|(i, &xi)| (i + 1) as f64 * xi.powi(4)).sum()
}

/// Zakharov function - plate-shaped
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5, 10]
pub fn zakharov(x: &Array1<f64>) -> f64 {
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let weighted: f64 = x.iter().enumerate().map(|(i, &xi)| 0.5 * (i + 1) as f64 * xi).sum();
    sum_sq + weighted.powi(2) + weighted.powi(4)
}

/// Rosenbrock function - narrow curved valley
/// Global minimum: f(x) = 0 at x = (1, 1, ..., 1)
/// Bounds: x_i in [-5, 10]
pub fn rosenbrock(x: &Array1<f64>) -> f64 {
    x.windows(2)
        .into_iter()
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (w[0] - 1.0).powi(2))
        .sum()
}

/// Easom function - flat plate with a very narrow hole, 2D only
/// Global minimum: f(x) = -1 at x = (π, π)
/// Bounds: x_i in [-100, 100]
pub fn easom(x: &Array1<f64>) -> f64 {
    let x1 = x[0];
    let x2 = x[1];
    let pi = std::f64::consts::PI;
    -x1.cos() * x2.cos() * (-(x1 - pi).powi(2) - (x2 - pi).powi(2)).exp()
}
