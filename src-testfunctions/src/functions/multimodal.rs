//! Multimodal test functions
//!
//! These functions have many local minima (or a discontinuous landscape) and
//! test whether a swarm keeps exploring instead of collapsing early.

use ndarray::Array1;
use std::f64::consts::{E, PI};

/// Step function - discontinuous plateaus
/// Global minimum: f(x) = 0 for every x_i in [-0.5, 0.5)
/// Bounds: x_i in [-100, 100]
pub fn step(x: &Array1<f64>) -> f64 {
    x.iter().map(|&xi| (xi + 0.5).floor().powi(2)).sum()
}

/// Schaffer F6 function - concentric ripples, 2D only
/// Global minimum: f(x) = 0 at x = (0, 0)
/// Bounds: x_i in [-100, 100]
pub fn schaffer_f6(x: &Array1<f64>) -> f64 {
    let r2 = x[0] * x[0] + x[1] * x[1];
    0.5 + (r2.sqrt().sin().powi(2) - 0.5) / (1.0 + 0.001 * r2).powi(2)
}

/// Ackley function - nearly flat outer region with a central funnel
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-32.768, 32.768]
pub fn ackley(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let sum_cos: f64 = x.iter().map(|&xi| (2.0 * PI * xi).cos()).sum();
    -20.0 * (-0.2 * (sum_sq / n).sqrt()).exp() - (sum_cos / n).exp() + 20.0 + E
}

/// Rastrigin function - highly multimodal
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-5.12, 5.12]
pub fn rastrigin(x: &Array1<f64>) -> f64 {
    let n = x.len() as f64;
    let sum: f64 = x.iter().map(|&xi| xi * xi - 10.0 * (2.0 * PI * xi).cos()).sum();
    10.0 * n + sum
}

/// Griewank function - product term couples the dimensions
/// Global minimum: f(x) = 0 at x = (0, 0, ..., 0)
/// Bounds: x_i in [-600, 600]
pub fn griewank(x: &Array1<f64>) -> f64 {
    let sum_sq: f64 = x.iter().map(|&xi| xi * xi).sum();
    let product_cos: f64 = x.iter().enumerate().map(|(i, &xi)| (xi / ((i + 1) as f64).sqrt()).cos()).product();
    1.0 + sum_sq / 4000.0 - product_cos
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_step_plateau() {
        assert_eq!(step(&array![0.4, -0.5, 0.0]), 0.0);
        assert_eq!(step(&array![0.5]), 1.0);
        assert_eq!(step(&array![-1.7]), 4.0);
    }

    #[test]
    fn test_schaffer_f6_ring() {
        assert!(schaffer_f6(&array![0.0, 0.0]).abs() < 1e-12);
        // sin^2 peaks at r = pi/2
        let r = PI / 2.0;
        assert!(schaffer_f6(&array![r, 0.0]) > 0.99);
    }

    #[test]
    fn test_griewank_scales_by_one_based_index() {
        let x = array![0.0, PI * 2f64.sqrt()];
        // cos(pi) = -1 on the second coordinate
        let expected = 1.0 + x[1] * x[1] / 4000.0 + 1.0;
        assert!((griewank(&x) - expected).abs() < 1e-12);
    }
}
