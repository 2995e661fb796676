//! The velocity/position recurrence shared by most variants.
//!
//! ```text
//! v[d] = w*v[d] + c1*U1*(pbest[d]-x[d]) + c2*U2*(exemplar[d]-x[d])
//! v[d] = clamp(v[d], -vmax[d], vmax[d])
//! x[d] = clamp(x[d] + v[d], lb[d], ub[d])
//! ```
//!
//! Evaluation and the personal-best update stay with the caller, which
//! routes them through the evaluation budget.

use ndarray::ArrayView1;
use rand::Rng;

use crate::particle::{Coefficients, Particle};
use crate::state::Limits;

/// Canonical move toward `exemplar` (global, local or leader position).
pub(crate) fn canonical_move<R: Rng + ?Sized>(
    p: &mut Particle,
    c: Coefficients,
    exemplar: ArrayView1<f64>,
    limits: &Limits,
    rng: &mut R,
) {
    for d in 0..p.dimension() {
        let r1 = rng.random::<f64>();
        let r2 = rng.random::<f64>();
        let v = c.w * p.v[d] + c.c1 * r1 * (p.pbest[d] - p.x[d]) + c.c2 * r2 * (exemplar[d] - p.x[d]);
        p.v[d] = limits.clamp_velocity(d, v);
        p.x[d] = limits.clamp_position(d, p.x[d] + p.v[d]);
    }
}

/// Single-term move: dimension `d` learns from `guide(d)` only.
pub(crate) fn learning_move<R, G>(p: &mut Particle, w: f64, c: f64, guide: G, limits: &Limits, rng: &mut R)
where
    R: Rng + ?Sized,
    G: Fn(usize) -> f64,
{
    for d in 0..p.dimension() {
        let r = rng.random::<f64>();
        let v = w * p.v[d] + c * r * (guide(d) - p.x[d]);
        p.v[d] = limits.clamp_velocity(d, v);
        p.x[d] = limits.clamp_position(d, p.x[d] + p.v[d]);
    }
}

/// Move along the current velocity without recomputing it.
pub(crate) fn drift(p: &mut Particle, limits: &Limits) {
    for d in 0..p.dimension() {
        p.x[d] = limits.clamp_position(d, p.x[d] + p.v[d]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn limits_1d() -> Limits {
        Limits::new(array![-1.0], array![1.0], 0.2)
    }

    #[test]
    fn test_zero_acceleration_keeps_particles_at_rest() {
        let limits = limits_1d();
        let mut rng = StdRng::seed_from_u64(1);
        let c = Coefficients { w: 0.5, c1: 0.0, c2: 0.0 };
        let mut a = Particle::at_rest(array![0.25], 0.0625);
        let b = Particle::at_rest(array![-0.5], 0.25);
        for _ in 0..10 {
            canonical_move(&mut a, c, b.pbest.view(), &limits, &mut rng);
        }
        assert_eq!(a.x, array![0.25]);
        assert_eq!(a.v, array![0.0]);
    }

    #[test]
    fn test_velocity_and_position_clamped() {
        let limits = limits_1d();
        let mut rng = StdRng::seed_from_u64(2);
        let c = Coefficients { w: 1.0, c1: 2.0, c2: 2.0 };
        let mut p = Particle::at_rest(array![0.95], 1.0);
        p.v[0] = 5.0;
        let far = array![-1.0];
        for _ in 0..50 {
            canonical_move(&mut p, c, far.view(), &limits, &mut rng);
            assert!(p.v[0].abs() <= limits.vmax[0] + 1e-12);
            assert!((-1.0..=1.0).contains(&p.x[0]));
        }
    }

    #[test]
    fn test_drift_clamps_without_touching_velocity() {
        let limits = limits_1d();
        let mut p = Particle::at_rest(array![0.9], 0.0);
        p.v[0] = 0.3;
        drift(&mut p, &limits);
        assert_eq!(p.x[0], 1.0);
        assert_eq!(p.v[0], 0.3);
    }

    #[test]
    fn test_learning_move_pulls_toward_guide() {
        let limits = Limits::new(array![-10.0, -10.0], array![10.0, 10.0], 0.5);
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = Particle::at_rest(array![5.0, -5.0], 0.0);
        for _ in 0..200 {
            learning_move(&mut p, 0.4, 2.0, |_| 0.0, &limits, &mut rng);
        }
        assert!(p.x.iter().all(|v| v.abs() < 1.0), "{:?}", p.x);
    }
}
