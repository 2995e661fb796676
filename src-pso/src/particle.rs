//! A single particle: position, velocity, personal best, and the optional
//! per-variant fields that only some strategies populate.

use ndarray::Array1;

use crate::objective::Direction;

/// Inertia and acceleration coefficients carried by one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub w: f64,
    pub c1: f64,
    pub c2: f64,
}

/// Per-dimension coefficients (distance-shaped variants).
#[derive(Debug, Clone, PartialEq)]
pub struct DimCoefficients {
    pub w: Array1<f64>,
    pub c1: Array1<f64>,
    pub c2: Array1<f64>,
}

impl DimCoefficients {
    pub fn zeros(n: usize) -> Self {
        Self { w: Array1::zeros(n), c1: Array1::zeros(n), c2: Array1::zeros(n) }
    }
}

/// One candidate solution.
///
/// `pbest`/`fpbest` only move through [`Particle::record`] (or an explicit
/// strictly-fitter replacement), so the personal best never regresses.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub x: Array1<f64>,
    /// Velocity; stays zero for velocity-less variants.
    pub v: Array1<f64>,
    pub fx: f64,
    pub pbest: Array1<f64>,
    pub fpbest: f64,
    /// Neighbour indices (lattice or sub-swarm members, self excluded).
    pub neighbours: Vec<usize>,
    /// Per-dimension exemplar index (comprehensive learning, orthogonal guidance).
    pub exemplars: Vec<usize>,
    pub coefficients: Option<Coefficients>,
    pub dim_coefficients: Option<DimCoefficients>,
    /// Generations since the personal best last improved.
    pub stagnation: usize,
    /// Position and fitness before the latest move, when one exists.
    pub previous: Option<(Array1<f64>, f64)>,
    /// Relaxation flag: recompute velocity on the next move.
    pub update_velocity: bool,
    /// Comprehensive-learning probability.
    pub learning_probability: f64,
}

impl Particle {
    /// New particle whose personal best is its current position.
    pub fn new(x: Array1<f64>, v: Array1<f64>, fx: f64) -> Self {
        Self {
            pbest: x.clone(),
            fpbest: fx,
            x,
            v,
            fx,
            neighbours: Vec::new(),
            exemplars: Vec::new(),
            coefficients: None,
            dim_coefficients: None,
            stagnation: 0,
            previous: None,
            update_velocity: false,
            learning_probability: 0.0,
        }
    }

    /// Particle at rest.
    pub fn at_rest(x: Array1<f64>, fx: f64) -> Self {
        let n = x.len();
        Self::new(x, Array1::zeros(n), fx)
    }

    pub fn dimension(&self) -> usize {
        self.x.len()
    }

    /// Store a freshly evaluated fitness for the current position and
    /// promote it to personal best when strictly fitter. Returns whether
    /// the personal best improved.
    pub fn record(&mut self, fx: f64, direction: Direction) -> bool {
        self.fx = fx;
        if direction.fitter(fx, self.fpbest) {
            self.pbest.assign(&self.x);
            self.fpbest = fx;
            true
        } else {
            false
        }
    }

    /// Replace the personal best with an externally found point, only if it
    /// is strictly fitter.
    pub fn offer_memory(&mut self, position: &Array1<f64>, f: f64, direction: Direction) -> bool {
        if direction.fitter(f, self.fpbest) {
            self.pbest.assign(position);
            self.fpbest = f;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_record_requires_strict_improvement() {
        let mut p = Particle::at_rest(array![1.0, 2.0], 5.0);
        p.x = array![0.0, 0.0];
        assert!(!p.record(5.0, Direction::Minimize));
        assert_eq!(p.pbest, array![1.0, 2.0]);
        assert_eq!(p.fx, 5.0);

        assert!(p.record(4.0, Direction::Minimize));
        assert_eq!(p.pbest, array![0.0, 0.0]);
        assert_eq!(p.fpbest, 4.0);

        p.x = array![3.0, 3.0];
        assert!(!p.record(9.0, Direction::Minimize));
        assert_eq!(p.fpbest, 4.0);
        assert_eq!(p.fx, 9.0);
    }

    #[test]
    fn test_offer_memory_keeps_fitter_best() {
        let mut p = Particle::at_rest(array![1.0], 1.0);
        assert!(!p.offer_memory(&array![2.0], 0.5, Direction::Maximize));
        assert!(p.offer_memory(&array![2.0], 1.5, Direction::Maximize));
        assert_eq!(p.pbest, array![2.0]);
        assert_eq!(p.x, array![1.0]);
    }
}
