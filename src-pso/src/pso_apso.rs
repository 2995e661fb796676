//! Adaptive PSO driven by a fuzzy estimate of the evolutionary state.
//!
//! Every generation the swarm's spread around the best particle is reduced
//! to an evolutionary factor `e` in `[0, 1]`, classified into one of four
//! states, and the acceleration coefficients are nudged accordingly. In
//! the convergence state an elitist learning step perturbs the best memory.

use log::{debug, trace};
use ndarray::Array1;
use rand::Rng;

use crate::error::Result;
use crate::kernel::canonical_move;
use crate::objective::Direction;
use crate::particle::Coefficients;
use crate::sampling::{gaussian, uniform};
use crate::state::SearchState;
use crate::strategy::{check_positive, check_range, SwarmStrategy};

const C_MIN: f64 = 1.5;
const C_MAX: f64 = 2.5;
const C_SUM_MIN: f64 = 3.0;
const C_SUM_MAX: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvolutionaryState {
    Exploration,
    Exploitation,
    Convergence,
    JumpingOut,
}

impl EvolutionaryState {
    const ORDER: [EvolutionaryState; 4] = [
        EvolutionaryState::Exploration,
        EvolutionaryState::Exploitation,
        EvolutionaryState::Convergence,
        EvolutionaryState::JumpingOut,
    ];
}

/// Fuzzy memberships of `e`, indexed like exploration, exploitation,
/// convergence, jumping-out.
pub fn membership(e: f64) -> [f64; 4] {
    let exploration = if e <= 0.4 {
        0.0
    } else if e <= 0.6 {
        5.0 * e - 2.0
    } else if e <= 0.7 {
        1.0
    } else if e <= 0.8 {
        -10.0 * e + 8.0
    } else {
        0.0
    };
    let exploitation = if e <= 0.2 {
        0.0
    } else if e <= 0.3 {
        10.0 * e - 2.0
    } else if e <= 0.4 {
        1.0
    } else if e <= 0.6 {
        -5.0 * e + 3.0
    } else {
        0.0
    };
    let convergence = if e <= 0.1 {
        1.0
    } else if e <= 0.3 {
        -5.0 * e + 1.5
    } else {
        0.0
    };
    let jumping_out = if e <= 0.7 {
        0.0
    } else if e <= 0.9 {
        5.0 * e - 3.5
    } else {
        1.0
    };
    [exploration, exploitation, convergence, jumping_out]
}

/// Classify `e`, using `previous` to break two-way overlaps. Any other
/// overlap pattern keeps `previous`.
pub fn classify(e: f64, previous: EvolutionaryState) -> EvolutionaryState {
    use EvolutionaryState::*;
    let mu = membership(e);
    let active: Vec<EvolutionaryState> =
        EvolutionaryState::ORDER.iter().zip(mu).filter(|(_, m)| *m != 0.0).map(|(s, _)| *s).collect();
    match active.as_slice() {
        [only] => *only,
        [Exploitation, Convergence] => {
            if matches!(previous, Exploration | Exploitation) {
                Exploitation
            } else {
                Convergence
            }
        }
        [Exploration, Exploitation] => {
            if matches!(previous, Exploration | JumpingOut) {
                Exploration
            } else {
                Exploitation
            }
        }
        [Exploration, JumpingOut] => {
            if matches!(previous, Exploration | JumpingOut) {
                Exploration
            } else {
                JumpingOut
            }
        }
        _ => previous,
    }
}

/// `(d_best - d_min) / (d_max - d_min)` over mean Euclidean distances to
/// the other particles. `None` when every mean distance is equal.
pub fn evolutionary_factor(positions: &[Array1<f64>], best: usize) -> Option<f64> {
    let n = positions.len();
    if n < 2 {
        return None;
    }
    let mean_distance: Vec<f64> = positions
        .iter()
        .map(|p| {
            positions.iter().map(|q| (p - q).mapv(|v| v * v).sum().sqrt()).sum::<f64>() / (n - 1) as f64
        })
        .collect();
    let d_max = mean_distance.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let d_min = mean_distance.iter().copied().fold(f64::INFINITY, f64::min);
    let spread = d_max - d_min;
    if !(spread > 0.0) {
        return None;
    }
    Some(((mean_distance[best] - d_min) / spread).clamp(0.0, 1.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApsoParams {
    pub c1: f64,
    pub c2: f64,
    pub w_min: f64,
    pub w_max: f64,
    pub elr_min: f64,
    pub elr_max: f64,
    pub vmax_fraction: f64,
}

impl Default for ApsoParams {
    fn default() -> Self {
        Self { c1: 2.0, c2: 2.0, w_min: 0.4, w_max: 0.9, elr_min: 0.1, elr_max: 1.0, vmax_fraction: 0.2 }
    }
}

impl ApsoParams {
    pub fn validate(&self) -> Result<()> {
        check_range("c1", C_MIN, self.c1)?;
        check_range("c1", self.c1, C_MAX)?;
        check_range("c2", C_MIN, self.c2)?;
        check_range("c2", self.c2, C_MAX)?;
        check_range("w_min", self.w_min, self.w_max)?;
        check_range("elr_min", self.elr_min, self.elr_max)?;
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

pub struct Apso {
    params: ApsoParams,
    c1: f64,
    c2: f64,
    w: f64,
    state: EvolutionaryState,
}

impl Apso {
    pub fn new(params: ApsoParams) -> Self {
        Self { params, c1: params.c1, c2: params.c2, w: params.w_max, state: EvolutionaryState::Exploration }
    }

    pub fn evolutionary_state(&self) -> EvolutionaryState {
        self.state
    }

    pub fn coefficients(&self) -> Coefficients {
        Coefficients { w: self.w, c1: self.c1, c2: self.c2 }
    }

    fn adapt_coefficients<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let delta1 = uniform(rng, 0.05, 0.1);
        let delta2 = uniform(rng, 0.05, 0.1);
        let r1 = uniform(rng, 0.0, delta1);
        let r2 = uniform(rng, 0.0, delta2);
        let (d1, d2) = match self.state {
            EvolutionaryState::Exploration => (r1, -r2),
            EvolutionaryState::Exploitation => (0.5 * r1, -0.5 * r2),
            EvolutionaryState::Convergence => (0.5 * r1, 0.5 * r2),
            EvolutionaryState::JumpingOut => (-r1, r2),
        };
        self.c1 = (self.c1 + d1).clamp(C_MIN, C_MAX);
        self.c2 = (self.c2 + d2).clamp(C_MIN, C_MAX);
        let sum = self.c1 + self.c2;
        let target = if sum > C_SUM_MAX {
            C_SUM_MAX
        } else if sum < C_SUM_MIN {
            C_SUM_MIN
        } else {
            sum
        };
        self.c1 *= target / sum;
        self.c2 *= target / sum;
    }

    /// Elitist learning: Gaussian kick on one coordinate of the best memory.
    /// The result replaces the best memory when fitter, otherwise the worst
    /// particle when fitter than its memory.
    fn elitist_learning(&self, state: &mut SearchState<'_>) {
        let direction: Direction = state.direction();
        let n = state.dimension();
        let d = state.rng.random_range(0..n);
        let elr = self.params.elr_max - (self.params.elr_max - self.params.elr_min) * state.progress();
        let mut candidate = state.best().pbest.clone();
        let kick = state.limits.span(d) * gaussian(&mut state.rng, 0.0, elr);
        candidate[d] = state.limits.clamp_position(d, candidate[d] + kick);
        let f = state.evaluate(&candidate);

        let best = state.swarm.best;
        if state.swarm.particles[best].offer_memory(&candidate, f, direction) {
            trace!("apso: elitist step improved the best memory to {:.6e}", f);
            return;
        }
        let worst = state.swarm.worst(direction);
        let p = &mut state.swarm.particles[worst];
        if direction.fitter(f, p.fpbest) {
            p.x.assign(&candidate);
            p.record(f, direction);
            trace!("apso: elitist step replaced particle {}", worst);
        }
    }
}

impl SwarmStrategy for Apso {
    fn name(&self) -> &'static str {
        "apso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn min_population(&self) -> usize {
        2
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let positions: Vec<Array1<f64>> = state.swarm.particles.iter().map(|p| p.x.clone()).collect();
        if let Some(e) = evolutionary_factor(&positions, state.swarm.best) {
            let next = classify(e, self.state);
            if next != self.state {
                debug!("apso: {:?} -> {:?} at generation {}", self.state, next, state.generation);
            }
            self.state = next;
            self.adapt_coefficients(&mut state.rng);
            if self.state == EvolutionaryState::Convergence {
                self.elitist_learning(state);
            }
            let w = 1.0 / (1.0 + 1.5 * (-2.6 * e).exp());
            self.w = w.clamp(self.params.w_min, self.params.w_max);
            trace!("apso: e={:.3} state={:?} c1={:.3} c2={:.3} w={:.3}", e, self.state, self.c1, self.c2, self.w);
        }
        state.refresh_best();

        let c = self.coefficients();
        let gbest = state.best().pbest.clone();
        for i in 0..state.population() {
            canonical_move(&mut state.swarm.particles[i], c, gbest.view(), &state.limits, &mut state.rng);
            state.evaluate_particle(i);
        }
        state.refresh_best();
    }
}
