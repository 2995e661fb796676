//! Aging leader and challengers.
//!
//! The swarm follows a leader position that is not tied to any particle.
//! The leader ages every generation; its lifespan grows while it keeps the
//! swarm improving and shrinks otherwise. When its age reaches its
//! lifespan, a mutated challenger leads the swarm for a few trial
//! generations. If a trial improves any personal best the challenger takes
//! over, otherwise the swarm is rolled back to the state before the trials.

use log::debug;
use ndarray::Array1;
use rand::Rng;

use crate::error::{PsoError, Result};
use crate::kernel::canonical_move;
use crate::particle::Coefficients;
use crate::sampling::uniform;
use crate::state::SearchState;
use crate::strategy::{check_non_negative, check_positive, SwarmStrategy};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlcpsoParams {
    pub c1: f64,
    pub c2: f64,
    pub w: f64,
    pub life_span: usize,
    /// Trial generations granted to a challenger.
    pub trials: usize,
    pub vmax_fraction: f64,
}

impl Default for AlcpsoParams {
    fn default() -> Self {
        Self { c1: 2.0, c2: 2.0, w: 0.4, life_span: 60, trials: 2, vmax_fraction: 0.5 }
    }
}

impl AlcpsoParams {
    pub fn validate(&self) -> Result<()> {
        check_non_negative("c1", self.c1)?;
        check_non_negative("c2", self.c2)?;
        check_non_negative("w", self.w)?;
        if self.life_span == 0 {
            return Err(PsoError::InvalidParameter { name: "life_span", value: 0.0, reason: "must be at least 1" });
        }
        if self.trials == 0 {
            return Err(PsoError::InvalidParameter { name: "trials", value: 0.0, reason: "must be at least 1" });
        }
        check_positive("vmax_fraction", self.vmax_fraction)
    }
}

/// Position leading the swarm, with its age and lifespan.
#[derive(Debug, Clone, PartialEq)]
pub struct Leader {
    pub x: Array1<f64>,
    pub fx: f64,
    pub age: usize,
    pub life_span: usize,
}

/// What a sweep of the swarm achieved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SweepOutcome {
    leader: bool,
    pbest: bool,
    gbest: bool,
}

pub struct Alcpso {
    params: AlcpsoParams,
    leader: Leader,
}

impl Alcpso {
    pub fn new(params: AlcpsoParams) -> Self {
        let leader = Leader { x: Array1::zeros(0), fx: f64::NAN, age: 0, life_span: params.life_span };
        Self { params, leader }
    }

    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    /// One pass over the swarm following `guide`; a particle landing fitter
    /// than the guide replaces it for the next pass.
    fn sweep(&self, state: &mut SearchState<'_>, guide: &mut Leader) -> SweepOutcome {
        let c = Coefficients { w: self.params.w, c1: self.params.c1, c2: self.params.c2 };
        let target = guide.x.clone();
        let mut best_f = state.best_fitness();
        let mut outcome = SweepOutcome::default();
        for i in 0..state.population() {
            canonical_move(&mut state.swarm.particles[i], c, target.view(), &state.limits, &mut state.rng);
            let improved = state.evaluate_particle(i);
            let p = &state.swarm.particles[i];
            if state.fitter(p.fx, guide.fx) {
                guide.x.assign(&p.x);
                guide.fx = p.fx;
                outcome.leader = true;
            }
            if improved {
                outcome.pbest = true;
                if state.fitter(p.fpbest, best_f) {
                    best_f = p.fpbest;
                    outcome.gbest = true;
                }
            }
        }
        state.refresh_best();
        outcome
    }

    fn adjust_life_span(&mut self, outcome: SweepOutcome) {
        if outcome.gbest {
            self.leader.life_span += 2;
        } else if outcome.pbest {
            self.leader.life_span += 1;
        } else if !outcome.leader {
            self.leader.life_span = self.leader.life_span.saturating_sub(1).max(1);
        }
    }

    /// Leader copy with each coordinate re-drawn with probability `1/D`;
    /// at least one coordinate always changes.
    fn challenger(&self, state: &mut SearchState<'_>) -> Leader {
        let n = state.dimension();
        let mut x = self.leader.x.clone();
        let mut mutated = false;
        for d in 0..n {
            if state.rng.random::<f64>() < 1.0 / n as f64 {
                x[d] = uniform(&mut state.rng, state.limits.lower[d], state.limits.upper[d]);
                mutated = true;
            }
        }
        if !mutated {
            let d = state.rng.random_range(0..n);
            x[d] = uniform(&mut state.rng, state.limits.lower[d], state.limits.upper[d]);
        }
        let fx = state.evaluate(&x);
        Leader { x, fx, age: 0, life_span: self.params.life_span }
    }

    /// Let a challenger lead for up to `trials` generations. Returns whether
    /// it was accepted.
    pub fn challenge(&mut self, state: &mut SearchState<'_>) -> bool {
        let snapshot: Vec<(Array1<f64>, Array1<f64>, f64)> =
            state.swarm.particles.iter().map(|p| (p.x.clone(), p.v.clone(), p.fx)).collect();
        let mut challenger = self.challenger(state);
        for t in 0..self.params.trials {
            if self.sweep(state, &mut challenger).pbest {
                debug!("alcpso: challenger accepted after {} trial(s), fx={:.6e}", t + 1, challenger.fx);
                self.leader = challenger;
                state.generation += t + 1;
                return true;
            }
        }
        for (p, (x, v, fx)) in state.swarm.particles.iter_mut().zip(snapshot) {
            p.x = x;
            p.v = v;
            p.fx = fx;
        }
        self.leader.age = self.leader.life_span.saturating_sub(1);
        debug!("alcpso: challenger rejected, swarm rolled back");
        false
    }
}

impl SwarmStrategy for Alcpso {
    fn name(&self) -> &'static str {
        "alcpso"
    }

    fn vmax_fraction(&self) -> f64 {
        self.params.vmax_fraction
    }

    fn random_velocity(&self) -> bool {
        false
    }

    fn prepare(&mut self, state: &mut SearchState<'_>) -> Result<()> {
        let best = state.best();
        self.leader = Leader { x: best.x.clone(), fx: best.fx, age: 0, life_span: self.params.life_span };
        Ok(())
    }

    fn step(&mut self, state: &mut SearchState<'_>) {
        let mut leader = self.leader.clone();
        let outcome = self.sweep(state, &mut leader);
        self.leader = leader;
        self.adjust_life_span(outcome);
        self.leader.age += 1;
        if self.leader.age >= self.leader.life_span {
            self.challenge(state);
        }
    }
}
