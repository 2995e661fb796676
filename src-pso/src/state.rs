//! Per-run search context handed to strategies by mutable borrow.

use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::budget::EvaluationBudget;
use crate::error::{PsoError, Result};
use crate::objective::{validate_bounds, Direction, Objective};
use crate::particle::Particle;
use crate::sampling::uniform;
use crate::swarm::Swarm;
use crate::PsoConfig;

/// Box bounds and velocity clamp.
#[derive(Debug, Clone)]
pub struct Limits {
    pub lower: Array1<f64>,
    pub upper: Array1<f64>,
    pub vmax: Array1<f64>,
}

impl Limits {
    pub fn new(lower: Array1<f64>, upper: Array1<f64>, vmax_fraction: f64) -> Self {
        let vmax = (&upper - &lower) * vmax_fraction;
        Self { lower, upper, vmax }
    }

    pub fn span(&self, d: usize) -> f64 {
        self.upper[d] - self.lower[d]
    }

    pub fn clamp_position(&self, d: usize, value: f64) -> f64 {
        value.clamp(self.lower[d], self.upper[d])
    }

    pub fn clamp_velocity(&self, d: usize, value: f64) -> f64 {
        value.clamp(-self.vmax[d], self.vmax[d])
    }

    pub fn contains(&self, d: usize, value: f64) -> bool {
        value >= self.lower[d] && value <= self.upper[d]
    }

    pub fn clamp_all(&self, x: &mut Array1<f64>) {
        for (d, xd) in x.iter_mut().enumerate() {
            *xd = self.clamp_position(d, *xd);
        }
    }
}

/// Everything a strategy needs for one generation: the objective, the
/// swarm, the evaluation budget and the run's single random generator.
pub struct SearchState<'a> {
    pub objective: &'a dyn Objective,
    pub limits: Limits,
    pub swarm: Swarm,
    pub budget: EvaluationBudget,
    pub rng: StdRng,
    pub generation: usize,
    pub max_generations: usize,
    direction: Direction,
}

impl<'a> SearchState<'a> {
    /// Build the budget and the swarm. The swarm is either the configured
    /// initial swarm or sampled uniformly inside the bounds (with velocities
    /// in `[-vmax, vmax]` when `random_velocity` is set).
    pub fn new(
        objective: &'a dyn Objective,
        config: &PsoConfig,
        vmax_fraction: f64,
        random_velocity: bool,
    ) -> Result<Self> {
        let (lower, upper) = objective.bounds();
        validate_bounds(lower, upper)?;
        let direction = objective.direction();
        let limits = Limits::new(lower.clone(), upper.clone(), vmax_fraction);

        let mut budget = match config.max_evaluations {
            Some(max) => {
                if objective.optimum().is_none() {
                    return Err(PsoError::MissingOptimum);
                }
                EvaluationBudget::with_checkpoints(max, &config.checkpoints, direction)?
            }
            None => EvaluationBudget::unlimited(direction),
        };

        let mut rng: StdRng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => {
                let mut thread_rng = rand::rng();
                StdRng::from_rng(&mut thread_rng)
            }
        };

        let n = limits.lower.len();
        let particles = match &config.initial_swarm {
            Some(initial) => {
                if initial.len() != config.popsize {
                    return Err(PsoError::InitialSwarmMismatch { expected: config.popsize, got: initial.len() });
                }
                for (index, p) in initial.iter().enumerate() {
                    for got in [p.x.len(), p.v.len(), p.pbest.len()] {
                        if got != n {
                            return Err(PsoError::InitialSwarmDimension { index, expected: n, got });
                        }
                    }
                    budget.observe(p.fpbest);
                }
                initial.clone()
            }
            None => {
                let mut particles = Vec::with_capacity(config.popsize);
                for _ in 0..config.popsize {
                    let mut x = Array1::zeros(n);
                    let mut v = Array1::zeros(n);
                    for d in 0..n {
                        x[d] = uniform(&mut rng, limits.lower[d], limits.upper[d]);
                        if random_velocity {
                            v[d] = uniform(&mut rng, -limits.vmax[d], limits.vmax[d]);
                        }
                    }
                    let fx = budget.evaluate(objective, &x, 0);
                    budget.observe(fx);
                    particles.push(Particle::new(x, v, fx));
                }
                particles
            }
        };

        Ok(Self {
            objective,
            limits,
            swarm: Swarm::new(particles, direction),
            budget,
            rng,
            generation: 0,
            max_generations: config.maxiter,
            direction,
        })
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn fitter(&self, a: f64, b: f64) -> bool {
        self.direction.fitter(a, b)
    }

    pub fn dimension(&self) -> usize {
        self.limits.lower.len()
    }

    pub fn population(&self) -> usize {
        self.swarm.len()
    }

    /// Fraction of the generation horizon consumed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        (self.generation as f64 / self.max_generations.max(1) as f64).clamp(0.0, 1.0)
    }

    /// Counted objective call.
    pub fn evaluate(&mut self, x: &Array1<f64>) -> f64 {
        self.budget.evaluate(self.objective, x, self.generation)
    }

    /// Evaluate particle `i` at its current position and apply the
    /// personal-best rule. Returns whether the personal best improved.
    pub fn evaluate_particle(&mut self, i: usize) -> bool {
        let fx = self.budget.evaluate(self.objective, &self.swarm.particles[i].x, self.generation);
        self.swarm.particles[i].record(fx, self.direction)
    }

    /// Recompute the best index by full scan and report it to the budget.
    pub fn refresh_best(&mut self) -> usize {
        let best = self.swarm.refresh_best(self.direction);
        self.budget.observe(self.swarm.particles[best].fpbest);
        best
    }

    pub fn best(&self) -> &Particle {
        self.swarm.best_particle()
    }

    pub fn best_fitness(&self) -> f64 {
        self.swarm.best_particle().fpbest
    }

    pub fn random_position(&mut self) -> Array1<f64> {
        let n = self.dimension();
        let mut x = Array1::zeros(n);
        for d in 0..n {
            x[d] = uniform(&mut self.rng, self.limits.lower[d], self.limits.upper[d]);
        }
        x
    }

    /// Generation cap in generation mode, evaluation cap in budget mode.
    pub fn finished(&self) -> bool {
        if self.budget.max().is_some() {
            self.budget.exhausted()
        } else {
            self.generation >= self.max_generations
        }
    }
}
