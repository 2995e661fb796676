//! Particle Swarm Optimization (PSO) in pure Rust using ndarray
//!
//! A single engine drives sixteen published PSO variants. Each variant is a
//! [`SwarmStrategy`] plugged onto the shared swarm model, evaluation budget
//! and update kernel.
//!
//! Supported features:
//! - Box constraints (lower/upper bounds), minimisation or maximisation
//! - Generation-capped runs, or evaluation-budget runs that record a
//!   convergence trace at fractional checkpoints
//! - Global-best, lattice, dynamic multi-swarm and ring neighbourhoods
//! - Adaptive inertia, fuzzy state estimation, self-adaptive Cauchy coefficients
//! - Comprehensive, orthogonal and fitness-distance-ratio learning
//! - Aging leader with challengers, neighbourhood search, relaxed velocity updates
//! - Optional seeded RNG and caller-supplied initial swarm for reproducible runs
//!
//! ```
//! use ndarray::Array1;
//! use swarmbench_pso::{particle_swarm, PsoConfigBuilder};
//!
//! let sphere = |x: &Array1<f64>| x.iter().map(|v| v * v).sum::<f64>();
//! let config = PsoConfigBuilder::new().seed(7).maxiter(200).build().unwrap();
//! let report = particle_swarm(&sphere, &[(-5.0, 5.0); 3], "clpso".parse().unwrap(), config).unwrap();
//! assert!(report.fun < 1e-2);
//! ```

#![allow(missing_docs)]
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::{debug, info};
use ndarray::{Array1, Array2};

pub mod budget;
pub(crate) mod distinct_indices;
pub mod error;
pub mod inertia;
pub(crate) mod kernel;
pub mod objective;
pub mod orthogonal;
pub mod particle;
pub(crate) mod sampling;
pub mod state;
pub mod strategy;
pub mod swarm;
pub mod topology;

pub mod pso_aiwpso;
pub mod pso_alcpso;
pub mod pso_apso;
pub mod pso_asdpso;
pub mod pso_bare_bones;
pub mod pso_canonical;
pub mod pso_clpso;
pub mod pso_dmspso;
pub mod pso_dnspso;
pub mod pso_epso;
pub mod pso_fdrpso;
pub mod pso_olpso;
pub mod pso_rvupso;
pub mod pso_sapsomvs;
pub mod pso_von_neumann;

pub mod parallel_runs;
pub mod particle_swarm;
pub mod recorder;

pub use budget::{ConvergenceSample, EvaluationBudget};
pub use error::{PsoError, Result};
pub use objective::{Direction, Objective, Problem};
pub use parallel_runs::solve_independent;
pub use particle::{Coefficients, DimCoefficients, Particle};
pub use particle_swarm::particle_swarm;
pub use recorder::{OptimizationRecorder, RecordedGeneration};
pub use state::{Limits, SearchState};
pub use strategy::SwarmStrategy;
pub use swarm::{Memory, Swarm};

use pso_aiwpso::{Aiwpso, AiwpsoParams};
use pso_alcpso::{Alcpso, AlcpsoParams};
use pso_apso::{Apso, ApsoParams};
use pso_asdpso::{Asdpso, AsdpsoParams};
use pso_bare_bones::{BareBonesParams, BareBonesPso};
use pso_canonical::{CanonicalParams, CanonicalPso};
use pso_clpso::{Clpso, ClpsoParams};
use pso_dmspso::{Dmspso, DmspsoParams};
use pso_dnspso::{Dnspso, DnspsoParams};
use pso_epso::{Epso, EpsoParams};
use pso_fdrpso::{Fdrpso, FdrpsoParams};
use pso_olpso::{Olpso, OlpsoParams};
use pso_rvupso::{Rvupso, RvupsoParams};
use pso_sapsomvs::{Sapsomvs, SapsomvsParams};
use pso_von_neumann::{VonNeumannParams, VonNeumannPso};

/// PSO variant together with its hyperparameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
	/// Kennedy & Eberhart's PSO: global best, no inertia damping
	Original(CanonicalParams),
	/// Global best with a fixed inertia weight
	Canonical(CanonicalParams),
	/// Gaussian sampling around personal and global best, no velocity
	BareBones(BareBonesParams),
	/// Success-rate adaptive inertia plus mutation of the worst memory
	Aiwpso(AiwpsoParams),
	/// Local best on a toroidal lattice
	VonNeumann(VonNeumannParams),
	/// Aging leader replaced by challengers
	Alcpso(AlcpsoParams),
	/// Dynamic multi-swarm with periodic regrouping
	Dmspso(DmspsoParams),
	/// Orthogonal-learning guidance
	Olpso(OlpsoParams),
	/// Fuzzy evolutionary-state estimation with elitist learning
	Apso(ApsoParams),
	/// Comprehensive learning with tournament-selected exemplars
	Clpso(ClpsoParams),
	/// Fitness-distance-ratio neighbour term
	Fdrpso(FdrpsoParams),
	/// Self-adaptive per-particle coefficients, multiple velocity strategies
	Sapsomvs(SapsomvsParams),
	/// Distance-shaped per-dimension coefficients with stuck detection
	Asdpso(AsdpsoParams),
	/// Diversity trials and neighbourhood search
	Dnspso(DnspsoParams),
	/// Rank-based learning or uniform re-sampling, no velocity
	Epso(EpsoParams),
	/// Velocity recomputed only after a worsening move
	Rvupso(RvupsoParams),
}

impl Algorithm {
	pub fn name(&self) -> &'static str {
		match self {
			Algorithm::Original(_) => "original",
			Algorithm::Canonical(_) => "canonical",
			Algorithm::BareBones(_) => "bare-bones",
			Algorithm::Aiwpso(_) => "aiwpso",
			Algorithm::VonNeumann(_) => "von-neumann",
			Algorithm::Alcpso(_) => "alcpso",
			Algorithm::Dmspso(_) => "dms-pso",
			Algorithm::Olpso(_) => "olpso",
			Algorithm::Apso(_) => "apso",
			Algorithm::Clpso(_) => "clpso",
			Algorithm::Fdrpso(_) => "fdr-pso",
			Algorithm::Sapsomvs(_) => "sapso-mvs",
			Algorithm::Asdpso(_) => "asd-pso",
			Algorithm::Dnspso(_) => "dns-pso",
			Algorithm::Epso(_) => "epso",
			Algorithm::Rvupso(_) => "rvu-pso",
		}
	}

	/// Population size the variant is usually run with, adjusted to fit its
	/// topology.
	pub fn default_popsize(&self) -> usize {
		match self {
			Algorithm::Asdpso(_) | Algorithm::Rvupso(_) => 30,
			Algorithm::VonNeumann(p) => p.rows * p.cols,
			// smallest multiple of the sub-swarm size holding 20 particles
			Algorithm::Dmspso(p) => 20usize.div_ceil(p.sub_swarm_size.max(1)) * p.sub_swarm_size.max(1),
			_ => 20,
		}
	}

	pub fn validate(&self) -> Result<()> {
		match self {
			Algorithm::Original(p) | Algorithm::Canonical(p) => p.validate(),
			Algorithm::BareBones(p) => p.validate(),
			Algorithm::Aiwpso(p) => p.validate(),
			Algorithm::VonNeumann(p) => p.validate(),
			Algorithm::Alcpso(p) => p.validate(),
			Algorithm::Dmspso(p) => p.validate(),
			Algorithm::Olpso(p) => p.validate(),
			Algorithm::Apso(p) => p.validate(),
			Algorithm::Clpso(p) => p.validate(),
			Algorithm::Fdrpso(p) => p.validate(),
			Algorithm::Sapsomvs(p) => p.validate(),
			Algorithm::Asdpso(p) => p.validate(),
			Algorithm::Dnspso(p) => p.validate(),
			Algorithm::Epso(p) => p.validate(),
			Algorithm::Rvupso(p) => p.validate(),
		}
	}

	/// Fresh strategy object for one run.
	pub fn strategy(&self) -> Box<dyn SwarmStrategy> {
		match *self {
			Algorithm::Original(p) => Box::new(CanonicalPso::original(p)),
			Algorithm::Canonical(p) => Box::new(CanonicalPso::new(p)),
			Algorithm::BareBones(p) => Box::new(BareBonesPso::new(p)),
			Algorithm::Aiwpso(p) => Box::new(Aiwpso::new(p)),
			Algorithm::VonNeumann(p) => Box::new(VonNeumannPso::new(p)),
			Algorithm::Alcpso(p) => Box::new(Alcpso::new(p)),
			Algorithm::Dmspso(p) => Box::new(Dmspso::new(p)),
			Algorithm::Olpso(p) => Box::new(Olpso::new(p)),
			Algorithm::Apso(p) => Box::new(Apso::new(p)),
			Algorithm::Clpso(p) => Box::new(Clpso::new(p)),
			Algorithm::Fdrpso(p) => Box::new(Fdrpso::new(p)),
			Algorithm::Sapsomvs(p) => Box::new(Sapsomvs::new(p)),
			Algorithm::Asdpso(p) => Box::new(Asdpso::new(p)),
			Algorithm::Dnspso(p) => Box::new(Dnspso::new(p)),
			Algorithm::Epso(p) => Box::new(Epso::new(p)),
			Algorithm::Rvupso(p) => Box::new(Rvupso::new(p)),
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Algorithm {
	type Err = String;
	fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
		let t = s.to_lowercase();
		match t.as_str() {
			"original" | "originalpso" | "original-pso" => Ok(Algorithm::Original(CanonicalParams::original())),
			"canonical" | "canonicalpso" | "canonical-pso" => Ok(Algorithm::Canonical(CanonicalParams::default())),
			"bare-bones" | "barebones" | "bare_bones" | "bbpso" => Ok(Algorithm::BareBones(BareBonesParams::default())),
			"aiwpso" | "aiw-pso" => Ok(Algorithm::Aiwpso(AiwpsoParams::default())),
			"von-neumann" | "vonneumann" | "von_neumann" => Ok(Algorithm::VonNeumann(VonNeumannParams::default())),
			"alcpso" | "alc-pso" => Ok(Algorithm::Alcpso(AlcpsoParams::default())),
			"dms-pso" | "dmspso" | "dms_pso" => Ok(Algorithm::Dmspso(DmspsoParams::default())),
			"olpso" | "ol-pso" => Ok(Algorithm::Olpso(OlpsoParams::default())),
			"apso" => Ok(Algorithm::Apso(ApsoParams::default())),
			"clpso" | "cl-pso" => Ok(Algorithm::Clpso(ClpsoParams::default())),
			"fdr-pso" | "fdrpso" | "fdr_pso" => Ok(Algorithm::Fdrpso(FdrpsoParams::default())),
			"sapso-mvs" | "sapsomvs" | "sapso_mvs" => Ok(Algorithm::Sapsomvs(SapsomvsParams::default())),
			"asd-pso" | "asdpso" | "asd_pso" => Ok(Algorithm::Asdpso(AsdpsoParams::default())),
			"dns-pso" | "dnspso" | "dns_pso" => Ok(Algorithm::Dnspso(DnspsoParams::default())),
			"epso" => Ok(Algorithm::Epso(EpsoParams::default())),
			"rvu-pso" | "rvupso" | "rvu_pso" => Ok(Algorithm::Rvupso(RvupsoParams::default())),
			_ => Err(format!("unknown algorithm: {}", s)),
		}
	}
}

/// Configuration for a PSO run
pub struct PsoConfig {
	pub popsize: usize,
	/// Generation cap; in evaluation-budget mode only the schedule horizon
	pub maxiter: usize,
	/// Evaluation cap; switches the run to evaluation-budget mode
	pub max_evaluations: Option<usize>,
	/// Fractions of `max_evaluations` at which the convergence trace is sampled
	pub checkpoints: Vec<f64>,
	pub seed: Option<u64>,
	/// Optional caller-supplied swarm replacing random initialisation
	pub initial_swarm: Option<Vec<Particle>>,
	/// Per-generation observer
	pub callback: Option<Box<dyn FnMut(&PsoIntermediate<'_>)>>,
}

impl Default for PsoConfig {
	fn default() -> Self {
		Self {
			popsize: 20,
			maxiter: 4000,
			max_evaluations: None,
			checkpoints: Vec::new(),
			seed: None,
			initial_swarm: None,
			callback: None,
		}
	}
}

impl PsoConfig {
	pub fn validate(&self) -> Result<()> {
		if self.popsize == 0 {
			return Err(PsoError::PopulationTooSmall { pop_size: 0, required: 1 });
		}
		if self.maxiter == 0 {
			return Err(PsoError::InvalidGenerationCap);
		}
		match self.max_evaluations {
			None if !self.checkpoints.is_empty() => return Err(PsoError::CheckpointsWithoutBudget),
			Some(0) => {
				return Err(PsoError::InvalidParameter {
					name: "max_evaluations",
					value: 0.0,
					reason: "must be at least 1",
				});
			}
			Some(max) => {
				budget::checkpoint_counts(max, &self.checkpoints)?;
			}
			None => {}
		}
		if let Some(initial) = &self.initial_swarm {
			if initial.len() != self.popsize {
				return Err(PsoError::InitialSwarmMismatch { expected: self.popsize, got: initial.len() });
			}
		}
		Ok(())
	}
}

/// Fluent builder for `PsoConfig`; `build` validates.
pub struct PsoConfigBuilder {
	cfg: PsoConfig,
}

impl Default for PsoConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl PsoConfigBuilder {
	pub fn new() -> Self {
		Self { cfg: PsoConfig::default() }
	}
	/// Start from the population size the variant is usually run with.
	pub fn for_algorithm(algorithm: &Algorithm) -> Self {
		Self::new().popsize(algorithm.default_popsize())
	}
	pub fn popsize(mut self, v: usize) -> Self {
		self.cfg.popsize = v;
		self
	}
	pub fn maxiter(mut self, v: usize) -> Self {
		self.cfg.maxiter = v;
		self
	}
	pub fn evaluation_budget(mut self, max: usize, checkpoints: &[f64]) -> Self {
		self.cfg.max_evaluations = Some(max);
		self.cfg.checkpoints = checkpoints.to_vec();
		self
	}
	pub fn seed(mut self, v: u64) -> Self {
		self.cfg.seed = Some(v);
		self
	}
	pub fn initial_swarm(mut self, v: Vec<Particle>) -> Self {
		self.cfg.initial_swarm = Some(v);
		self
	}
	pub fn callback(mut self, cb: Box<dyn FnMut(&PsoIntermediate<'_>)>) -> Self {
		self.cfg.callback = Some(cb);
		self
	}
	pub fn build(self) -> Result<PsoConfig> {
		self.cfg.validate()?;
		Ok(self.cfg)
	}
}

/// Result of a PSO run
#[derive(Clone)]
pub struct PsoReport {
	pub x: Array1<f64>,
	pub fun: f64,
	pub message: String,
	pub nit: usize,
	pub nfev: usize,
	/// Convergence samples; empty unless an evaluation budget was set
	pub trace: Vec<ConvergenceSample>,
	/// Personal bests, one row per particle
	pub population: Array2<f64>,
	pub population_fitness: Array1<f64>,
}

impl fmt::Debug for PsoReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PsoReport")
			.field("x", &format!("len={}", self.x.len()))
			.field("fun", &self.fun)
			.field("message", &self.message)
			.field("nit", &self.nit)
			.field("nfev", &self.nfev)
			.field("trace", &format!("len={}", self.trace.len()))
			.field("population", &format!("{}x{}", self.population.nrows(), self.population.ncols()))
			.field("population_fitness", &format!("len={}", self.population_fitness.len()))
			.finish()
	}
}

/// Information passed to the callback after each generation
pub struct PsoIntermediate<'s> {
	pub x: Array1<f64>,
	pub fun: f64,
	pub iter: usize,
	pub nfev: usize,
	pub swarm: &'s Swarm,
}

/// Particle swarm optimizer
pub struct ParticleSwarm<'a> {
	objective: &'a dyn Objective,
	algorithm: Algorithm,
	config: PsoConfig,
}

impl<'a> ParticleSwarm<'a> {
	/// Validate bounds, variant parameters and configuration together.
	pub fn new(objective: &'a dyn Objective, algorithm: Algorithm, config: PsoConfig) -> Result<Self> {
		let (lower, upper) = objective.bounds();
		objective::validate_bounds(lower, upper)?;
		algorithm.validate()?;
		config.validate()?;
		algorithm.strategy().check_population(config.popsize)?;
		if config.max_evaluations.is_some() && objective.optimum().is_none() {
			return Err(PsoError::MissingOptimum);
		}
		Ok(Self { objective, algorithm, config })
	}

	pub fn algorithm(&self) -> &Algorithm {
		&self.algorithm
	}

	/// Mutable access to configuration
	pub fn config_mut(&mut self) -> &mut PsoConfig {
		&mut self.config
	}

	/// Run the optimization and return a report
	pub fn solve(&mut self) -> Result<PsoReport> {
		let timing_enabled = std::env::var("SWARMBENCH_PSO_TIMING").map(|v| v != "0").unwrap_or(false);
		self.config.validate()?;
		let mut strategy = self.algorithm.strategy();
		strategy.check_population(self.config.popsize)?;

		let t_init0 = Instant::now();
		let mut state = SearchState::new(
			self.objective,
			&self.config,
			strategy.vmax_fraction(),
			strategy.random_velocity(),
		)?;
		strategy.prepare(&mut state)?;
		state.refresh_best();
		let t_init = t_init0.elapsed();

		match state.budget.max() {
			Some(max) => info!(
				"{}: {} dimensions, population={}, evaluation budget={} ({} checkpoints), horizon={}",
				strategy.name(),
				state.dimension(),
				state.population(),
				max,
				state.budget.checkpoints().len(),
				state.max_generations
			),
			None => info!(
				"{}: {} dimensions, population={}, maxiter={}",
				strategy.name(),
				state.dimension(),
				state.population(),
				state.max_generations
			),
		}
		debug!("{} init: best_f={:.6e} nfev={}", strategy.name(), state.best_fitness(), state.budget.count());

		let mut callback = self.config.callback.take();
		let mut t_step_tot = Duration::ZERO;
		let mut t_callback_tot = Duration::ZERO;
		while !state.finished() {
			let t_step0 = Instant::now();
			strategy.step(&mut state);
			t_step_tot += t_step0.elapsed();
			state.generation += 1;
			debug!(
				"{} gen {:5}  best_f={:.6e} nfev={}",
				strategy.name(),
				state.generation,
				state.best_fitness(),
				state.budget.count()
			);

			if let Some(cb) = callback.as_mut() {
				let t_cb0 = Instant::now();
				let best = state.best();
				let intermediate = PsoIntermediate {
					x: best.pbest.clone(),
					fun: best.fpbest,
					iter: state.generation,
					nfev: state.budget.count(),
					swarm: &state.swarm,
				};
				cb(&intermediate);
				t_callback_tot += t_cb0.elapsed();
			}
		}
		self.config.callback = callback;

		if timing_enabled {
			debug!(
				"{} timing: init={:.3} ms, steps={:.3} ms ({} generations), callbacks={:.3} ms",
				strategy.name(),
				t_init.as_secs_f64() * 1e3,
				t_step_tot.as_secs_f64() * 1e3,
				state.generation,
				t_callback_tot.as_secs_f64() * 1e3
			);
		}

		let message = if state.budget.max().is_some() {
			"Evaluation budget exhausted"
		} else {
			"Maximum number of generations reached"
		};
		let best = state.best();
		let report = PsoReport {
			x: best.pbest.clone(),
			fun: best.fpbest,
			message: message.to_string(),
			nit: state.generation,
			nfev: state.budget.count(),
			population: state.swarm.personal_bests(),
			population_fitness: state.swarm.personal_best_fitness(),
			trace: state.budget.into_trace(),
		};
		info!(
			"{} done: best_f={:.6e} after {} generations and {} evaluations",
			strategy.name(),
			report.fun,
			report.nit,
			report.nfev
		);
		Ok(report)
	}
}
