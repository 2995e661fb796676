use crate::{Algorithm, ParticleSwarm, PsoConfig, PsoReport, Problem, Result};
use ndarray::Array1;

/// Minimise `func` over `bounds` in one call:
/// - `func`: objective function mapping x -> f(x), minimised
/// - `bounds`: vector of (lower, upper) pairs
/// - `algorithm`: PSO variant and its parameters
/// - `config`: run configuration
pub fn particle_swarm<F>(
	func: &F,
	bounds: &[(f64, f64)],
	algorithm: Algorithm,
	config: PsoConfig,
) -> Result<PsoReport>
where
	F: Fn(&Array1<f64>) -> f64,
{
	let problem = Problem::new(func, bounds)?;
	let mut pso = ParticleSwarm::new(&problem, algorithm, config)?;
	pso.solve()
}
