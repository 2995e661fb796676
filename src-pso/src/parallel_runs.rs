//! Independent runs of one variant, spread over the rayon thread pool.

use log::debug;
use rayon::prelude::*;

use crate::error::Result;
use crate::objective::Objective;
use crate::{Algorithm, ParticleSwarm, PsoConfig, PsoReport};

/// Solve `objective` once per seed, in parallel.
///
/// `configure` builds the configuration of each run; its `seed` is then
/// forced to the run's seed. Every run owns its swarm, budget and RNG, so
/// the only shared state is the objective. Reports come back in seed order.
pub fn solve_independent<O, C>(
    objective: &O,
    algorithm: Algorithm,
    seeds: &[u64],
    configure: C,
) -> Vec<Result<PsoReport>>
where
    O: Objective + Sync,
    C: Fn(u64) -> PsoConfig + Sync,
{
    seeds
        .par_iter()
        .map(|&seed| {
            let mut config = configure(seed);
            config.seed = Some(seed);
            let report = ParticleSwarm::new(objective, algorithm, config)?.solve()?;
            debug!("{} seed {}: best_f={:.6e} nfev={}", algorithm, seed, report.fun, report.nfev);
            Ok(report)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::Problem;
    use crate::pso_canonical::CanonicalParams;
    use ndarray::Array1;

    fn sphere(x: &Array1<f64>) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    #[test]
    fn test_runs_match_sequential_runs() {
        let problem = Problem::new(sphere, &[(-5.0, 5.0); 4]).unwrap();
        let algorithm = Algorithm::Canonical(CanonicalParams::default());
        let seeds = [1u64, 2, 3, 4];
        let configure = |_seed: u64| PsoConfig { popsize: 10, maxiter: 40, ..PsoConfig::default() };

        let parallel = solve_independent(&problem, algorithm, &seeds, configure);
        assert_eq!(parallel.len(), seeds.len());
        for (seed, result) in seeds.iter().zip(&parallel) {
            let report = result.as_ref().unwrap();
            let mut config = configure(*seed);
            config.seed = Some(*seed);
            let sequential = ParticleSwarm::new(&problem, algorithm, config).unwrap().solve().unwrap();
            assert_eq!(report.fun, sequential.fun);
            assert_eq!(report.x, sequential.x);
            assert_eq!(report.nfev, sequential.nfev);
        }
    }

    #[test]
    fn test_invalid_configuration_is_reported_per_run() {
        let problem = Problem::new(sphere, &[(-1.0, 1.0); 2]).unwrap();
        let algorithm = Algorithm::Canonical(CanonicalParams::default());
        let results = solve_independent(&problem, algorithm, &[5, 6], |seed| PsoConfig {
            popsize: if seed == 5 { 0 } else { 5 },
            maxiter: 5,
            ..PsoConfig::default()
        });
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
