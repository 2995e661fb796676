use std::cell::RefCell;
use std::rc::Rc;

use ndarray::Array1;
use swarmbench_pso::{Algorithm, ParticleSwarm, Problem, PsoConfigBuilder, PsoIntermediate};
use swarmbench_testfunctions::{get_function_bounds, rastrigin};

const ALGORITHMS: [&str; 16] = [
    "original",
    "canonical",
    "bare-bones",
    "aiwpso",
    "von-neumann",
    "alcpso",
    "dms-pso",
    "olpso",
    "apso",
    "clpso",
    "fdr-pso",
    "sapso-mvs",
    "asd-pso",
    "dns-pso",
    "epso",
    "rvu-pso",
];

// velocity is drawn from the kernel and clamped on every move
const VELOCITY_CLAMPED: [&str; 12] = [
    "original",
    "canonical",
    "aiwpso",
    "von-neumann",
    "alcpso",
    "dms-pso",
    "olpso",
    "apso",
    "clpso",
    "fdr-pso",
    "dns-pso",
    "rvu-pso",
];

#[derive(Default)]
struct Violations {
    out_of_bounds: usize,
    too_fast: usize,
    memory_regressed: usize,
    memory_mislabelled: usize,
    previous: Option<Vec<f64>>,
}

#[test]
fn test_swarm_invariants_hold_every_generation() {
    let _ = env_logger::builder().is_test(true).try_init();
    let bounds = get_function_bounds("rastrigin", 4).unwrap();
    let lower = Array1::from_iter(bounds.iter().map(|b| b.0));
    let upper = Array1::from_iter(bounds.iter().map(|b| b.1));
    let problem = Problem::new(rastrigin, &bounds).unwrap();

    for name in ALGORITHMS {
        let algorithm: Algorithm = name.parse().unwrap();
        let vmax = (&upper - &lower) * algorithm.strategy().vmax_fraction();
        let check_velocity = VELOCITY_CLAMPED.contains(&name);
        let found = Rc::new(RefCell::new(Violations::default()));
        let sink = Rc::clone(&found);
        let (lo, hi) = (lower.clone(), upper.clone());

        let config = PsoConfigBuilder::for_algorithm(&algorithm)
            .seed(31)
            .maxiter(60)
            .callback(Box::new(move |inter: &PsoIntermediate<'_>| {
                let mut guard = sink.borrow_mut();
                let v = &mut *guard;
                for p in &inter.swarm.particles {
                    for d in 0..p.x.len() {
                        if p.x[d] < lo[d] || p.x[d] > hi[d] {
                            v.out_of_bounds += 1;
                        }
                        if check_velocity && p.v[d].abs() > vmax[d] * (1.0 + 1e-12) {
                            v.too_fast += 1;
                        }
                    }
                    if rastrigin(&p.pbest) != p.fpbest {
                        v.memory_mislabelled += 1;
                    }
                }
                let fitness: Vec<f64> = inter.swarm.particles.iter().map(|p| p.fpbest).collect();
                if let Some(prev) = &v.previous {
                    v.memory_regressed += prev.iter().zip(&fitness).filter(|(old, new)| new > old).count();
                }
                v.previous = Some(fitness);
            }))
            .build()
            .unwrap();
        ParticleSwarm::new(&problem, algorithm, config).unwrap().solve().unwrap();

        let v = found.borrow();
        assert_eq!(v.out_of_bounds, 0, "{}: positions left the box", name);
        assert_eq!(v.too_fast, 0, "{}: velocity above vmax", name);
        assert_eq!(v.memory_regressed, 0, "{}: a personal best got worse", name);
        assert_eq!(v.memory_mislabelled, 0, "{}: a personal best fitness does not match its position", name);
        assert!(v.previous.is_some(), "{}: callback never ran", name);
    }
}

#[test]
fn test_reported_best_is_the_fittest_memory() {
    let bounds = vec![(-5.12, 5.12); 3];
    let problem = Problem::new(rastrigin, &bounds).unwrap();
    for name in ALGORITHMS {
        let algorithm: Algorithm = name.parse().unwrap();
        let config = PsoConfigBuilder::for_algorithm(&algorithm).seed(8).maxiter(40).build().unwrap();
        let report = ParticleSwarm::new(&problem, algorithm, config).unwrap().solve().unwrap();
        let fittest = report.population_fitness.iter().copied().fold(f64::INFINITY, f64::min);
        assert_eq!(report.fun, fittest, "{}", name);
        assert_eq!(rastrigin(&report.x), report.fun, "{}", name);
        assert_eq!(report.population.nrows(), algorithm.default_popsize(), "{}", name);
    }
}
