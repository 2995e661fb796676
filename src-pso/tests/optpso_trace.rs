use swarmbench_pso::{solve_independent, Algorithm, ParticleSwarm, Problem, PsoConfigBuilder};
use swarmbench_testfunctions::{ackley, get_function_bounds, get_function_optimum, sphere};

const FRACTIONS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];

#[test]
fn test_trace_samples_every_checkpoint_once() {
    let _ = env_logger::builder().is_test(true).try_init();
    let bounds = get_function_bounds("ackley", 10).unwrap();
    let problem = Problem::new(ackley, &bounds).unwrap().with_optimum(get_function_optimum("ackley").unwrap());
    for name in ["canonical", "bare-bones", "alcpso", "olpso", "apso", "clpso", "dns-pso", "epso"] {
        let algorithm: Algorithm = name.parse().unwrap();
        let config = PsoConfigBuilder::for_algorithm(&algorithm)
            .seed(77)
            .maxiter(250)
            .evaluation_budget(5000, &FRACTIONS)
            .build()
            .unwrap();
        let report = ParticleSwarm::new(&problem, algorithm, config).unwrap().solve().unwrap();

        let counts: Vec<usize> = report.trace.iter().map(|s| s.evaluations).collect();
        assert_eq!(counts, (1..=10).map(|k| k * 500).collect::<Vec<_>>(), "{}", name);
        for pair in report.trace.windows(2) {
            assert!(pair[1].best <= pair[0].best, "{}: trace best got worse", name);
        }
        for sample in &report.trace {
            assert!((sample.error - sample.best).abs() < 1e-12, "{}: error is |best - 0|", name);
        }
        let last = report.trace.last().unwrap();
        assert!(last.best >= report.fun, "{}", name);
        assert!(report.nfev >= 5000, "{}", name);
    }
}

#[test]
fn test_trace_is_reproducible_and_serializable() {
    let problem = Problem::new(sphere, &[(-100.0, 100.0); 5]).unwrap().with_optimum(0.0);
    let run = || {
        let config = PsoConfigBuilder::new().seed(3).popsize(20).evaluation_budget(2000, &[0.25, 0.5, 1.0]).build().unwrap();
        ParticleSwarm::new(&problem, "fdr-pso".parse().unwrap(), config).unwrap().solve().unwrap()
    };
    let (a, b) = (run(), run());
    assert_eq!(a.trace, b.trace);

    let json = serde_json::to_string(&a.trace).unwrap();
    assert!(json.starts_with('['));
    assert!(json.contains("\"evaluations\":500"));
}

#[test]
fn test_independent_runs_average_trace() {
    let problem = Problem::new(sphere, &[(-100.0, 100.0); 5]).unwrap().with_optimum(0.0);
    let seeds: Vec<u64> = (0..6).collect();
    let results = solve_independent(&problem, "dns-pso".parse().unwrap(), &seeds, |_| {
        PsoConfigBuilder::new().popsize(20).maxiter(100).evaluation_budget(3000, &[0.5, 1.0]).build().unwrap()
    });
    assert_eq!(results.len(), seeds.len());

    let mut mean_error = [0.0; 2];
    for result in &results {
        let report = result.as_ref().unwrap();
        assert_eq!(report.trace.len(), 2);
        for (acc, sample) in mean_error.iter_mut().zip(&report.trace) {
            *acc += sample.error / seeds.len() as f64;
        }
    }
    assert!(mean_error[1] <= mean_error[0]);
    // distinct seeds explore differently
    let first = results[0].as_ref().unwrap();
    assert!(results.iter().skip(1).any(|r| r.as_ref().unwrap().x != first.x));
}
