use swarmbench_pso::{particle_swarm, Algorithm, PsoConfigBuilder};
use swarmbench_testfunctions::{ackley, griewank, rastrigin, step, zakharov};

#[test]
fn test_pso_rastrigin_2d() {
    let b2 = vec![(-5.12, 5.12); 2];
    for (seed, name) in [(40, "clpso"), (41, "olpso")] {
        let config = PsoConfigBuilder::new().seed(seed).popsize(20).maxiter(1000).build().unwrap();
        let report = particle_swarm(&rastrigin, &b2, name.parse().unwrap(), config).unwrap();
        // the nearest local minima sit near 1.0
        assert!(report.fun < 0.5, "{}: fun={}", name, report.fun);
    }
}

#[test]
fn test_pso_ackley_2d() {
    let bounds = vec![(-32.768, 32.768); 2];
    let config = PsoConfigBuilder::new().seed(42).popsize(20).maxiter(800).build().unwrap();
    let report = particle_swarm(&ackley, &bounds, "clpso".parse().unwrap(), config).unwrap();
    assert!(report.fun < 1e-2, "fun={}", report.fun);
    for &actual in report.x.iter() {
        assert!(actual.abs() < 0.5);
    }
}

#[test]
fn test_pso_step_3d() {
    let bounds = vec![(-100.0, 100.0); 3];
    let algorithm: Algorithm = "clpso".parse().unwrap();
    let config = PsoConfigBuilder::for_algorithm(&algorithm).seed(7).maxiter(500).build().unwrap();
    let report = particle_swarm(&step, &bounds, algorithm, config).unwrap();
    assert_eq!(report.fun, 0.0);
}

#[test]
fn test_pso_griewank_2d() {
    let bounds = vec![(-600.0, 600.0); 2];
    let algorithm: Algorithm = "dms-pso".parse().unwrap();
    let config = PsoConfigBuilder::for_algorithm(&algorithm).seed(12).maxiter(1500).build().unwrap();
    let report = particle_swarm(&griewank, &bounds, algorithm, config).unwrap();
    assert!(report.fun < 0.05, "fun={}", report.fun);
}

#[test]
fn test_pso_zakharov_5d() {
    let bounds = vec![(-5.0, 10.0); 5];
    let algorithm: Algorithm = "aiwpso".parse().unwrap();
    let config = PsoConfigBuilder::for_algorithm(&algorithm).seed(9).maxiter(1000).build().unwrap();
    let report = particle_swarm(&zakharov, &bounds, algorithm, config).unwrap();
    assert!(report.fun < 1e-3, "fun={}", report.fun);
}
