use swarmbench_pso::{particle_swarm, Algorithm, PsoConfigBuilder};
use swarmbench_testfunctions::{sphere, sum_squares};

fn run(name: &str, seed: u64) -> f64 {
    let algorithm: Algorithm = name.parse().unwrap();
    let bounds = vec![(-5.12, 5.12); 5];
    let config = PsoConfigBuilder::for_algorithm(&algorithm).seed(seed).maxiter(1000).build().unwrap();
    let report = particle_swarm(&sphere, &bounds, algorithm, config).unwrap();
    assert_eq!(report.x.len(), 5);
    report.fun
}

#[test]
fn test_pso_sphere_5d_converging_variants() {
    for (k, name) in
        ["bare-bones", "aiwpso", "von-neumann", "alcpso", "dms-pso", "olpso", "apso", "clpso", "fdr-pso", "dns-pso"]
            .iter()
            .enumerate()
    {
        let fun = run(name, 100 + k as u64);
        assert!(fun < 1e-2, "{}: fun={}", name, fun);
    }
}

#[test]
fn test_pso_sphere_5d_slow_variants() {
    for (k, name) in ["sapso-mvs", "asd-pso", "epso", "rvu-pso"].iter().enumerate() {
        let fun = run(name, 200 + k as u64);
        assert!(fun < 1.0, "{}: fun={}", name, fun);
    }
}

#[test]
fn test_pso_sphere_5d_undamped_variants() {
    // fixed inertia keeps the swarm moving; the best memory still lands near the origin
    for (k, name) in ["original", "canonical"].iter().enumerate() {
        let fun = run(name, 300 + k as u64);
        assert!(fun < 5.0, "{}: fun={}", name, fun);
    }
}

#[test]
fn test_pso_sum_squares_10d() {
    let bounds = vec![(-10.0, 10.0); 10];
    let config = PsoConfigBuilder::new().seed(42).popsize(30).maxiter(1500).build().unwrap();
    let report = particle_swarm(&sum_squares, &bounds, "clpso".parse().unwrap(), config).unwrap();
    assert!(report.fun < 1e-3, "fun={}", report.fun);
    for &actual in report.x.iter() {
        assert!(actual.abs() < 0.1);
    }
}
