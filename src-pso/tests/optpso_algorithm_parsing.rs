use swarmbench_pso::pso_canonical::CanonicalParams;
use swarmbench_pso::pso_dmspso::DmspsoParams;
use swarmbench_pso::Algorithm;

#[test]
fn test_parse_algorithm_variants() {
    assert!(matches!("clpso".parse::<Algorithm>().unwrap(), Algorithm::Clpso(_)));
    assert!(matches!("CL-PSO".parse::<Algorithm>().unwrap(), Algorithm::Clpso(_)));
    assert!(matches!("bbpso".parse::<Algorithm>().unwrap(), Algorithm::BareBones(_)));
    assert!(matches!("von_neumann".parse::<Algorithm>().unwrap(), Algorithm::VonNeumann(_)));
    assert!(matches!("sapsomvs".parse::<Algorithm>().unwrap(), Algorithm::Sapsomvs(_)));
    assert!(matches!("rvu_pso".parse::<Algorithm>().unwrap(), Algorithm::Rvupso(_)));
}

#[test]
fn test_original_and_canonical_differ_in_inertia() {
    let original = "original".parse::<Algorithm>().unwrap();
    let canonical = "canonical".parse::<Algorithm>().unwrap();
    assert_eq!(original, Algorithm::Original(CanonicalParams::original()));
    assert_eq!(canonical, Algorithm::Canonical(CanonicalParams::default()));
    assert_ne!(original.name(), canonical.name());
}

#[test]
fn test_unknown_algorithm_is_an_error() {
    let err = "gsa".parse::<Algorithm>().unwrap_err();
    assert!(err.contains("gsa"));
}

#[test]
fn test_default_popsize_fits_topology() {
    assert_eq!(Algorithm::Dmspso(DmspsoParams { sub_swarm_size: 4, ..DmspsoParams::default() }).default_popsize(), 20);
    assert_eq!("von-neumann".parse::<Algorithm>().unwrap().default_popsize(), 20);
    assert_eq!("asd-pso".parse::<Algorithm>().unwrap().default_popsize(), 30);
}
