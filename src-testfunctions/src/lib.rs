//! Benchmark objectives for swarm optimisers
//!
//! Plain `fn(&Array1<f64>) -> f64` functions, grouped by landscape, plus a
//! metadata registry with the usual search bounds and known global minima.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use swarmbench_testfunctions::*;
//!
//! let x = Array1::from_vec(vec![0.0, 0.0]);
//! assert_eq!(sphere(&x), 0.0);
//!
//! let bounds = get_function_bounds("rastrigin", 10).unwrap();
//! assert_eq!(bounds.len(), 10);
//! let f = get_function("rastrigin").unwrap();
//! assert_eq!(f(&Array1::zeros(10)), 0.0);
//! ```

use std::collections::HashMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

pub mod functions;
pub use functions::*;

/// Objective signature shared by every function in this crate
pub type TestFunction = fn(&Array1<f64>) -> f64;

/// Bounds, optimum and landscape notes of a benchmark function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    pub name: String,
    /// Per-dimension search interval (min, max)
    pub bounds: (f64, f64),
    /// Global minimum location for the smallest supported dimension, and its value
    pub global_minimum: (Vec<f64>, f64),
    pub description: String,
    pub multimodal: bool,
    /// Dimensions the function is usually run at; a single entry means fixed
    pub dimensions: Vec<usize>,
}

impl FunctionMetadata {
    /// Whether the function can be evaluated in `dimension` dimensions.
    pub fn supports(&self, dimension: usize) -> bool {
        match self.dimensions.as_slice() {
            [fixed] => *fixed == dimension,
            _ => dimension >= 1,
        }
    }
}

fn entry(
    name: &str,
    bounds: (f64, f64),
    global_minimum: (Vec<f64>, f64),
    description: &str,
    multimodal: bool,
    dimensions: Vec<usize>,
) -> (String, FunctionMetadata) {
    (
        name.to_string(),
        FunctionMetadata {
            name: name.to_string(),
            bounds,
            global_minimum,
            description: description.to_string(),
            multimodal,
            dimensions,
        },
    )
}

/// Metadata of every function in the crate, keyed by name
pub fn get_function_metadata() -> HashMap<String, FunctionMetadata> {
    let pi = std::f64::consts::PI;
    HashMap::from([
        entry("sphere", (-100.0, 100.0), (vec![0.0], 0.0), "Bowl-shaped, separable", false, vec![2, 10, 30]),
        entry(
            "sum_squares",
            (-10.0, 10.0),
            (vec![0.0], 0.0),
            "Bowl-shaped, weighted by 1-based index",
            false,
            vec![2, 10, 30],
        ),
        entry(
            "quartic",
            (-1.28, 1.28),
            (vec![0.0], 0.0),
            "Fourth-power bowl weighted by 1-based index, no noise",
            false,
            vec![2, 10, 30],
        ),
        entry("zakharov", (-5.0, 10.0), (vec![0.0], 0.0), "Plate-shaped", false, vec![2, 10, 30]),
        entry(
            "rosenbrock",
            (-5.0, 10.0),
            (vec![1.0, 1.0], 0.0),
            "Valley-shaped, narrow curved valley",
            false,
            vec![2, 10, 30],
        ),
        entry("easom", (-100.0, 100.0), (vec![pi, pi], -1.0), "Steep ridge around a narrow hole", false, vec![2]),
        entry("step", (-100.0, 100.0), (vec![0.0], 0.0), "Discontinuous plateaus", true, vec![2, 10, 30]),
        entry("schaffer_f6", (-100.0, 100.0), (vec![0.0, 0.0], 0.0), "Concentric ripples", true, vec![2]),
        entry(
            "ackley",
            (-32.768, 32.768),
            (vec![0.0], 0.0),
            "Nearly flat outer region with a central funnel",
            true,
            vec![2, 10, 30],
        ),
        entry("rastrigin", (-5.12, 5.12), (vec![0.0], 0.0), "Regular grid of local minima", true, vec![2, 10, 30]),
        entry(
            "griewank",
            (-600.0, 600.0),
            (vec![0.0], 0.0),
            "Product term couples the dimensions",
            true,
            vec![2, 10, 30],
        ),
    ])
}

/// Function pointer by name
pub fn get_function(name: &str) -> Option<TestFunction> {
    let f: TestFunction = match name {
        "sphere" => sphere,
        "sum_squares" => sum_squares,
        "quartic" => quartic,
        "zakharov" => zakharov,
        "rosenbrock" => rosenbrock,
        "easom" => easom,
        "step" => step,
        "schaffer_f6" => schaffer_f6,
        "ackley" => ackley,
        "rastrigin" => rastrigin,
        "griewank" => griewank,
        _ => return None,
    };
    Some(f)
}

/// Search bounds of `name` repeated over `dimension` dimensions.
///
/// `None` for unknown names and for fixed-dimension functions asked for
/// another dimension.
pub fn get_function_bounds(name: &str, dimension: usize) -> Option<Vec<(f64, f64)>> {
    let metadata = get_function_metadata();
    let meta = metadata.get(name)?;
    meta.supports(dimension).then(|| vec![meta.bounds; dimension])
}

/// Known optimal value of `name`
pub fn get_function_optimum(name: &str) -> Option<f64> {
    get_function_metadata().get(name).map(|m| m.global_minimum.1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_function_reaches_its_minimum() {
        for (name, meta) in get_function_metadata() {
            let f = get_function(&name).unwrap_or_else(|| panic!("{} has no function", name));
            let (location, value) = &meta.global_minimum;
            // separable minima are stored for one coordinate; repeat for the smallest dimension
            let dim = meta.dimensions[0];
            let x = if location.len() == dim {
                Array1::from_vec(location.clone())
            } else {
                Array1::from_elem(dim, location[0])
            };
            let got = f(&x);
            assert!((got - value).abs() < 1e-9, "{}: expected {}, got {}", name, value, got);
        }
    }

    #[test]
    fn test_function_metadata_completeness() {
        let metadata = get_function_metadata();
        assert_eq!(metadata.len(), 11);
        for (name, meta) in metadata.iter() {
            assert_eq!(&meta.name, name);
            assert!(!meta.description.is_empty(), "Function {} has no description", name);
            assert!(!meta.dimensions.is_empty(), "Function {} has no dimensions", name);
            assert!(meta.bounds.0 < meta.bounds.1, "Function {} has invalid bounds", name);
            let (lo, hi) = meta.bounds;
            assert!(meta.global_minimum.0.iter().all(|v| (lo..=hi).contains(v)), "{} optimum out of bounds", name);
        }
    }

    #[test]
    fn test_bounds_lookup() {
        assert_eq!(get_function_bounds("ackley", 3), Some(vec![(-32.768, 32.768); 3]));
        assert_eq!(get_function_bounds("easom", 2).map(|b| b.len()), Some(2));
        assert_eq!(get_function_bounds("easom", 5), None);
        assert_eq!(get_function_bounds("nope", 2), None);
        assert_eq!(get_function_optimum("easom"), Some(-1.0));
    }

    #[test]
    fn test_metadata_serializes() {
        let metadata = get_function_metadata();
        let json = serde_json::to_string(&metadata["schaffer_f6"]).unwrap();
        assert!(json.contains("\"name\":\"schaffer_f6\""));
        assert!(json.contains("\"multimodal\":true"));
    }
}
