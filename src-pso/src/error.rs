//! Error types for swarm construction and configuration.
//!
//! Every error here is raised before the first generation runs: a swarm
//! that starts is expected to finish.

/// Errors reported while validating bounds, configuration or an initial swarm.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PsoError {
    /// `lower` and `upper` differ in length.
    #[error("bounds mismatch: lower has {lower_len} entries, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bound vector.
        lower_len: usize,
        /// Length of the upper bound vector.
        upper_len: usize,
    },

    /// A dimension whose lower bound is not strictly below its upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) must be < upper ({upper})")]
    InvalidBounds {
        /// Offending dimension.
        index: usize,
        /// Lower bound value.
        lower: f64,
        /// Upper bound value.
        upper: f64,
    },

    /// No dimensions at all.
    #[error("bounds are empty: at least one dimension is required")]
    EmptyBounds,

    /// Population too small for the requested variant or topology.
    #[error("population size {pop_size} is too small: at least {required} particles required")]
    PopulationTooSmall {
        /// Configured population size.
        pop_size: usize,
        /// Minimum accepted by the variant.
        required: usize,
    },

    /// `maxiter` of zero.
    #[error("generation cap must be at least 1")]
    InvalidGenerationCap,

    /// An evaluation budget was requested without any sampling checkpoint.
    #[error("evaluation budget requires at least one checkpoint")]
    EmptyCheckpoints,

    /// A checkpoint fraction outside `(0, 1]`.
    #[error("checkpoint fraction {value} must lie in (0, 1]")]
    InvalidCheckpoint {
        /// Offending fraction.
        value: f64,
    },

    /// Checkpoints given while the run is generation-capped.
    #[error("checkpoints require an evaluation budget")]
    CheckpointsWithoutBudget,

    /// A convergence trace was requested but the objective has no known optimum.
    #[error("convergence trace requested but the objective reports no known optimum")]
    MissingOptimum,

    /// A hyperparameter outside its accepted range.
    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
        /// Accepted range or rule.
        reason: &'static str,
    },

    /// Neighbourhood or grouping that cannot be built from the population.
    #[error("topology cannot be built from {pop_size} particles: {reason}")]
    TopologySize {
        /// Configured population size.
        pop_size: usize,
        /// What the topology needed.
        reason: String,
    },

    /// Supplied initial swarm has the wrong number of particles.
    #[error("initial swarm has {got} particles, expected {expected}")]
    InitialSwarmMismatch {
        /// Configured population size.
        expected: usize,
        /// Particles supplied.
        got: usize,
    },

    /// A supplied particle whose vectors do not match the problem dimension.
    #[error("initial particle {index} has dimension {got}, expected {expected}")]
    InitialSwarmDimension {
        /// Particle index.
        index: usize,
        /// Problem dimension.
        expected: usize,
        /// Dimension found on the particle.
        got: usize,
    },

    /// A sampling distribution rejected its parameters.
    #[error("distribution error: {0}")]
    Distribution(String),
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, PsoError>;
