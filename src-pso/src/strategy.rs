//! The seam between the generic engine and each PSO variant.

use crate::error::{PsoError, Result};
use crate::state::SearchState;

/// One PSO variant: its control policies plus the generation it performs.
///
/// The engine builds the [`SearchState`], calls [`SwarmStrategy::prepare`]
/// once, then calls [`SwarmStrategy::step`] and advances the generation
/// counter until a stopping rule fires.
pub trait SwarmStrategy {
    fn name(&self) -> &'static str;

    /// Velocity clamp as a fraction of each dimension's range.
    fn vmax_fraction(&self) -> f64 {
        0.2
    }

    /// Whether random initialisation draws velocities (otherwise particles start at rest).
    fn random_velocity(&self) -> bool {
        true
    }

    /// Smallest population the variant's neighbourhoods can be built from.
    fn min_population(&self) -> usize {
        1
    }

    /// Reject population sizes the variant's neighbourhoods cannot be built from.
    fn check_population(&self, pop_size: usize) -> Result<()> {
        let required = self.min_population();
        if pop_size < required {
            return Err(PsoError::PopulationTooSmall { pop_size, required });
        }
        Ok(())
    }

    /// Populate per-particle fields before the first generation.
    fn prepare(&mut self, _state: &mut SearchState<'_>) -> Result<()> {
        Ok(())
    }

    /// Run one generation, ending with a full best refresh.
    fn step(&mut self, state: &mut SearchState<'_>);
}

pub(crate) fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PsoError::InvalidParameter { name, value, reason: "must be finite and > 0" })
    }
}

pub(crate) fn check_non_negative(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PsoError::InvalidParameter { name, value, reason: "must be finite and >= 0" })
    }
}

pub(crate) fn check_probability(name: &'static str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PsoError::InvalidParameter { name, value, reason: "must lie in [0, 1]" })
    }
}

pub(crate) fn check_range(name: &'static str, low: f64, high: f64) -> Result<()> {
    if low.is_finite() && high.is_finite() && low <= high {
        Ok(())
    } else {
        Err(PsoError::InvalidParameter { name, value: low, reason: "lower end must be finite and <= upper end" })
    }
}
