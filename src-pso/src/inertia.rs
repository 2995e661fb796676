//! Inertia-weight schedules.

use crate::error::{PsoError, Result};

/// How the inertia weight evolves over a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Inertia {
    /// Constant weight.
    Fixed(f64),
    /// `w = w_max - (w_max - w_min) * g / G`.
    LinearDecay { w_min: f64, w_max: f64 },
    /// `w = w_min + (w_max - w_min) * improved / N`.
    SuccessRate { w_min: f64, w_max: f64 },
}

impl Inertia {
    /// Weight used for the first generation.
    pub fn initial(&self) -> f64 {
        match *self {
            Inertia::Fixed(w) => w,
            Inertia::LinearDecay { w_max, .. } => w_max,
            Inertia::SuccessRate { w_max, .. } => w_max,
        }
    }

    /// Weight after a generation with the given progress (`g / G`) and
    /// success ratio (improved personal bests over population size).
    pub fn update(&self, progress: f64, success_ratio: f64) -> f64 {
        match *self {
            Inertia::Fixed(w) => w,
            Inertia::LinearDecay { w_min, w_max } => w_max - (w_max - w_min) * progress.clamp(0.0, 1.0),
            Inertia::SuccessRate { w_min, w_max } => w_min + (w_max - w_min) * success_ratio.clamp(0.0, 1.0),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            Inertia::Fixed(w) if !w.is_finite() => {
                Err(PsoError::InvalidParameter { name: "w", value: w, reason: "must be finite" })
            }
            Inertia::LinearDecay { w_min, w_max } | Inertia::SuccessRate { w_min, w_max } => {
                if !(w_min.is_finite() && w_max.is_finite()) || w_min > w_max {
                    Err(PsoError::InvalidParameter { name: "w_min", value: w_min, reason: "must be finite and <= w_max" })
                } else {
                    Ok(())
                }
            }
            Inertia::Fixed(_) => Ok(()),
        }
    }
}
