//! Garden parameters.
//!
//! [`GardenPlan`] is an immutable value: scenario runs derive modified
//! copies (e.g. [`GardenPlan::with_rainwater_scaled`]) instead of mutating
//! the instance a primary model was built from.

use serde::{Deserialize, Serialize};

/// A per-crop yield requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YieldTarget {
    /// Base crop the target applies to.
    pub plant: String,
    /// Minimum total yield (lbs) over the whole horizon.
    pub min_yield: f64,
    /// Optional absolute cap on the target's total yield (lbs).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_yield: Option<f64>,
    /// Optional cap as a fraction of the whole garden's total yield.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_yield_pct: Option<f64>,
}

impl YieldTarget {
    /// Creates a minimum-only target.
    pub fn new(plant: impl Into<String>, min_yield: f64) -> Self {
        Self {
            plant: plant.into(),
            min_yield,
            max_yield: None,
            max_yield_pct: None,
        }
    }

    /// Sets the absolute yield cap.
    pub fn with_max_yield(mut self, max_yield: f64) -> Self {
        self.max_yield = Some(max_yield);
        self
    }

    /// Sets the cap relative to total garden yield.
    pub fn with_max_yield_pct(mut self, pct: f64) -> Self {
        self.max_yield_pct = Some(pct);
        self
    }
}

/// Garden configuration for one planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GardenPlan {
    /// Total plantable area in sqft.
    pub sqft: f64,
    /// Planning horizon length in weeks, at least 1.
    pub weeks: u32,
    /// Weekly greywater supply in gallons. Use-it-or-lose-it: the model
    /// forces greywater-tolerant plantings to absorb all of it.
    pub greywater: f64,
    /// Weekly rainwater supply in gallons. Bounds usage only.
    pub rainwater: f64,
    /// Per-crop yield requirements.
    #[serde(default)]
    pub yields: Vec<YieldTarget>,
}

impl GardenPlan {
    /// Creates a garden with no water budgets and no yield targets.
    pub fn new(sqft: f64, weeks: u32) -> Self {
        Self {
            sqft,
            weeks,
            greywater: 0.0,
            rainwater: 0.0,
            yields: Vec::new(),
        }
    }

    /// Sets the weekly greywater supply.
    pub fn with_greywater(mut self, gallons: f64) -> Self {
        self.greywater = gallons;
        self
    }

    /// Sets the weekly rainwater supply.
    pub fn with_rainwater(mut self, gallons: f64) -> Self {
        self.rainwater = gallons;
        self
    }

    /// Adds a yield target.
    pub fn with_yield_target(mut self, target: YieldTarget) -> Self {
        self.yields.push(target);
        self
    }

    /// Total weekly water supply.
    pub fn total_water(&self) -> f64 {
        self.greywater + self.rainwater
    }

    /// Derives a copy with rainwater scaled by `factor`, for sensitivity
    /// scenarios. The receiver is left untouched.
    pub fn with_rainwater_scaled(&self, factor: f64) -> Self {
        let mut scenario = self.clone();
        scenario.rainwater *= factor;
        scenario
    }
}
