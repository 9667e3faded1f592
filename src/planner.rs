//! Top-level planning orchestration.
//!
//! [`Planner`] ties the stages together: validate the inputs, expand the
//! catalog, build the model, solve it, and evaluate the plan. It also runs
//! the rainwater sensitivity scenario on a derived copy of the garden
//! parameters, so a scenario can never disturb the primary run.

use thiserror::Error;
use tracing::debug;

use crate::builder::{GardenModel, GardenModelBuilder};
use crate::models::{BaseCrop, CropCatalog, GardenPlan};
use crate::report::PlanReport;
use crate::solve::{self, SolveError};
use crate::validation::{self, ValidationError};

/// Planning failure.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The crop library or garden parameters failed validation.
    #[error("input validation failed with {} error(s)", .0.len())]
    Validation(Vec<ValidationError>),
    /// The model could not be solved to optimality.
    #[error(transparent)]
    Solve(#[from] SolveError),
}

/// Validates inputs once, then plans any number of scenarios against the
/// same expanded catalog.
///
/// # Example
/// ```
/// use cropplan::models::{BaseCrop, GardenPlan, YieldTarget};
/// use cropplan::planner::Planner;
///
/// let crops = vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, 2).with_greywater_ok(true)];
/// let garden = GardenPlan::new(100.0, 4)
///     .with_rainwater(1000.0)
///     .with_yield_target(YieldTarget::new("lettuce", 50.0));
///
/// let planner = Planner::new(crops, garden).unwrap();
/// let report = planner.plan().unwrap();
/// assert!(report.total_yield >= 50.0);
/// ```
#[derive(Debug)]
pub struct Planner {
    catalog: CropCatalog,
    garden: GardenPlan,
}

impl Planner {
    /// Validates the inputs and expands the catalog.
    ///
    /// Rejecting malformed crops here keeps the catalog expander and the
    /// model builder total: no zero-lifespan division, no degenerate
    /// horizon, no dangling references downstream.
    pub fn new(crops: Vec<BaseCrop>, garden: GardenPlan) -> Result<Self, PlanError> {
        validation::validate_input(&crops, &garden).map_err(PlanError::Validation)?;
        Ok(Self {
            catalog: CropCatalog::new(crops),
            garden,
        })
    }

    /// The expanded catalog.
    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    /// The primary garden parameters.
    pub fn garden(&self) -> &GardenPlan {
        &self.garden
    }

    /// Builds the primary model without solving it.
    pub fn build_model(&self) -> GardenModel {
        GardenModelBuilder::new(&self.catalog, &self.garden).build()
    }

    /// Plans against the primary garden parameters.
    pub fn plan(&self) -> Result<PlanReport, PlanError> {
        self.plan_for(&self.garden)
    }

    /// Plans a sensitivity scenario with rainwater scaled by `factor`.
    ///
    /// Runs on an independent copy of the garden parameters; the primary
    /// instance and any model already built from it are untouched.
    pub fn plan_with_rainwater_scaled(&self, factor: f64) -> Result<PlanReport, PlanError> {
        let scenario = self.garden.with_rainwater_scaled(factor);
        debug!(rainwater = scenario.rainwater, "planning rainwater scenario");
        self.plan_for(&scenario)
    }

    fn plan_for(&self, garden: &GardenPlan) -> Result<PlanReport, PlanError> {
        let built = GardenModelBuilder::new(&self.catalog, garden).build();
        let solution = solve::solve(&built.model)?;
        Ok(PlanReport::calculate(&self.catalog, garden, &built, &solution))
    }
}
