//! Post-solve plan evaluation.
//!
//! Turns a solved garden model back into domain quantities: realized
//! totals, per-target yields, and week-by-week plant/harvest actions.
//! Everything here is plain data; rendering is a caller concern.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::builder::GardenModel;
use crate::models::{CropCatalog, GardenPlan};
use crate::solve::Solution;

/// Areas below this many sqft are treated as solver noise and omitted
/// from the weekly action lists.
pub const AREA_EPSILON: f64 = 0.1;

/// An instruction to plant an entry in a given week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantAction {
    /// Catalog entry name.
    pub crop: String,
    /// Area to plant, in sqft.
    pub sqft: f64,
}

/// An instruction to harvest an entry whose lifespan completes this week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestAction {
    /// Catalog entry name.
    pub crop: String,
    /// Area coming out, in sqft.
    pub sqft: f64,
    /// The week the harvested planting went in.
    pub planted_week: u32,
}

/// Everything happening in one week of the plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekActions {
    /// Week index, starting at 0.
    pub week: u32,
    /// Unplanted area this week, in sqft.
    pub fallow_sqft: f64,
    /// Plantings to make at the start of the week.
    pub plantings: Vec<PlantAction>,
    /// Harvests due at the end of the week.
    pub harvests: Vec<HarvestAction>,
}

/// A solved plan, evaluated back into domain quantities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReport {
    /// Total food yield over the horizon, in lbs.
    pub total_yield: f64,
    /// Net soil nitrogen change over the horizon, in grams.
    pub total_nitrogen_delta: f64,
    /// Realized objective value (yield plus weighted nitrogen).
    pub objective: f64,
    /// Realized yield per base crop, attributed across every contributing
    /// entry (direct plantings and compounds).
    pub target_yields: HashMap<String, f64>,
    /// Week-by-week actions.
    pub weeks: Vec<WeekActions>,
}

impl PlanReport {
    /// Evaluates a solution against the model it came from.
    ///
    /// # Arguments
    /// * `catalog` - The catalog the model was built over.
    /// * `garden` - The garden parameters the model was built against.
    /// * `built` - The built model (for variable handles and aggregates).
    /// * `solution` - Solver output.
    pub fn calculate(
        catalog: &CropCatalog,
        garden: &GardenPlan,
        built: &GardenModel,
        solution: &Solution,
    ) -> Self {
        let total_yield = solution.evaluate(&built.total_yield);
        let total_nitrogen_delta = solution.evaluate(&built.total_nitrogen);

        let mut target_yields = HashMap::new();
        for name in catalog.base_names() {
            let mut realized = 0.0;
            for (entry, per_sqft) in catalog.attributed_yields(name) {
                let planted: f64 = built
                    .planted_vars(&entry)
                    .unwrap_or(&[])
                    .iter()
                    .map(|&v| solution.value(v))
                    .sum();
                realized += per_sqft * planted;
            }
            target_yields.insert(name.to_string(), realized);
        }

        let mut weeks = Vec::with_capacity(garden.weeks as usize);
        for week in 0..garden.weeks {
            let fallow_sqft = solution.value(built.fallow_vars()[week as usize]);
            let mut plantings = Vec::new();
            let mut harvests = Vec::new();

            for crop in catalog.crops() {
                let Some(vars) = built.planted_vars(crop.name()) else {
                    continue;
                };

                let area = solution.value(vars[week as usize]);
                if area >= AREA_EPSILON {
                    plantings.push(PlantAction {
                        crop: crop.name().to_string(),
                        sqft: area,
                    });
                }

                // A planting made `lifespan` weeks before the end of this
                // week comes out now.
                if let Some(planted_week) = (week + 1).checked_sub(crop.lifespan()) {
                    let harvested = solution.value(vars[planted_week as usize]);
                    if harvested > AREA_EPSILON {
                        harvests.push(HarvestAction {
                            crop: crop.name().to_string(),
                            sqft: harvested,
                            planted_week,
                        });
                    }
                }
            }

            weeks.push(WeekActions {
                week,
                fallow_sqft,
                plantings,
                harvests,
            });
        }

        Self {
            total_yield,
            total_nitrogen_delta,
            objective: solution.objective(),
            target_yields,
            weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GardenModelBuilder;
    use crate::models::BaseCrop;
    use crate::solve;
    use approx::assert_relative_eq;

    fn solve_garden(catalog: &CropCatalog, garden: &GardenPlan) -> (GardenModel, Solution) {
        let built = GardenModelBuilder::new(catalog, garden).build();
        let solution = solve::solve(&built.model).unwrap();
        (built, solution)
    }

    #[test]
    fn test_report_totals_match_aggregates() {
        let catalog = CropCatalog::new(vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, 2)]);
        let garden = GardenPlan::new(100.0, 4).with_rainwater(1000.0);
        let (built, solution) = solve_garden(&catalog, &garden);

        let report = PlanReport::calculate(&catalog, &garden, &built, &solution);
        assert_relative_eq!(
            report.total_yield,
            solution.evaluate(&built.total_yield),
            epsilon = 1e-9
        );
        assert_relative_eq!(report.total_nitrogen_delta, 0.0, epsilon = 1e-6);
        assert_eq!(report.weeks.len(), 4);
    }

    #[test]
    fn test_target_yields_attribute_across_entries() {
        let catalog = CropCatalog::new(vec![
            BaseCrop::new("tomato", 5.0, 1.0, 0.0, 2).with_companion("basil"),
            BaseCrop::new("basil", 1.0, 1.0, 0.0, 2),
        ]);
        let garden = GardenPlan::new(100.0, 4).with_rainwater(10_000.0);
        let (built, solution) = solve_garden(&catalog, &garden);
        let report = PlanReport::calculate(&catalog, &garden, &built, &solution);

        // Whatever the optimizer chose, the per-target split must re-add
        // to the total: each entry's yield is fully attributed to its
        // component base crops.
        let attributed_sum: f64 = report.target_yields.values().sum();
        assert_relative_eq!(attributed_sum, report.total_yield, epsilon = 1e-6);
        assert!(report.target_yields.contains_key("tomato"));
        assert!(report.target_yields.contains_key("basil"));
    }

    #[test]
    fn test_weekly_actions_pair_plantings_with_harvests() {
        let catalog = CropCatalog::new(vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, 2)]);
        let garden = GardenPlan::new(100.0, 4).with_rainwater(1000.0);
        let (built, solution) = solve_garden(&catalog, &garden);
        let report = PlanReport::calculate(&catalog, &garden, &built, &solution);

        // Every reported harvest in week w is a planting from week w+1-2.
        for week in &report.weeks {
            for harvest in &week.harvests {
                assert_eq!(harvest.planted_week + 2, week.week + 1);
                let planted = built.planted_vars(&harvest.crop).unwrap();
                assert_relative_eq!(
                    harvest.sqft,
                    solution.value(planted[harvest.planted_week as usize]),
                    epsilon = 1e-9
                );
            }
        }

        // Land accounting: in each week, alive area plus fallow fills the
        // garden.
        let planted = built.planted_vars("lettuce").unwrap();
        for week in 0..4u32 {
            let alive: f64 = crate::builder::alive_window(planted, 2, week)
                .iter()
                .map(|&v| solution.value(v))
                .sum();
            assert_relative_eq!(
                alive + report.weeks[week as usize].fallow_sqft,
                100.0,
                epsilon = 1e-6
            );
        }
    }

    #[test]
    fn test_negligible_areas_omitted() {
        // Nothing forces planting, no rainwater: optimum leaves the garden
        // fallow and the action lists empty.
        let catalog = CropCatalog::new(vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, 2)]);
        let garden = GardenPlan::new(100.0, 3);
        let (built, solution) = solve_garden(&catalog, &garden);
        let report = PlanReport::calculate(&catalog, &garden, &built, &solution);

        for week in &report.weeks {
            assert!(week.plantings.is_empty());
            assert!(week.harvests.is_empty());
            assert_relative_eq!(week.fallow_sqft, 100.0, epsilon = 1e-6);
        }
    }
}
