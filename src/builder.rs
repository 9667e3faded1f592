//! Garden model builder.
//!
//! Translates a [`CropCatalog`] and a [`GardenPlan`] into a complete linear
//! program over weekly planted area: one non-negative planted-area variable
//! per (catalog entry, week), one fallow-area variable per week, a maximize
//! objective, and the land, water, yield-target, harvestability, and
//! nitrogen constraint set.
//!
//! All temporal accounting goes through [`alive_window`]: a planting made
//! at week `p` with lifespan `L` occupies its area during weeks
//! `p ..= p + L - 1` and frees it at `p + L`.
//!
//! # Reference
//! Williams (2013), "Model Building in Mathematical Programming",
//! Ch. 14 (multi-period production models)

use std::collections::HashMap;

use tracing::debug;

use crate::lp::{Constraint, LinearExpr, LpModel, VarId};
use crate::models::{CropCatalog, GardenPlan};

/// Weight of the nitrogen delta in the objective. Yield dominates;
/// nitrogen breaks near-ties.
pub const NITROGEN_WEIGHT: f64 = 0.1;

/// Weight of the fallow-area penalty expression; see
/// [`GardenModel::fallow_penalty`].
pub const FALLOW_WEIGHT: f64 = 0.1;

/// The plantings of one crop still occupying area during `week`.
///
/// `vars` holds the crop's planting-week variables indexed by week. The
/// result is the sub-slice for planting weeks `[max(0, week - lifespan + 1),
/// week]`, ascending. The same window drives land, water, and
/// harvestability accounting.
///
/// `lifespan` must be at least 1 and `week` must index into `vars`.
pub fn alive_window(vars: &[VarId], lifespan: u32, week: u32) -> &[VarId] {
    let earliest = week.saturating_sub(lifespan.saturating_sub(1)) as usize;
    &vars[earliest..=week as usize]
}

/// A built garden model, ready for the solver, plus the handles a caller
/// needs to interpret the solution.
#[derive(Debug, Clone)]
pub struct GardenModel {
    /// The assembled linear program.
    pub model: LpModel,
    planted: HashMap<String, Vec<VarId>>,
    fallow: Vec<VarId>,
    /// Total yield across the horizon; each planting is charged once, at
    /// its planting week.
    pub total_yield: LinearExpr,
    /// Total soil nitrogen change across the horizon.
    pub total_nitrogen: LinearExpr,
    /// `FALLOW_WEIGHT · Σ fallow_w`. Exposed for post-solve inspection;
    /// not part of the optimized objective.
    ///
    /// TODO: confirm with the product owner whether this penalty should be
    /// subtracted from the objective. The land equality already forces
    /// fallow area to be priced against forgone yield, so wiring it in
    /// would only shift near-ties.
    pub fallow_penalty: LinearExpr,
}

impl GardenModel {
    /// Planting-week variables for a catalog entry, indexed by week.
    pub fn planted_vars(&self, crop: &str) -> Option<&[VarId]> {
        self.planted.get(crop).map(Vec::as_slice)
    }

    /// Fallow-area variables, indexed by week.
    pub fn fallow_vars(&self) -> &[VarId] {
        &self.fallow
    }
}

/// Builds a [`GardenModel`] from a catalog and garden parameters.
///
/// Construction is pure and deterministic; the builder borrows its inputs
/// read-only, so one catalog can feed both a primary and a scenario model.
///
/// # Example
/// ```
/// use cropplan::builder::GardenModelBuilder;
/// use cropplan::models::{BaseCrop, CropCatalog, GardenPlan};
///
/// let catalog = CropCatalog::new(vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, 2)]);
/// let garden = GardenPlan::new(100.0, 4).with_rainwater(1000.0);
/// let built = GardenModelBuilder::new(&catalog, &garden).build();
/// assert_eq!(built.model.variable_count(), 4 + 4);
/// ```
pub struct GardenModelBuilder<'a> {
    catalog: &'a CropCatalog,
    garden: &'a GardenPlan,
}

impl<'a> GardenModelBuilder<'a> {
    /// Creates a builder over the given catalog and garden.
    pub fn new(catalog: &'a CropCatalog, garden: &'a GardenPlan) -> Self {
        Self { catalog, garden }
    }

    /// Assembles variables, objective, and the full constraint set.
    ///
    /// Constraints, in insertion order:
    /// - per week: `land_week_{w}` (planted alive area plus fallow equals
    ///   the garden area exactly), `use_all_greywater_week_{w}` (greywater-
    ///   tolerant plantings must absorb the whole weekly greywater supply),
    ///   `total_water_week_{w}` (total demand within total supply);
    /// - per yield target: `{plant}_min_yield`, then `{plant}_max_yield`
    ///   and `{plant}_max_yield_pct` when bounded;
    /// - per non-cover entry: `latest_planting_{name}`;
    /// - `nitrogen_balance` (no net soil depletion over the horizon).
    pub fn build(&self) -> GardenModel {
        let weeks = self.garden.weeks;
        let mut model = LpModel::new();

        // One planted-area variable per (entry, week), then one fallow
        // variable per week.
        let mut planted: HashMap<String, Vec<VarId>> = HashMap::new();
        for crop in self.catalog.crops() {
            let vars = (0..weeks)
                .map(|w| model.add_variable(format!("{}_week_{w}", crop.name())))
                .collect();
            planted.insert(crop.name().to_string(), vars);
        }
        let fallow: Vec<VarId> = (0..weeks)
            .map(|w| model.add_variable(format!("fallow_week_{w}")))
            .collect();

        // Aggregates charge each planting once, at its planting week.
        let mut total_yield = LinearExpr::zero();
        let mut total_nitrogen = LinearExpr::zero();
        for crop in self.catalog.crops() {
            for &var in &planted[crop.name()] {
                total_yield.add_term(var, crop.yield_per_sqft());
                total_nitrogen.add_term(var, crop.delta_n());
            }
        }
        let mut fallow_penalty = LinearExpr::zero();
        for &var in &fallow {
            fallow_penalty.add_term(var, FALLOW_WEIGHT);
        }

        model.set_objective(total_yield.clone() + total_nitrogen.clone() * NITROGEN_WEIGHT);

        for week in 0..weeks {
            // Every square foot is accounted for: planted or fallow.
            let mut land = LinearExpr::zero();
            for crop in self.catalog.crops() {
                for &var in alive_window(&planted[crop.name()], crop.lifespan(), week) {
                    land.add_term(var, 1.0);
                }
            }
            land.add_term(fallow[week as usize], 1.0);
            model.add_constraint(Constraint::equal(
                format!("land_week_{week}"),
                land,
                self.garden.sqft,
            ));

            // Greywater is use-it-or-lose-it: tolerant plantings must
            // absorb the full weekly supply.
            let mut greywater_use = LinearExpr::zero();
            for crop in self.catalog.greywater_crops() {
                for &var in alive_window(&planted[crop.name()], crop.lifespan(), week) {
                    greywater_use.add_term(var, crop.water_use());
                }
            }
            model.add_constraint(Constraint::greater_eq(
                format!("use_all_greywater_week_{week}"),
                greywater_use,
                self.garden.greywater,
            ));

            // Total demand cannot exceed total supply.
            let mut water_use = LinearExpr::zero();
            for crop in self.catalog.crops() {
                for &var in alive_window(&planted[crop.name()], crop.lifespan(), week) {
                    water_use.add_term(var, crop.water_use());
                }
            }
            model.add_constraint(Constraint::less_eq(
                format!("total_water_week_{week}"),
                water_use,
                self.garden.total_water(),
            ));
        }

        // Per-target yield bounds over every contributing entry.
        for target in &self.garden.yields {
            let mut attributed = LinearExpr::zero();
            for (entry, per_sqft) in self.catalog.attributed_yields(&target.plant) {
                for &var in &planted[&entry] {
                    attributed.add_term(var, per_sqft);
                }
            }

            model.add_constraint(Constraint::greater_eq(
                format!("{}_min_yield", target.plant),
                attributed.clone(),
                target.min_yield,
            ));
            if let Some(max_yield) = target.max_yield {
                model.add_constraint(Constraint::less_eq(
                    format!("{}_max_yield", target.plant),
                    attributed.clone(),
                    max_yield,
                ));
            }
            if let Some(pct) = target.max_yield_pct {
                // Cap relative to the whole garden's yield, folded onto
                // the left side: attributed - pct * total_yield <= 0.
                model.add_constraint(Constraint::less_eq(
                    format!("{}_max_yield_pct", target.plant),
                    attributed + total_yield.clone() * -pct,
                    0.0,
                ));
            }
        }

        // Latest planting: nothing may be planted so late that it is still
        // growing past the horizon. The alive-in-final-week window is
        // ascending by planting week; when the lifespan fits the horizon
        // its first element is the one planting that completes exactly at
        // the boundary, and only that one is exempt. Cover crops are
        // exempt entirely.
        if let Some(final_week) = weeks.checked_sub(1) {
            for crop in self.catalog.crops() {
                if crop.is_cover_crop() {
                    continue;
                }
                let window = alive_window(&planted[crop.name()], crop.lifespan(), final_week);
                let constrained = if crop.lifespan() <= weeks && !window.is_empty() {
                    &window[1..]
                } else {
                    window
                };
                model.add_constraint(Constraint::equal(
                    format!("latest_planting_{}", crop.name()),
                    LinearExpr::sum(constrained.iter().copied()),
                    0.0,
                ));
            }
        }

        // Soil nitrogen must not be net-depleted over the horizon.
        model.add_constraint(Constraint::greater_eq(
            "nitrogen_balance",
            total_nitrogen.clone(),
            0.0,
        ));

        debug!(
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            weeks,
            entries = self.catalog.len(),
            "assembled garden model"
        );

        GardenModel {
            model,
            planted,
            fallow,
            total_yield,
            total_nitrogen,
            fallow_penalty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BaseCrop, YieldTarget};
    use approx::assert_relative_eq;

    fn build(catalog: &CropCatalog, garden: &GardenPlan) -> GardenModel {
        GardenModelBuilder::new(catalog, garden).build()
    }

    fn single_crop_catalog(lifespan: u32) -> CropCatalog {
        CropCatalog::new(vec![BaseCrop::new("lettuce", 1.0, 1.0, 0.0, lifespan)])
    }

    #[test]
    fn test_alive_window() {
        let mut model = LpModel::new();
        let vars: Vec<VarId> = (0..8).map(|w| model.add_variable(format!("w{w}"))).collect();

        // Lifespan 3 at week 5: planted weeks 3, 4, 5 are still growing.
        assert_eq!(alive_window(&vars, 3, 5), &vars[3..=5]);
        // Clamped at the horizon start.
        assert_eq!(alive_window(&vars, 3, 1), &vars[0..=1]);
        // Lifespan 1 only covers the planting week itself.
        assert_eq!(alive_window(&vars, 1, 4), &vars[4..=4]);
        // A lifespan past the horizon start covers everything so far.
        assert_eq!(alive_window(&vars, 20, 6), &vars[0..=6]);
    }

    #[test]
    fn test_variable_count() {
        let catalog = CropCatalog::new(vec![
            BaseCrop::new("a", 1.0, 1.0, 0.0, 2).with_companion("b"),
            BaseCrop::new("b", 1.0, 1.0, 0.0, 3),
        ]);
        let garden = GardenPlan::new(50.0, 6);
        let built = build(&catalog, &garden);

        // 3 entries (a, b, a-b) x 6 weeks + 6 fallow.
        assert_eq!(built.model.variable_count(), 3 * 6 + 6);
        assert_eq!(built.planted_vars("a-b").unwrap().len(), 6);
        assert_eq!(built.fallow_vars().len(), 6);
    }

    #[test]
    fn test_land_constraint_coefficients() {
        // 1 crop, lifespan 1, 2 weeks, sqft 10: each land constraint is
        // planted_week_w + fallow_week_w == 10.
        let catalog = single_crop_catalog(1);
        let garden = GardenPlan::new(10.0, 2);
        let built = build(&catalog, &garden);

        let planted = built.planted_vars("lettuce").unwrap();
        let fallow = built.fallow_vars();
        for week in 0..2usize {
            let land = built.model.constraint(&format!("land_week_{week}")).unwrap();
            assert_relative_eq!(land.rhs, 10.0);
            assert_eq!(land.op, crate::lp::Comparison::Equal);
            assert_eq!(land.lhs.term_count(), 2);
            assert_relative_eq!(land.lhs.coeff(planted[week]), 1.0);
            assert_relative_eq!(land.lhs.coeff(fallow[week]), 1.0);
        }
    }

    #[test]
    fn test_land_constraint_counts_overlapping_plantings() {
        let catalog = single_crop_catalog(3);
        let garden = GardenPlan::new(10.0, 6);
        let built = build(&catalog, &garden);

        let planted = built.planted_vars("lettuce").unwrap();
        let land = built.model.constraint("land_week_5").unwrap();
        // Plantings from weeks 3, 4, 5 plus the fallow variable.
        assert_eq!(land.lhs.term_count(), 4);
        for week in 3..=5 {
            assert!(land.lhs.contains(planted[week]));
        }
        assert!(!land.lhs.contains(planted[2]));
    }

    #[test]
    fn test_water_constraints() {
        let catalog = CropCatalog::new(vec![
            BaseCrop::new("grey", 1.0, 2.0, 0.0, 1).with_greywater_ok(true),
            BaseCrop::new("fresh", 1.0, 3.0, 0.0, 1),
        ]);
        let garden = GardenPlan::new(50.0, 1).with_greywater(20.0).with_rainwater(80.0);
        let built = build(&catalog, &garden);

        let grey_vars = built.planted_vars("grey").unwrap();
        let fresh_vars = built.planted_vars("fresh").unwrap();

        // Floor: only the greywater-tolerant crop appears.
        let floor = built.model.constraint("use_all_greywater_week_0").unwrap();
        assert_eq!(floor.op, crate::lp::Comparison::GreaterEq);
        assert_relative_eq!(floor.rhs, 20.0);
        assert_relative_eq!(floor.lhs.coeff(grey_vars[0]), 2.0);
        assert!(!floor.lhs.contains(fresh_vars[0]));

        // Cap: every crop appears, bounded by the combined supply.
        let cap = built.model.constraint("total_water_week_0").unwrap();
        assert_eq!(cap.op, crate::lp::Comparison::LessEq);
        assert_relative_eq!(cap.rhs, 100.0);
        assert_relative_eq!(cap.lhs.coeff(grey_vars[0]), 2.0);
        assert_relative_eq!(cap.lhs.coeff(fresh_vars[0]), 3.0);
    }

    #[test]
    fn test_objective_weights_nitrogen() {
        let catalog = CropCatalog::new(vec![BaseCrop::new("pea", 2.0, 1.0, 3.0, 2)]);
        let garden = GardenPlan::new(10.0, 2);
        let built = build(&catalog, &garden);

        let planted = built.planted_vars("pea").unwrap();
        for &var in planted {
            assert_relative_eq!(built.model.objective().coeff(var), 2.0 + 0.1 * 3.0);
        }
    }

    #[test]
    fn test_fallow_penalty_not_in_objective() {
        let catalog = single_crop_catalog(1);
        let garden = GardenPlan::new(10.0, 3);
        let built = build(&catalog, &garden);

        for &var in built.fallow_vars() {
            assert!(!built.model.objective().contains(var));
            assert_relative_eq!(built.fallow_penalty.coeff(var), FALLOW_WEIGHT);
        }
    }

    #[test]
    fn test_yield_target_constraints() {
        let catalog = CropCatalog::new(vec![
            BaseCrop::new("tomato", 5.0, 1.0, 0.0, 4).with_companion("basil"),
            BaseCrop::new("basil", 1.0, 1.0, 0.0, 2),
        ]);
        let garden = GardenPlan::new(100.0, 4).with_yield_target(
            YieldTarget::new("tomato", 25.0)
                .with_max_yield(80.0)
                .with_max_yield_pct(0.5),
        );
        let built = build(&catalog, &garden);

        let tomato = built.planted_vars("tomato").unwrap();
        let compound = built.planted_vars("tomato-basil").unwrap();
        let basil = built.planted_vars("basil").unwrap();

        let min = built.model.constraint("tomato_min_yield").unwrap();
        assert_eq!(min.op, crate::lp::Comparison::GreaterEq);
        assert_relative_eq!(min.rhs, 25.0);
        // Direct plantings at full yield, compound plantings at the
        // attributed component yield.
        assert_relative_eq!(min.lhs.coeff(tomato[0]), 5.0);
        assert_relative_eq!(min.lhs.coeff(compound[0]), 5.0);
        assert!(!min.lhs.contains(basil[0]));

        let max = built.model.constraint("tomato_max_yield").unwrap();
        assert_relative_eq!(max.rhs, 80.0);

        // Percentage cap folds -pct * total_yield into the left side, so
        // unrelated crops appear with negative weight.
        let pct = built.model.constraint("tomato_max_yield_pct").unwrap();
        assert_relative_eq!(pct.rhs, 0.0);
        assert_relative_eq!(pct.lhs.coeff(tomato[0]), 5.0 - 0.5 * 5.0);
        assert_relative_eq!(pct.lhs.coeff(basil[0]), -0.5 * 1.0);
    }

    #[test]
    fn test_latest_planting_exempts_boundary_fit() {
        // Horizon 4, lifespan 2: alive at week 3 are plantings 2 and 3.
        // Planting 2 finishes exactly at the boundary and is exempt;
        // planting 3 is forced to zero.
        let catalog = single_crop_catalog(2);
        let garden = GardenPlan::new(100.0, 4);
        let built = build(&catalog, &garden);

        let planted = built.planted_vars("lettuce").unwrap();
        let latest = built.model.constraint("latest_planting_lettuce").unwrap();
        assert_eq!(latest.op, crate::lp::Comparison::Equal);
        assert_relative_eq!(latest.rhs, 0.0);
        assert_eq!(latest.lhs.term_count(), 1);
        assert!(latest.lhs.contains(planted[3]));
        assert!(!latest.lhs.contains(planted[2]));
    }

    #[test]
    fn test_latest_planting_lifespan_exceeding_horizon() {
        // Lifespan 6 over a 4-week horizon: no planting can ever finish,
        // so every planting week is zeroed with no exemption.
        let catalog = single_crop_catalog(6);
        let garden = GardenPlan::new(100.0, 4);
        let built = build(&catalog, &garden);

        let planted = built.planted_vars("lettuce").unwrap();
        let latest = built.model.constraint("latest_planting_lettuce").unwrap();
        assert_eq!(latest.lhs.term_count(), 4);
        for &var in planted {
            assert!(latest.lhs.contains(var));
        }
    }

    #[test]
    fn test_cover_crop_exempt_from_latest_planting() {
        let catalog = CropCatalog::new(vec![
            BaseCrop::new("clover", 0.0, 0.3, 4.0, 8).with_cover_crop(true)
        ]);
        let garden = GardenPlan::new(100.0, 4);
        let built = build(&catalog, &garden);

        assert!(built.model.constraint("latest_planting_clover").is_none());
    }

    #[test]
    fn test_nitrogen_balance_constraint() {
        let catalog = CropCatalog::new(vec![BaseCrop::new("corn", 3.0, 1.0, -0.8, 2)]);
        let garden = GardenPlan::new(10.0, 2);
        let built = build(&catalog, &garden);

        let nitrogen = built.model.constraint("nitrogen_balance").unwrap();
        assert_eq!(nitrogen.op, crate::lp::Comparison::GreaterEq);
        assert_relative_eq!(nitrogen.rhs, 0.0);
        let planted = built.planted_vars("corn").unwrap();
        assert_relative_eq!(nitrogen.lhs.coeff(planted[0]), -0.8);
    }
}
