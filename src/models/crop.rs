//! Crop catalog entries.
//!
//! A catalog entry is either a [`BaseCrop`] supplied by the operator's crop
//! library or a [`CompoundCrop`] synthesized from a companion pair. The two
//! are kept as separate variants of [`Crop`] so that a base crop can never
//! carry per-component yields and a compound crop can never declare further
//! companions.
//!
//! # Reference
//! Riotte (1975), "Carrots Love Tomatoes: Secrets of Companion Planting"

use serde::{Deserialize, Serialize};

/// An operator-defined crop.
///
/// Attributes are per square foot of planted area unless noted otherwise.
/// `lifespan` is the number of whole weeks a planting occupies its area,
/// counted from the planting week inclusive; the area is freed (harvested)
/// at `planting_week + lifespan`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseCrop {
    /// Unique crop name.
    pub name: String,
    /// Names of base crops this crop can share a plot with.
    ///
    /// The relation is directional: listing `B` here produces the compound
    /// `"{self}-{B}"` and nothing else. A crop must never list itself.
    #[serde(default)]
    pub companions: Vec<String>,
    /// Whether the crop tolerates greywater irrigation.
    pub greywater_ok: bool,
    /// Harvest yield in lbs per sqft over one lifespan.
    #[serde(rename = "yield")]
    pub yield_per_sqft: f64,
    /// Weekly water demand in gallons per sqft while alive.
    pub water_use: f64,
    /// Soil nitrogen change in grams per sqft over one lifespan.
    /// Negative for feeders, positive for fixers.
    pub delta_n: f64,
    /// Weeks from planting to harvest, at least 1.
    pub lifespan: u32,
    /// Cover crops may be planted too late to reach maturity.
    pub is_cover_crop: bool,
}

impl BaseCrop {
    /// Creates a base crop with no companions and all flags off.
    pub fn new(
        name: impl Into<String>,
        yield_per_sqft: f64,
        water_use: f64,
        delta_n: f64,
        lifespan: u32,
    ) -> Self {
        Self {
            name: name.into(),
            companions: Vec::new(),
            greywater_ok: false,
            yield_per_sqft,
            water_use,
            delta_n,
            lifespan,
            is_cover_crop: false,
        }
    }

    /// Declares a companion crop.
    pub fn with_companion(mut self, name: impl Into<String>) -> Self {
        self.companions.push(name.into());
        self
    }

    /// Sets greywater tolerance.
    pub fn with_greywater_ok(mut self, ok: bool) -> Self {
        self.greywater_ok = ok;
        self
    }

    /// Marks the crop as a cover crop.
    pub fn with_cover_crop(mut self, cover: bool) -> Self {
        self.is_cover_crop = cover;
        self
    }
}

/// A synthesized companion-planting entry.
///
/// Represents two base crops sharing one plot for the longer of their two
/// lifespans. The shorter-lived component is replanted back-to-back, so its
/// yield and nitrogen contributions are multiplied by how many of its cycles
/// fit in the compound lifespan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompoundCrop {
    /// `"{plant_1}-{plant_2}"`.
    pub name: String,
    /// First component (the crop that declared the companionship).
    pub plant_1_name: String,
    /// Second component (the declared companion).
    pub plant_2_name: String,
    /// Yield per sqft attributable to the first component.
    pub plant_1_yield: f64,
    /// Yield per sqft attributable to the second component.
    pub plant_2_yield: f64,
    /// Both components must tolerate greywater.
    pub greywater_ok: bool,
    /// Combined yield per sqft over one compound lifespan.
    #[serde(rename = "yield")]
    pub yield_per_sqft: f64,
    /// Combined weekly water demand per sqft.
    pub water_use: f64,
    /// Combined nitrogen change per sqft over one compound lifespan.
    pub delta_n: f64,
    /// Max of the two component lifespans.
    pub lifespan: u32,
    /// Both components must be cover crops.
    pub is_cover_crop: bool,
}

impl CompoundCrop {
    /// Derives the compound entry for one ordered companion pair.
    ///
    /// Both lifespans must be at least 1 (enforced by input validation
    /// before any expansion happens).
    pub fn from_pair(crop: &BaseCrop, companion: &BaseCrop) -> Self {
        debug_assert!(crop.lifespan >= 1 && companion.lifespan >= 1);

        let longest = crop.lifespan.max(companion.lifespan);
        // How many full cycles of each component fit in the compound lifespan.
        let crop_cycles = (longest / crop.lifespan) as f64;
        let companion_cycles = (longest / companion.lifespan) as f64;
        let crop_yield = crop_cycles * crop.yield_per_sqft;
        let companion_yield = companion_cycles * companion.yield_per_sqft;

        Self {
            name: format!("{}-{}", crop.name, companion.name),
            plant_1_name: crop.name.clone(),
            plant_2_name: companion.name.clone(),
            plant_1_yield: crop_yield,
            plant_2_yield: companion_yield,
            greywater_ok: crop.greywater_ok && companion.greywater_ok,
            yield_per_sqft: crop_yield + companion_yield,
            water_use: crop.water_use + companion.water_use,
            delta_n: crop.delta_n * crop_cycles + companion.delta_n * companion_cycles,
            lifespan: longest,
            is_cover_crop: crop.is_cover_crop && companion.is_cover_crop,
        }
    }
}

/// A catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Crop {
    /// Operator-defined crop.
    Base(BaseCrop),
    /// Synthesized companion pair.
    Compound(CompoundCrop),
}

impl Crop {
    /// Entry name, unique within a catalog for base crops.
    pub fn name(&self) -> &str {
        match self {
            Crop::Base(c) => &c.name,
            Crop::Compound(c) => &c.name,
        }
    }

    /// Yield in lbs per sqft over one lifespan.
    pub fn yield_per_sqft(&self) -> f64 {
        match self {
            Crop::Base(c) => c.yield_per_sqft,
            Crop::Compound(c) => c.yield_per_sqft,
        }
    }

    /// Weekly water demand in gallons per sqft while alive.
    pub fn water_use(&self) -> f64 {
        match self {
            Crop::Base(c) => c.water_use,
            Crop::Compound(c) => c.water_use,
        }
    }

    /// Nitrogen change in grams per sqft over one lifespan.
    pub fn delta_n(&self) -> f64 {
        match self {
            Crop::Base(c) => c.delta_n,
            Crop::Compound(c) => c.delta_n,
        }
    }

    /// Weeks a planting occupies its area.
    pub fn lifespan(&self) -> u32 {
        match self {
            Crop::Base(c) => c.lifespan,
            Crop::Compound(c) => c.lifespan,
        }
    }

    /// Whether the entry tolerates greywater irrigation.
    pub fn greywater_ok(&self) -> bool {
        match self {
            Crop::Base(c) => c.greywater_ok,
            Crop::Compound(c) => c.greywater_ok,
        }
    }

    /// Whether the entry is exempt from the latest-planting rule.
    pub fn is_cover_crop(&self) -> bool {
        match self {
            Crop::Base(c) => c.is_cover_crop,
            Crop::Compound(c) => c.is_cover_crop,
        }
    }

    /// Whether the entry is a synthesized compound.
    pub fn is_compound(&self) -> bool {
        matches!(self, Crop::Compound(_))
    }
}
