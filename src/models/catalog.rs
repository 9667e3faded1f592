//! Crop catalog: companion expansion and yield attribution.
//!
//! The catalog owns the full set of plantable entries: the operator's base
//! crops followed by one synthesized [`CompoundCrop`] per declared
//! (crop, companion) pair. Expansion happens once at construction; the
//! catalog is immutable afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BaseCrop, CompoundCrop, Crop};

/// Synthesizes compound entries for every declared companion pair.
///
/// Companionship is directional: `A` listing `B` produces `"A-B"`, and `B`
/// listing `A` separately produces `"B-A"`. The two are never merged, even
/// when their derived attributes coincide. Companion names that match no
/// base crop are skipped here; validation reports them upstream.
///
/// Pairs are emitted in catalog order: outer loop over declaring crops,
/// inner loop over the base list.
pub fn expand_companions(base: &[BaseCrop]) -> Vec<CompoundCrop> {
    let mut compounds = Vec::new();
    for crop in base {
        for companion in base
            .iter()
            .filter(|c| crop.companions.iter().any(|n| n == &c.name))
        {
            compounds.push(CompoundCrop::from_pair(crop, companion));
        }
    }
    compounds
}

/// The full set of plantable entries for one garden.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCatalog {
    crops: Vec<Crop>,
}

impl CropCatalog {
    /// Builds the catalog from validated base crops, appending the
    /// synthesized compound entries.
    pub fn new(base: Vec<BaseCrop>) -> Self {
        let compounds = expand_companions(&base);
        let mut crops: Vec<Crop> = base.into_iter().map(Crop::Base).collect();
        crops.extend(compounds.into_iter().map(Crop::Compound));
        Self { crops }
    }

    /// All entries in catalog order (base crops first).
    pub fn crops(&self) -> &[Crop] {
        &self.crops
    }

    /// Number of entries, compounds included.
    pub fn len(&self) -> usize {
        self.crops.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Looks up an entry by name (first match in catalog order).
    pub fn get(&self, name: &str) -> Option<&Crop> {
        self.crops.iter().find(|c| c.name() == name)
    }

    /// Entries that tolerate greywater irrigation.
    pub fn greywater_crops(&self) -> impl Iterator<Item = &Crop> {
        self.crops.iter().filter(|c| c.greywater_ok())
    }

    /// Names of the base (non-compound) crops.
    pub fn base_names(&self) -> Vec<&str> {
        self.crops
            .iter()
            .filter(|c| !c.is_compound())
            .map(Crop::name)
            .collect()
    }

    /// Per-entry yield credited toward `target`, keyed by entry name.
    ///
    /// A base entry contributes its full yield when its name matches. A
    /// compound entry contributes `plant_1_yield` when its first component
    /// matches, otherwise `plant_2_yield` when its second does, never both.
    /// Entries that do not involve the target are omitted.
    pub fn attributed_yields(&self, target: &str) -> HashMap<String, f64> {
        let mut yields = HashMap::new();
        for crop in &self.crops {
            match crop {
                Crop::Base(c) if c.name == target => {
                    yields.insert(c.name.clone(), c.yield_per_sqft);
                }
                Crop::Compound(c) if c.plant_1_name == target => {
                    yields.insert(c.name.clone(), c.plant_1_yield);
                }
                Crop::Compound(c) if c.plant_2_name == target => {
                    yields.insert(c.name.clone(), c.plant_2_yield);
                }
                _ => {}
            }
        }
        yields
    }
}
