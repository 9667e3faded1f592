//! Garden planting scheduler.
//!
//! Plans a multi-week planting schedule for a fixed-area garden,
//! maximizing food yield under land, water, nitrogen, crop-lifespan, and
//! per-crop yield-target constraints. The heart of the crate is the
//! scheduling-model builder: it expands the crop catalog with synthetic
//! companion-planting compounds, then translates catalog plus garden
//! parameters into a linear program over weekly planted area.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `BaseCrop`, `CompoundCrop`, `Crop`,
//!   `CropCatalog`, `GardenPlan`, `YieldTarget`
//! - **`validation`**: Input integrity checks (duplicate names, zero
//!   lifespans, self-companionship, dangling references)
//! - **`lp`**: Linear-program primitives: variables, expressions, named
//!   constraints, the model object handed to the solver
//! - **`builder`**: Model assembly: variables, objective, and the land /
//!   water / yield-target / harvestability / nitrogen constraint set
//! - **`solve`**: Solver boundary (`good_lp` with the pure-Rust backend)
//! - **`report`**: Post-solve evaluation into weekly plant/harvest actions
//! - **`planner`**: Orchestration and the rainwater sensitivity scenario
//!
//! # Architecture
//!
//! Model construction is pure, synchronous, and deterministic: the builder
//! borrows an immutable catalog and garden value and emits a fresh model.
//! Scenario runs derive modified parameter copies instead of mutating
//! shared state. Only `solve` touches the LP engine.
//!
//! # References
//!
//! - Williams (2013), "Model Building in Mathematical Programming"
//! - Winston (2004), "Operations Research: Applications and Algorithms"
//! - Riotte (1975), "Carrots Love Tomatoes: Secrets of Companion Planting"

pub mod builder;
pub mod lp;
pub mod models;
pub mod planner;
pub mod report;
pub mod solve;
pub mod validation;
