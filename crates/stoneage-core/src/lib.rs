//! Stone Age companion core library
//!
//! Pure calculators and reference-data lookups behind the companion tool:
//!
//! - [`rebirth`]: five-tier rebirth point (환포) engine
//! - [`hangul`]: case-insensitive and initial-consonant (초성) search
//! - [`pet`]: pet records, growth calculator and pet search
//! - [`catalog`]: pet / boarding / riding-image datasets
//!
//! plus the ambient pieces shared by the binaries: [`config`], [`obs`]
//! events and [`init_tracing`].

pub mod catalog;
pub mod config;
pub mod error;
pub mod hangul;
pub mod obs;
pub mod pet;
pub mod rebirth;
pub mod telemetry;

pub use catalog::{BoardingMap, BoardingView, Catalog, CharacterMap, RidingImage, RidingMap};
pub use config::CompanionConfig;
pub use error::{CompanionError, Result};
pub use hangul::{initial_consonant, initial_consonants, is_consonant_query, matches};
pub use pet::{
    calculate_pet_stats, search_pets, BaseStats, ElementStats, GrowthStats, PetGrowthResult,
    PetRecord, DEFAULT_SEARCH_LIMIT,
};
pub use rebirth::{
    available_points, compute, RebirthInputs, Stat, StatDecimal, StatInput, TierResult, BONUSES,
    MAX_LEVEL, MAX_REBIRTH, TIER_COUNT,
};
pub use telemetry::init_tracing;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
