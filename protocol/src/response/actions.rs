//! Gameplay action payloads: spins, encounters, catches, and bag operations

use serde::{Deserialize, Serialize};

use super::inventory::{AwardedItem, EggIncubator, PokemonData};
use super::map::WildPokemon;

/// FORT_SEARCH result codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FortSearchResult {
    #[default]
    NoResultSet,
    Success,
    OutOfRange,
    InCooldownPeriod,
    InventoryFull,
    ExceededDailyLimit,
    PoiInaccessible,
}

/// FORT_SEARCH response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortSearchResponse {
    pub result: FortSearchResult,
    pub items_awarded: Vec<AwardedItem>,
    /// Bonus egg, granted occasionally on a successful spin
    pub pokemon_data_egg: Option<PokemonData>,
    pub experience_awarded: i64,
    pub cooldown_complete_timestamp_ms: u64,
}

/// ENCOUNTER status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncounterStatus {
    #[default]
    EncounterError,
    EncounterSuccess,
    EncounterNotFound,
    EncounterClosed,
    EncounterPokemonFled,
    EncounterNotInRange,
    EncounterAlreadyHappened,
    PokemonInventoryFull,
}

/// ENCOUNTER response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterResponse {
    pub status: EncounterStatus,
    pub wild_pokemon: Option<WildPokemon>,
}

/// CATCH_POKEMON status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatchStatus {
    #[default]
    CatchError,
    CatchSuccess,
    CatchEscape,
    CatchFlee,
    CatchMissed,
}

/// Per-throw award arrays; one entry per bonus source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureAward {
    pub xp: Vec<i32>,
    pub candy: Vec<i32>,
    pub stardust: Vec<i32>,
}

/// CATCH_POKEMON response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchPokemonResponse {
    pub status: CatchStatus,
    pub captured_pokemon_id: u64,
    pub capture_award: CaptureAward,
    pub capture_reason: i32,
    /// Only present on tutorial/first captures
    pub pokemon_data: Option<PokemonData>,
}

/// LEVEL_UP_REWARDS response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpRewardsResponse {
    pub result: i32,
    pub items_awarded: Vec<AwardedItem>,
}

/// RELEASE_POKEMON response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleasePokemonResponse {
    pub result: i32,
    pub candy_awarded: i32,
}

/// RECYCLE_INVENTORY_ITEM response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecycleItemResponse {
    pub result: i32,
    pub new_count: i32,
}

/// EVOLVE_POKEMON response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolvePokemonResponse {
    pub result: i32,
    pub evolved_pokemon_data: Option<PokemonData>,
}

/// USE_ITEM_EGG_INCUBATOR result codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UseIncubatorResult {
    #[default]
    Unset,
    Success,
    ErrorIncubatorNotFound,
    ErrorPokemonEggNotFound,
    ErrorPokemonIdNotEgg,
    ErrorPokemonAlreadyIncubating,
    ErrorIncubatorAlreadyInUse,
}

/// USE_ITEM_EGG_INCUBATOR response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UseIncubatorResponse {
    pub result: UseIncubatorResult,
    pub egg_incubator: Option<EggIncubator>,
}
