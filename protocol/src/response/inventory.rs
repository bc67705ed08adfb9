//! Inventory sync payloads
//!
//! The server never resends the whole inventory: each sync carries a delta of
//! typed entries plus markers for removed pokemon. Entries are a proper
//! discriminated union here, one variant per embedded data kind.

use serde::{Deserialize, Serialize};

/// GET_INVENTORY response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryResponse {
    pub inventory_delta: InventoryPayload,
}

/// The incremental sync payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryPayload {
    pub original_timestamp_ms: u64,
    pub new_timestamp_ms: u64,
    pub inventory_items: Vec<InventoryEntry>,
}

/// One typed entry of an inventory delta
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryEntry {
    Pokemon(PokemonData),
    Item(ItemStack),
    PlayerStats(PlayerStats),
    EggIncubators(Vec<EggIncubator>),
    Candy(FamilyCandy),
    /// Marker for a pokemon the server removed (released, evolved away)
    RemovedPokemon(u64),
}

/// An owned pokemon or egg
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PokemonData {
    pub id: u64,
    /// Species number
    pub pokemon_id: i32,
    pub cp: i32,
    pub stamina: i32,
    pub stamina_max: i32,
    pub individual_attack: i32,
    pub individual_defense: i32,
    pub individual_stamina: i32,
    pub is_egg: bool,
    pub egg_km_walked_target: f64,
    /// Empty when the egg is not incubating
    pub egg_incubator_id: String,
    pub creation_time_ms: u64,
    /// Derived roll quality (0-100), stamped at ingestion time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<u8>,
}

/// A stack of bag items, keyed by item type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemStack {
    pub item_id: i32,
    pub count: i32,
    pub unseen: bool,
}

/// Inventory-embedded player stats, distinct from the profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    pub level: i32,
    pub experience: i64,
    pub prev_level_xp: i64,
    pub next_level_xp: i64,
    pub km_walked: f64,
    pub pokemons_encountered: i32,
    pub pokemons_captured: i32,
    pub poke_stop_visits: i32,
    pub pokeballs_thrown: i32,
    pub eggs_hatched: i32,
}

/// An egg incubator, free when `pokemon_id` is zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EggIncubator {
    pub id: String,
    pub item_id: i32,
    pub incubator_type: i32,
    pub pokemon_id: u64,
    pub start_km_walked: f64,
    pub target_km_walked: f64,
    pub uses_remaining: i32,
}

/// Candy balance for one species family
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyCandy {
    pub family_id: i32,
    pub candy: i32,
}

/// An item credit attached to a fort search or level-up response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardedItem {
    pub item_id: i32,
    pub item_count: i32,
}
