//! Map refresh payloads

use serde::{Deserialize, Serialize};

use super::inventory::PokemonData;

/// GET_MAP_OBJECTS response: entities grouped by S2 cell
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapObjectsResponse {
    pub map_cells: Vec<MapCell>,
}

/// One S2 cell worth of nearby entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapCell {
    pub s2_cell_id: u64,
    pub current_timestamp_ms: u64,
    pub forts: Vec<FortData>,
    pub wild_pokemons: Vec<WildPokemon>,
    pub catchable_pokemons: Vec<MapPokemon>,
    pub nearby_pokemons: Vec<NearbyPokemon>,
}

/// Fort classification carried on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FortType {
    #[default]
    Gym,
    Pokestop,
}

impl FortType {
    /// Map the numeric wire discriminant (gym = 0, checkpoint = 1)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Gym),
            1 => Some(Self::Pokestop),
            _ => None,
        }
    }
}

/// A pokestop or gym on the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortData {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "type")]
    pub fort_type: FortType,
    pub enabled: bool,
    /// Zero when the fort can be spun again
    pub cooldown_complete_timestamp_ms: u64,
    pub guard_pokemon_id: i32,
}

/// A wild pokemon with full data, surfaced by encounters too
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WildPokemon {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pokemon_data: PokemonData,
    pub time_till_hidden_ms: i64,
}

/// A catchable pokemon as listed on the map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapPokemon {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub pokemon_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub expiration_timestamp_ms: u64,
}

/// A nearby pokemon, species and rough distance only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NearbyPokemon {
    pub pokemon_id: i32,
    pub distance_in_meters: f32,
    pub fort_id: String,
}
