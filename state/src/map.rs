//! Map snapshot and refresh policy
//!
//! Unlike the inventory, map data is never merged: every refresh replaces the
//! whole snapshot. The refresh cadence itself is server-tuned through
//! download settings and enforced as a pure function of stored timestamps.

use serde::{Deserialize, Serialize};

use rambler_protocol::{FortData, FortType, MapObjectsResponse, MapPokemon, NearbyPokemon, WildPokemon};

use crate::state::{LatLng, State};

/// Nearby entities from the last map refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSnapshot {
    pub pokestops: Vec<FortData>,
    pub gyms: Vec<FortData>,
    pub wild_pokemons: Vec<WildPokemon>,
    pub catchable_pokemons: Vec<MapPokemon>,
    pub nearby_pokemons: Vec<NearbyPokemon>,
}

/// Species common enough that a silently-limited account still sees them
const COMMON_SPECIES: [i32; 38] = [
    16, 19, 23, 27, 29, 32, 37, 41, 43, 46, 52, 54, 58, 60, 69, 72, 74, 77, 81, 90, 98, 118, 120,
    129, 155, 161, 165, 167, 177, 183, 187, 191, 194, 198, 209, 218, 220, 228,
];

impl MapSnapshot {
    /// Flatten the per-cell lists and classify forts by their type
    pub fn from_response(response: &MapObjectsResponse) -> Self {
        let mut snapshot = Self::default();
        for cell in &response.map_cells {
            for fort in &cell.forts {
                match fort.fort_type {
                    FortType::Pokestop => snapshot.pokestops.push(fort.clone()),
                    FortType::Gym => snapshot.gyms.push(fort.clone()),
                }
            }
            snapshot.wild_pokemons.extend(cell.wild_pokemons.iter().cloned());
            snapshot
                .catchable_pokemons
                .extend(cell.catchable_pokemons.iter().cloned());
            snapshot
                .nearby_pokemons
                .extend(cell.nearby_pokemons.iter().cloned());
        }
        snapshot
    }

    /// True when every visible spawn is a common species, the usual sign of
    /// a shadow-limited account. Meaningless on an empty snapshot.
    pub fn only_common_spawns(&self) -> bool {
        self.catchable_pokemons
            .iter()
            .map(|p| p.pokemon_id)
            .chain(self.nearby_pokemons.iter().map(|p| p.pokemon_id))
            .all(|id| COMMON_SPECIES.contains(&id))
    }
}

/// Great-circle distance in meters
pub fn distance_m(a: LatLng, b: LatLng) -> f64 {
    const EARTH_RADIUS_M: f64 = 6_371_000.0;

    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

impl State {
    /// Whether a map refresh is due at `now_ms`.
    ///
    /// The max refresh interval forces one; past the min interval a refresh
    /// is allowed once the player moved the minimum distance. Before any
    /// refresh happened at all, the answer is always yes.
    pub fn should_refresh_map(&self, now_ms: u64) -> bool {
        let Some(last) = self.api.last_map_refresh_ms else {
            return true;
        };
        let Some(settings) = &self.download_settings else {
            return false;
        };

        let map = &settings.map_settings;
        let elapsed_s = now_ms.saturating_sub(last) as f64 / 1000.0;

        if elapsed_s >= map.get_map_objects_max_refresh_seconds {
            return true;
        }
        if elapsed_s >= map.get_map_objects_min_refresh_seconds {
            if let Some(previous) = self.api.last_map_position {
                return distance_m(previous, self.position)
                    > map.get_map_objects_min_distance_meters;
            }
        }
        false
    }
}
