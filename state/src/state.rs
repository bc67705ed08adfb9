//! The long-lived state aggregate
//!
//! Built once at process start, populated by the login exchange, then mutated
//! by every response-handling pass. The whole aggregate serializes to a JSON
//! snapshot for crash resume; bulky game-data caches are skipped.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use rambler_protocol::{GlobalSettings, PlayerResponse};

use crate::inventory::Inventory;
use crate::map::MapSnapshot;

/// A position on the map
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Server-declared player profile, replaced wholesale on every GetPlayer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub username: String,
    pub team: i32,
    pub creation_timestamp_ms: u64,
    /// Experience credited by action responses between inventory syncs
    pub experience: i64,
    pub tutorial_state: Vec<i32>,
    pub max_pokemon_storage: i32,
    pub max_item_storage: i32,
    pub banned: bool,
    pub warned: bool,
}

impl Profile {
    /// Build a profile from a GetPlayer response, copying the envelope flags
    pub fn from_response(response: &PlayerResponse) -> Self {
        let data = &response.player_data;
        Self {
            username: data.username.clone(),
            team: data.team,
            creation_timestamp_ms: data.creation_timestamp_ms,
            experience: 0,
            tutorial_state: data.tutorial_state.clone(),
            max_pokemon_storage: data.max_pokemon_storage,
            max_item_storage: data.max_item_storage,
            banned: response.banned,
            warned: response.warn,
        }
    }

    /// Whether a tutorial step has been completed
    pub fn tutorial_done(&self, step: i32) -> bool {
        self.tutorial_state.contains(&step)
    }
}

/// A deferred action, consumed one at a time by the control loop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum TodoEntry {
    LevelUp,
    ReleasePokemon { ids: Vec<u64> },
    EvolvePokemon { id: u64 },
    DropItems { item_id: i32, count: i32 },
}

/// Protocol bookkeeping shared across batches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiState {
    /// Last inventory sync stamp, echoed back on every GetInventory
    pub inventory_timestamp: u64,
    /// Last settings hash, echoed back on every DownloadSettings
    pub settings_hash: String,
    pub item_templates_timestamp: u64,
    pub asset_digest_timestamp: u64,
    /// Floor between two map refreshes, derived from download settings
    pub map_refresh_min_delay_ms: u64,
    pub last_map_refresh_ms: Option<u64>,
    pub last_map_position: Option<LatLng>,
    /// Game master cache; not part of the snapshot
    #[serde(skip)]
    pub item_templates: Vec<Value>,
    /// Asset digest cache; not part of the snapshot
    #[serde(skip)]
    pub asset_digest: Vec<Value>,
}

/// The process-wide aggregate every handler funnels through.
///
/// `player`, `inventory`, and `map` stay `None` until the first response of
/// the matching kind arrives; handlers for other kinds must tolerate that.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub position: LatLng,
    pub player: Option<Profile>,
    pub inventory: Option<Inventory>,
    pub map: Option<MapSnapshot>,
    pub download_settings: Option<GlobalSettings>,
    pub api: ApiState,
    pub todo: VecDeque<TodoEntry>,
    /// Encounter ids already handled this session
    pub encountered: Vec<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_response() {
        let response = PlayerResponse {
            player_data: rambler_protocol::PlayerData {
                username: "trainer".to_string(),
                tutorial_state: vec![0, 1],
                ..Default::default()
            },
            banned: false,
            warn: true,
        };

        let profile = Profile::from_response(&response);

        assert_eq!(profile.username, "trainer");
        assert!(profile.warned);
        assert!(!profile.banned);
        assert!(profile.tutorial_done(0));
        assert!(!profile.tutorial_done(7));
    }

    #[test]
    fn test_todo_serializes_with_call_tag() {
        let text = serde_json::to_string(&TodoEntry::LevelUp).unwrap();
        assert_eq!(text, r#"{"call":"level_up"}"#);

        let entry: TodoEntry = serde_json::from_str(r#"{"call":"drop_items","item_id":1,"count":5}"#).unwrap();
        assert_eq!(
            entry,
            TodoEntry::DropItems {
                item_id: 1,
                count: 5
            }
        );
    }

    #[test]
    fn test_snapshot_round_trip_skips_caches() {
        let mut state = State::default();
        state.api.inventory_timestamp = 99;
        state.api.item_templates = vec![serde_json::json!({"huge": "blob"})];
        state.todo.push_back(TodoEntry::LevelUp);

        let text = serde_json::to_string(&state).unwrap();
        let back: State = serde_json::from_str(&text).unwrap();

        assert_eq!(back.api.inventory_timestamp, 99);
        assert_eq!(back.todo, state.todo);
        assert!(back.api.item_templates.is_empty());
    }
}
