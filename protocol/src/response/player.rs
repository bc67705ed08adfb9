//! Player profile and tutorial payloads

use serde::{Deserialize, Serialize};

use super::inventory::PokemonData;

/// GET_PLAYER response; ban and warning flags ride on the envelope,
/// not inside the profile data
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerResponse {
    pub player_data: PlayerData,
    pub banned: bool,
    pub warn: bool,
}

/// The server-declared profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerData {
    pub creation_timestamp_ms: u64,
    pub username: String,
    pub team: i32,
    /// Tutorial steps already completed, as server-side step numbers
    pub tutorial_state: Vec<i32>,
    pub max_pokemon_storage: i32,
    pub max_item_storage: i32,
}

/// GET_PLAYER_PROFILE response, informational only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfileResponse {
    pub start_time: u64,
    pub badges: Vec<serde_json::Value>,
}

/// MARK_TUTORIAL_COMPLETE response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkTutorialCompleteResponse {
    pub success: bool,
}

/// SET_AVATAR response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SetAvatarResponse {
    pub status: i32,
}

/// CLAIM_CODENAME response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimCodenameResponse {
    pub status: i32,
    pub codename: String,
}

/// ENCOUNTER_TUTORIAL_COMPLETE response: the starter pokemon arrives inline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTutorialCompleteResponse {
    pub result: i32,
    pub pokemon_data: Option<PokemonData>,
}
