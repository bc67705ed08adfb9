//! Supplementary trailer payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::inventory::PokemonData;

/// GET_HATCHED_EGGS response; parallel arrays, one entry per hatch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HatchedEggsResponse {
    pub success: bool,
    pub pokemon_id: Vec<u64>,
    pub experience_awarded: Vec<i32>,
    pub candy_awarded: Vec<i32>,
    pub stardust_awarded: Vec<i32>,
    pub egg_km_walked: Vec<f64>,
    pub hatched_pokemon: Vec<PokemonData>,
}

impl HatchedEggsResponse {
    /// True when nothing hatched since the last check
    pub fn is_empty(&self) -> bool {
        self.pokemon_id.is_empty()
            && self.experience_awarded.is_empty()
            && self.candy_awarded.is_empty()
            && self.stardust_awarded.is_empty()
            && self.egg_km_walked.is_empty()
            && self.hatched_pokemon.is_empty()
    }
}

/// CHECK_AWARDED_BADGES response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwardedBadgesResponse {
    pub success: bool,
    pub awarded_badges: Vec<i32>,
    pub awarded_badge_levels: Vec<i32>,
}

/// GET_BUDDY_WALKED response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuddyWalkedResponse {
    pub success: bool,
    pub family_candy_id: i32,
    pub candy_earned_count: i32,
}

/// GET_INBOX response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxResponse {
    pub inbox: Inbox,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inbox {
    pub notifications: Vec<Value>,
}

/// CHECK_CHALLENGE response. A raised `show_challenge` interrupts the whole
/// session until the challenge URL is resolved out-of-band.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckChallengeResponse {
    pub show_challenge: bool,
    pub challenge_url: String,
}

/// VERIFY_CHALLENGE response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifyChallengeResponse {
    pub success: bool,
}
