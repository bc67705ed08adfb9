//! Outgoing request composition
//!
//! Gameplay calls are never sent alone: callers queue named operations into an
//! ordered [`Batch`] which the transport layer signs, encodes, and submits as a
//! single envelope. Responses come back in queue order.

use serde::{Deserialize, Serialize};

use crate::response::ResponseKind;

/// Device platform reported to the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    #[default]
    Ios,
    Android,
}

/// Avatar customization sent during the tutorial
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerAvatar {
    pub skin: i32,
    pub hair: String,
    pub shirt: String,
    pub pants: String,
    pub hat: String,
    pub shoes: String,
    pub eyes: String,
    pub backpack: String,
}

/// A single named RPC operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RpcRequest {
    /// Fetch the player profile for the given locale
    GetPlayer {
        country: String,
        language: String,
        timezone: String,
    },

    /// Fetch extended profile data (badges, start date)
    GetPlayerProfile,

    /// Sync inventory changes since the given server timestamp (0 = full sync)
    GetInventory { last_timestamp_ms: u64 },

    /// Fetch server settings; the hash short-circuits an unchanged payload
    DownloadSettings { hash: String },

    /// Check whether the game master or asset digest caches are stale
    DownloadRemoteConfigVersion { platform: Platform, app_version: u32 },

    /// Fetch one page of the game master item templates
    DownloadItemTemplates {
        paginate: bool,
        page_offset: i32,
        page_timestamp_ms: u64,
    },

    /// Fetch one page of the asset digest
    GetAssetDigest {
        platform: Platform,
        app_version: u32,
        paginate: bool,
        page_offset: i32,
        page_timestamp_ms: u64,
    },

    /// Resolve download URLs for the given asset ids
    GetDownloadUrls { asset_ids: Vec<String> },

    /// Spin a pokestop
    FortSearch {
        fort_id: String,
        latitude: f64,
        longitude: f64,
    },

    /// Start an encounter with a catchable pokemon
    Encounter {
        encounter_id: u64,
        spawn_point_id: String,
    },

    /// Throw a ball at an encountered pokemon
    CatchPokemon {
        encounter_id: u64,
        pokeball: i32,
        normalized_reticle_size: f64,
        spawn_point_id: String,
        hit_pokemon: bool,
        spin_modifier: f64,
        normalized_hit_position: f64,
    },

    /// Refresh nearby map entities for the given S2 cells
    GetMapObjects {
        cell_ids: Vec<u64>,
        since_timestamp_ms: Vec<u64>,
    },

    /// Claim the rewards for reaching the given level
    LevelUpRewards { level: i32 },

    /// Transfer pokemon to the professor
    ReleasePokemon { pokemon_ids: Vec<u64> },

    /// Evolve a pokemon
    EvolvePokemon { pokemon_id: u64 },

    /// Discard items from the bag
    RecycleInventoryItem { item_id: i32, count: i32 },

    /// Put an egg into an incubator
    UseItemEggIncubator {
        incubator_id: String,
        pokemon_id: u64,
    },

    /// Collect pokemon hatched since the last check
    GetHatchedEggs,

    /// Collect badges awarded since the last check
    CheckAwardedBadges,

    /// Collect candy earned by the buddy pokemon
    GetBuddyWalked,

    /// Fetch server-to-player notifications
    GetInbox {
        is_history: bool,
        is_reverse: bool,
        not_before_ms: u64,
    },

    /// Poll for a pending captcha challenge
    CheckChallenge,

    /// Submit a solved captcha token
    VerifyChallenge { token: String },

    /// Mark tutorial steps as completed
    MarkTutorialComplete {
        tutorials: Vec<i32>,
        send_marketing_emails: bool,
        send_push_notifications: bool,
    },

    /// Set the player avatar (tutorial step)
    SetAvatar { avatar: PlayerAvatar },

    /// Claim the player codename (tutorial step)
    ClaimCodename { codename: String },

    /// Catch the starter pokemon (tutorial step)
    EncounterTutorialComplete { pokemon_id: i32 },
}

impl RpcRequest {
    /// The response kind this operation answers with
    pub fn kind(&self) -> ResponseKind {
        match self {
            Self::GetPlayer { .. } => ResponseKind::GetPlayer,
            Self::GetPlayerProfile => ResponseKind::GetPlayerProfile,
            Self::GetInventory { .. } => ResponseKind::GetInventory,
            Self::DownloadSettings { .. } => ResponseKind::DownloadSettings,
            Self::DownloadRemoteConfigVersion { .. } => ResponseKind::DownloadRemoteConfigVersion,
            Self::DownloadItemTemplates { .. } => ResponseKind::DownloadItemTemplates,
            Self::GetAssetDigest { .. } => ResponseKind::GetAssetDigest,
            Self::GetDownloadUrls { .. } => ResponseKind::GetDownloadUrls,
            Self::FortSearch { .. } => ResponseKind::FortSearch,
            Self::Encounter { .. } => ResponseKind::Encounter,
            Self::CatchPokemon { .. } => ResponseKind::CatchPokemon,
            Self::GetMapObjects { .. } => ResponseKind::GetMapObjects,
            Self::LevelUpRewards { .. } => ResponseKind::LevelUpRewards,
            Self::ReleasePokemon { .. } => ResponseKind::ReleasePokemon,
            Self::EvolvePokemon { .. } => ResponseKind::EvolvePokemon,
            Self::RecycleInventoryItem { .. } => ResponseKind::RecycleInventoryItem,
            Self::UseItemEggIncubator { .. } => ResponseKind::UseItemEggIncubator,
            Self::GetHatchedEggs => ResponseKind::GetHatchedEggs,
            Self::CheckAwardedBadges => ResponseKind::CheckAwardedBadges,
            Self::GetBuddyWalked => ResponseKind::GetBuddyWalked,
            Self::GetInbox { .. } => ResponseKind::GetInbox,
            Self::CheckChallenge => ResponseKind::CheckChallenge,
            Self::VerifyChallenge { .. } => ResponseKind::VerifyChallenge,
            Self::MarkTutorialComplete { .. } => ResponseKind::MarkTutorialComplete,
            Self::SetAvatar { .. } => ResponseKind::SetAvatar,
            Self::ClaimCodename { .. } => ResponseKind::ClaimCodename,
            Self::EncounterTutorialComplete { .. } => ResponseKind::EncounterTutorialComplete,
        }
    }
}

/// An ordered batch of operations submitted as one envelope
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    requests: Vec<RpcRequest>,
}

impl Batch {
    /// Start an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an operation, chaining style
    pub fn queue(mut self, request: RpcRequest) -> Self {
        self.requests.push(request);
        self
    }

    /// Queue an operation in place
    pub fn push(&mut self, request: RpcRequest) {
        self.requests.push(request);
    }

    /// The queued operations, in submission order
    pub fn requests(&self) -> &[RpcRequest] {
        &self.requests
    }

    /// Response kinds expected back, in order
    pub fn expected_kinds(&self) -> Vec<ResponseKind> {
        self.requests.iter().map(RpcRequest::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = RpcRequest;
    type IntoIter = std::vec::IntoIter<RpcRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}
