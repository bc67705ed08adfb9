//! Decoded response types
//!
//! Every response carries an explicit request-kind discriminant. Handlers
//! match on [`ResponseEnvelope`] variants; field-presence sniffing is never
//! used to tell two kinds apart.


pub mod actions;
pub mod config;
pub mod inventory;
pub mod map;
pub mod misc;
pub mod player;

use anyhow::Result;
use serde_json::Value;

use crate::DecodeError;
use actions::{
    CatchPokemonResponse, EncounterResponse, EvolvePokemonResponse, FortSearchResponse,
    LevelUpRewardsResponse, RecycleItemResponse, ReleasePokemonResponse, UseIncubatorResponse,
};
use config::{
    AssetDigestResponse, DownloadSettingsResponse, DownloadUrlsResponse, ItemTemplatesResponse,
    RemoteConfigResponse,
};
use inventory::InventoryResponse;
use map::MapObjectsResponse;
use misc::{
    AwardedBadgesResponse, BuddyWalkedResponse, CheckChallengeResponse, HatchedEggsResponse,
    InboxResponse, VerifyChallengeResponse,
};
use player::{
    ClaimCodenameResponse, EncounterTutorialCompleteResponse, MarkTutorialCompleteResponse,
    PlayerProfileResponse, PlayerResponse, SetAvatarResponse,
};

/// Request kinds the agent understands, with their wire request-type codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    GetPlayer,
    GetInventory,
    DownloadSettings,
    DownloadItemTemplates,
    DownloadRemoteConfigVersion,
    FortSearch,
    Encounter,
    CatchPokemon,
    GetMapObjects,
    ReleasePokemon,
    GetPlayerProfile,
    EvolvePokemon,
    GetHatchedEggs,
    EncounterTutorialComplete,
    LevelUpRewards,
    CheckAwardedBadges,
    RecycleInventoryItem,
    UseItemEggIncubator,
    GetBuddyWalked,
    GetAssetDigest,
    GetDownloadUrls,
    ClaimCodename,
    SetAvatar,
    MarkTutorialComplete,
    CheckChallenge,
    VerifyChallenge,
    GetInbox,
}

impl ResponseKind {
    /// Map a wire request-type code onto a kind
    pub fn from_code(code: i32) -> Option<Self> {
        let kind = match code {
            2 => Self::GetPlayer,
            4 => Self::GetInventory,
            5 => Self::DownloadSettings,
            6 => Self::DownloadItemTemplates,
            7 => Self::DownloadRemoteConfigVersion,
            101 => Self::FortSearch,
            102 => Self::Encounter,
            103 => Self::CatchPokemon,
            106 => Self::GetMapObjects,
            112 => Self::ReleasePokemon,
            121 => Self::GetPlayerProfile,
            125 => Self::EvolvePokemon,
            126 => Self::GetHatchedEggs,
            127 => Self::EncounterTutorialComplete,
            128 => Self::LevelUpRewards,
            129 => Self::CheckAwardedBadges,
            137 => Self::RecycleInventoryItem,
            140 => Self::UseItemEggIncubator,
            153 => Self::GetBuddyWalked,
            300 => Self::GetAssetDigest,
            301 => Self::GetDownloadUrls,
            403 => Self::ClaimCodename,
            404 => Self::SetAvatar,
            406 => Self::MarkTutorialComplete,
            600 => Self::CheckChallenge,
            601 => Self::VerifyChallenge,
            1405 => Self::GetInbox,
            _ => return None,
        };
        Some(kind)
    }

    /// The wire request-type code for this kind
    pub fn code(&self) -> i32 {
        match self {
            Self::GetPlayer => 2,
            Self::GetInventory => 4,
            Self::DownloadSettings => 5,
            Self::DownloadItemTemplates => 6,
            Self::DownloadRemoteConfigVersion => 7,
            Self::FortSearch => 101,
            Self::Encounter => 102,
            Self::CatchPokemon => 103,
            Self::GetMapObjects => 106,
            Self::ReleasePokemon => 112,
            Self::GetPlayerProfile => 121,
            Self::EvolvePokemon => 125,
            Self::GetHatchedEggs => 126,
            Self::EncounterTutorialComplete => 127,
            Self::LevelUpRewards => 128,
            Self::CheckAwardedBadges => 129,
            Self::RecycleInventoryItem => 137,
            Self::UseItemEggIncubator => 140,
            Self::GetBuddyWalked => 153,
            Self::GetAssetDigest => 300,
            Self::GetDownloadUrls => 301,
            Self::ClaimCodename => 403,
            Self::SetAvatar => 404,
            Self::MarkTutorialComplete => 406,
            Self::CheckChallenge => 600,
            Self::VerifyChallenge => 601,
            Self::GetInbox => 1405,
        }
    }
}

/// One decoded response from a batched call
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    GetPlayer(PlayerResponse),
    GetInventory(InventoryResponse),
    DownloadSettings(DownloadSettingsResponse),
    DownloadItemTemplates(ItemTemplatesResponse),
    DownloadRemoteConfigVersion(RemoteConfigResponse),
    FortSearch(FortSearchResponse),
    Encounter(EncounterResponse),
    CatchPokemon(CatchPokemonResponse),
    GetMapObjects(MapObjectsResponse),
    ReleasePokemon(ReleasePokemonResponse),
    GetPlayerProfile(PlayerProfileResponse),
    EvolvePokemon(EvolvePokemonResponse),
    GetHatchedEggs(HatchedEggsResponse),
    EncounterTutorialComplete(EncounterTutorialCompleteResponse),
    LevelUpRewards(LevelUpRewardsResponse),
    CheckAwardedBadges(AwardedBadgesResponse),
    RecycleInventoryItem(RecycleItemResponse),
    UseItemEggIncubator(UseIncubatorResponse),
    GetBuddyWalked(BuddyWalkedResponse),
    GetAssetDigest(AssetDigestResponse),
    GetDownloadUrls(DownloadUrlsResponse),
    ClaimCodename(ClaimCodenameResponse),
    SetAvatar(SetAvatarResponse),
    MarkTutorialComplete(MarkTutorialCompleteResponse),
    CheckChallenge(CheckChallengeResponse),
    VerifyChallenge(VerifyChallengeResponse),
    GetInbox(InboxResponse),

    /// A kind this build does not understand. Preserved for diagnostics,
    /// never treated as a successful no-op.
    Unknown { request_type: i32, body: Value },
}

impl ResponseEnvelope {
    /// The kind of this response, if recognized
    pub fn kind(&self) -> Option<ResponseKind> {
        let kind = match self {
            Self::GetPlayer(_) => ResponseKind::GetPlayer,
            Self::GetInventory(_) => ResponseKind::GetInventory,
            Self::DownloadSettings(_) => ResponseKind::DownloadSettings,
            Self::DownloadItemTemplates(_) => ResponseKind::DownloadItemTemplates,
            Self::DownloadRemoteConfigVersion(_) => ResponseKind::DownloadRemoteConfigVersion,
            Self::FortSearch(_) => ResponseKind::FortSearch,
            Self::Encounter(_) => ResponseKind::Encounter,
            Self::CatchPokemon(_) => ResponseKind::CatchPokemon,
            Self::GetMapObjects(_) => ResponseKind::GetMapObjects,
            Self::ReleasePokemon(_) => ResponseKind::ReleasePokemon,
            Self::GetPlayerProfile(_) => ResponseKind::GetPlayerProfile,
            Self::EvolvePokemon(_) => ResponseKind::EvolvePokemon,
            Self::GetHatchedEggs(_) => ResponseKind::GetHatchedEggs,
            Self::EncounterTutorialComplete(_) => ResponseKind::EncounterTutorialComplete,
            Self::LevelUpRewards(_) => ResponseKind::LevelUpRewards,
            Self::CheckAwardedBadges(_) => ResponseKind::CheckAwardedBadges,
            Self::RecycleInventoryItem(_) => ResponseKind::RecycleInventoryItem,
            Self::UseItemEggIncubator(_) => ResponseKind::UseItemEggIncubator,
            Self::GetBuddyWalked(_) => ResponseKind::GetBuddyWalked,
            Self::GetAssetDigest(_) => ResponseKind::GetAssetDigest,
            Self::GetDownloadUrls(_) => ResponseKind::GetDownloadUrls,
            Self::ClaimCodename(_) => ResponseKind::ClaimCodename,
            Self::SetAvatar(_) => ResponseKind::SetAvatar,
            Self::MarkTutorialComplete(_) => ResponseKind::MarkTutorialComplete,
            Self::CheckChallenge(_) => ResponseKind::CheckChallenge,
            Self::VerifyChallenge(_) => ResponseKind::VerifyChallenge,
            Self::GetInbox(_) => ResponseKind::GetInbox,
            Self::Unknown { .. } => return None,
        };
        Some(kind)
    }

    /// Decode a raw response body by its wire request-type code.
    ///
    /// The discriminant is resolved once, here. Codes this build does not
    /// know land in [`ResponseEnvelope::Unknown`] so the dispatcher can
    /// report them.
    pub fn decode(request_type: i32, body: Value) -> Result<Self> {
        let Some(kind) = ResponseKind::from_code(request_type) else {
            return Ok(Self::Unknown { request_type, body });
        };

        fn payload<T: serde::de::DeserializeOwned>(kind: ResponseKind, body: Value) -> Result<T> {
            serde_json::from_value(body)
                .map_err(|source| DecodeError::InvalidPayload { kind, source }.into())
        }

        let envelope = match kind {
            ResponseKind::GetPlayer => Self::GetPlayer(payload(kind, body)?),
            ResponseKind::GetInventory => Self::GetInventory(payload(kind, body)?),
            ResponseKind::DownloadSettings => Self::DownloadSettings(payload(kind, body)?),
            ResponseKind::DownloadItemTemplates => Self::DownloadItemTemplates(payload(kind, body)?),
            ResponseKind::DownloadRemoteConfigVersion => {
                Self::DownloadRemoteConfigVersion(payload(kind, body)?)
            }
            ResponseKind::FortSearch => Self::FortSearch(payload(kind, body)?),
            ResponseKind::Encounter => Self::Encounter(payload(kind, body)?),
            ResponseKind::CatchPokemon => Self::CatchPokemon(payload(kind, body)?),
            ResponseKind::GetMapObjects => Self::GetMapObjects(payload(kind, body)?),
            ResponseKind::ReleasePokemon => Self::ReleasePokemon(payload(kind, body)?),
            ResponseKind::GetPlayerProfile => Self::GetPlayerProfile(payload(kind, body)?),
            ResponseKind::EvolvePokemon => Self::EvolvePokemon(payload(kind, body)?),
            ResponseKind::GetHatchedEggs => Self::GetHatchedEggs(payload(kind, body)?),
            ResponseKind::EncounterTutorialComplete => {
                Self::EncounterTutorialComplete(payload(kind, body)?)
            }
            ResponseKind::LevelUpRewards => Self::LevelUpRewards(payload(kind, body)?),
            ResponseKind::CheckAwardedBadges => Self::CheckAwardedBadges(payload(kind, body)?),
            ResponseKind::RecycleInventoryItem => Self::RecycleInventoryItem(payload(kind, body)?),
            ResponseKind::UseItemEggIncubator => Self::UseItemEggIncubator(payload(kind, body)?),
            ResponseKind::GetBuddyWalked => Self::GetBuddyWalked(payload(kind, body)?),
            ResponseKind::GetAssetDigest => Self::GetAssetDigest(payload(kind, body)?),
            ResponseKind::GetDownloadUrls => Self::GetDownloadUrls(payload(kind, body)?),
            ResponseKind::ClaimCodename => Self::ClaimCodename(payload(kind, body)?),
            ResponseKind::SetAvatar => Self::SetAvatar(payload(kind, body)?),
            ResponseKind::MarkTutorialComplete => Self::MarkTutorialComplete(payload(kind, body)?),
            ResponseKind::CheckChallenge => Self::CheckChallenge(payload(kind, body)?),
            ResponseKind::VerifyChallenge => Self::VerifyChallenge(payload(kind, body)?),
            ResponseKind::GetInbox => Self::GetInbox(payload(kind, body)?),
        };
        Ok(envelope)
    }
}
