use thiserror::Error;

pub mod request;
pub mod response;

pub use request::{Batch, Platform, PlayerAvatar, RpcRequest};
pub use response::{ResponseEnvelope, ResponseKind};
pub use response::actions::{
    CaptureAward, CatchPokemonResponse, CatchStatus, EncounterResponse, EncounterStatus,
    EvolvePokemonResponse, FortSearchResponse, FortSearchResult, LevelUpRewardsResponse,
    RecycleItemResponse, ReleasePokemonResponse, UseIncubatorResponse, UseIncubatorResult,
};
pub use response::config::{
    AssetDigestResponse, AssetDownloadUrl, DownloadSettingsResponse, DownloadUrlsResponse,
    FortSettings, GlobalSettings, ItemTemplatesResponse, MapSettings, RemoteConfigResponse,
};
pub use response::inventory::{
    AwardedItem, EggIncubator, FamilyCandy, InventoryEntry, InventoryPayload, InventoryResponse,
    ItemStack, PlayerStats, PokemonData,
};
pub use response::map::{
    FortData, FortType, MapCell, MapObjectsResponse, MapPokemon, NearbyPokemon, WildPokemon,
};
pub use response::misc::{
    AwardedBadgesResponse, BuddyWalkedResponse, CheckChallengeResponse, HatchedEggsResponse,
    Inbox, InboxResponse, VerifyChallengeResponse,
};
pub use response::player::{
    ClaimCodenameResponse, EncounterTutorialCompleteResponse, MarkTutorialCompleteResponse,
    PlayerData, PlayerProfileResponse, PlayerResponse, SetAvatarResponse,
};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Invalid payload for {kind:?}: {source}")]
    InvalidPayload {
        kind: ResponseKind,
        source: serde_json::Error,
    },
}
