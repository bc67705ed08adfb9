//! Response dispatch into shared state
//!
//! A batched call answers with an ordered list of responses. The
//! [`Synchronizer`] walks that list in order, matches each response on its
//! kind, and applies the matching state mutation. Per-call results that the
//! caller needs (spin cooldowns, catch outcomes, page offsets) are collected
//! into a [`CallInfo`] record.
//!
//! Order matters: trailers put the inventory sync before gameplay responses
//! in the same batch, and handlers like fort search rely on that.

use serde_json::Value;
use tracing::{debug, error, info, warn};

use rambler_protocol::{
    CatchStatus, EncounterStatus, FortSearchResult, PokemonData, ResponseEnvelope,
    UseIncubatorResult,
};

use crate::error::SyncError;
use crate::inventory::{assign_iv, Inventory, InventoryDelta};
use crate::map::MapSnapshot;
use crate::state::{LatLng, Profile, State, TodoEntry};
use crate::version::VersionGuard;

/// Fort search outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FortSearchInfo {
    pub result: FortSearchResult,
    pub cooldown_ms: u64,
}

/// Encounter outcome; the wild pokemon snapshot is surfaced untouched
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterInfo {
    pub status: EncounterStatus,
    pub pokemon: Option<PokemonData>,
    pub position: Option<LatLng>,
}

/// Catch outcome with summed awards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatchInfo {
    pub caught: bool,
    pub status: CatchStatus,
    pub pokemon_id: u64,
    pub capture_reason: i32,
    pub candy: i32,
    pub xp: i32,
}

/// One page of game master templates
#[derive(Debug, Clone, PartialEq)]
pub struct TemplatePage {
    pub success: bool,
    pub templates: Vec<Value>,
    pub timestamp_ms: u64,
    pub page_offset: i32,
}

/// One page of the asset digest
#[derive(Debug, Clone, PartialEq)]
pub struct DigestPage {
    pub success: bool,
    pub digest: Vec<Value>,
    pub timestamp_ms: u64,
    pub page_offset: i32,
}

/// Codename claim outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodenameInfo {
    pub status: i32,
    pub codename: String,
}

/// Release outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseInfo {
    pub result: i32,
    pub candy_awarded: i32,
}

/// Recycle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecycleInfo {
    pub result: i32,
    pub new_count: i32,
}

/// Per-call results surfaced to the caller.
///
/// Which fields are set depends on which response kinds were in the batch;
/// a fort-search caller reads `fort_search`, a catch caller reads `catch`.
/// Recoverable failures live here as result codes and are never errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallInfo {
    pub fort_search: Option<FortSearchInfo>,
    pub encounter: Option<EncounterInfo>,
    pub catch: Option<CatchInfo>,
    pub templates: Option<TemplatePage>,
    pub digest: Option<DigestPage>,
    pub download_urls: Option<Vec<String>>,
    pub level_up: Option<i32>,
    pub release: Option<ReleaseInfo>,
    pub recycle: Option<RecycleInfo>,
    pub evolve: Option<i32>,
    pub incubator: Option<UseIncubatorResult>,
    pub tutorial: Option<bool>,
    pub codename: Option<CodenameInfo>,
    pub challenge_verified: Option<bool>,
}

/// Owns the canonical [`State`] and is its only writer: every response
/// effect funnels through [`Synchronizer::parse`].
#[derive(Debug, Clone, Default)]
pub struct Synchronizer {
    guard: VersionGuard,
    pub state: State,
}

impl Synchronizer {
    /// Start with an empty state
    pub fn new(guard: VersionGuard) -> Self {
        Self {
            guard,
            state: State::default(),
        }
    }

    /// Resume from a persisted snapshot
    pub fn with_state(guard: VersionGuard, state: State) -> Self {
        Self { guard, state }
    }

    /// Process a batch of responses in order, mutating state and collecting
    /// per-call results.
    ///
    /// A fatal condition (ban, challenge, strict version violation) aborts
    /// the rest of the batch: a challenge invalidates everything after it.
    pub fn parse(&mut self, responses: &[ResponseEnvelope]) -> Result<CallInfo, SyncError> {
        let mut info = CallInfo::default();
        for response in responses {
            self.dispatch(response, &mut info)?;
        }
        Ok(info)
    }

    fn dispatch(
        &mut self,
        response: &ResponseEnvelope,
        info: &mut CallInfo,
    ) -> Result<(), SyncError> {
        match response {
            ResponseEnvelope::GetPlayer(r) => {
                self.state.player = Some(Profile::from_response(r));
                if r.banned {
                    return Err(SyncError::AccountBanned);
                }
                if r.warn {
                    error!("ban warning received");
                }
            }

            ResponseEnvelope::GetInventory(r) => {
                let delta = &r.inventory_delta;
                // sync timestamps only move forward
                if delta.new_timestamp_ms > self.state.api.inventory_timestamp {
                    self.state.api.inventory_timestamp = delta.new_timestamp_ms;
                }

                if self.state.inventory.is_none() {
                    self.state.inventory = Some(Inventory::from_entries(&delta.inventory_items));
                } else if !delta.inventory_items.is_empty() {
                    let split = InventoryDelta::split(&delta.inventory_items);
                    if let Some(inventory) = self.state.inventory.as_mut() {
                        if inventory.apply_delta(split) {
                            self.state.todo.push_back(TodoEntry::LevelUp);
                        }
                    }
                }

                if let Some(inventory) = self.state.inventory.as_mut() {
                    inventory.assign_ivs();
                }
            }

            ResponseEnvelope::DownloadSettings(r) => {
                self.state.api.settings_hash = r.hash.clone();
                if let Some(settings) = &r.settings {
                    self.guard.verify(&settings.minimum_client_version)?;
                    self.state.api.map_refresh_min_delay_ms =
                        (settings.map_settings.get_map_objects_min_refresh_seconds * 1000.0) as u64;
                    self.state.download_settings = Some(settings.clone());
                }
            }

            ResponseEnvelope::DownloadItemTemplates(r) => {
                if !r.item_templates.is_empty() {
                    info.templates = Some(TemplatePage {
                        success: r.success,
                        templates: r.item_templates.clone(),
                        timestamp_ms: r.timestamp_ms,
                        page_offset: r.page_offset,
                    });
                }
            }

            ResponseEnvelope::DownloadRemoteConfigVersion(r) => {
                self.state.api.item_templates_timestamp = r.item_templates_timestamp_ms;
                self.state.api.asset_digest_timestamp = r.asset_digest_timestamp_ms;
            }

            ResponseEnvelope::FortSearch(r) => {
                if r.result == FortSearchResult::Success {
                    if let Some(inventory) = self.state.inventory.as_mut() {
                        for award in &r.items_awarded {
                            inventory.credit_item(award.item_id, award.item_count);
                        }
                        if let Some(egg) = &r.pokemon_data_egg {
                            inventory.eggs.push(egg.clone());
                        }
                    }
                    if let Some(player) = self.state.player.as_mut() {
                        player.experience += r.experience_awarded;
                    }
                } else {
                    warn!("fort search returned {:?}", r.result);
                }
                info.fort_search = Some(FortSearchInfo {
                    result: r.result,
                    cooldown_ms: r.cooldown_complete_timestamp_ms,
                });
            }

            ResponseEnvelope::Encounter(r) => {
                info.encounter = Some(EncounterInfo {
                    status: r.status,
                    pokemon: r.wild_pokemon.as_ref().map(|w| w.pokemon_data.clone()),
                    position: r.wild_pokemon.as_ref().map(|w| LatLng {
                        lat: w.latitude,
                        lng: w.longitude,
                    }),
                });
            }

            ResponseEnvelope::CatchPokemon(r) => {
                if let Some(pokemon) = &r.pokemon_data {
                    // first-capture flow delivers the pokemon inline
                    if let Some(inventory) = self.state.inventory.as_mut() {
                        let mut pokemon = pokemon.clone();
                        assign_iv(&mut pokemon);
                        inventory.pokemon.push(pokemon);
                    }
                }
                info.catch = Some(CatchInfo {
                    caught: r.status == CatchStatus::CatchSuccess,
                    status: r.status,
                    pokemon_id: r.captured_pokemon_id,
                    capture_reason: r.capture_reason,
                    candy: r.capture_award.candy.iter().sum(),
                    xp: r.capture_award.xp.iter().sum(),
                });
            }

            ResponseEnvelope::GetMapObjects(r) => {
                self.state.map = Some(MapSnapshot::from_response(r));
            }

            ResponseEnvelope::GetPlayerProfile(_) => {
                // informational only
            }

            ResponseEnvelope::GetHatchedEggs(r) => {
                if !r.is_empty() {
                    let hatched = r.pokemon_id.len().max(r.hatched_pokemon.len());
                    info!("{} egg(s) hatched", hatched);
                }
            }

            ResponseEnvelope::MarkTutorialComplete(r) => {
                info.tutorial = Some(r.success);
            }

            ResponseEnvelope::SetAvatar(_) => {
                // acknowledged, nothing to track
            }

            ResponseEnvelope::ClaimCodename(r) => {
                info.codename = Some(CodenameInfo {
                    status: r.status,
                    codename: r.codename.clone(),
                });
            }

            ResponseEnvelope::EncounterTutorialComplete(r) => {
                if let Some(pokemon) = &r.pokemon_data {
                    if let Some(inventory) = self.state.inventory.as_mut() {
                        let mut pokemon = pokemon.clone();
                        assign_iv(&mut pokemon);
                        inventory.pokemon.push(pokemon);
                    }
                }
            }

            ResponseEnvelope::LevelUpRewards(r) => {
                // awarded items also arrive through the inventory delta;
                // only the result code is surfaced to avoid double credit
                info.level_up = Some(r.result);
            }

            ResponseEnvelope::CheckAwardedBadges(r) => {
                if !r.awarded_badges.is_empty() || !r.awarded_badge_levels.is_empty() {
                    debug!("{} badge(s) awarded", r.awarded_badges.len());
                }
            }

            ResponseEnvelope::GetBuddyWalked(r) => {
                if r.family_candy_id != 0 || r.candy_earned_count != 0 {
                    info!(
                        "buddy walked: family {} earned {} candy",
                        r.family_candy_id, r.candy_earned_count
                    );
                }
            }

            ResponseEnvelope::GetAssetDigest(r) => {
                if !r.digest.is_empty() {
                    info.digest = Some(DigestPage {
                        success: r.success,
                        digest: r.digest.clone(),
                        timestamp_ms: r.timestamp_ms,
                        page_offset: r.page_offset,
                    });
                }
            }

            ResponseEnvelope::GetDownloadUrls(r) => {
                info.download_urls = Some(r.download_urls.iter().map(|u| u.url.clone()).collect());
            }

            ResponseEnvelope::GetInbox(r) => {
                if !r.inbox.notifications.is_empty() {
                    debug!("{} inbox notification(s)", r.inbox.notifications.len());
                }
            }

            ResponseEnvelope::CheckChallenge(r) => {
                if r.show_challenge {
                    error!("challenge received: {}", r.challenge_url);
                    return Err(SyncError::ChallengeRequired {
                        url: r.challenge_url.clone(),
                    });
                }
            }

            ResponseEnvelope::ReleasePokemon(r) => {
                info.release = Some(ReleaseInfo {
                    result: r.result,
                    candy_awarded: r.candy_awarded,
                });
            }

            ResponseEnvelope::RecycleInventoryItem(r) => {
                info.recycle = Some(RecycleInfo {
                    result: r.result,
                    new_count: r.new_count,
                });
            }

            ResponseEnvelope::EvolvePokemon(r) => {
                info.evolve = Some(r.result);
            }

            ResponseEnvelope::UseItemEggIncubator(r) => {
                info.incubator = Some(r.result);
            }

            ResponseEnvelope::VerifyChallenge(r) => {
                info.challenge_verified = Some(r.success);
            }

            ResponseEnvelope::Unknown { request_type, body } => {
                warn!("unhandled response kind {}: {}", request_type, body);
            }
        }

        Ok(())
    }
}
