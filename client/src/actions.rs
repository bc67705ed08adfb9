//! Opportunistic gameplay actions driven from the latest map snapshot

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info, warn};

use rambler_protocol::{
    Batch, EncounterStatus, FortData, FortSearchResult, PokemonData, RpcRequest,
    UseIncubatorResult,
};
use rambler_state::{LatLng, TodoEntry, TrailerOptions, distance_m};

use crate::{RpcClient, Session};

/// Ball item ids, plain to ultra
const POKE_BALLS: [i32; 4] = [1, 2, 3, 4];
/// Item id of the unlimited-use incubator
const INFINITE_INCUBATOR: i32 = 901;

/// A successfully started encounter
#[derive(Debug, Clone, PartialEq)]
pub struct EncounterTarget {
    pub encounter_id: u64,
    pub spawn_point_id: String,
    pub pokemon_id: i32,
}

struct ThrowParameters {
    ball: i32,
    reticle_size: f64,
    spin_modifier: f64,
    normalized_hit_position: f64,
}

impl<C: RpcClient> Session<C> {
    fn distance_to(&self, lat: f64, lng: f64) -> f64 {
        distance_m(self.sync.state.position, LatLng { lat, lng })
    }

    /// Pokestops not in cooldown and close enough to spin
    pub fn spinnable_pokestops(&self) -> Vec<FortData> {
        let Some(map) = &self.sync.state.map else {
            return Vec::new();
        };
        let Some(settings) = &self.sync.state.download_settings else {
            return Vec::new();
        };
        // stay a little inside the advertised range
        let range = settings.fort_settings.interaction_range_meters * 0.9;

        map.pokestops
            .iter()
            .filter(|stop| {
                stop.cooldown_complete_timestamp_ms == 0
                    && self.distance_to(stop.latitude, stop.longitude) < range
            })
            .cloned()
            .collect()
    }

    /// Spin every reachable pokestop, stamping the returned cooldown back
    /// onto the map snapshot. Returns how many spins succeeded.
    pub async fn spin_pokestops(&mut self) -> Result<u32> {
        let stops = self.spinnable_pokestops();
        let mut spun = 0;

        for stop in stops {
            debug!("spin {}", stop.id);
            let batch = Batch::new().queue(RpcRequest::FortSearch {
                fort_id: stop.id.clone(),
                latitude: stop.latitude,
                longitude: stop.longitude,
            });
            let info = self.execute(batch, TrailerOptions::default()).await?;

            let Some(search) = info.fort_search else {
                continue;
            };
            if search.result == FortSearchResult::Success {
                spun += 1;
                if let Some(map) = self.sync.state.map.as_mut() {
                    if let Some(visited) = map.pokestops.iter_mut().find(|p| p.id == stop.id) {
                        visited.cooldown_complete_timestamp_ms = search.cooldown_ms;
                    }
                }
            }
        }
        Ok(spun)
    }

    /// Encounter catchable pokemon in range, optionally throwing at them.
    /// Dedups against encounters already handled this session and caps the
    /// work per pass so a dense cell cannot stall the loop.
    pub async fn encounter_pokemons(&mut self, catch: bool) -> Result<Vec<EncounterTarget>> {
        let visible_range = self
            .sync
            .state
            .download_settings
            .as_ref()
            .map(|s| s.map_settings.pokemon_visible_range)
            .unwrap_or(0.0);

        let mut targets: Vec<EncounterTarget> = Vec::new();
        if let Some(map) = &self.sync.state.map {
            for pokemon in &map.catchable_pokemons {
                if targets.iter().any(|t| t.encounter_id == pokemon.encounter_id) {
                    continue;
                }
                if self.sync.state.encountered.contains(&pokemon.encounter_id) {
                    continue;
                }
                if self.distance_to(pokemon.latitude, pokemon.longitude) > visible_range {
                    continue;
                }
                targets.push(EncounterTarget {
                    encounter_id: pokemon.encounter_id,
                    spawn_point_id: pokemon.spawn_point_id.clone(),
                    pokemon_id: pokemon.pokemon_id,
                });
            }
        }
        targets.truncate(3);

        if targets.is_empty() {
            return Ok(Vec::new());
        }
        debug!("start encounters");

        let mut started = Vec::new();
        for target in targets {
            debug!("encounter {}", target.pokemon_id);
            let batch = Batch::new().queue(RpcRequest::Encounter {
                encounter_id: target.encounter_id,
                spawn_point_id: target.spawn_point_id.clone(),
            });
            let info = self.execute(batch, TrailerOptions::default()).await?;

            let Some(encounter) = info.encounter else {
                continue;
            };
            match encounter.status {
                EncounterStatus::PokemonInventoryFull => {
                    warn!("pokemon bag full");
                }
                EncounterStatus::EncounterSuccess => {
                    self.sync.state.encountered.push(target.encounter_id);
                    if catch {
                        let caught = self.catch_pokemon(&target).await?;
                        if let Some(pokemon) = caught {
                            self.release_if_outclassed(&pokemon);
                        }
                    }
                    started.push(target);
                }
                status => {
                    warn!("error while encountering pokemon: {:?}", status);
                }
            }
        }
        Ok(started)
    }

    /// Throw one ball at an encountered pokemon. Returns the caught pokemon
    /// as stored in the inventory, if the catch held.
    pub async fn catch_pokemon(&mut self, target: &EncounterTarget) -> Result<Option<PokemonData>> {
        let Some(throw) = self.throw_parameters() else {
            warn!("no pokeball left for catching");
            return Ok(None);
        };

        let batch = Batch::new().queue(RpcRequest::CatchPokemon {
            encounter_id: target.encounter_id,
            pokeball: throw.ball,
            normalized_reticle_size: throw.reticle_size,
            spawn_point_id: target.spawn_point_id.clone(),
            hit_pokemon: true,
            spin_modifier: throw.spin_modifier,
            normalized_hit_position: throw.normalized_hit_position,
        });
        let info = self.execute(batch, TrailerOptions::default()).await?;

        let Some(catch) = info.catch else {
            return Ok(None);
        };
        if catch.caught {
            let pokemon = self
                .sync
                .state
                .inventory
                .as_ref()
                .and_then(|inv| inv.pokemon.iter().find(|p| p.id == catch.pokemon_id))
                .cloned();
            if let Some(pokemon) = &pokemon {
                info!("pokemon caught: {}", pokemon.pokemon_id);
            }
            Ok(pokemon)
        } else {
            info!("pokemon missed ({:?})", catch.status);
            Ok(None)
        }
    }

    /// Queue a release when a strictly better twin is already in the bag
    pub fn release_if_outclassed(&mut self, pokemon: &PokemonData) {
        if !self.config.behavior.autorelease {
            return;
        }
        let Some(inventory) = &self.sync.state.inventory else {
            return;
        };

        let iv = pokemon.iv.unwrap_or(0) as f64;
        let outclassed = inventory.pokemon.iter().any(|other| {
            other.id != pokemon.id
                && other.pokemon_id == pokemon.pokemon_id
                && other.iv.unwrap_or(0) as f64 > iv * 1.1
                && other.cp as f64 > pokemon.cp as f64 * 0.8
        });
        if outclassed {
            info!("queueing release of pokemon {}", pokemon.pokemon_id);
            self.sync.state.todo.push_back(TodoEntry::ReleasePokemon {
                ids: vec![pokemon.id],
            });
        }
    }

    fn throw_parameters(&mut self) -> Option<ThrowParameters> {
        let ball = self.take_pokeball()?;
        let mut rng = rand::thread_rng();

        let mut throw = ThrowParameters {
            ball,
            reticle_size: 1.25 + 0.70 * rng.r#gen::<f64>(),
            spin_modifier: 0.3 * rng.r#gen::<f64>(),
            normalized_hit_position: 0.0,
        };
        if rng.r#gen::<f64>() > 0.7 {
            // a nice throw or better lands on the reticle
            throw.reticle_size = 1.0 + 0.95 * rng.r#gen::<f64>();
            throw.normalized_hit_position = 1.0;
        }
        Some(throw)
    }

    fn take_pokeball(&mut self) -> Option<i32> {
        let inventory = self.sync.state.inventory.as_mut()?;
        let ball = inventory
            .items
            .iter_mut()
            .find(|item| item.count > 0 && POKE_BALLS.contains(&item.item_id))?;
        ball.count -= 1;
        Some(ball.item_id)
    }

    /// Assign free incubators to free eggs: unlimited incubators take the
    /// shortest eggs, disposable ones the longest.
    pub async fn dispatch_incubators(&mut self) -> Result<()> {
        let Some(inventory) = &self.sync.state.inventory else {
            return Ok(());
        };

        let mut free_eggs: Vec<(u64, f64)> = inventory
            .eggs
            .iter()
            .filter(|egg| egg.egg_incubator_id.is_empty())
            .map(|egg| (egg.id, egg.egg_km_walked_target))
            .collect();
        let free_incubators: Vec<(String, i32)> = inventory
            .egg_incubators
            .iter()
            .filter(|incubator| incubator.pokemon_id == 0)
            .map(|incubator| (incubator.id.clone(), incubator.item_id))
            .collect();

        if free_eggs.is_empty() || free_incubators.is_empty() {
            return Ok(());
        }
        debug!("dispatch incubators");

        free_eggs.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (infinite, disposable): (Vec<_>, Vec<_>) = free_incubators
            .into_iter()
            .partition(|(_, item_id)| *item_id == INFINITE_INCUBATOR);

        let mut assignments: Vec<(String, u64)> = Vec::new();
        let mut eggs = free_eggs.iter();
        for (incubator_id, _) in &infinite {
            let Some((egg_id, _)) = eggs.next() else { break };
            assignments.push((incubator_id.clone(), *egg_id));
        }
        let mut remaining: Vec<u64> = eggs.map(|(id, _)| *id).collect();
        for (incubator_id, _) in &disposable {
            let Some(egg_id) = remaining.pop() else { break };
            assignments.push((incubator_id.clone(), egg_id));
        }

        for (incubator_id, egg_id) in assignments {
            let batch = Batch::new().queue(RpcRequest::UseItemEggIncubator {
                incubator_id: incubator_id.clone(),
                pokemon_id: egg_id,
            });
            let info = self.execute(batch, TrailerOptions::default()).await?;
            if info.incubator != Some(UseIncubatorResult::Success) {
                warn!(
                    "error using incubator {} on egg {}: {:?}",
                    incubator_id, egg_id, info.incubator
                );
            }
        }
        Ok(())
    }

    /// Pop and run one deferred action. Returns false when the queue was
    /// empty.
    pub async fn process_todo(&mut self) -> Result<bool> {
        let Some(todo) = self.sync.state.todo.pop_front() else {
            return Ok(false);
        };

        match todo {
            TodoEntry::LevelUp => {
                let level = self.current_level();
                let batch = Batch::new().queue(RpcRequest::LevelUpRewards { level });
                let info = self.execute(batch, TrailerOptions::default()).await?;
                if info.level_up == Some(1) {
                    info!("level up rewards claimed at level {}", level);
                }
            }
            TodoEntry::ReleasePokemon { ids } => {
                let batch = Batch::new().queue(RpcRequest::ReleasePokemon {
                    pokemon_ids: ids.clone(),
                });
                let info = self.execute(batch, TrailerOptions::default()).await?;
                match info.release {
                    Some(release) if release.result == 1 => {
                        info!("released {} pokemon", ids.len());
                    }
                    other => warn!("error releasing pokemon: {:?}", other),
                }
            }
            TodoEntry::EvolvePokemon { id } => {
                let batch = Batch::new().queue(RpcRequest::EvolvePokemon { pokemon_id: id });
                let info = self.execute(batch, TrailerOptions::default()).await?;
                match info.evolve {
                    Some(1) => info!("pokemon evolved"),
                    other => warn!("error evolving pokemon: {:?}", other),
                }
            }
            TodoEntry::DropItems { item_id, count } => {
                let batch = Batch::new().queue(RpcRequest::RecycleInventoryItem { item_id, count });
                let info = self.execute(batch, TrailerOptions::default()).await?;
                match info.recycle {
                    Some(recycle) if recycle.result == 1 => {
                        info!("dropped {} of item {}", count, item_id);
                    }
                    other => warn!("error dropping items: {:?}", other),
                }
            }
        }
        Ok(true)
    }

    /// Refresh the map snapshot when the freshness policy allows it.
    /// `cell_ids` come from the caller's cell cover of the current position.
    pub async fn map_refresh(&mut self, now_ms: u64, cell_ids: Vec<u64>) -> Result<bool> {
        if !self.sync.state.should_refresh_map(now_ms) {
            return Ok(false);
        }
        info!(
            "map refresh at {:.5},{:.5}",
            self.sync.state.position.lat, self.sync.state.position.lng
        );

        self.sync.state.api.last_map_refresh_ms = Some(now_ms);
        self.sync.state.api.last_map_position = Some(self.sync.state.position);

        let since_timestamp_ms = vec![0; cell_ids.len()];
        let batch = Batch::new().queue(RpcRequest::GetMapObjects {
            cell_ids,
            since_timestamp_ms,
        });
        self.execute(batch, TrailerOptions::default()).await?;

        if let Some(map) = &self.sync.state.map {
            if !map.catchable_pokemons.is_empty() && map.only_common_spawns() {
                warn!("only common spawns visible, account may be limited");
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedClient;
    use crate::Config;
    use rambler_protocol::{
        EggIncubator, EncounterResponse, FortSearchResponse, FortSettings, FortType,
        GlobalSettings, ItemStack, MapPokemon, MapSettings, ResponseEnvelope, ResponseKind,
        WildPokemon,
    };
    use rambler_state::{Inventory, MapSnapshot};

    fn settings() -> GlobalSettings {
        GlobalSettings {
            map_settings: MapSettings {
                get_map_objects_min_refresh_seconds: 10.0,
                get_map_objects_max_refresh_seconds: 30.0,
                get_map_objects_min_distance_meters: 50.0,
                pokemon_visible_range: 200.0,
                ..Default::default()
            },
            fort_settings: FortSettings {
                interaction_range_meters: 40.0,
            },
            ..Default::default()
        }
    }

    fn pokestop(id: &str, lng_offset: f64, cooldown: u64) -> FortData {
        FortData {
            id: id.to_string(),
            fort_type: FortType::Pokestop,
            latitude: 48.8456222,
            longitude: 2.3364526 + lng_offset,
            cooldown_complete_timestamp_ms: cooldown,
            ..Default::default()
        }
    }

    fn session(scripted: Vec<Vec<ResponseEnvelope>>) -> Session<ScriptedClient> {
        let mut session = Session::new(Config::default(), ScriptedClient::new(scripted));
        session.sync.state.download_settings = Some(settings());
        session
    }

    #[test]
    fn test_spinnable_filter_by_range_and_cooldown() {
        let mut s = session(vec![]);
        s.sync.state.map = Some(MapSnapshot {
            pokestops: vec![
                pokestop("near", 0.0001, 0),    // ~7m away
                pokestop("cooling", 0.0001, 99), // in cooldown
                pokestop("far", 0.01, 0),       // ~700m away
            ],
            ..Default::default()
        });

        let spinnable = s.spinnable_pokestops();

        assert_eq!(spinnable.len(), 1);
        assert_eq!(spinnable[0].id, "near");
    }

    #[tokio::test]
    async fn test_spin_updates_cooldown_on_snapshot() {
        let mut s = session(vec![vec![ResponseEnvelope::FortSearch(FortSearchResponse {
            result: FortSearchResult::Success,
            cooldown_complete_timestamp_ms: 4242,
            ..Default::default()
        })]]);
        s.sync.state.map = Some(MapSnapshot {
            pokestops: vec![pokestop("near", 0.0001, 0)],
            ..Default::default()
        });

        let spun = s.spin_pokestops().await.unwrap();

        assert_eq!(spun, 1);
        let map = s.sync.state.map.as_ref().unwrap();
        assert_eq!(map.pokestops[0].cooldown_complete_timestamp_ms, 4242);
    }

    #[tokio::test]
    async fn test_encounter_dedups_and_records() {
        let catchable = MapPokemon {
            encounter_id: 10,
            spawn_point_id: "spawn".to_string(),
            pokemon_id: 16,
            latitude: 48.8456222,
            longitude: 2.3364526,
            ..Default::default()
        };
        let mut s = session(vec![vec![ResponseEnvelope::Encounter(EncounterResponse {
            status: EncounterStatus::EncounterSuccess,
            wild_pokemon: Some(WildPokemon::default()),
        })]]);
        s.sync.state.map = Some(MapSnapshot {
            // the same encounter listed twice
            catchable_pokemons: vec![catchable.clone(), catchable],
            ..Default::default()
        });

        let started = s.encounter_pokemons(false).await.unwrap();

        assert_eq!(started.len(), 1);
        assert_eq!(s.sync.state.encountered, vec![10]);
        assert_eq!(s.client.sent.len(), 1);

        // a second pass skips the already-encountered id entirely
        let started = s.encounter_pokemons(false).await.unwrap();
        assert!(started.is_empty());
        assert_eq!(s.client.sent.len(), 1);
    }

    #[test]
    fn test_take_pokeball_prefers_first_stack_and_decrements() {
        let mut s = session(vec![]);
        let mut inventory = Inventory::default();
        inventory.items.push(ItemStack {
            item_id: 1,
            count: 1,
            unseen: false,
        });
        inventory.items.push(ItemStack {
            item_id: 2,
            count: 5,
            unseen: false,
        });
        s.sync.state.inventory = Some(inventory);

        assert_eq!(s.take_pokeball(), Some(1));
        assert_eq!(s.take_pokeball(), Some(2));
        assert_eq!(
            s.sync.state.inventory.as_ref().unwrap().item_count(1),
            0
        );
    }

    #[test]
    fn test_release_queued_only_when_outclassed() {
        let mut s = session(vec![]);
        s.config.behavior.autorelease = true;

        let mut caught = rambler_protocol::PokemonData {
            id: 1,
            pokemon_id: 16,
            cp: 100,
            iv: Some(40),
            ..Default::default()
        };
        let better = rambler_protocol::PokemonData {
            id: 2,
            pokemon_id: 16,
            cp: 300,
            iv: Some(90),
            ..Default::default()
        };
        let mut inventory = Inventory::default();
        inventory.pokemon.push(caught.clone());
        inventory.pokemon.push(better);
        s.sync.state.inventory = Some(inventory);

        s.release_if_outclassed(&caught);
        assert_eq!(
            s.sync.state.todo.front(),
            Some(&TodoEntry::ReleasePokemon { ids: vec![1] })
        );

        // a strong pokemon is kept
        s.sync.state.todo.clear();
        caught.iv = Some(95);
        s.release_if_outclassed(&caught);
        assert!(s.sync.state.todo.is_empty());
    }

    #[tokio::test]
    async fn test_incubator_assignment_pairing() {
        use rambler_protocol::UseIncubatorResponse;

        let mut s = session(vec![
            vec![ResponseEnvelope::UseItemEggIncubator(UseIncubatorResponse {
                result: UseIncubatorResult::Success,
                ..Default::default()
            })],
            vec![ResponseEnvelope::UseItemEggIncubator(UseIncubatorResponse {
                result: UseIncubatorResult::Success,
                ..Default::default()
            })],
        ]);

        let mut inventory = Inventory::default();
        for (id, km) in [(1, 2.0), (2, 10.0), (3, 5.0)] {
            inventory.eggs.push(rambler_protocol::PokemonData {
                id,
                is_egg: true,
                egg_km_walked_target: km,
                ..Default::default()
            });
        }
        inventory.egg_incubators.push(EggIncubator {
            id: "unlimited".to_string(),
            item_id: INFINITE_INCUBATOR,
            ..Default::default()
        });
        inventory.egg_incubators.push(EggIncubator {
            id: "disposable".to_string(),
            item_id: 902,
            ..Default::default()
        });
        s.sync.state.inventory = Some(inventory);

        s.dispatch_incubators().await.unwrap();

        // unlimited takes the 2km egg, disposable the 10km egg
        let sent: Vec<_> = s
            .client
            .sent
            .iter()
            .map(|batch| batch.requests()[0].clone())
            .collect();
        assert_eq!(
            sent[0],
            RpcRequest::UseItemEggIncubator {
                incubator_id: "unlimited".to_string(),
                pokemon_id: 1,
            }
        );
        assert_eq!(
            sent[1],
            RpcRequest::UseItemEggIncubator {
                incubator_id: "disposable".to_string(),
                pokemon_id: 2,
            }
        );
    }

    #[tokio::test]
    async fn test_process_todo_level_up() {
        use rambler_protocol::LevelUpRewardsResponse;

        let mut s = session(vec![vec![ResponseEnvelope::LevelUpRewards(
            LevelUpRewardsResponse {
                result: 1,
                ..Default::default()
            },
        )]]);
        s.sync.state.todo.push_back(TodoEntry::LevelUp);

        assert!(s.process_todo().await.unwrap());
        assert!(s.sync.state.todo.is_empty());
        assert_eq!(
            s.client.sent[0].expected_kinds()[0],
            ResponseKind::LevelUpRewards
        );

        // queue drained
        assert!(!s.process_todo().await.unwrap());
    }

    #[tokio::test]
    async fn test_map_refresh_respects_policy_and_stamps_position() {
        let mut s = session(vec![vec![]]);
        // no refresh yet: always due
        assert!(s.map_refresh(1_000, vec![1, 2]).await.unwrap());
        assert_eq!(s.sync.state.api.last_map_refresh_ms, Some(1_000));
        assert_eq!(
            s.sync.state.api.last_map_position,
            Some(s.sync.state.position)
        );

        // immediately after, the policy blocks the next one
        assert!(!s.map_refresh(2_000, vec![1, 2]).await.unwrap());
        assert_eq!(s.client.sent.len(), 1);
    }
}
