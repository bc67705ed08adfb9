//! Inventory reconciliation
//!
//! The server syncs inventory incrementally: each GetInventory response
//! carries a delta of typed entries. Splitting a delta is a pure
//! categorization step; folding it into the owned [`Inventory`] is where the
//! uniqueness invariant is enforced (one copy of a pokemon id across
//! `pokemon` and `eggs`, remove-then-add on every upsert).

use serde::{Deserialize, Serialize};

use rambler_protocol::{
    EggIncubator, FamilyCandy, InventoryEntry, ItemStack, PlayerStats, PokemonData,
};

/// Reconciled inventory, built from the first full sync and patched by deltas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub pokemon: Vec<PokemonData>,
    /// Disjoint from `pokemon`: entries flagged `is_egg`
    pub eggs: Vec<PokemonData>,
    pub items: Vec<ItemStack>,
    pub egg_incubators: Vec<EggIncubator>,
    /// Inventory-embedded stats, distinct from the profile
    pub player: Option<PlayerStats>,
    pub candies: Vec<FamilyCandy>,
}

/// One delta payload partitioned by entry kind. Pure data, no state touched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryDelta {
    pub pokemon: Vec<PokemonData>,
    pub removed_pokemon: Vec<u64>,
    pub items: Vec<ItemStack>,
    pub player: Option<PlayerStats>,
    pub egg_incubators: Vec<EggIncubator>,
    pub candies: Vec<FamilyCandy>,
}

impl InventoryDelta {
    /// Partition raw inventory entries by their discriminant
    pub fn split(entries: &[InventoryEntry]) -> Self {
        let mut delta = Self::default();
        for entry in entries {
            match entry {
                InventoryEntry::Pokemon(pokemon) => delta.pokemon.push(pokemon.clone()),
                InventoryEntry::Item(item) => delta.items.push(item.clone()),
                InventoryEntry::PlayerStats(stats) => delta.player = Some(stats.clone()),
                InventoryEntry::EggIncubators(incubators) => {
                    delta.egg_incubators.extend(incubators.iter().cloned());
                }
                InventoryEntry::Candy(candy) => delta.candies.push(candy.clone()),
                InventoryEntry::RemovedPokemon(id) => delta.removed_pokemon.push(*id),
            }
        }
        delta
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
            && self.removed_pokemon.is_empty()
            && self.items.is_empty()
            && self.player.is_none()
            && self.egg_incubators.is_empty()
            && self.candies.is_empty()
    }
}

impl Inventory {
    /// Build the inventory from the first full sync, splitting eggs out of
    /// the pokemon list
    pub fn from_entries(entries: &[InventoryEntry]) -> Self {
        let delta = InventoryDelta::split(entries);
        let (eggs, pokemon): (Vec<_>, Vec<_>) =
            delta.pokemon.into_iter().partition(|p| p.is_egg);

        Self {
            pokemon,
            eggs,
            items: delta.items,
            egg_incubators: delta.egg_incubators,
            player: delta.player,
            candies: delta.candies,
        }
    }

    /// Fold a delta in. Returns true when the player stats reported a level
    /// increase over the previous known level.
    pub fn apply_delta(&mut self, delta: InventoryDelta) -> bool {
        for pokemon in delta.pokemon {
            // remove-then-add so a re-synced pokemon never duplicates
            if pokemon.is_egg {
                self.eggs.retain(|e| e.id != pokemon.id);
                self.eggs.push(pokemon);
            } else {
                self.pokemon.retain(|e| e.id != pokemon.id);
                self.pokemon.push(pokemon);
            }
        }

        if !delta.removed_pokemon.is_empty() {
            self.pokemon
                .retain(|p| !delta.removed_pokemon.contains(&p.id));
            self.eggs.retain(|p| !delta.removed_pokemon.contains(&p.id));
        }

        for stack in delta.items {
            match self.items.iter_mut().find(|it| it.item_id == stack.item_id) {
                Some(item) => {
                    item.count = stack.count;
                    item.unseen = stack.unseen;
                }
                None => self.items.push(stack),
            }
        }

        for candy in delta.candies {
            match self
                .candies
                .iter_mut()
                .find(|c| c.family_id == candy.family_id)
            {
                Some(existing) => existing.candy = candy.candy,
                None => self.candies.push(candy),
            }
        }

        let mut leveled_up = false;
        if let Some(stats) = delta.player {
            if let Some(previous) = &self.player {
                leveled_up = stats.level > previous.level;
            }
            self.player = Some(stats);
        }

        if !delta.egg_incubators.is_empty() {
            self.egg_incubators = delta.egg_incubators;
        }

        leveled_up
    }

    /// Count of a given item in the bag
    pub fn item_count(&self, item_id: i32) -> i32 {
        self.items
            .iter()
            .find(|it| it.item_id == item_id)
            .map(|it| it.count)
            .unwrap_or(0)
    }

    /// Best-effort item credit from an action response. Only existing stacks
    /// are bumped; new stacks arrive with the next inventory delta, which is
    /// the source of truth.
    pub fn credit_item(&mut self, item_id: i32, amount: i32) {
        if let Some(item) = self.items.iter_mut().find(|it| it.item_id == item_id) {
            item.count += amount;
        }
    }

    /// Recompute the derived iv for every active pokemon
    pub fn assign_ivs(&mut self) {
        for pokemon in &mut self.pokemon {
            assign_iv(pokemon);
        }
    }
}

/// Individual-roll quality on a 0-100 scale
pub fn compute_iv(pokemon: &PokemonData) -> u8 {
    let total = pokemon.individual_attack
        + pokemon.individual_defense
        + pokemon.individual_stamina;
    (100.0 * total as f64 / 45.0).round() as u8
}

/// Stamp the derived iv on a pokemon
pub fn assign_iv(pokemon: &mut PokemonData) {
    pokemon.iv = Some(compute_iv(pokemon));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pokemon(id: u64, species: i32) -> PokemonData {
        PokemonData {
            id,
            pokemon_id: species,
            ..Default::default()
        }
    }

    fn egg(id: u64) -> PokemonData {
        PokemonData {
            id,
            is_egg: true,
            egg_km_walked_target: 5.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_split_partitions_by_kind() {
        let entries = vec![
            InventoryEntry::Pokemon(pokemon(1, 16)),
            InventoryEntry::Item(ItemStack {
                item_id: 1,
                count: 10,
                unseen: false,
            }),
            InventoryEntry::PlayerStats(PlayerStats {
                level: 5,
                ..Default::default()
            }),
            InventoryEntry::EggIncubators(vec![EggIncubator {
                id: "incubator-1".to_string(),
                ..Default::default()
            }]),
            InventoryEntry::Candy(FamilyCandy {
                family_id: 16,
                candy: 12,
            }),
            InventoryEntry::RemovedPokemon(99),
        ];

        let delta = InventoryDelta::split(&entries);

        assert_eq!(delta.pokemon.len(), 1);
        assert_eq!(delta.items.len(), 1);
        assert_eq!(delta.player.as_ref().unwrap().level, 5);
        assert_eq!(delta.egg_incubators.len(), 1);
        assert_eq!(delta.candies.len(), 1);
        assert_eq!(delta.removed_pokemon, vec![99]);
    }

    #[test]
    fn test_first_sync_splits_eggs() {
        let entries = vec![
            InventoryEntry::Pokemon(pokemon(1, 16)),
            InventoryEntry::Pokemon(egg(2)),
            InventoryEntry::Item(ItemStack {
                item_id: 1,
                count: 10,
                unseen: false,
            }),
        ];

        let inventory = Inventory::from_entries(&entries);

        assert_eq!(inventory.pokemon.len(), 1);
        assert_eq!(inventory.eggs.len(), 1);
        assert_eq!(inventory.items.len(), 1);
    }

    #[test]
    fn test_apply_delta_upsert_never_duplicates() {
        let mut inventory = Inventory::from_entries(&[
            InventoryEntry::Pokemon(pokemon(1, 16)),
            InventoryEntry::Pokemon(pokemon(2, 19)),
        ]);

        // re-sync pokemon 1 with a new cp
        let mut updated = pokemon(1, 16);
        updated.cp = 400;
        let delta = InventoryDelta::split(&[InventoryEntry::Pokemon(updated)]);
        inventory.apply_delta(delta);

        assert_eq!(inventory.pokemon.len(), 2);
        let ids: Vec<u64> = inventory.pokemon.iter().map(|p| p.id).collect();
        assert_eq!(ids.iter().filter(|id| **id == 1).count(), 1);
        assert_eq!(
            inventory.pokemon.iter().find(|p| p.id == 1).unwrap().cp,
            400
        );
    }

    #[test]
    fn test_apply_delta_removes_from_pokemon_and_eggs() {
        let mut inventory = Inventory::from_entries(&[
            InventoryEntry::Pokemon(pokemon(1, 16)),
            InventoryEntry::Pokemon(egg(2)),
        ]);

        let delta = InventoryDelta::split(&[
            InventoryEntry::RemovedPokemon(1),
            InventoryEntry::RemovedPokemon(2),
        ]);
        inventory.apply_delta(delta);

        assert!(inventory.pokemon.is_empty());
        assert!(inventory.eggs.is_empty());
    }

    #[test]
    fn test_apply_delta_overwrites_item_counts() {
        let mut inventory = Inventory::from_entries(&[InventoryEntry::Item(ItemStack {
            item_id: 1,
            count: 10,
            unseen: false,
        })]);

        let delta = InventoryDelta::split(&[
            InventoryEntry::Item(ItemStack {
                item_id: 1,
                count: 7,
                unseen: true,
            }),
            InventoryEntry::Item(ItemStack {
                item_id: 101,
                count: 3,
                unseen: false,
            }),
        ]);
        inventory.apply_delta(delta);

        assert_eq!(inventory.item_count(1), 7);
        assert_eq!(inventory.item_count(101), 3);
        assert!(inventory.items.iter().find(|i| i.item_id == 1).unwrap().unseen);
    }

    #[test]
    fn test_apply_delta_reports_level_up() {
        let mut inventory = Inventory::from_entries(&[InventoryEntry::PlayerStats(
            PlayerStats {
                level: 5,
                ..Default::default()
            },
        )]);

        let same = InventoryDelta::split(&[InventoryEntry::PlayerStats(PlayerStats {
            level: 5,
            experience: 100,
            ..Default::default()
        })]);
        assert!(!inventory.apply_delta(same));

        let up = InventoryDelta::split(&[InventoryEntry::PlayerStats(PlayerStats {
            level: 6,
            ..Default::default()
        })]);
        assert!(inventory.apply_delta(up));
        assert_eq!(inventory.player.as_ref().unwrap().level, 6);
    }

    #[test]
    fn test_empty_delta_is_a_no_op() {
        let mut inventory = Inventory::from_entries(&[
            InventoryEntry::Pokemon(pokemon(1, 16)),
            InventoryEntry::Item(ItemStack {
                item_id: 1,
                count: 2,
                unseen: false,
            }),
        ]);
        let before = inventory.clone();

        inventory.apply_delta(InventoryDelta::default());

        assert_eq!(inventory, before);
    }

    #[test]
    fn test_incubator_set_replaced_wholesale() {
        let mut inventory = Inventory::from_entries(&[InventoryEntry::EggIncubators(vec![
            EggIncubator {
                id: "a".to_string(),
                ..Default::default()
            },
            EggIncubator {
                id: "b".to_string(),
                ..Default::default()
            },
        ])]);

        let delta = InventoryDelta::split(&[InventoryEntry::EggIncubators(vec![EggIncubator {
            id: "c".to_string(),
            pokemon_id: 42,
            ..Default::default()
        }])]);
        inventory.apply_delta(delta);

        assert_eq!(inventory.egg_incubators.len(), 1);
        assert_eq!(inventory.egg_incubators[0].id, "c");
    }

    #[test]
    fn test_iv_derivation() {
        let mut perfect = pokemon(1, 16);
        perfect.individual_attack = 15;
        perfect.individual_defense = 15;
        perfect.individual_stamina = 15;
        assert_eq!(compute_iv(&perfect), 100);

        let mut none = pokemon(2, 16);
        none.individual_attack = 0;
        none.individual_defense = 0;
        none.individual_stamina = 0;
        assert_eq!(compute_iv(&none), 0);

        let mut mid = pokemon(3, 16);
        mid.individual_attack = 10;
        mid.individual_defense = 7;
        mid.individual_stamina = 5;
        // 22/45 rounds to 49
        assert_eq!(compute_iv(&mid), 49);

        assign_iv(&mut mid);
        assert_eq!(mid.iv, Some(49));
    }
}
