//! State snapshots on disk
//!
//! A snapshot is the whole [`State`] aggregate as JSON, minus the transport
//! handle (never part of the state) and the bulky game-data caches (skipped
//! by their serde attributes). Enough round-trips for crash resume:
//! player, inventory, map, and protocol bookkeeping all survive.

use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use rambler_state::State;

use crate::{RpcClient, Session};

/// Write a crash-resume snapshot
pub fn save_state(state: &State, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(state)?)?;
    debug!("state saved to {}", path.display());
    Ok(())
}

/// Load a snapshot written by [`save_state`]
pub fn load_state(path: impl AsRef<Path>) -> Result<State> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

impl<C: RpcClient> Session<C> {
    /// Snapshot the session state into the configured data directory
    pub fn save_state(&self) -> Result<()> {
        save_state(&self.sync.state, self.config.data_dir.join("state.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rambler_protocol::{InventoryEntry, ItemStack, PokemonData};
    use rambler_state::{Inventory, MapSnapshot, TodoEntry};

    #[test]
    fn test_snapshot_round_trip() {
        let mut state = State::default();
        state.inventory = Some(Inventory::from_entries(&[
            InventoryEntry::Pokemon(PokemonData {
                id: 1,
                pokemon_id: 16,
                ..Default::default()
            }),
            InventoryEntry::Item(ItemStack {
                item_id: 1,
                count: 10,
                unseen: false,
            }),
        ]));
        state.map = Some(MapSnapshot::default());
        state.todo.push_back(TodoEntry::EvolvePokemon { id: 1 });
        state.api.inventory_timestamp = 777;
        state.api.item_templates = vec![serde_json::json!({"bulky": true})];

        let path = std::env::temp_dir().join(format!(
            "rambler-test-snapshot-{}/state.json",
            std::process::id()
        ));
        save_state(&state, &path).unwrap();
        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded.inventory, state.inventory);
        assert_eq!(loaded.map, state.map);
        assert_eq!(loaded.todo, state.todo);
        assert_eq!(loaded.api.inventory_timestamp, 777);
        // caches are not part of the snapshot
        assert!(loaded.api.item_templates.is_empty());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
