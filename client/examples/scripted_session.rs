//! Drives a session against a canned transport: login exchange, one map
//! refresh, one pokestop spin. Useful to see which batches the flows
//! compose and how state evolves without a live account.
//!
//! Run with: cargo run --example scripted_session

use anyhow::Result;
use rambler_client::{Config, RpcClient, Session};
use rambler_protocol::{
    AwardedItem, Batch, DownloadSettingsResponse, FortData, FortSearchResponse, FortSearchResult,
    FortSettings, FortType, GlobalSettings, InventoryEntry, InventoryPayload, InventoryResponse,
    ItemStack, MapCell, MapObjectsResponse, MapSettings, PlayerData, PlayerResponse,
    ResponseEnvelope, ResponseKind, RpcRequest,
};

/// Answers every queued request with a canned payload
struct CannedTransport {
    calls: u32,
}

impl RpcClient for CannedTransport {
    async fn batch_call(&mut self, batch: Batch) -> Result<Vec<ResponseEnvelope>> {
        self.calls += 1;
        println!(
            "batch {}: {:?}",
            self.calls,
            batch.expected_kinds()
        );
        Ok(batch
            .requests()
            .iter()
            .map(|request| canned_response(request))
            .collect())
    }
}

fn canned_response(request: &RpcRequest) -> ResponseEnvelope {
    match request.kind() {
        ResponseKind::GetPlayer => ResponseEnvelope::GetPlayer(PlayerResponse {
            player_data: PlayerData {
                username: "scripted-trainer".to_string(),
                tutorial_state: vec![0, 1, 3, 4, 7],
                ..Default::default()
            },
            ..Default::default()
        }),
        ResponseKind::GetInventory => ResponseEnvelope::GetInventory(InventoryResponse {
            inventory_delta: InventoryPayload {
                new_timestamp_ms: 1,
                inventory_items: vec![InventoryEntry::Item(ItemStack {
                    item_id: 1,
                    count: 20,
                    unseen: false,
                })],
                ..Default::default()
            },
        }),
        ResponseKind::DownloadSettings => {
            ResponseEnvelope::DownloadSettings(DownloadSettingsResponse {
                hash: "canned".to_string(),
                settings: Some(GlobalSettings {
                    minimum_client_version: "0.51.0".to_string(),
                    map_settings: MapSettings {
                        get_map_objects_min_refresh_seconds: 10.0,
                        get_map_objects_max_refresh_seconds: 30.0,
                        pokemon_visible_range: 200.0,
                        ..Default::default()
                    },
                    fort_settings: FortSettings {
                        interaction_range_meters: 40.0,
                    },
                }),
            })
        }
        ResponseKind::GetMapObjects => ResponseEnvelope::GetMapObjects(MapObjectsResponse {
            map_cells: vec![MapCell {
                forts: vec![FortData {
                    id: "stop-1".to_string(),
                    fort_type: FortType::Pokestop,
                    latitude: 48.8456222,
                    longitude: 2.3364722,
                    ..Default::default()
                }],
                ..Default::default()
            }],
        }),
        ResponseKind::FortSearch => ResponseEnvelope::FortSearch(FortSearchResponse {
            result: FortSearchResult::Success,
            items_awarded: vec![AwardedItem {
                item_id: 1,
                item_count: 3,
            }],
            experience_awarded: 50,
            cooldown_complete_timestamp_ms: 300_000,
            ..Default::default()
        }),
        kind => ResponseEnvelope::decode(kind.code(), serde_json::json!({})).unwrap(),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let mut session = Session::new(Config::default(), CannedTransport { calls: 0 });

    session.get_player().await?;
    session
        .execute(Batch::new(), rambler_state::TrailerOptions::init())
        .await?;

    session.map_refresh(1_000, vec![42]).await?;
    let spun = session.spin_pokestops().await?;

    let state = session.state();
    println!();
    println!(
        "player: {}",
        state.player.as_ref().map(|p| p.username.as_str()).unwrap_or("?")
    );
    println!(
        "pokeballs: {}",
        state.inventory.as_ref().map(|i| i.item_count(1)).unwrap_or(0)
    );
    println!("pokestops spun: {}", spun);

    Ok(())
}
