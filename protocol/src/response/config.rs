//! Server configuration and asset payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// DOWNLOAD_SETTINGS response; `settings` is absent when the hash matched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadSettingsResponse {
    pub hash: String,
    pub settings: Option<GlobalSettings>,
}

/// Server-tuned client configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalSettings {
    pub minimum_client_version: String,
    pub map_settings: MapSettings,
    pub fort_settings: FortSettings,
}

/// Map refresh cadence and visibility ranges
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub get_map_objects_min_refresh_seconds: f64,
    pub get_map_objects_max_refresh_seconds: f64,
    pub get_map_objects_min_distance_meters: f64,
    pub pokemon_visible_range: f64,
    pub encounter_range_meters: f64,
}

/// Fort interaction tuning
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FortSettings {
    pub interaction_range_meters: f64,
}

/// DOWNLOAD_ITEM_TEMPLATES response: one page of the game master.
/// Template entries stay opaque; the agent caches them as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTemplatesResponse {
    pub success: bool,
    pub item_templates: Vec<Value>,
    pub timestamp_ms: u64,
    /// Zero on the last page
    pub page_offset: i32,
}

/// DOWNLOAD_REMOTE_CONFIG_VERSION response: cache freshness stamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfigResponse {
    pub result: i32,
    pub item_templates_timestamp_ms: u64,
    pub asset_digest_timestamp_ms: u64,
}

/// GET_ASSET_DIGEST response: one page of the asset digest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDigestResponse {
    pub success: bool,
    pub digest: Vec<Value>,
    pub timestamp_ms: u64,
    /// Zero on the last page
    pub page_offset: i32,
}

/// One resolved asset URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetDownloadUrl {
    pub asset_id: String,
    pub url: String,
}

/// GET_DOWNLOAD_URLS response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadUrlsResponse {
    pub download_urls: Vec<AssetDownloadUrl>,
}
