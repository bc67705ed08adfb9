//! Game master and asset digest refresh
//!
//! Both blobs are paginated downloads, refreshed only when the remote config
//! advertises a newer timestamp than the copy cached on disk.

use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use rambler_protocol::{Batch, Platform, RpcRequest};
use rambler_state::TrailerOptions;

use crate::{RpcClient, Session};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CachedBlob {
    timestamp_ms: u64,
    entries: Vec<Value>,
}

fn read_cache(path: &Path) -> Option<CachedBlob> {
    let text = fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn write_cache(path: &Path, blob: &CachedBlob) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(blob)?)?;
    Ok(())
}

impl<C: RpcClient> Session<C> {
    /// Re-download the item templates when the remote config says the cached
    /// copy is stale
    pub async fn refresh_item_templates(&mut self) -> Result<()> {
        debug!("checking if item templates need a refresh");
        let path = self.config.data_dir.join("item_templates.json");

        let mut last = 0;
        if let Some(cached) = read_cache(&path) {
            last = cached.timestamp_ms;
            self.sync.state.api.item_templates = cached.entries;
        }
        if last != 0 && last >= self.sync.state.api.item_templates_timestamp {
            return Ok(());
        }

        info!("game master updating");
        let mut templates: Vec<Value> = Vec::new();
        let mut page_offset = 0;
        let mut page_timestamp = 0;
        loop {
            let batch = Batch::new().queue(RpcRequest::DownloadItemTemplates {
                paginate: true,
                page_offset,
                page_timestamp_ms: page_timestamp,
            });
            let info = self.execute(batch, TrailerOptions::init()).await?;

            let Some(page) = info.templates else { break };
            templates.extend(page.templates);
            page_timestamp = page.timestamp_ms;
            if page.page_offset == 0 {
                break;
            }
            page_offset = page.page_offset;
        }

        write_cache(
            &path,
            &CachedBlob {
                timestamp_ms: page_timestamp,
                entries: templates.clone(),
            },
        )?;
        self.sync.state.api.item_templates = templates;
        Ok(())
    }

    /// Re-download the asset digest when the remote config says the cached
    /// copy is stale
    pub async fn refresh_asset_digest(&mut self) -> Result<()> {
        debug!("checking if asset digest needs a refresh");
        let path = self.config.data_dir.join("asset_digest.json");

        let mut last = 0;
        if let Some(cached) = read_cache(&path) {
            last = cached.timestamp_ms;
            self.sync.state.api.asset_digest = cached.entries;
        }
        if last != 0 && last >= self.sync.state.api.asset_digest_timestamp {
            return Ok(());
        }

        info!("asset digest updating");
        let mut digest: Vec<Value> = Vec::new();
        let mut page_offset = 0;
        let mut page_timestamp = 0;
        loop {
            let batch = Batch::new().queue(RpcRequest::GetAssetDigest {
                platform: Platform::Ios,
                app_version: self.config.api.version,
                paginate: true,
                page_offset,
                page_timestamp_ms: page_timestamp,
            });
            let info = self.execute(batch, TrailerOptions::init()).await?;

            let Some(page) = info.digest else { break };
            digest.extend(page.digest);
            page_timestamp = page.timestamp_ms;
            if page.page_offset == 0 {
                break;
            }
            page_offset = page.page_offset;
        }

        write_cache(
            &path,
            &CachedBlob {
                timestamp_ms: page_timestamp,
                entries: digest.clone(),
            },
        )?;
        self.sync.state.api.asset_digest = digest;
        Ok(())
    }
}

/// Fetch the minimum supported client version from the release endpoint,
/// stripping everything but digits and dots
pub async fn fetch_minimum_version(http: &reqwest::Client, url: &str) -> Result<String> {
    let body = http
        .get(url)
        .header("accept", "*/*")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let version: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if version.is_empty() {
        return Err(anyhow!("no version in response: {}", body));
    }
    Ok(version)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedClient;
    use crate::Config;
    use rambler_protocol::{ItemTemplatesResponse, ResponseEnvelope};
    use serde_json::json;

    fn template_page(n: u32, page_offset: i32) -> ResponseEnvelope {
        ResponseEnvelope::DownloadItemTemplates(ItemTemplatesResponse {
            success: true,
            item_templates: vec![json!({ "template_id": format!("T{}", n) })],
            timestamp_ms: 1_000 + n as u64,
            page_offset,
        })
    }

    fn temp_config(tag: &str) -> Config {
        Config {
            data_dir: std::env::temp_dir().join(format!("rambler-test-{}-{}", tag, std::process::id())),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_template_pagination_until_zero_offset() {
        let client = ScriptedClient::new(vec![
            vec![template_page(1, 50)],
            vec![template_page(2, 100)],
            vec![template_page(3, 0)],
        ]);
        let config = temp_config("templates");
        let data_dir = config.data_dir.clone();
        let mut session = Session::new(config, client);
        session.sync.state.api.item_templates_timestamp = 5_000;

        session.refresh_item_templates().await.unwrap();

        assert_eq!(session.client.sent.len(), 3);
        assert_eq!(session.sync.state.api.item_templates.len(), 3);

        // the cache landed on disk with the last page timestamp
        let cached = read_cache(&data_dir.join("item_templates.json")).unwrap();
        assert_eq!(cached.timestamp_ms, 1_003);
        assert_eq!(cached.entries.len(), 3);

        let _ = fs::remove_dir_all(&data_dir);
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_download() {
        let config = temp_config("fresh");
        let data_dir = config.data_dir.clone();
        write_cache(
            &data_dir.join("item_templates.json"),
            &CachedBlob {
                timestamp_ms: 9_000,
                entries: vec![json!({"template_id": "cached"})],
            },
        )
        .unwrap();

        let client = ScriptedClient::new(vec![]);
        let mut session = Session::new(config, client);
        session.sync.state.api.item_templates_timestamp = 5_000;

        session.refresh_item_templates().await.unwrap();

        assert!(session.client.sent.is_empty());
        assert_eq!(session.sync.state.api.item_templates.len(), 1);

        let _ = fs::remove_dir_all(&data_dir);
    }
}
