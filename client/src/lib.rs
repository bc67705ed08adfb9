//! Session flows for a Pokemon GO automation agent.
//!
//! The transport (request signing, batching, retries) lives behind the
//! [`RpcClient`] trait; this crate drives it: every gameplay batch gets the
//! standard trailers attached, goes out through the transport, and has its
//! responses folded into shared state by `rambler-state`.
//!
//! One batch is in flight at a time. The state core has no internal locking
//! and relies on this serialization.

mod actions;
mod config;
mod gamedata;
mod persist;
mod tutorial;

pub use actions::EncounterTarget;
pub use config::{ApiConfig, BehaviorConfig, Config, Credentials};
pub use gamedata::fetch_minimum_version;
pub use persist::{load_state, save_state};

use anyhow::Result;
use tracing::debug;

use rambler_protocol::{Batch, Platform, ResponseEnvelope, RpcRequest};
use rambler_state::{CallInfo, State, SyncError, Synchronizer, TrailerOptions, VersionGuard};

/// Transport boundary: signs, encodes, and submits one batch per call,
/// returning the decoded responses in request order.
pub trait RpcClient {
    fn batch_call(
        &mut self,
        batch: Batch,
    ) -> impl Future<Output = Result<Vec<ResponseEnvelope>>> + Send;
}

/// A logged-in automation session over an abstract transport
pub struct Session<C> {
    pub config: Config,
    pub sync: Synchronizer,
    client: C,
}

impl<C: RpcClient> Session<C> {
    /// Start a session with empty state
    pub fn new(config: Config, client: C) -> Self {
        let guard = VersionGuard::new(config.api.version, config.api.check_version);
        let mut sync = Synchronizer::new(guard);
        sync.state.position = config.position;
        Self {
            config,
            sync,
            client,
        }
    }

    /// Resume a session from a persisted state snapshot
    pub fn resume(config: Config, client: C, state: State) -> Self {
        let guard = VersionGuard::new(config.api.version, config.api.check_version);
        Self {
            config,
            sync: Synchronizer::with_state(guard, state),
            client,
        }
    }

    pub fn state(&self) -> &State {
        &self.sync.state
    }

    /// Attach the standard trailers, run the batch, and fold the responses
    /// into state
    pub async fn execute(&mut self, batch: Batch, options: TrailerOptions) -> Result<CallInfo> {
        let batch = self.sync.standard_trailers(batch, options);
        let responses = self.client.batch_call(batch).await?;
        let info = self.sync.parse(&responses)?;
        Ok(info)
    }

    /// Run a batch without trailers (the login flow's first empty request)
    pub async fn execute_raw(&mut self, batch: Batch) -> Result<CallInfo> {
        let responses = self.client.batch_call(batch).await?;
        let info = self.sync.parse(&responses)?;
        Ok(info)
    }

    /// Fetch the player profile with minimal trailers
    pub async fn get_player(&mut self) -> Result<CallInfo> {
        let batch = Batch::new().queue(RpcRequest::GetPlayer {
            country: self.config.api.country.clone(),
            language: self.config.api.language.clone(),
            timezone: self.config.api.timezone.clone(),
        });
        self.execute(batch, TrailerOptions::minimal()).await
    }

    /// The initial exchange after login: profile, remote config, game data
    /// caches, tutorial, and the pending level-up claim.
    pub async fn bootstrap(&mut self) -> Result<()> {
        debug!("first empty request");
        self.execute_raw(Batch::new()).await?;

        debug!("get player info");
        self.get_player().await?;

        debug!("download remote config");
        let batch = Batch::new().queue(RpcRequest::DownloadRemoteConfigVersion {
            platform: Platform::Ios,
            app_version: self.config.api.version,
        });
        self.execute(batch, TrailerOptions::init()).await?;

        self.refresh_asset_digest().await?;
        self.refresh_item_templates().await?;

        debug!("checking tutorial state");
        if !self.complete_tutorial().await? {
            // nothing to complete; touch the profile like the real app does
            let batch = Batch::new().queue(RpcRequest::GetPlayerProfile);
            self.execute(
                batch,
                TrailerOptions {
                    settings: true,
                    buddy: true,
                    inbox: false,
                },
            )
            .await?;
        }

        debug!("claiming level up rewards");
        let level = self.current_level();
        let batch = Batch::new().queue(RpcRequest::LevelUpRewards { level });
        self.execute(
            batch,
            TrailerOptions {
                settings: true,
                ..Default::default()
            },
        )
        .await?;

        Ok(())
    }

    /// Submit an externally-solved challenge token. Returns whether the
    /// server accepted it.
    pub async fn resolve_challenge(&mut self, token: &str) -> Result<bool> {
        let batch = Batch::new().queue(RpcRequest::VerifyChallenge {
            token: token.to_string(),
        });
        let info = self.execute(batch, TrailerOptions::default()).await?;
        let accepted = info.challenge_verified.unwrap_or(false);
        if !accepted {
            tracing::error!("incorrect challenge token sent");
        }
        Ok(accepted)
    }

    pub(crate) fn current_level(&self) -> i32 {
        self.sync
            .state
            .inventory
            .as_ref()
            .and_then(|inventory| inventory.player.as_ref())
            .map(|stats| stats.level)
            .unwrap_or(1)
    }
}

/// Extract the challenge URL from a flow error, if that is what stopped it
pub fn challenge_url(err: &anyhow::Error) -> Option<&str> {
    match err.downcast_ref::<SyncError>() {
        Some(SyncError::ChallengeRequired { url }) => Some(url),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use std::collections::VecDeque;

    use anyhow::Result;

    use rambler_protocol::{Batch, ResponseEnvelope};

    use crate::RpcClient;

    /// Scripted transport: pops one canned response batch per call and
    /// records every submitted batch.
    pub struct ScriptedClient {
        pub scripted: VecDeque<Vec<ResponseEnvelope>>,
        pub sent: Vec<Batch>,
    }

    impl ScriptedClient {
        pub fn new(scripted: Vec<Vec<ResponseEnvelope>>) -> Self {
            Self {
                scripted: scripted.into(),
                sent: Vec::new(),
            }
        }
    }

    impl RpcClient for ScriptedClient {
        async fn batch_call(&mut self, batch: Batch) -> Result<Vec<ResponseEnvelope>> {
            self.sent.push(batch);
            Ok(self.scripted.pop_front().unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::ScriptedClient;
    use rambler_protocol::ResponseKind;
    use rambler_state::SyncError;

    #[tokio::test]
    async fn test_execute_attaches_trailers() {
        let client = ScriptedClient::new(vec![vec![]]);
        let mut session = Session::new(Config::default(), client);

        session
            .execute(
                Batch::new().queue(RpcRequest::GetPlayerProfile),
                TrailerOptions::default(),
            )
            .await
            .unwrap();

        let sent = &session.client.sent[0];
        let kinds = sent.expected_kinds();
        assert_eq!(kinds[0], ResponseKind::GetPlayerProfile);
        assert_eq!(kinds[1], ResponseKind::CheckChallenge);
        assert_eq!(kinds[3], ResponseKind::GetInventory);
    }

    #[tokio::test]
    async fn test_challenge_error_is_downcastable() {
        use rambler_protocol::CheckChallengeResponse;

        let client = ScriptedClient::new(vec![vec![ResponseEnvelope::CheckChallenge(
            CheckChallengeResponse {
                show_challenge: true,
                challenge_url: "http://x".to_string(),
            },
        )]]);
        let mut session = Session::new(Config::default(), client);

        let err = session
            .execute(Batch::new(), TrailerOptions::minimal())
            .await
            .unwrap_err();

        assert_eq!(challenge_url(&err), Some("http://x"));
        assert_eq!(
            err.downcast_ref::<SyncError>(),
            Some(&SyncError::ChallengeRequired {
                url: "http://x".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_resolve_challenge_reports_acceptance() {
        use rambler_protocol::VerifyChallengeResponse;

        let client = ScriptedClient::new(vec![vec![ResponseEnvelope::VerifyChallenge(
            VerifyChallengeResponse { success: true },
        )]]);
        let mut session = Session::new(Config::default(), client);

        assert!(session.resolve_challenge("token").await.unwrap());
    }
}
