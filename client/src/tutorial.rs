//! Tutorial completion flow
//!
//! A fresh account must walk the in-game tutorial before the server accepts
//! normal gameplay calls. Which steps are missing is read from the profile's
//! `tutorial_state`; each step is completed with its own exchange, parsing
//! the responses in between so the state keeps up.

use anyhow::Result;
use rand::Rng;
use tracing::{debug, info};

use rambler_protocol::{Batch, PlayerAvatar, RpcRequest};
use rambler_state::TrailerOptions;

use crate::{RpcClient, Session};

/// Tutorial steps the server tracks in `player.tutorial_state`
const LEGAL_SCREEN: i32 = 0;
const AVATAR_SELECTION: i32 = 1;
const POKEMON_CAPTURE: i32 = 3;
const NAME_SELECTION: i32 = 4;
const FIRST_TIME_EXPERIENCE: i32 = 7;

const REQUIRED_STEPS: [i32; 5] = [
    LEGAL_SCREEN,
    AVATAR_SELECTION,
    POKEMON_CAPTURE,
    NAME_SELECTION,
    FIRST_TIME_EXPERIENCE,
];

/// Starter species offered by the capture tutorial
const STARTERS: [i32; 3] = [1, 4, 7];

impl<C: RpcClient> Session<C> {
    /// Complete any tutorial step the profile has not been through yet.
    /// Returns false when there was nothing to do.
    pub async fn complete_tutorial(&mut self) -> Result<bool> {
        let done = self
            .sync
            .state
            .player
            .as_ref()
            .map(|player| player.tutorial_state.clone())
            .unwrap_or_default();

        if REQUIRED_STEPS.iter().all(|step| done.contains(step)) {
            return Ok(false);
        }
        info!("completing tutorials");

        if !done.contains(&LEGAL_SCREEN) {
            debug!("legal screen tutorial ({})", LEGAL_SCREEN);
            self.mark_tutorial_complete(LEGAL_SCREEN).await?;
            self.get_player().await?;
        }

        if !done.contains(&AVATAR_SELECTION) {
            debug!("avatar tutorial ({})", AVATAR_SELECTION);
            let batch = Batch::new().queue(RpcRequest::SetAvatar {
                avatar: random_avatar(),
            });
            self.execute(batch, TrailerOptions::minimal()).await?;
            self.mark_tutorial_complete(AVATAR_SELECTION).await?;

            let batch = Batch::new().queue(RpcRequest::GetPlayerProfile);
            self.execute(
                batch,
                TrailerOptions {
                    settings: false,
                    buddy: true,
                    inbox: false,
                },
            )
            .await?;
        }

        if !done.contains(&POKEMON_CAPTURE) {
            debug!("starter encounter tutorial ({})", POKEMON_CAPTURE);
            let starter = STARTERS[rand::thread_rng().gen_range(0..STARTERS.len())];
            let batch =
                Batch::new().queue(RpcRequest::EncounterTutorialComplete { pokemon_id: starter });
            self.execute(batch, TrailerOptions::minimal()).await?;
            self.get_player().await?;
        }

        if !done.contains(&NAME_SELECTION) {
            debug!("name tutorial ({})", NAME_SELECTION);
            let codename = self.config.credentials.username.clone();
            let batch = Batch::new().queue(RpcRequest::ClaimCodename { codename });
            self.execute(batch, TrailerOptions::minimal()).await?;
            self.get_player().await?;
            self.mark_tutorial_complete(NAME_SELECTION).await?;
        }

        if !done.contains(&FIRST_TIME_EXPERIENCE) {
            debug!("first time experience tutorial ({})", FIRST_TIME_EXPERIENCE);
            self.mark_tutorial_complete(FIRST_TIME_EXPERIENCE).await?;
        }

        Ok(true)
    }

    async fn mark_tutorial_complete(&mut self, step: i32) -> Result<()> {
        let batch = Batch::new().queue(RpcRequest::MarkTutorialComplete {
            tutorials: vec![step],
            send_marketing_emails: false,
            send_push_notifications: false,
        });
        self.execute(batch, TrailerOptions::minimal()).await?;
        Ok(())
    }
}

/// Generate a randomized default avatar
fn random_avatar() -> PlayerAvatar {
    let mut rng = rand::thread_rng();
    let hair = rng.gen_range(0..=5);
    let eyes = rng.gen_range(0..=4);
    PlayerAvatar {
        skin: rng.gen_range(0..=3),
        hair: format!("AVATAR_m_hair_default_{}", hair),
        shirt: "AVATAR_m_shirt_default_2B".to_string(),
        pants: "AVATAR_m_pants_default_0".to_string(),
        hat: "AVATAR_m_hat_default_5".to_string(),
        shoes: "AVATAR_m_shoes_default_2".to_string(),
        eyes: format!("AVATAR_m_eyes_{}", eyes),
        backpack: "AVATAR_m_backpack_default_2".to_string(),
    }
}
