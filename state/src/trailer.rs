//! Standard trailing calls
//!
//! Every meaningful gameplay request piggybacks a fixed set of supplementary
//! calls: challenge check, hatched eggs, inventory sync, badge check, and
//! optionally settings, buddy, and inbox. The order is part of the contract:
//! the dispatcher processes responses positionally and the inventory sync
//! must land before handlers that read it.

use rambler_protocol::{Batch, RpcRequest};

use crate::dispatch::Synchronizer;

/// Which optional trailers to append
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerOptions {
    pub settings: bool,
    pub buddy: bool,
    pub inbox: bool,
}

impl Default for TrailerOptions {
    fn default() -> Self {
        Self {
            settings: false,
            buddy: true,
            inbox: true,
        }
    }
}

impl TrailerOptions {
    /// Trailers for the init flow: refresh settings, skip the social calls
    pub fn init() -> Self {
        Self {
            settings: true,
            buddy: false,
            inbox: false,
        }
    }

    /// The mandatory trailers only
    pub fn minimal() -> Self {
        Self {
            settings: false,
            buddy: false,
            inbox: false,
        }
    }
}

impl Synchronizer {
    /// Append the standard trailers to a batch, echoing the last-known
    /// inventory timestamp and settings hash
    pub fn standard_trailers(&self, batch: Batch, options: TrailerOptions) -> Batch {
        let mut batch = batch
            .queue(RpcRequest::CheckChallenge)
            .queue(RpcRequest::GetHatchedEggs)
            .queue(RpcRequest::GetInventory {
                last_timestamp_ms: self.state.api.inventory_timestamp,
            })
            .queue(RpcRequest::CheckAwardedBadges);

        if options.settings {
            batch = batch.queue(RpcRequest::DownloadSettings {
                hash: self.state.api.settings_hash.clone(),
            });
        }
        if options.buddy {
            batch = batch.queue(RpcRequest::GetBuddyWalked);
        }
        if options.inbox {
            batch = batch.queue(RpcRequest::GetInbox {
                is_history: true,
                is_reverse: false,
                not_before_ms: 0,
            });
        }
        batch
    }
}
