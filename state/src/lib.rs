//! Game state tracking and response dispatch for the Pokemon GO RPC API.
//!
//! This crate is the synchronous core of the agent: it owns the long-lived
//! [`State`] aggregate and reconciles it against the batched responses the
//! transport layer brings back.
//!
//! # Overview
//!
//! ```text
//! rambler-protocol (request/response types)
//!        │
//!        ▼
//! rambler-state (state + dispatch) ← THIS CRATE
//!        │
//!        └─> rambler-client (session flows over a transport)
//! ```
//!
//! # Main types
//!
//! - [`Synchronizer`] - dispatches response batches into [`State`]
//! - [`State`] - player profile, inventory, map snapshot, protocol bookkeeping
//! - [`Inventory`] / [`InventoryDelta`] - incremental inventory reconciliation
//! - [`CallInfo`] - per-call results returned from [`Synchronizer::parse`]
//! - [`VersionGuard`] - server-minimum version policy
//! - [`SyncError`] - the fatal/interrupt conditions a control loop matches on
//!
//! # Example
//!
//! ```ignore
//! use rambler_state::{SyncError, Synchronizer, VersionGuard};
//!
//! let mut sync = Synchronizer::new(VersionGuard::new(5901, true));
//!
//! match sync.parse(&responses) {
//!     Ok(info) => { /* consult info.fort_search, info.catch, ... */ }
//!     Err(SyncError::ChallengeRequired { url }) => { /* hand off to the captcha solver */ }
//!     Err(err) => return Err(err.into()),
//! }
//! ```

pub mod dispatch;
pub mod error;
pub mod inventory;
pub mod map;
pub mod state;
pub mod trailer;
pub mod version;

pub use dispatch::{
    CallInfo, CatchInfo, CodenameInfo, DigestPage, EncounterInfo, FortSearchInfo, RecycleInfo,
    ReleaseInfo, Synchronizer, TemplatePage,
};
pub use error::SyncError;
pub use inventory::{assign_iv, compute_iv, Inventory, InventoryDelta};
pub use map::{distance_m, MapSnapshot};
pub use state::{ApiState, LatLng, Profile, State, TodoEntry};
pub use trailer::TrailerOptions;
pub use version::{
    compare_versions, version_to_client_version, version_to_ios_version, VersionGuard,
};

// Re-export commonly used protocol types
pub use rambler_protocol::{Batch, ResponseEnvelope, RpcRequest};
