use thiserror::Error;

/// Conditions that abort response processing.
///
/// Each kind is meant to be matched on by the control loop: a ban ends the
/// session, a challenge pauses it until the URL is resolved out-of-band, a
/// version violation (strict mode) means the client build is too old to keep
/// talking to the server.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    #[error("account banned")]
    AccountBanned,

    #[error("a challenge has been received: {url}")]
    ChallengeRequired { url: String },

    #[error("minimum client version is {server_minimum}, {client_version} is too low")]
    MinimumVersionTooLow {
        server_minimum: String,
        client_version: String,
    },
}
