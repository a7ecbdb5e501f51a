use thiserror::Error;

/// User-facing text for any resolution failure. Upstream error bodies are
/// logged, never shown verbatim.
pub const INVALID_INVITATION_MESSAGE: &str =
    "This invitation link is invalid or has expired. Please ask for a new invitation.";

pub const MISSING_TOKEN_MESSAGE: &str =
    "This invitation link is missing its token. Please use the link from your invitation email.";

pub const SESSION_UNAVAILABLE_MESSAGE: &str =
    "We could not check your sign-in status. Please check your connection and try again.";

pub const ACCEPT_FAILED_MESSAGE: &str =
    "We could not accept the invitation. Please try again.";

/// Failure modes of invitation token resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Invitation not found")]
    NotFound,

    #[error("Invitation has expired")]
    Expired,

    #[error("Invitation has been revoked")]
    Revoked,

    /// Any other non-2xx or malformed response from the backing store.
    /// The detail is for logs only.
    #[error("Invitation lookup failed: {0}")]
    Upstream(String),
}

/// Transport-level failure of the session probe. "Not authenticated" is a
/// valid `Session`, never an error.
#[derive(Error, Debug)]
#[error("Session probe transport failure: {0}")]
pub struct ProbeTransportError(pub String);

/// Failure modes of the external accept action.
#[derive(Error, Debug)]
pub enum AcceptError {
    /// The token was already consumed. Treated as success by callers.
    #[error("Invitation has already been accepted")]
    AlreadyAccepted,

    /// Any other rejection. The detail is for logs only.
    #[error("Invitation acceptance rejected: {0}")]
    Rejected(String),
}

/// Failures writing the pending-invitation slot. Reads never fail: corrupt
/// or stale data is purged and reported as absent.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Pending slot write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pending slot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
