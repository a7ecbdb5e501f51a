use async_trait::async_trait;

use crate::error::{AcceptError, ProbeTransportError, ResolveError};
use crate::models::{AcceptanceSummary, Invitation, Session};

// Expose the HTTP-backed implementation
pub mod http;

/// Resolves an opaque invitation token to an invitation snapshot.
///
/// Callers must hand in a non-empty token; a missing token is the caller's
/// error and never reaches the resolver. A failed resolution is terminal for
/// that token: implementations must not retry in the background.
#[async_trait]
pub trait InvitationResolver: Send + Sync + 'static {
    async fn resolve(&self, token: &str) -> Result<Invitation, ResolveError>;
}

/// Reports whether the current caller is authenticated.
///
/// Returns `Ok(Session::anonymous())` for an unauthenticated caller; `Err`
/// is reserved for transport failures so callers can tell the two apart.
#[async_trait]
pub trait SessionProbe: Send + Sync + 'static {
    async fn probe(&self) -> Result<Session, ProbeTransportError>;
}

/// Invokes the external accept action for a resolved token.
///
/// The backing endpoint enforces at-most-once consumption: a token that was
/// already accepted yields `AcceptError::AlreadyAccepted`, which callers
/// treat as success.
#[async_trait]
pub trait AcceptAction: Send + Sync + 'static {
    async fn accept(&self, token: &str) -> Result<AcceptanceSummary, AcceptError>;
}
