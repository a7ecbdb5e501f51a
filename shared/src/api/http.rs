use async_trait::async_trait;
use chrono::Utc;
use log::{debug, error, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::api::{AcceptAction, InvitationResolver, SessionProbe};
use crate::error::{AcceptError, ProbeTransportError, ResolveError};
use crate::models::{AcceptanceSummary, Invitation, InvitationStatus, Session};

const RESOLVE_ENDPOINT: &str = "/invitations/public";
const ACCEPT_ENDPOINT: &str = "/invitations/accept";
const AUTH_USER_ENDPOINT: &str = "/auth/user";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize, Debug)]
struct AcceptRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize, Debug)]
struct AuthUserResponse {
    id: String,
}

/// REST client for the Plato Hiring backend, implementing all three
/// collaborator traits against the public invitation and auth endpoints.
pub struct HiringApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl HiringApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Build a client around an existing `reqwest::Client` (shared pools,
    /// custom timeouts).
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl InvitationResolver for HiringApiClient {
    async fn resolve(&self, token: &str) -> Result<Invitation, ResolveError> {
        let url = format!("{}/{}", self.url(RESOLVE_ENDPOINT), token);
        debug!("Resolving invitation token via {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ResolveError::Upstream(format!("transport failure: {}", e)))?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => return Err(ResolveError::NotFound),
            StatusCode::GONE => return Err(ResolveError::Expired),
            StatusCode::FORBIDDEN => return Err(ResolveError::Revoked),
            s if !s.is_success() => {
                // Log the body for diagnosis but never surface it
                let body = response.text().await.unwrap_or_default();
                error!("Invitation resolution returned {}: {}", s, body);
                return Err(ResolveError::Upstream(format!("status {}", s)));
            }
            _ => {}
        }

        let invitation: Invitation = response
            .json()
            .await
            .map_err(|e| ResolveError::Upstream(format!("malformed invitation body: {}", e)))?;

        // A 200 payload can still describe a dead invitation
        match invitation.status {
            InvitationStatus::Expired => return Err(ResolveError::Expired),
            InvitationStatus::Revoked => return Err(ResolveError::Revoked),
            // A consumed token no longer resolves to a joinable invitation
            InvitationStatus::Accepted => return Err(ResolveError::NotFound),
            InvitationStatus::Pending => {}
        }
        if invitation.is_expired(Utc::now()) {
            return Err(ResolveError::Expired);
        }

        Ok(invitation)
    }
}

#[async_trait]
impl SessionProbe for HiringApiClient {
    async fn probe(&self) -> Result<Session, ProbeTransportError> {
        let url = self.url(AUTH_USER_ENDPOINT);
        debug!("Probing session via {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProbeTransportError(format!("transport failure: {}", e)))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Ok(Session::anonymous());
        }
        if !status.is_success() {
            // An auth backend failure is indistinguishable from a network
            // fault for our purposes: retryable, never a login redirect.
            warn!("Session probe returned {}", status);
            return Err(ProbeTransportError(format!("status {}", status)));
        }

        let user: AuthUserResponse = response
            .json()
            .await
            .map_err(|e| ProbeTransportError(format!("malformed user body: {}", e)))?;

        Ok(Session::authenticated(user.id))
    }
}

#[async_trait]
impl AcceptAction for HiringApiClient {
    async fn accept(&self, token: &str) -> Result<AcceptanceSummary, AcceptError> {
        let url = self.url(ACCEPT_ENDPOINT);
        debug!("Accepting invitation via {}", url);

        let response = self
            .client
            .post(&url)
            .json(&AcceptRequest { token })
            .send()
            .await
            .map_err(|e| AcceptError::Rejected(format!("transport failure: {}", e)))?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(AcceptError::AlreadyAccepted);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Invitation accept returned {}: {}", status, body);
            return Err(AcceptError::Rejected(format!("status {}", status)));
        }

        response
            .json()
            .await
            .map_err(|e| AcceptError::Rejected(format!("malformed accept body: {}", e)))
    }
}
