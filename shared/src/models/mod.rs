use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an invitation. Transitions are monotonic:
/// `Pending` may become `Accepted`, `Expired` or `Revoked`, never the reverse.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Expired,
    Revoked,
}

/// Immutable snapshot of an invitation as resolved from its token.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Invitation {
    pub token: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    #[serde(rename = "organizationName")]
    pub organization_name: String,
    pub role: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: String, // RFC 3339, server-defined instant
    pub status: InvitationStatus,
}

impl Invitation {
    /// True when `expires_at` parses and lies in the past. An unparsable
    /// expiry is treated as expired rather than open-ended.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(dt) => dt.with_timezone(&Utc) < now,
            Err(_) => true,
        }
    }

    pub fn organization(&self) -> OrganizationSummary {
        OrganizationSummary {
            id: self.organization_id.clone(),
            name: self.organization_name.clone(),
        }
    }
}

/// Authentication state of the current caller. Owned by the external auth
/// collaborator; this subsystem only reads it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Session {
    #[serde(rename = "isAuthenticated")]
    pub is_authenticated: bool,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl Session {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            user_id: Some(user_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            user_id: None,
        }
    }
}

/// In-flight invitation parameters stashed across the login round-trip.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PendingInvitationRecord {
    pub token: String,
    #[serde(rename = "organizationId")]
    pub organization_id: String,
    pub role: String,
    pub timestamp: i64, // epoch milliseconds
}

impl PendingInvitationRecord {
    pub fn new(
        token: impl Into<String>,
        organization_id: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            token: token.into(),
            organization_id: organization_id.into(),
            role: role.into(),
            timestamp: epoch_ms(),
        }
    }

    /// A record older than `ttl_ms` must be treated as absent.
    pub fn is_stale(&self, now_ms: i64, ttl_ms: i64) -> bool {
        now_ms - self.timestamp > ttl_ms
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrganizationSummary {
    pub id: String,
    pub name: String,
}

/// Response body of the accept action: confirmation message plus the
/// organization the caller just joined.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AcceptanceSummary {
    pub message: String,
    pub organization: OrganizationSummary,
}

// Error body shape used by the REST collaborators
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

// Helper function to get current timestamp as string
pub fn now_str() -> String {
    Utc::now().to_rfc3339()
}

// Helper function to get current time as epoch milliseconds
pub fn epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}
