use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;

use crate::api::{AcceptAction, InvitationResolver, SessionProbe};
use crate::error::{AcceptError, ProbeTransportError, ResolveError};
use crate::models::{AcceptanceSummary, Invitation, InvitationStatus, OrganizationSummary, Session};

/// Mock implementation of InvitationResolver for testing.
///
/// Enforces status and expiry on every lookup, so an expired or revoked
/// invitation in the seed data resolves to the matching error.
pub struct MockInvitationResolver {
    invitations: Mutex<HashMap<String, Invitation>>,
    error_mode: bool,
    latency: Option<Duration>,
    calls: AtomicUsize,
}

impl MockInvitationResolver {
    pub fn new() -> Self {
        Self {
            invitations: Mutex::new(HashMap::new()),
            error_mode: false,
            latency: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Create a MockInvitationResolver with initial data
    pub fn with_data(invitations: Vec<Invitation>) -> Self {
        let resolver = Self::new();
        {
            let mut map = resolver.invitations.lock().unwrap();
            for invitation in invitations {
                map.insert(invitation.token.clone(), invitation);
            }
        }
        resolver
    }

    /// Create a resolver in error mode where every lookup fails upstream
    pub fn new_error() -> Self {
        Self {
            error_mode: true,
            ..Self::new()
        }
    }

    /// Add an await point of `latency` before answering, so overlapping
    /// coordinator runs interleave deterministically in tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockInvitationResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InvitationResolver for MockInvitationResolver {
    async fn resolve(&self, token: &str) -> Result<Invitation, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.error_mode {
            return Err(ResolveError::Upstream("Mock".into()));
        }

        let invitation = self
            .invitations
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(ResolveError::NotFound)?;

        match invitation.status {
            InvitationStatus::Expired => return Err(ResolveError::Expired),
            InvitationStatus::Revoked => return Err(ResolveError::Revoked),
            InvitationStatus::Accepted => return Err(ResolveError::NotFound),
            InvitationStatus::Pending => {}
        }
        if invitation.is_expired(Utc::now()) {
            return Err(ResolveError::Expired);
        }

        Ok(invitation)
    }
}

/// What the mock session probe answers with.
#[derive(Clone, Debug)]
pub enum ProbeBehavior {
    Authenticated(String),
    Anonymous,
    TransportFailure,
}

/// Mock implementation of SessionProbe for testing. The behavior can be
/// flipped mid-test to simulate a login round-trip.
pub struct MockSessionProbe {
    behavior: Mutex<ProbeBehavior>,
    calls: AtomicUsize,
}

impl MockSessionProbe {
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::with_behavior(ProbeBehavior::Authenticated(user_id.into()))
    }

    pub fn anonymous() -> Self {
        Self::with_behavior(ProbeBehavior::Anonymous)
    }

    pub fn transport_failure() -> Self {
        Self::with_behavior(ProbeBehavior::TransportFailure)
    }

    fn with_behavior(behavior: ProbeBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_behavior(&self, behavior: ProbeBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionProbe for MockSessionProbe {
    async fn probe(&self) -> Result<Session, ProbeTransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior.lock().unwrap().clone() {
            ProbeBehavior::Authenticated(user_id) => Ok(Session::authenticated(user_id)),
            ProbeBehavior::Anonymous => Ok(Session::anonymous()),
            ProbeBehavior::TransportFailure => {
                Err(ProbeTransportError("Mock transport failure".into()))
            }
        }
    }
}

/// Mock implementation of AcceptAction for testing.
///
/// Consumes each token at most once: the first call joins the organization,
/// every later call for the same token answers `AlreadyAccepted` without a
/// second membership side effect.
pub struct MockAcceptAction {
    organization: OrganizationSummary,
    accepted: Mutex<HashSet<String>>,
    memberships: Mutex<Vec<String>>,
    error_mode: bool,
    fail_first: AtomicUsize,
    calls: AtomicUsize,
}

impl MockAcceptAction {
    pub fn new(organization: OrganizationSummary) -> Self {
        Self {
            organization,
            accepted: Mutex::new(HashSet::new()),
            memberships: Mutex::new(Vec::new()),
            error_mode: false,
            fail_first: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    /// Create an accept action in error mode where every call is rejected
    pub fn new_error(organization: OrganizationSummary) -> Self {
        Self {
            error_mode: true,
            ..Self::new(organization)
        }
    }

    /// Create an accept action that rejects the first `failures` calls and
    /// succeeds afterwards, for exercising the manual retry path.
    pub fn new_flaky(organization: OrganizationSummary, failures: usize) -> Self {
        let action = Self::new(organization);
        action.fail_first.store(failures, Ordering::SeqCst);
        action
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Tokens for which a membership was actually created.
    pub fn memberships(&self) -> Vec<String> {
        self.memberships.lock().unwrap().clone()
    }
}

#[async_trait]
impl AcceptAction for MockAcceptAction {
    async fn accept(&self, token: &str) -> Result<AcceptanceSummary, AcceptError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.error_mode {
            return Err(AcceptError::Rejected("Mock".into()));
        }
        if self
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(AcceptError::Rejected("Mock transient failure".into()));
        }

        if !self.accepted.lock().unwrap().insert(token.to_string()) {
            return Err(AcceptError::AlreadyAccepted);
        }
        self.memberships.lock().unwrap().push(token.to_string());

        Ok(AcceptanceSummary {
            message: format!("You have joined {}", self.organization.name),
            organization: self.organization.clone(),
        })
    }
}
