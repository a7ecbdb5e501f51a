use chrono::{Duration, Utc};

use crate::api::{AcceptAction, InvitationResolver, SessionProbe};
use crate::error::{AcceptError, ProbeTransportError, ResolveError};
use crate::models::{Invitation, InvitationStatus, OrganizationSummary};
use crate::test_utils::mock_api::{
    MockAcceptAction, MockInvitationResolver, MockSessionProbe, ProbeBehavior,
};
use crate::test_utils::test_logging::init_test_logging;

fn pending_invitation(token: &str, hours_from_now: i64) -> Invitation {
    Invitation {
        token: token.to_string(),
        organization_id: "org1".to_string(),
        organization_name: "Acme Hiring".to_string(),
        role: "recruiter".to_string(),
        expires_at: (Utc::now() + Duration::hours(hours_from_now)).to_rfc3339(),
        status: InvitationStatus::Pending,
    }
}

fn acme() -> OrganizationSummary {
    OrganizationSummary {
        id: "org1".to_string(),
        name: "Acme Hiring".to_string(),
    }
}

#[tokio::test]
async fn test_mock_resolver_returns_seeded_invitation() {
    init_test_logging();

    let resolver = MockInvitationResolver::with_data(vec![pending_invitation("abc123", 48)]);

    let invitation = resolver.resolve("abc123").await.unwrap();
    assert_eq!(invitation.organization_id, "org1");
    assert_eq!(invitation.role, "recruiter");
    assert_eq!(resolver.call_count(), 1);
}

#[tokio::test]
async fn test_mock_resolver_unknown_token_is_not_found() {
    init_test_logging();

    let resolver = MockInvitationResolver::new();

    let err = resolver.resolve("nope").await.unwrap_err();
    assert!(matches!(err, ResolveError::NotFound));
}

#[tokio::test]
async fn test_mock_resolver_enforces_expiry() {
    init_test_logging();

    let resolver = MockInvitationResolver::with_data(vec![pending_invitation("old", -1)]);

    let err = resolver.resolve("old").await.unwrap_err();
    assert!(matches!(err, ResolveError::Expired));
}

#[tokio::test]
async fn test_mock_resolver_maps_dead_statuses() {
    init_test_logging();

    let mut revoked = pending_invitation("revoked", 48);
    revoked.status = InvitationStatus::Revoked;
    let mut consumed = pending_invitation("consumed", 48);
    consumed.status = InvitationStatus::Accepted;

    let resolver = MockInvitationResolver::with_data(vec![revoked, consumed]);

    assert!(matches!(
        resolver.resolve("revoked").await.unwrap_err(),
        ResolveError::Revoked
    ));
    assert!(matches!(
        resolver.resolve("consumed").await.unwrap_err(),
        ResolveError::NotFound
    ));
}

#[tokio::test]
async fn test_mock_probe_distinguishes_anonymous_from_failure() {
    init_test_logging();

    let probe = MockSessionProbe::anonymous();
    let session = probe.probe().await.unwrap();
    assert!(!session.is_authenticated);
    assert_eq!(session.user_id, None);

    probe.set_behavior(ProbeBehavior::TransportFailure);
    let err = probe.probe().await.unwrap_err();
    let ProbeTransportError(detail) = err;
    assert!(!detail.is_empty());
    assert_eq!(probe.call_count(), 2);
}

#[tokio::test]
async fn test_mock_probe_login_round_trip() {
    init_test_logging();

    let probe = MockSessionProbe::anonymous();
    assert!(!probe.probe().await.unwrap().is_authenticated);

    probe.set_behavior(ProbeBehavior::Authenticated("user-1".to_string()));
    let session = probe.probe().await.unwrap();
    assert!(session.is_authenticated);
    assert_eq!(session.user_id.as_deref(), Some("user-1"));
}

#[tokio::test]
async fn test_mock_accept_consumes_token_once() {
    init_test_logging();

    let accept = MockAcceptAction::new(acme());

    let summary = accept.accept("abc123").await.unwrap();
    assert_eq!(summary.organization.id, "org1");

    // Second raw call must not create a second membership
    let err = accept.accept("abc123").await.unwrap_err();
    assert!(matches!(err, AcceptError::AlreadyAccepted));
    assert_eq!(accept.call_count(), 2);
    assert_eq!(accept.memberships(), vec!["abc123".to_string()]);
}

#[tokio::test]
async fn test_mock_accept_error_mode() {
    init_test_logging();

    let accept = MockAcceptAction::new_error(acme());

    let err = accept.accept("abc123").await.unwrap_err();
    assert!(matches!(err, AcceptError::Rejected(_)));
    assert!(accept.memberships().is_empty());
}
