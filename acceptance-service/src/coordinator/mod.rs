use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::watch;

use hiring_shared::api::{AcceptAction, InvitationResolver, SessionProbe};
use hiring_shared::error::{
    AcceptError, ACCEPT_FAILED_MESSAGE, INVALID_INVITATION_MESSAGE, MISSING_TOKEN_MESSAGE,
    SESSION_UNAVAILABLE_MESSAGE,
};
use hiring_shared::models::{AcceptanceSummary, Invitation, PendingInvitationRecord};
use hiring_shared::pending::PendingInvitationStore;

use crate::cache::MembershipCache;
use crate::config::CoordinatorConfig;
use crate::redirect::{Navigator, ScheduledRedirect};

/// Observable state of a coordinator run. Published over a watch channel so
/// the hosting view can render a loading indicator at every suspension point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordinatorState {
    Init,
    ResolvingToken,
    TokenInvalid,
    CheckingSession,
    Unauthenticated,
    ResolvingAccept,
    AcceptSuccess,
    AcceptFailure,
}

/// Incoming request parameters for an acceptance run. The token is the only
/// thing that can trigger acceptance; `organization_id` and `role` are
/// display-only hints carried by some invitation links.
#[derive(Clone, Debug, Default)]
pub struct AcceptanceRequest {
    pub token: Option<String>,
    pub organization_id: Option<String>,
    pub role: Option<String>,
}

impl AcceptanceRequest {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }
}

/// Discriminated result of a coordinator run. Errors never escape uncaught:
/// every terminal state maps to a variant with a user-facing message and a
/// recovery action.
#[derive(Debug)]
pub enum RunOutcome {
    /// Missing token or failed resolution. Not retryable for this token.
    TokenInvalid { message: String },

    /// The session probe hit a transport failure. Retryable by re-running;
    /// distinct from "not signed in" so the caller is never bounced to login
    /// over a flaky network.
    SessionUnavailable { message: String },

    /// Caller is not signed in. The pending record was stashed and the
    /// navigator pointed at the login page; `return_to` re-enters this flow
    /// after login.
    RedirectToLogin { login_url: String, return_to: String },

    /// Invitation accepted (or found already accepted). The home redirect is
    /// armed; dropping the handle cancels it.
    Accepted {
        summary: AcceptanceSummary,
        redirect: ScheduledRedirect,
    },

    /// The accept action failed. The carried snapshot feeds `retry_accept`.
    AcceptFailed {
        message: String,
        invitation: Invitation,
    },

    /// A newer run started while this one was suspended; its result was
    /// discarded without side effects.
    Superseded,
}

/// The state machine tying token resolution, auth gating and the accept
/// action together.
///
/// The coordinator exclusively owns the pending-invitation slot's write and
/// delete lifecycle; the resolver and probe are read-only collaborators.
/// Overlapping runs are serialized by a generation counter: each collaborator
/// result is discarded if a newer run has started in the meantime.
pub struct AcceptanceCoordinator<R, S, A, P> {
    resolver: Arc<R>,
    probe: Arc<S>,
    accept: Arc<A>,
    pending: Arc<P>,
    navigator: Arc<dyn Navigator>,
    cache: Arc<dyn MembershipCache>,
    config: CoordinatorConfig,
    generation: AtomicU64,
    state_tx: watch::Sender<CoordinatorState>,
}

impl<R, S, A, P> AcceptanceCoordinator<R, S, A, P>
where
    R: InvitationResolver,
    S: SessionProbe,
    A: AcceptAction,
    P: PendingInvitationStore,
{
    pub fn new(
        resolver: Arc<R>,
        probe: Arc<S>,
        accept: Arc<A>,
        pending: Arc<P>,
        navigator: Arc<dyn Navigator>,
        cache: Arc<dyn MembershipCache>,
        config: CoordinatorConfig,
    ) -> Self {
        let (state_tx, _) = watch::channel(CoordinatorState::Init);
        Self {
            resolver,
            probe,
            accept,
            pending,
            navigator,
            cache,
            config,
            generation: AtomicU64::new(0),
            state_tx,
        }
    }

    /// Subscribe to state transitions of the current run.
    pub fn state(&self) -> watch::Receiver<CoordinatorState> {
        self.state_tx.subscribe()
    }

    /// Run the acceptance flow for an incoming request.
    ///
    /// Token precedence: the URL token when present, otherwise a fresh
    /// pending record stashed by a pre-login run. The session probe is only
    /// invoked after the token has resolved, so the accept call always has
    /// the invitation's organization context.
    pub async fn run(&self, request: AcceptanceRequest) -> RunOutcome {
        let generation = self.begin_run();
        self.publish(generation, CoordinatorState::Init);

        let (token, from_pending) = match request.token.filter(|t| !t.is_empty()) {
            Some(token) => (token, false),
            None => match self.pending.get() {
                Some(record) => {
                    info!("Re-entering acceptance flow with stashed invitation");
                    (record.token, true)
                }
                None => {
                    warn!("No invitation token in request or pending slot");
                    self.publish(generation, CoordinatorState::TokenInvalid);
                    return RunOutcome::TokenInvalid {
                        message: MISSING_TOKEN_MESSAGE.to_string(),
                    };
                }
            },
        };

        self.publish(generation, CoordinatorState::ResolvingToken);
        let resolved = self.resolver.resolve(&token).await;
        if !self.is_current(generation) {
            debug!("Discarding stale resolution result");
            return RunOutcome::Superseded;
        }
        let invitation = match resolved {
            Ok(invitation) => invitation,
            Err(e) => {
                error!("Invitation resolution failed: {}", e);
                if from_pending {
                    // A dead token must not wedge the slot for later entries
                    self.pending.clear();
                }
                self.publish(generation, CoordinatorState::TokenInvalid);
                return RunOutcome::TokenInvalid {
                    message: INVALID_INVITATION_MESSAGE.to_string(),
                };
            }
        };

        self.publish(generation, CoordinatorState::CheckingSession);
        let probed = self.probe.probe().await;
        if !self.is_current(generation) {
            debug!("Discarding stale session probe result");
            return RunOutcome::Superseded;
        }
        let session = match probed {
            Ok(session) => session,
            Err(e) => {
                warn!("Session probe failed: {}", e);
                return RunOutcome::SessionUnavailable {
                    message: SESSION_UNAVAILABLE_MESSAGE.to_string(),
                };
            }
        };

        if !session.is_authenticated {
            // Stash the invitation before control leaves for the login page
            let record = PendingInvitationRecord::new(
                invitation.token.clone(),
                invitation.organization_id.clone(),
                invitation.role.clone(),
            );
            if let Err(e) = self.pending.put(record) {
                error!("Failed to stash pending invitation: {}", e);
            }
            self.publish(generation, CoordinatorState::Unauthenticated);

            let return_to = format!("/accept-invitation?token={}", invitation.token);
            let login_url = format!("{}?returnTo={}", self.config.login_path, return_to);
            info!("Redirecting unauthenticated caller to login");
            self.navigator.navigate(&login_url);
            return RunOutcome::RedirectToLogin {
                login_url,
                return_to,
            };
        }

        // Direct token link plus live session: auto-accept, no second click
        self.resolve_accept(generation, &invitation).await
    }

    /// Manual retry affordance after `AcceptFailed`: re-enters the accept
    /// phase with the already-resolved invitation, as a new run.
    pub async fn retry_accept(&self, invitation: &Invitation) -> RunOutcome {
        let generation = self.begin_run();
        self.resolve_accept(generation, invitation).await
    }

    async fn resolve_accept(&self, generation: u64, invitation: &Invitation) -> RunOutcome {
        self.publish(generation, CoordinatorState::ResolvingAccept);
        let result = self.accept.accept(&invitation.token).await;
        if !self.is_current(generation) {
            debug!("Discarding stale accept result");
            return RunOutcome::Superseded;
        }

        // Win or lose, the attempt happened: the stash has served its purpose
        self.pending.clear();

        let summary = match result {
            Ok(summary) => summary,
            Err(AcceptError::AlreadyAccepted) => {
                // A consumed token means the membership already exists;
                // converge on success instead of scaring the user
                info!(
                    "Invitation for {} was already accepted",
                    invitation.organization_name
                );
                AcceptanceSummary {
                    message: format!(
                        "You are already a member of {}",
                        invitation.organization_name
                    ),
                    organization: invitation.organization(),
                }
            }
            Err(e) => {
                error!("Invitation acceptance failed: {}", e);
                self.publish(generation, CoordinatorState::AcceptFailure);
                return RunOutcome::AcceptFailed {
                    message: ACCEPT_FAILED_MESSAGE.to_string(),
                    invitation: invitation.clone(),
                };
            }
        };

        self.cache.invalidate_memberships();
        self.publish(generation, CoordinatorState::AcceptSuccess);
        info!(
            "Joined {} as {}",
            summary.organization.name, invitation.role
        );

        let redirect = ScheduledRedirect::schedule(
            Arc::clone(&self.navigator),
            self.config.home_path.clone(),
            self.config.redirect_delay,
        );
        RunOutcome::Accepted { summary, redirect }
    }

    fn begin_run(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn publish(&self, generation: u64, state: CoordinatorState) {
        if self.is_current(generation) {
            let _ = self.state_tx.send_replace(state);
        }
    }
}
