//! Acceptance Coordinator for Plato Hiring organization invitations.
//!
//! Ties the invitation token resolver, the session probe and the external
//! accept action together into one state machine: resolve the token, gate on
//! authentication (stashing the invitation across the login round-trip), then
//! accept and schedule the post-success redirect.

pub mod cache;
pub mod config;
pub mod coordinator;
pub mod redirect;


pub use cache::{MembershipCache, NoopMembershipCache};
pub use config::CoordinatorConfig;
pub use coordinator::{AcceptanceCoordinator, AcceptanceRequest, CoordinatorState, RunOutcome};
pub use redirect::{Navigator, ScheduledRedirect};
