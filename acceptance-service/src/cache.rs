/// Seam for invalidating cached organization/membership data after a
/// successful acceptance, so the hosting app refetches instead of showing a
/// stale membership list.
pub trait MembershipCache: Send + Sync + 'static {
    fn invalidate_memberships(&self);
}

/// No-op implementation for hosts without a query cache.
pub struct NoopMembershipCache;

impl MembershipCache for NoopMembershipCache {
    fn invalidate_memberships(&self) {}
}
