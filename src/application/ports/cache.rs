//! Port for the process-wide, best-effort TTL cache (C3).
//!
//! Losing an entry must never produce incorrect behavior, only extra
//! backend traffic or recomputation — see `promote_confirmed`'s deliberate
//! bypass of this cache in `infrastructure::reconciler`.

use async_trait::async_trait;

#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: String, value: String, ttl: std::time::Duration);
    async fn invalidate(&self, key: &str);
}
