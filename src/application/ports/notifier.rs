//! Port for C7's outbound notification half: fire-and-forget webhook calls
//! and the audit trail of every API invocation.

use async_trait::async_trait;

use crate::domain::entities::{ApiFailedLog, ApiLog};

#[derive(Debug, Clone)]
pub struct WebhookEvent {
    pub title: String,
    pub description: String,
}

#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    /// Best-effort delivery: callers never await failure, a dropped
    /// notification is not a request failure.
    async fn notify(&self, event: WebhookEvent);
}

#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn record_success(&self, entry: ApiLog);
    async fn record_failure(&self, entry: ApiFailedLog);
}
