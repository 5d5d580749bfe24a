//! Append-only success/failure audit trail (C7). Backed by an in-memory
//! ring buffer; a hardened deployment would swap this for a durable
//! ledger-adjacent table without touching the port.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::AuditLog;
use crate::domain::entities::{ApiFailedLog, ApiLog};

const LOG_CAPACITY: usize = 10_000;

pub struct InMemoryAuditLog {
    successes: Arc<Mutex<Vec<ApiLog>>>,
    failures: Arc<Mutex<Vec<ApiFailedLog>>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            successes: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn recent_successes(&self, limit: usize) -> Vec<ApiLog> {
        let log = self.successes.lock();
        log.iter().rev().take(limit).cloned().collect()
    }

    pub fn recent_failures(&self, limit: usize) -> Vec<ApiFailedLog> {
        let log = self.failures.lock();
        log.iter().rev().take(limit).cloned().collect()
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditLog for InMemoryAuditLog {
    async fn record_success(&self, entry: ApiLog) {
        let mut log = self.successes.lock();
        if log.len() >= LOG_CAPACITY {
            log.remove(0);
        }
        log.push(entry);
    }

    async fn record_failure(&self, entry: ApiFailedLog) {
        let mut log = self.failures.lock();
        if log.len() >= LOG_CAPACITY {
            log.remove(0);
        }
        log.push(entry);
    }
}
