//! Port for the per-coin configuration table (C2).

use async_trait::async_trait;

use crate::domain::entities::CoinSetting;

#[async_trait]
pub trait CoinSettingsRepository: Send + Sync {
    async fn get(&self, coin_name: &str) -> Option<CoinSetting>;
    async fn all(&self) -> Vec<CoinSetting>;
    /// Replace the whole table, as done by the reconciler's config-reload tick.
    async fn reload(&self, settings: Vec<CoinSetting>);
    /// Record a fresh chain tip observed for one coin (authoritative height,
    /// consulted directly by `promote_confirmed` rather than through the cache).
    async fn record_tip(&self, coin_name: &str, height: i64, now: crate::domain::value_objects::Timestamp);
}
