//! Port for resolving the coin-backend driver (C1) to talk to for a given
//! coin. Concrete drivers are constructed once, at startup, from each
//! `CoinSetting.coin_type`; this port is just the lookup table.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::services::Driver;

#[async_trait]
pub trait DriverLookup: Send + Sync {
    async fn driver_for(&self, coin_name: &str) -> Option<Arc<dyn Driver>>;
}
