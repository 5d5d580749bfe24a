//! `/status` and `/status/{coin}`: public, cache-memoized read of per-coin
//! operational parameters. Carries no authorization of its own.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::application::ports::{Cache, CoinSettingsRepository};

const STATUS_TTL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinStatus {
    pub coin_name: String,
    pub coin_type: String,
    pub enabled: bool,
    pub enable_create: bool,
    pub enable_deposit: bool,
    pub enable_withdraw: bool,
    pub confirmation_depth: i64,
    pub min_deposit: rust_decimal::Decimal,
    pub min_transfer: rust_decimal::Decimal,
    pub max_transfer: rust_decimal::Decimal,
    pub min_withdraw: rust_decimal::Decimal,
    pub max_withdraw: rust_decimal::Decimal,
    pub fee_withdraw: rust_decimal::Decimal,
    pub chain_height: i64,
}

impl From<&crate::domain::entities::CoinSetting> for CoinStatus {
    fn from(s: &crate::domain::entities::CoinSetting) -> Self {
        Self {
            coin_name: s.coin_name.clone(),
            coin_type: s.coin_type.to_string(),
            enabled: s.enabled,
            enable_create: s.enable_create,
            enable_deposit: s.enable_deposit,
            enable_withdraw: s.enable_withdraw,
            confirmation_depth: s.confirmation_depth,
            min_deposit: s.min_deposit,
            min_transfer: s.min_transfer,
            max_transfer: s.max_transfer,
            min_withdraw: s.min_withdraw,
            max_withdraw: s.max_withdraw,
            fee_withdraw: s.fee_withdraw,
            chain_height: s.chain_height,
        }
    }
}

pub struct StatusUseCase {
    coin_settings: Arc<dyn CoinSettingsRepository>,
    cache: Arc<dyn Cache>,
}

impl StatusUseCase {
    pub fn new(coin_settings: Arc<dyn CoinSettingsRepository>, cache: Arc<dyn Cache>) -> Self {
        Self {
            coin_settings,
            cache,
        }
    }

    pub async fn status_one(&self, coin_name: &str) -> Option<CoinStatus> {
        let cache_key = format!("status/{coin_name}");
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(status) = serde_json::from_str::<CoinStatus>(&cached) {
                return Some(status);
            }
        }

        let setting = self.coin_settings.get(coin_name).await?;
        let status = CoinStatus::from(&setting);
        if let Ok(serialized) = serde_json::to_string(&status) {
            self.cache.set(cache_key, serialized, STATUS_TTL).await;
        }
        Some(status)
    }

    pub async fn status_all(&self) -> Vec<CoinStatus> {
        self.coin_settings
            .all()
            .await
            .iter()
            .map(CoinStatus::from)
            .collect()
    }
}
