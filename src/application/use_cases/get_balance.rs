//! `/balance` use case.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::{AddressRegistry, CoinSettingsRepository};
use crate::domain::entities::BalanceView;

#[derive(Debug, Clone)]
pub struct GetBalanceQuery {
    pub api_id: Uuid,
    pub coin_name: String,
    pub address: String,
}

pub struct GetBalanceUseCase {
    registry: Arc<dyn AddressRegistry>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
}

impl GetBalanceUseCase {
    pub fn new(registry: Arc<dyn AddressRegistry>, coin_settings: Arc<dyn CoinSettingsRepository>) -> Self {
        Self {
            registry,
            coin_settings,
        }
    }

    pub async fn execute(&self, query: GetBalanceQuery) -> Result<BalanceView, GetBalanceError> {
        let settings = self
            .coin_settings
            .get(&query.coin_name)
            .await
            .ok_or(GetBalanceError::UnsupportedCoin)?;

        let address = self
            .registry
            .lookup(&query.coin_name, &query.address)
            .await
            .ok_or(GetBalanceError::NotFound)?;

        if address.api_id != query.api_id {
            return Err(GetBalanceError::Forbidden);
        }

        Ok(address.balance_view(settings.round_places))
    }
}

#[derive(Debug, Clone)]
pub enum GetBalanceError {
    UnsupportedCoin,
    NotFound,
    Forbidden,
}

impl std::fmt::Display for GetBalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GetBalanceError::UnsupportedCoin => write!(f, "coin not in the supported list!"),
            GetBalanceError::NotFound => write!(f, "address not found."),
            GetBalanceError::Forbidden => write!(f, "you do not own this address."),
        }
    }
}

impl std::error::Error for GetBalanceError {}
