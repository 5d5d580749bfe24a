//! `/hold_alance` use case: reserve part of an address's spendable balance.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::{
    AddressRegistry, AddressRepository, CoinSettingsRepository, HoldRepository, WebhookEvent,
    WebhookNotifier,
};
use crate::domain::entities::Hold;
use crate::domain::services::Clock;

#[derive(Debug, Clone)]
pub struct HoldBalanceCommand {
    pub api_id: Uuid,
    pub coin_name: String,
    pub address: String,
    pub amount: Decimal,
    pub expiring_secs: i64,
    pub purpose: String,
}

pub struct HoldBalanceUseCase<C: Clock> {
    clock: Arc<C>,
    addresses: Arc<dyn AddressRepository>,
    holds: Arc<dyn HoldRepository>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
    registry: Arc<dyn AddressRegistry>,
    webhook: Arc<dyn WebhookNotifier>,
}

impl<C: Clock> HoldBalanceUseCase<C> {
    pub fn new(
        clock: Arc<C>,
        addresses: Arc<dyn AddressRepository>,
        holds: Arc<dyn HoldRepository>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        registry: Arc<dyn AddressRegistry>,
        webhook: Arc<dyn WebhookNotifier>,
    ) -> Self {
        Self {
            clock,
            addresses,
            holds,
            coin_settings,
            registry,
            webhook,
        }
    }

    /// Ownership is checked before the balance is touched, matching every
    /// other address-scoped endpoint: an address the caller doesn't own
    /// surfaces as `Forbidden`, never as an arithmetic or internal error.
    pub async fn execute(&self, cmd: HoldBalanceCommand) -> Result<Hold, HoldBalanceError> {
        let _settings = self
            .coin_settings
            .get(&cmd.coin_name)
            .await
            .ok_or(HoldBalanceError::UnsupportedCoin)?;

        let mut address = self
            .registry
            .lookup(&cmd.coin_name, &cmd.address)
            .await
            .ok_or(HoldBalanceError::NotFound)?;
        if address.api_id != cmd.api_id {
            return Err(HoldBalanceError::Forbidden);
        }

        if cmd.amount < Decimal::ZERO {
            return Err(HoldBalanceError::NegativeAmount);
        }
        if cmd.amount > address.raw_balance() {
            return Err(HoldBalanceError::InsufficientBalance);
        }

        let hold = Hold::new(
            cmd.coin_name.clone(),
            cmd.api_id,
            address.id,
            cmd.address.clone(),
            cmd.amount,
            cmd.expiring_secs,
            cmd.purpose,
            self.clock.now(),
        );

        address.place_hold(cmd.amount);
        self.addresses.save(address).await;
        self.holds.save(hold.clone()).await;
        self.registry.refresh().await;

        self.webhook
            .notify(WebhookEvent {
                title: format!("hold placed: {}", cmd.coin_name),
                description: format!("{} held on {} until {}", hold.hold_amount, cmd.address, hold.time_expiring),
            })
            .await;

        Ok(hold)
    }
}

#[derive(Debug, Clone)]
pub enum HoldBalanceError {
    UnsupportedCoin,
    NotFound,
    Forbidden,
    NegativeAmount,
    InsufficientBalance,
}

impl std::fmt::Display for HoldBalanceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HoldBalanceError::UnsupportedCoin => write!(f, "coin not in the supported list!"),
            HoldBalanceError::NotFound => write!(f, "address not found."),
            HoldBalanceError::Forbidden => write!(f, "you do not own this address."),
            HoldBalanceError::NegativeAmount => write!(f, "amount must be non-negative."),
            HoldBalanceError::InsufficientBalance => write!(f, "insufficient balance."),
        }
    }
}

impl std::error::Error for HoldBalanceError {}
