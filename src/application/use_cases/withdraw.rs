//! `/withdraw` use case.

use std::sync::Arc;

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::application::ports::{
    AddressRegistry, AddressRepository, CoinSettingsRepository, DriverLookup, WebhookEvent,
    WebhookNotifier, WithdrawRepository,
};
use crate::domain::entities::Withdraw;
use crate::domain::services::Clock;

#[derive(Debug, Clone)]
pub struct WithdrawCommand {
    pub api_id: Uuid,
    pub coin_name: String,
    pub from_address: String,
    pub to_address: String,
    pub amount: Decimal,
    pub remark: String,
}

#[derive(Debug, Clone)]
pub struct WithdrawResult {
    pub txid: String,
    pub ref_uuid: String,
}

pub struct WithdrawUseCase<C: Clock> {
    clock: Arc<C>,
    addresses: Arc<dyn AddressRepository>,
    withdraws: Arc<dyn WithdrawRepository>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
    registry: Arc<dyn AddressRegistry>,
    drivers: Arc<dyn DriverLookup>,
    webhook: Arc<dyn WebhookNotifier>,
}

impl<C: Clock> WithdrawUseCase<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<C>,
        addresses: Arc<dyn AddressRepository>,
        withdraws: Arc<dyn WithdrawRepository>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        registry: Arc<dyn AddressRegistry>,
        drivers: Arc<dyn DriverLookup>,
        webhook: Arc<dyn WebhookNotifier>,
    ) -> Self {
        Self {
            clock,
            addresses,
            withdraws,
            coin_settings,
            registry,
            drivers,
            webhook,
        }
    }

    pub async fn execute(&self, cmd: WithdrawCommand) -> Result<WithdrawResult, WithdrawError> {
        if cmd.remark.len() > 100 {
            return Err(WithdrawError::RemarkTooLong);
        }

        let settings = self
            .coin_settings
            .get(&cmd.coin_name)
            .await
            .ok_or_else(|| WithdrawError::UnsupportedCoin(cmd.coin_name.clone()))?;
        if !settings.enable_withdraw {
            return Err(WithdrawError::WithdrawDisabled);
        }
        if cmd.amount < settings.min_withdraw || cmd.amount > settings.max_withdraw {
            return Err(WithdrawError::AmountOutOfRange);
        }

        if self.registry.is_known(&cmd.coin_name, &cmd.to_address).await {
            return Err(WithdrawError::InternalDestination(
                cmd.coin_name.clone(),
                cmd.to_address.clone(),
            ));
        }

        let mut from = self
            .registry
            .lookup(&cmd.coin_name, &cmd.from_address)
            .await
            .ok_or(WithdrawError::NotFound)?;
        if from.api_id != cmd.api_id {
            return Err(WithdrawError::Forbidden);
        }

        let total = cmd.amount + settings.fee_withdraw;
        if total > from.raw_balance() {
            return Err(WithdrawError::InsufficientBalance);
        }

        let driver = self
            .drivers
            .driver_for(&cmd.coin_name)
            .await
            .ok_or_else(|| WithdrawError::UnsupportedCoin(cmd.coin_name.clone()))?;

        let sent = match driver
            .send_external(&cmd.from_address, &cmd.to_address, cmd.amount, &settings)
            .await
        {
            Ok(sent) => sent,
            Err(err) => {
                let event = WebhookEvent {
                    title: format!("withdraw failed: {}", cmd.coin_name),
                    description: err.to_string(),
                };
                self.webhook.notify(event.clone()).await;
                return Err(WithdrawError::Backend(err.to_string(), event));
            }
        };

        from.debit_withdraw(cmd.amount, settings.fee_withdraw);
        self.addresses.save(from.clone()).await;

        let withdraw = Withdraw::new(
            cmd.api_id,
            cmd.coin_name.clone(),
            cmd.from_address.clone(),
            cmd.amount,
            settings.fee_withdraw,
            from.id,
            cmd.to_address.clone(),
            sent.hash.clone(),
            sent.key.clone(),
            cmd.remark,
            self.clock.now(),
        );
        let ref_uuid = withdraw.ref_uuid.to_string();
        self.withdraws.save(withdraw).await;
        self.registry.refresh().await;

        self.webhook
            .notify(WebhookEvent {
                title: format!("withdraw: {}", cmd.coin_name),
                description: format!(
                    "{} {} from {} to {}, tx {}",
                    cmd.amount, cmd.coin_name, cmd.from_address, cmd.to_address, sent.hash
                ),
            })
            .await;

        Ok(WithdrawResult {
            txid: sent.hash,
            ref_uuid,
        })
    }
}

#[derive(Debug, Clone)]
pub enum WithdrawError {
    UnsupportedCoin(String),
    WithdrawDisabled,
    RemarkTooLong,
    AmountOutOfRange,
    InternalDestination(String, String),
    NotFound,
    Forbidden,
    InsufficientBalance,
    Backend(String, WebhookEvent),
}

impl std::fmt::Display for WithdrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WithdrawError::UnsupportedCoin(coin) => write!(f, "coin {coin} not in the supported list!"),
            WithdrawError::WithdrawDisabled => write!(f, "withdraw disabled for this coin."),
            WithdrawError::RemarkTooLong => write!(f, "remark too long."),
            WithdrawError::AmountOutOfRange => write!(f, "amount outside allowed range."),
            WithdrawError::InternalDestination(coin, to_address) => write!(
                f,
                "{coin}, you can not send to address {to_address}. You might need to call /transfer instead"
            ),
            WithdrawError::NotFound => write!(f, "address not found."),
            WithdrawError::Forbidden => write!(f, "you do not own this address."),
            WithdrawError::InsufficientBalance => write!(f, "insufficient balance."),
            WithdrawError::Backend(msg, _) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for WithdrawError {}
