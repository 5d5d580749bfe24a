//! `/newaddress` use case: idempotent address issuance per (coin, tag, api).

use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::{AddressRegistry, AddressRepository, CoinSettingsRepository, DriverLookup};
use crate::domain::entities::DepositAddress;
use crate::domain::services::Clock;

#[derive(Debug, Clone)]
pub struct IssueAddressCommand {
    pub api_id: Uuid,
    pub coin_name: String,
    pub tag: String,
    pub second_tag: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IssueAddressResult {
    pub address: DepositAddress,
    pub reused: bool,
}

pub struct IssueAddressUseCase<C: Clock> {
    clock: Arc<C>,
    addresses: Arc<dyn AddressRepository>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
    registry: Arc<dyn AddressRegistry>,
    drivers: Arc<dyn DriverLookup>,
}

impl<C: Clock> IssueAddressUseCase<C> {
    pub fn new(
        clock: Arc<C>,
        addresses: Arc<dyn AddressRepository>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        registry: Arc<dyn AddressRegistry>,
        drivers: Arc<dyn DriverLookup>,
    ) -> Self {
        Self {
            clock,
            addresses,
            coin_settings,
            registry,
            drivers,
        }
    }

    pub async fn execute(
        &self,
        cmd: IssueAddressCommand,
    ) -> Result<IssueAddressResult, IssueAddressError> {
        if cmd.tag.len() >= 100 {
            return Err(IssueAddressError::TagTooLong);
        }

        let settings = self
            .coin_settings
            .get(&cmd.coin_name)
            .await
            .ok_or(IssueAddressError::UnsupportedCoin)?;
        if !settings.enable_create {
            return Err(IssueAddressError::CreationDisabled);
        }

        if let Some(mut existing) = self
            .addresses
            .list_by_api(&cmd.api_id, &cmd.coin_name)
            .await
            .into_iter()
            .find(|a| a.tag == cmd.tag)
        {
            if existing.second_tag.is_none() {
                if let Some(second_tag) = cmd.second_tag.clone() {
                    existing.second_tag = Some(second_tag);
                    self.addresses.save(existing.clone()).await;
                }
            }
            return Ok(IssueAddressResult {
                address: existing,
                reused: true,
            });
        }

        let driver = self
            .drivers
            .driver_for(&cmd.coin_name)
            .await
            .ok_or(IssueAddressError::UnsupportedCoin)?;

        let made = driver
            .make_address(&settings.main_address, None)
            .await
            .map_err(|e| IssueAddressError::Backend(e.to_string()))?;

        let mut address = DepositAddress::new(
            cmd.api_id,
            cmd.coin_name.clone(),
            made.address,
            cmd.tag,
            self.clock.now(),
        );
        address.address_extra = made.extra;
        address.private_key = made.private_key;
        address.second_tag = cmd.second_tag;
        self.addresses.save(address.clone()).await;
        self.registry.refresh().await;

        Ok(IssueAddressResult {
            address,
            reused: false,
        })
    }
}

#[derive(Debug, Clone)]
pub enum IssueAddressError {
    UnsupportedCoin,
    CreationDisabled,
    TagTooLong,
    Backend(String),
}

impl std::fmt::Display for IssueAddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueAddressError::UnsupportedCoin => write!(f, "coin not in the supported list!"),
            IssueAddressError::CreationDisabled => write!(f, "address creation disabled for this coin."),
            IssueAddressError::TagTooLong => write!(f, "tag too long."),
            IssueAddressError::Backend(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for IssueAddressError {}
