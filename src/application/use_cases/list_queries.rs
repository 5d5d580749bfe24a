//! Read-only history endpoints: `/list_transactions`, `/list_withdraws`,
//! `/list_address`. All are ownership-scoped, capped at 500 rows, newest first.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::ports::{
    AddressReader, AddressRegistry, DepositReader, WithdrawReader,
};
use crate::domain::entities::{Deposit, DepositAddress, Withdraw};

const LIST_LIMIT: usize = 500;

#[derive(Debug, Clone)]
pub enum ListQueriesError {
    UnsupportedCoin,
    NotFound,
    Forbidden,
}

impl std::fmt::Display for ListQueriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListQueriesError::UnsupportedCoin => write!(f, "coin not in the supported list!"),
            ListQueriesError::NotFound => write!(f, "address not found."),
            ListQueriesError::Forbidden => write!(f, "you do not own this address."),
        }
    }
}

impl std::error::Error for ListQueriesError {}

pub struct ListQueriesUseCase {
    addresses: Arc<dyn AddressReader>,
    deposits: Arc<dyn DepositReader>,
    withdraws: Arc<dyn WithdrawReader>,
    registry: Arc<dyn AddressRegistry>,
}

impl ListQueriesUseCase {
    pub fn new(
        addresses: Arc<dyn AddressReader>,
        deposits: Arc<dyn DepositReader>,
        withdraws: Arc<dyn WithdrawReader>,
        registry: Arc<dyn AddressRegistry>,
    ) -> Self {
        Self {
            addresses,
            deposits,
            withdraws,
            registry,
        }
    }

    async fn owned_address(
        &self,
        api_id: Uuid,
        coin_name: &str,
        address: &str,
    ) -> Result<DepositAddress, ListQueriesError> {
        let found = self
            .registry
            .lookup(coin_name, address)
            .await
            .ok_or(ListQueriesError::NotFound)?;
        if found.api_id != api_id {
            return Err(ListQueriesError::Forbidden);
        }
        Ok(found)
    }

    /// `/list_transactions/{coin}[/{address}]`: deposits credited to the
    /// caller, newest first. When `address` is omitted, every address the
    /// caller owns for that coin is included.
    pub async fn list_transactions(
        &self,
        api_id: Uuid,
        coin_name: &str,
        address: Option<&str>,
    ) -> Result<Vec<Deposit>, ListQueriesError> {
        let owned_addresses = match address {
            Some(addr) => vec![self.owned_address(api_id, coin_name, addr).await?],
            None => self.addresses.list_by_api(&api_id, coin_name).await,
        };

        let mut deposits = Vec::new();
        for addr in &owned_addresses {
            deposits.extend(self.deposits.list_by_address(&addr.id).await);
        }
        deposits.sort_by(|a, b| b.time_insert.cmp(&a.time_insert));
        deposits.truncate(LIST_LIMIT);
        Ok(deposits)
    }

    pub async fn list_withdraws(
        &self,
        api_id: Uuid,
        coin_name: &str,
        address: Option<&str>,
    ) -> Result<Vec<Withdraw>, ListQueriesError> {
        let owned_addresses = match address {
            Some(addr) => vec![self.owned_address(api_id, coin_name, addr).await?],
            None => self.addresses.list_by_api(&api_id, coin_name).await,
        };

        let mut withdraws = Vec::new();
        for addr in &owned_addresses {
            withdraws.extend(self.withdraws.list_by_address(&addr.id).await);
        }
        withdraws.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        withdraws.truncate(LIST_LIMIT);
        Ok(withdraws)
    }

    pub async fn list_address(
        &self,
        api_id: Uuid,
        coin_name: &str,
    ) -> Vec<DepositAddress> {
        let mut addresses = self.addresses.list_by_api(&api_id, coin_name).await;
        addresses.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        addresses.truncate(LIST_LIMIT);
        addresses
    }
}
