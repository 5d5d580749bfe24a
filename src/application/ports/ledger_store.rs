//! Port for the durable ledger: addresses, deposits, withdraws, transfers,
//! and holds. Interface Segregation keeps readers and writers separate so a
//! use case that only reads a balance doesn't need mutation capability.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::{AddressId, Deposit, DepositAddress, Hold, Transfer, Withdraw};

#[async_trait]
pub trait AddressReader: Send + Sync {
    async fn get(&self, id: &AddressId) -> Option<DepositAddress>;
    async fn get_by_key(&self, coin_name: &str, address: &str) -> Option<DepositAddress>;
    async fn list_by_api(&self, api_id: &Uuid, coin_name: &str) -> Vec<DepositAddress>;
    /// Every address on file, regardless of owner — used by the registry's
    /// full-rebuild refresh (C5).
    async fn list_all(&self) -> Vec<DepositAddress>;
}

#[async_trait]
pub trait AddressWriter: Send + Sync {
    async fn save(&self, address: DepositAddress);
}

#[async_trait]
pub trait AddressRepository: AddressReader + AddressWriter {}
impl<T: AddressReader + AddressWriter> AddressRepository for T {}

#[async_trait]
pub trait DepositReader: Send + Sync {
    async fn get_by_natural_key(
        &self,
        coin_name: &str,
        txid: &str,
        address: &str,
    ) -> Option<Deposit>;
    /// All deposits recorded for a `(coin, txid)` pair, regardless of
    /// destination address — used by `/noted`, which the wire protocol
    /// addresses by txid alone.
    async fn list_by_txid(&self, coin_name: &str, txid: &str) -> Vec<Deposit>;
    async fn list_unpromoted(&self, coin_name: &str) -> Vec<Deposit>;
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Deposit>;
}

#[async_trait]
pub trait DepositWriter: Send + Sync {
    /// Inserts a newly observed deposit, by id, unconditionally overwriting
    /// any existing row with that id. Callers that already hold a row they
    /// fetched and mutated (promotion, `/noted`) use this to persist it back.
    async fn save(&self, deposit: Deposit);

    /// True insert-or-ignore on the natural key `(coin_name, txid, address)`:
    /// if a row with that key already exists, it is left completely
    /// untouched and `deposit` is discarded. Used by deposit detection,
    /// which rescans an overlapping block window every tick and must never
    /// regress an already-promoted row back to unconfirmed.
    async fn insert_if_absent(&self, deposit: Deposit);
}

#[async_trait]
pub trait DepositRepository: DepositReader + DepositWriter {}
impl<T: DepositReader + DepositWriter> DepositRepository for T {}

#[async_trait]
pub trait WithdrawReader: Send + Sync {
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Withdraw>;
}

#[async_trait]
pub trait WithdrawWriter: Send + Sync {
    async fn save(&self, withdraw: Withdraw);
}

#[async_trait]
pub trait WithdrawRepository: WithdrawReader + WithdrawWriter {}
impl<T: WithdrawReader + WithdrawWriter> WithdrawRepository for T {}

#[async_trait]
pub trait TransferReader: Send + Sync {
    async fn seen_pair(&self, pair_key: &str) -> bool;
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Transfer>;
}

#[async_trait]
pub trait TransferWriter: Send + Sync {
    async fn save(&self, transfer: Transfer);
}

#[async_trait]
pub trait TransferRepository: TransferReader + TransferWriter {}
impl<T: TransferReader + TransferWriter> TransferRepository for T {}

#[async_trait]
pub trait HoldReader: Send + Sync {
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Hold>;
    async fn list_expired(&self, now: crate::domain::value_objects::Timestamp) -> Vec<Hold>;
}

#[async_trait]
pub trait HoldWriter: Send + Sync {
    async fn save(&self, hold: Hold);
    async fn delete(&self, id: &crate::domain::value_objects::HoldId) -> bool;
}

#[async_trait]
pub trait HoldRepository: HoldReader + HoldWriter {}
impl<T: HoldReader + HoldWriter> HoldRepository for T {}

/// Aggregate port a use case depends on when it needs the whole ledger
/// rather than a single slice of it.
pub trait LedgerStore:
    AddressRepository + DepositRepository + WithdrawRepository + TransferRepository + HoldRepository
{
}

impl<T> LedgerStore for T where
    T: AddressRepository
        + DepositRepository
        + WithdrawRepository
        + TransferRepository
        + HoldRepository
{
}
