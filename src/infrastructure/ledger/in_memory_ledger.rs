//! In-memory ledger store (C2). One `DashMap` per table so unrelated tables
//! never contend with each other; a SQL-backed implementation of the same
//! ports would instead hand out pooled connections per query.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::application::ports::{
    AddressReader, AddressWriter, DepositReader, DepositWriter, HoldReader, HoldWriter,
    TransferReader, TransferWriter, WithdrawReader, WithdrawWriter,
};
use crate::domain::entities::{AddressId, Deposit, DepositAddress, Hold, Transfer, Withdraw};
use crate::domain::value_objects::{HoldId, Timestamp};

pub struct InMemoryLedgerStore {
    addresses: DashMap<AddressId, DepositAddress>,
    deposits: DashMap<uuid::Uuid, Deposit>,
    withdraws: DashMap<uuid::Uuid, Withdraw>,
    transfers: DashMap<uuid::Uuid, Transfer>,
    seen_pairs: DashMap<String, ()>,
    holds: DashMap<HoldId, Hold>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            addresses: DashMap::new(),
            deposits: DashMap::new(),
            withdraws: DashMap::new(),
            transfers: DashMap::new(),
            seen_pairs: DashMap::new(),
            holds: DashMap::new(),
        }
    }

    /// Snapshot of every address, used by the registry rebuild (C5).
    pub fn all_addresses(&self) -> Vec<DepositAddress> {
        self.addresses.iter().map(|e| e.value().clone()).collect()
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressReader for InMemoryLedgerStore {
    async fn get(&self, id: &AddressId) -> Option<DepositAddress> {
        self.addresses.get(id).map(|e| e.value().clone())
    }

    async fn get_by_key(&self, coin_name: &str, address: &str) -> Option<DepositAddress> {
        self.addresses
            .iter()
            .find(|e| e.coin_name == coin_name && e.address == address)
            .map(|e| e.value().clone())
    }

    async fn list_by_api(&self, api_id: &Uuid, coin_name: &str) -> Vec<DepositAddress> {
        self.addresses
            .iter()
            .filter(|e| &e.api_id == api_id && e.coin_name == coin_name)
            .map(|e| e.value().clone())
            .collect()
    }

    async fn list_all(&self) -> Vec<DepositAddress> {
        self.all_addresses()
    }
}

#[async_trait]
impl AddressWriter for InMemoryLedgerStore {
    async fn save(&self, address: DepositAddress) {
        self.addresses.insert(address.id, address);
    }
}

#[async_trait]
impl DepositReader for InMemoryLedgerStore {
    async fn get_by_natural_key(
        &self,
        coin_name: &str,
        txid: &str,
        address: &str,
    ) -> Option<Deposit> {
        self.deposits
            .iter()
            .find(|e| e.natural_key() == (coin_name.to_string(), txid.to_string(), address.to_string()))
            .map(|e| e.value().clone())
    }

    async fn list_by_txid(&self, coin_name: &str, txid: &str) -> Vec<Deposit> {
        self.deposits
            .iter()
            .filter(|e| e.coin_name == coin_name && e.txid == txid)
            .map(|e| e.value().clone())
            .collect()
    }

    async fn list_unpromoted(&self, coin_name: &str) -> Vec<Deposit> {
        self.deposits
            .iter()
            .filter(|e| e.coin_name == coin_name && e.can_credit == crate::domain::value_objects::CreditState::No)
            .map(|e| e.value().clone())
            .collect()
    }

    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Deposit> {
        self.deposits
            .iter()
            .filter(|e| &e.deposit_id == address_id)
            .map(|e| e.value().clone())
            .collect()
    }
}

#[async_trait]
impl DepositWriter for InMemoryLedgerStore {
    async fn save(&self, deposit: Deposit) {
        self.deposits.insert(deposit.id.as_uuid(), deposit);
    }

    async fn insert_if_absent(&self, deposit: Deposit) {
        let exists = self
            .deposits
            .iter()
            .any(|e| e.natural_key() == deposit.natural_key());
        if !exists {
            self.deposits.insert(deposit.id.as_uuid(), deposit);
        }
    }
}

#[async_trait]
impl WithdrawReader for InMemoryLedgerStore {
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Withdraw> {
        self.withdraws
            .iter()
            .filter(|e| &e.from_address_id == address_id)
            .map(|e| e.value().clone())
            .collect()
    }
}

#[async_trait]
impl WithdrawWriter for InMemoryLedgerStore {
    async fn save(&self, withdraw: Withdraw) {
        self.withdraws.insert(withdraw.id.as_uuid(), withdraw);
    }
}

#[async_trait]
impl TransferReader for InMemoryLedgerStore {
    async fn seen_pair(&self, pair_key: &str) -> bool {
        self.seen_pairs.contains_key(pair_key)
    }

    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Transfer> {
        self.transfers
            .iter()
            .filter(|e| e.from_address_id == *address_id || e.to_address_id == *address_id)
            .map(|e| e.value().clone())
            .collect()
    }
}

#[async_trait]
impl TransferWriter for InMemoryLedgerStore {
    async fn save(&self, transfer: Transfer) {
        let pair_key = Transfer::unordered_pair_key(
            &transfer.coin_name,
            &transfer.from_address,
            &transfer.to_address,
        );
        self.seen_pairs.insert(pair_key, ());
        self.transfers.insert(transfer.ref_uuid.as_uuid(), transfer);
    }
}

#[async_trait]
impl HoldReader for InMemoryLedgerStore {
    async fn list_by_address(&self, address_id: &AddressId) -> Vec<Hold> {
        self.holds
            .iter()
            .filter(|e| &e.address_id == address_id)
            .map(|e| e.value().clone())
            .collect()
    }

    async fn list_expired(&self, now: Timestamp) -> Vec<Hold> {
        self.holds
            .iter()
            .filter(|e| e.is_expired(now))
            .map(|e| e.value().clone())
            .collect()
    }
}

#[async_trait]
impl HoldWriter for InMemoryLedgerStore {
    async fn save(&self, hold: Hold) {
        self.holds.insert(hold.id, hold);
    }

    async fn delete(&self, id: &HoldId) -> bool {
        self.holds.remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn saves_and_finds_address_by_key() {
        let store = InMemoryLedgerStore::new();
        let addr = DepositAddress::new(Uuid::new_v4(), "BTC", "addr1", "tag1", chrono::Utc::now());
        AddressWriter::save(&store, addr.clone()).await;

        let found = store.get_by_key("BTC", "addr1").await.unwrap();
        assert_eq!(found.id, addr.id);
    }

    #[tokio::test]
    async fn insert_if_absent_creates_a_new_row() {
        let store = InMemoryLedgerStore::new();
        let deposit = Deposit::new(
            "BTC",
            Uuid::new_v4(),
            AddressId::new(),
            "tx1",
            "addr1",
            None,
            100,
            dec!(1),
            6,
            chrono::Utc::now(),
        );
        DepositWriter::insert_if_absent(&store, deposit).await;

        let found = store
            .get_by_natural_key("BTC", "tx1", "addr1")
            .await
            .unwrap();
        assert_eq!(found.confirmations, 6);
    }

    #[tokio::test]
    async fn insert_if_absent_never_overwrites_an_existing_row() {
        let store = InMemoryLedgerStore::new();
        let mut deposit = Deposit::new(
            "BTC",
            Uuid::new_v4(),
            AddressId::new(),
            "tx1",
            "addr1",
            None,
            100,
            dec!(1),
            6,
            chrono::Utc::now(),
        );
        DepositWriter::insert_if_absent(&store, deposit.clone()).await;

        let mut promoted = store
            .get_by_natural_key("BTC", "tx1", "addr1")
            .await
            .unwrap();
        promoted.promote();
        DepositWriter::save(&store, promoted.clone()).await;

        // A later tick re-observes the same on-chain tx with a fresh,
        // low-confidence record; the existing promoted row must survive.
        deposit.confirmations = 0;
        deposit.can_credit = crate::domain::value_objects::CreditState::No;
        DepositWriter::insert_if_absent(&store, deposit).await;

        let found = store
            .get_by_natural_key("BTC", "tx1", "addr1")
            .await
            .unwrap();
        assert_eq!(found.id, promoted.id);
        assert_eq!(found.can_credit, crate::domain::value_objects::CreditState::Yes);
    }
}
