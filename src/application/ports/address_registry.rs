//! Port for the address registry snapshot (C5): a read-mostly index of
//! every known deposit address, rebuilt wholesale and published atomically
//! after each structural change rather than mutated in place.

use async_trait::async_trait;

use crate::domain::entities::DepositAddress;

#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Look up an address's current snapshot by its natural key.
    async fn lookup(&self, coin_name: &str, address: &str) -> Option<DepositAddress>;

    /// Whether `address` is a known deposit address for `coin_name` — used
    /// by `/withdraw` and `/transfer` to distinguish internal destinations.
    async fn is_known(&self, coin_name: &str, address: &str) -> bool;

    /// Force a full rebuild from the ledger store, publishing the result
    /// as one atomic snapshot swap.
    async fn refresh(&self);
}
