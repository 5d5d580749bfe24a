//! Address registry (C5): a read-mostly index of every known deposit
//! address. Rebuilt wholesale from the ledger store and published as one
//! immutable snapshot behind an atomically-swapped pointer — readers
//! `load()` a consistent view for the lifetime of one request; the rebuild
//! happens off to the side and is installed with a single `store()`, never
//! mutating the live snapshot in place.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;

use crate::application::ports::{AddressRegistry, AddressReader};
use crate::domain::entities::DepositAddress;
use crate::domain::value_objects::address_key;

#[derive(Default)]
struct Snapshot {
    by_key: HashMap<String, DepositAddress>,
}

pub struct ArcSwapAddressRegistry {
    ledger: Arc<dyn AddressReader>,
    snapshot: ArcSwap<Snapshot>,
}

impl ArcSwapAddressRegistry {
    pub fn new(ledger: Arc<dyn AddressReader>) -> Self {
        Self {
            ledger,
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
        }
    }
}

#[async_trait]
impl AddressRegistry for ArcSwapAddressRegistry {
    async fn lookup(&self, coin_name: &str, address: &str) -> Option<DepositAddress> {
        let key = address_key(coin_name, address);
        self.snapshot.load().by_key.get(&key).cloned()
    }

    async fn is_known(&self, coin_name: &str, address: &str) -> bool {
        let key = address_key(coin_name, address);
        self.snapshot.load().by_key.contains_key(&key)
    }

    async fn refresh(&self) {
        let all = self.ledger.list_all().await;
        let mut by_key = HashMap::with_capacity(all.len());
        for address in all {
            by_key.insert(address_key(&address.coin_name, &address.address), address);
        }
        self.snapshot.store(Arc::new(Snapshot { by_key }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ledger::InMemoryLedgerStore;
    use uuid::Uuid;

    #[tokio::test]
    async fn refresh_makes_new_addresses_visible() {
        let store = Arc::new(InMemoryLedgerStore::new());
        let registry = ArcSwapAddressRegistry::new(store.clone());

        assert!(!registry.is_known("BTC", "addr1").await);

        let addr = DepositAddress::new(Uuid::new_v4(), "BTC", "addr1", "tag1", chrono::Utc::now());
        crate::application::ports::AddressWriter::save(&*store, addr).await;
        registry.refresh().await;

        assert!(registry.is_known("BTC", "addr1").await);
    }
}
