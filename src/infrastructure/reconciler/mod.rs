//! Background reconciliation (C4): four independent `tokio` loops that keep
//! the ledger in sync with the coin backends without blocking any request.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};

use crate::application::ports::{
    AddressRepository, Cache, CoinSettingsRepository, DepositRepository, DriverLookup,
    HoldRepository, WebhookEvent, WebhookNotifier,
};
use crate::domain::entities::{CoinSetting, Deposit};
use crate::domain::services::Clock;
use crate::domain::value_objects::CoinType;

const DEPOSIT_TICK: Duration = Duration::from_secs(10);
const PROMOTE_TICK: Duration = Duration::from_secs(10);
const SWEEP_TICK: Duration = Duration::from_secs(30);
const RELOAD_TICK: Duration = Duration::from_secs(15);

/// Blocks of chain history rescanned every tick; duplicate sightings are
/// absorbed by the insert-or-ignore on `(coin, txid, address)`, which never
/// touches a row already on file.
const SCAN_WINDOW: i64 = 2000;

pub struct Reconciler<C: Clock + 'static> {
    clock: Arc<C>,
    coin_settings: Arc<dyn CoinSettingsRepository>,
    addresses: Arc<dyn AddressRepository>,
    deposits: Arc<dyn DepositRepository>,
    holds: Arc<dyn HoldRepository>,
    cache: Arc<dyn Cache>,
    drivers: Arc<dyn DriverLookup>,
    webhook: Arc<dyn WebhookNotifier>,
}

impl<C: Clock + 'static> Reconciler<C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        clock: Arc<C>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        addresses: Arc<dyn AddressRepository>,
        deposits: Arc<dyn DepositRepository>,
        holds: Arc<dyn HoldRepository>,
        cache: Arc<dyn Cache>,
        drivers: Arc<dyn DriverLookup>,
        webhook: Arc<dyn WebhookNotifier>,
    ) -> Self {
        Self {
            clock,
            coin_settings,
            addresses,
            deposits,
            holds,
            cache,
            drivers,
            webhook,
        }
    }

    /// Spawns all four loops as independent detached tasks. A persistent
    /// failure in one never stalls the others.
    pub fn spawn_all(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        vec![
            tokio::spawn(Arc::clone(&self).run_deposit_detection()),
            tokio::spawn(Arc::clone(&self).run_promote_confirmed()),
            tokio::spawn(Arc::clone(&self).run_sweep_holds()),
            tokio::spawn(Arc::clone(&self).run_reload_coin_settings()),
        ]
    }

    async fn run_deposit_detection(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(DEPOSIT_TICK);
        loop {
            ticker.tick().await;
            let coins = self.coin_settings.all().await;
            let mut tasks = JoinSet::new();
            for coin in coins.into_iter().filter(|c| c.enabled && c.enable_deposit) {
                let this = Arc::clone(&self);
                tasks.spawn(async move { this.detect_deposits_for(&coin).await });
            }
            while tasks.join_next().await.is_some() {}
            tracing::debug!("deposit detection tick complete");
        }
    }

    async fn detect_deposits_for(&self, coin: &CoinSetting) {
        let Some(driver) = self.drivers.driver_for(&coin.coin_name).await else {
            tracing::warn!(coin = %coin.coin_name, "no driver configured");
            return;
        };

        let tip = match driver.top_block().await {
            Ok(tip) => tip,
            Err(err) => {
                tracing::warn!(coin = %coin.coin_name, error = %err, "top_block failed");
                return;
            }
        };

        let now = self.clock.now();
        self.cache
            .set(
                format!("block/{}", coin.coin_name),
                tip.height.to_string(),
                DEPOSIT_TICK,
            )
            .await;
        self.coin_settings
            .record_tip(&coin.coin_name, tip.height, now)
            .await;

        let from_height = (tip.height - SCAN_WINDOW).max(0);
        let candidates = match driver.list_transfers(from_height, tip.height).await {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(coin = %coin.coin_name, error = %err, "list_transfers failed");
                return;
            }
        };

        let integrated = matches!(
            coin.coin_type,
            CoinType::Xmr | CoinType::TrtlApi | CoinType::TrtlService | CoinType::Bcn
        );

        for candidate in candidates {
            if candidate.amount < coin.min_deposit {
                continue;
            }
            if candidate.payment_id_or_address.is_empty() {
                continue;
            }
            // Admitted only once already at full depth; a candidate seen
            // before then is simply not inserted yet, never half-recorded.
            if candidate.height + coin.confirmation_depth > tip.height {
                continue;
            }

            let owner = if integrated {
                self.addresses
                    .list_all()
                    .await
                    .into_iter()
                    .find(|a| {
                        a.coin_name == coin.coin_name
                            && a.address_extra.as_deref() == Some(candidate.payment_id_or_address.as_str())
                    })
            } else {
                self.addresses
                    .get_by_key(&coin.coin_name, &candidate.payment_id_or_address)
                    .await
            };

            let Some(owner) = owner else {
                continue;
            };

            let confirmations = (tip.height - candidate.height).max(0);
            let deposit = Deposit::new(
                coin.coin_name.clone(),
                owner.api_id,
                owner.id,
                candidate.txid.clone(),
                owner.address.clone(),
                candidate.block_hash.clone(),
                candidate.height,
                candidate.amount,
                confirmations,
                now,
            );
            self.deposits.insert_if_absent(deposit).await;

            self.webhook
                .notify(WebhookEvent {
                    title: format!("pending deposit: {}", coin.coin_name),
                    description: format!(
                        "{} {} to {}, tx {}",
                        candidate.amount, coin.coin_name, owner.address, candidate.txid
                    ),
                })
                .await;
        }
    }

    /// Runs one promotion pass for a single coin immediately, without
    /// waiting for the next tick. Exposed for tests and manual triggering.
    pub async fn promote_confirmed(&self, coin_name: &str) {
        if let Some(coin) = self.coin_settings.get(coin_name).await {
            self.promote_confirmed_for(&coin).await;
        }
    }

    async fn run_promote_confirmed(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(PROMOTE_TICK);
        loop {
            ticker.tick().await;
            let coins = self.coin_settings.all().await;
            for coin in coins {
                self.promote_confirmed_for(&coin).await;
            }
        }
    }

    /// Never reads C3: `coin.chain_height` is the authoritative tip, written
    /// directly by `detect_deposits_for` on every successful `top_block()`.
    async fn promote_confirmed_for(&self, coin: &CoinSetting) {
        let unpromoted = self.deposits.list_unpromoted(&coin.coin_name).await;
        for mut deposit in unpromoted {
            if !deposit.is_eligible_for_promotion(coin.chain_height, coin.confirmation_depth) {
                continue;
            }
            deposit.promote();
            self.deposits.save(deposit.clone()).await;

            if let Some(mut address) = self.addresses.get(&deposit.deposit_id).await {
                address.credit_deposit(deposit.amount);
                self.addresses.save(address.clone()).await;

                self.webhook
                    .notify(WebhookEvent {
                        title: format!("unlocked: {}", coin.coin_name),
                        description: format!(
                            "{} {} credited to {}, tx {}",
                            deposit.amount, coin.coin_name, address.address, deposit.txid
                        ),
                    })
                    .await;
            }
        }
    }

    async fn run_sweep_holds(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(SWEEP_TICK);
        loop {
            ticker.tick().await;
            let now = self.clock.now();
            let expired = self.holds.list_expired(now).await;
            for hold in expired {
                if let Some(mut address) = self.addresses.get(&hold.address_id).await {
                    address.release_hold(hold.hold_amount);
                    self.addresses.save(address).await;
                }
                self.holds.delete(&hold.id).await;
            }
        }
    }

    /// In this in-memory build, `CoinSettingsRepository` already *is* C2, so
    /// this loop reloads the table from itself — a no-op that exists for
    /// parity with a split deployment where the repository wraps a
    /// separately-persisted store and the in-process copy can drift.
    async fn run_reload_coin_settings(self: Arc<Self>) {
        let mut ticker = tokio::time::interval(RELOAD_TICK);
        loop {
            ticker.tick().await;
            let settings = self.coin_settings.all().await;
            self.coin_settings.reload(settings).await;
        }
    }
}
