//! Coin Gateway
//!
//! A custodial multi-coin accounting gateway: deposit reconciliation,
//! ledger bookkeeping, and an authenticated REST API for address issuance,
//! balances, withdrawals, internal transfers, and holds.
//!
//! # Architecture
//!
//! Clean Architecture, same four layers throughout:
//!
//! - **Domain**: entities and invariants (`DepositAddress`, `Deposit`,
//!   `Withdraw`, `Transfer`, `Hold`, `CoinSetting`), the `Clock` and `Driver`
//!   services.
//! - **Application**: use cases (`IssueAddressUseCase`, `WithdrawUseCase`,
//!   ...) and the ports they depend on.
//! - **Infrastructure**: in-memory ledger (C2), TTL cache (C3), the
//!   background reconciler (C4), the `ArcSwap` address registry (C5), the
//!   per-coin-family drivers (C1), and the webhook/audit trail (C7).
//! - **Presentation**: the REST surface (C6).

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use domain::services::{Clock, SystemClock};
use infrastructure::cache::TtlCache;
use infrastructure::config::GatewayConfig;
use infrastructure::drivers::StaticDriverLookup;
use infrastructure::ledger::{InMemoryApiUserRepository, InMemoryCoinSettingsRepository, InMemoryLedgerStore};
use infrastructure::reconciler::Reconciler;
use infrastructure::registry::ArcSwapAddressRegistry;
use infrastructure::webhook::{DiscordWebhookNotifier, InMemoryAuditLog};
use presentation::rest::{create_router, AppState};

/// Bind address and master key, the only two things the gateway needs
/// beyond the coin/api_user tables loaded at construction.
#[derive(Debug, Clone)]
pub struct GatewayServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GatewayServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// The running gateway: every infrastructure component, wired once at
/// startup and shared behind `Arc` for the lifetime of the process.
pub struct Gateway<C: Clock + 'static> {
    pub server: GatewayServerConfig,
    pub master_key: String,
    pub clock: Arc<C>,
    pub ledger: Arc<InMemoryLedgerStore>,
    pub coin_settings: Arc<InMemoryCoinSettingsRepository>,
    pub api_users: Arc<InMemoryApiUserRepository>,
    pub cache: Arc<TtlCache>,
    pub registry: Arc<ArcSwapAddressRegistry>,
    pub drivers: Arc<StaticDriverLookup>,
    pub webhook: Arc<DiscordWebhookNotifier>,
    pub audit: Arc<InMemoryAuditLog>,
}

impl<C: Clock + 'static> Gateway<C> {
    pub fn with_clock(
        server: GatewayServerConfig,
        master_key: String,
        webhook_url: Option<String>,
        coin_settings: Vec<domain::entities::CoinSetting>,
        api_users: Vec<domain::entities::ApiUser>,
        clock: Arc<C>,
    ) -> Self {
        let ledger = Arc::new(InMemoryLedgerStore::new());
        let registry = Arc::new(ArcSwapAddressRegistry::new(ledger.clone() as Arc<dyn application::ports::AddressReader>));
        let drivers = Arc::new(StaticDriverLookup::from_settings(&coin_settings));

        Self {
            server,
            master_key,
            clock,
            coin_settings: Arc::new(InMemoryCoinSettingsRepository::seed(coin_settings)),
            api_users: Arc::new(InMemoryApiUserRepository::seed(api_users)),
            cache: Arc::new(TtlCache::new()),
            registry,
            drivers,
            webhook: Arc::new(DiscordWebhookNotifier::new(webhook_url)),
            audit: Arc::new(InMemoryAuditLog::new()),
            ledger,
        }
    }

    /// Build the REST router, wiring `AppState` with one `Arc` per port
    /// slice, all coerced from the same concrete stores.
    pub fn rest_router(&self) -> Router {
        let state = Arc::new(AppState::new(
            Arc::clone(&self.clock),
            self.ledger.clone() as Arc<dyn application::ports::AddressRepository>,
            self.ledger.clone() as Arc<dyn application::ports::AddressReader>,
            self.ledger.clone() as Arc<dyn application::ports::DepositRepository>,
            self.ledger.clone() as Arc<dyn application::ports::DepositReader>,
            self.ledger.clone() as Arc<dyn application::ports::DepositWriter>,
            self.ledger.clone() as Arc<dyn application::ports::WithdrawRepository>,
            self.ledger.clone() as Arc<dyn application::ports::WithdrawReader>,
            self.ledger.clone() as Arc<dyn application::ports::TransferRepository>,
            self.ledger.clone() as Arc<dyn application::ports::HoldRepository>,
            self.coin_settings.clone() as Arc<dyn application::ports::CoinSettingsRepository>,
            self.api_users.clone() as Arc<dyn application::ports::ApiUserRepository>,
            self.cache.clone() as Arc<dyn application::ports::Cache>,
            self.registry.clone() as Arc<dyn application::ports::AddressRegistry>,
            self.drivers.clone() as Arc<dyn application::ports::DriverLookup>,
            self.webhook.clone() as Arc<dyn application::ports::WebhookNotifier>,
            self.audit.clone() as Arc<dyn application::ports::AuditLog>,
            self.master_key.clone(),
        ));

        create_router(state)
    }

    /// Spawn the four background reconciliation loops (C4).
    pub fn spawn_reconciler(&self) -> Vec<JoinHandle<()>> {
        let reconciler = Arc::new(Reconciler::new(
            Arc::clone(&self.clock),
            self.coin_settings.clone() as Arc<dyn application::ports::CoinSettingsRepository>,
            self.ledger.clone() as Arc<dyn application::ports::AddressRepository>,
            self.ledger.clone() as Arc<dyn application::ports::DepositRepository>,
            self.ledger.clone() as Arc<dyn application::ports::HoldRepository>,
            self.cache.clone() as Arc<dyn application::ports::Cache>,
            self.drivers.clone() as Arc<dyn application::ports::DriverLookup>,
            self.webhook.clone() as Arc<dyn application::ports::WebhookNotifier>,
        ));
        reconciler.spawn_all()
    }

    /// Refresh the address registry once at startup so the first request
    /// doesn't race an empty snapshot.
    pub async fn warm_up(&self) {
        self.registry.refresh().await;
    }

    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        self.warm_up().await;
        let _reconciler_handles = self.spawn_reconciler();

        let addr = format!("{}:{}", self.server.host, self.server.port);
        let router = self.rest_router();

        tracing::info!("coin gateway listening on {}", addr);

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

impl Gateway<SystemClock> {
    pub fn new(server: GatewayServerConfig, master_key: String, webhook_url: Option<String>) -> Self {
        Self::with_clock(server, master_key, webhook_url, Vec::new(), Vec::new(), Arc::new(SystemClock))
    }

    pub async fn from_config(config: GatewayConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let server = GatewayServerConfig {
            host: config.server.host.clone(),
            port: config.server.port,
        };

        Ok(Self::with_clock(
            server,
            config.master_key.clone(),
            config.webhook_url.clone(),
            config.coin_settings(),
            config.api_users(),
            Arc::new(SystemClock),
        ))
    }
}
