//! Axum wiring: shared state plus the 11-route table (C6).

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::application::ports::{
    AddressReader, AddressRegistry, AddressRepository, ApiUserRepository, AuditLog, Cache,
    CoinSettingsRepository, DepositReader, DepositRepository, DepositWriter, DriverLookup,
    HoldRepository, TransferRepository, WebhookNotifier, WithdrawReader, WithdrawRepository,
};
use crate::domain::services::Clock;

use super::handlers;

/// Fields are deliberately split by the exact reader/writer slice each use
/// case needs (Interface Segregation, same as the ports themselves), rather
/// than handing every handler the full `*Repository` object. All of them
/// are coerced from the same concrete in-memory store at wiring time.
pub struct AppState<C: Clock> {
    pub clock: Arc<C>,
    pub addresses: Arc<dyn AddressRepository>,
    pub address_reader: Arc<dyn AddressReader>,
    pub deposits: Arc<dyn DepositRepository>,
    pub deposit_reader: Arc<dyn DepositReader>,
    pub deposit_writer: Arc<dyn DepositWriter>,
    pub withdraws: Arc<dyn WithdrawRepository>,
    pub withdraw_reader: Arc<dyn WithdrawReader>,
    pub transfers: Arc<dyn TransferRepository>,
    pub holds: Arc<dyn HoldRepository>,
    pub coin_settings: Arc<dyn CoinSettingsRepository>,
    pub api_users: Arc<dyn ApiUserRepository>,
    pub cache: Arc<dyn Cache>,
    pub registry: Arc<dyn AddressRegistry>,
    pub drivers: Arc<dyn DriverLookup>,
    pub webhook: Arc<dyn WebhookNotifier>,
    pub audit: Arc<dyn AuditLog>,
    pub master_key: String,
}

#[allow(clippy::too_many_arguments)]
impl<C: Clock> AppState<C> {
    pub fn new(
        clock: Arc<C>,
        addresses: Arc<dyn AddressRepository>,
        address_reader: Arc<dyn AddressReader>,
        deposits: Arc<dyn DepositRepository>,
        deposit_reader: Arc<dyn DepositReader>,
        deposit_writer: Arc<dyn DepositWriter>,
        withdraws: Arc<dyn WithdrawRepository>,
        withdraw_reader: Arc<dyn WithdrawReader>,
        transfers: Arc<dyn TransferRepository>,
        holds: Arc<dyn HoldRepository>,
        coin_settings: Arc<dyn CoinSettingsRepository>,
        api_users: Arc<dyn ApiUserRepository>,
        cache: Arc<dyn Cache>,
        registry: Arc<dyn AddressRegistry>,
        drivers: Arc<dyn DriverLookup>,
        webhook: Arc<dyn WebhookNotifier>,
        audit: Arc<dyn AuditLog>,
        master_key: String,
    ) -> Self {
        Self {
            clock,
            addresses,
            address_reader,
            deposits,
            deposit_reader,
            deposit_writer,
            withdraws,
            withdraw_reader,
            transfers,
            holds,
            coin_settings,
            api_users,
            cache,
            registry,
            drivers,
            webhook,
            audit,
            master_key,
        }
    }
}

pub fn create_router<C: Clock + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/newaddress", post(handlers::new_address::<C>))
        .route("/balance", post(handlers::balance::<C>))
        .route("/withdraw", post(handlers::withdraw::<C>))
        .route("/transfer", post(handlers::transfer::<C>))
        .route("/hold_alance", post(handlers::hold_balance::<C>))
        .route(
            "/list_transactions/{coin}",
            get(handlers::list_transactions::<C>),
        )
        .route(
            "/list_transactions/{coin}/{address}",
            get(handlers::list_transactions_for_address::<C>),
        )
        .route("/list_withdraws/{coin}", get(handlers::list_withdraws::<C>))
        .route(
            "/list_withdraws/{coin}/{address}",
            get(handlers::list_withdraws_for_address::<C>),
        )
        .route("/list_address/{coin}", get(handlers::list_address::<C>))
        .route("/noted/{coin}/{tx}", post(handlers::noted::<C>))
        .route("/status/{coin}", get(handlers::status_one::<C>))
        .route("/status", get(handlers::status_all::<C>))
        .route("/reload", post(handlers::reload::<C>))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
