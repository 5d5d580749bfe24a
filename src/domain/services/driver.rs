//! Coin-backend driver capability (C1): the uniform interface every wallet
//! or daemon family is adapted to, so the reconciler and the API surface
//! never know which wire dialect they are talking to.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::entities::CoinSetting;

/// Current chain tip as reported by the coin's daemon/wallet.
#[derive(Debug, Clone, Copy)]
pub struct TopBlock {
    pub height: i64,
}

/// A freshly minted deposit address.
#[derive(Debug, Clone)]
pub struct MadeAddress {
    pub address: String,
    /// Payment id for integrated-address families.
    pub extra: Option<String>,
    /// BTC-family only.
    pub private_key: Option<String>,
}

/// A candidate credit surfaced by `list_transfers`.
#[derive(Debug, Clone)]
pub struct DriverTransfer {
    pub txid: String,
    pub height: i64,
    /// Amount in the coin's whole units (already divided by `10^decimal`).
    pub amount: Decimal,
    /// Payment id for integrated-address families, or the destination
    /// address for BTC-family.
    pub payment_id_or_address: String,
    pub block_hash: Option<String>,
}

/// Result of a successful broadcast.
#[derive(Debug, Clone)]
pub struct SendResult {
    pub hash: String,
    pub key: Option<String>,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend rejected request: {0}")]
    Rejected(String),
}

/// Capability set every coin-backend driver implements, regardless of wire
/// family. See SPEC_FULL.md §4.1 for the per-family wire conventions each
/// implementation encodes.
#[async_trait]
pub trait Driver: Send + Sync {
    async fn top_block(&self) -> Result<TopBlock, BackendError>;

    async fn make_address(
        &self,
        main_address: &str,
        extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError>;

    async fn list_transfers(
        &self,
        from_height: i64,
        to_height: i64,
    ) -> Result<Vec<DriverTransfer>, BackendError>;

    async fn send_external(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        settings: &CoinSetting,
    ) -> Result<SendResult, BackendError>;
}
