//! XMR-family driver: Monero wallet RPC (JSON-RPC 2.0) over `wallet_address`.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::json_rpc::{call_jsonrpc_2_0, field};
use crate::domain::entities::CoinSetting;
use crate::domain::services::{BackendError, Driver, DriverTransfer, MadeAddress, SendResult, TopBlock};

const STATUS_TIMEOUT: Duration = Duration::from_secs(30);
const SEND_TIMEOUT: Duration = Duration::from_secs(250);

pub struct XmrFamilyDriver {
    client: reqwest::Client,
    wallet_address: String,
    decimal: u32,
}

impl XmrFamilyDriver {
    pub fn new(wallet_address: impl Into<String>, decimal: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            wallet_address: wallet_address.into(),
            decimal,
        }
    }
}

#[async_trait]
impl Driver for XmrFamilyDriver {
    async fn top_block(&self) -> Result<TopBlock, BackendError> {
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.wallet_address,
            "get_height",
            serde_json::json!({}),
            STATUS_TIMEOUT,
            None,
        )
        .await?;
        let height: i64 = field(&result, "height")?;
        Ok(TopBlock { height })
    }

    async fn make_address(
        &self,
        _main_address: &str,
        extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError> {
        let mut params = serde_json::json!({});
        if let Some(payment_id) = extra {
            params["payment_id"] = serde_json::json!(payment_id);
        }
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.wallet_address,
            "make_integrated_address",
            params,
            STATUS_TIMEOUT,
            None,
        )
        .await?;

        let address: String = field(&result, "integrated_address")?;
        let payment_id: String = field(&result, "payment_id")?;
        Ok(MadeAddress {
            address,
            extra: Some(payment_id),
            private_key: None,
        })
    }

    async fn list_transfers(
        &self,
        from_height: i64,
        to_height: i64,
    ) -> Result<Vec<DriverTransfer>, BackendError> {
        let result = call_jsonrpc_2_0(
            &self.client,
            &self.wallet_address,
            "get_transfers",
            serde_json::json!({
                "in": true,
                "out": false,
                "pool": true,
                "filter_by_height": true,
                "min_height": from_height,
                "max_height": to_height,
            }),
            STATUS_TIMEOUT,
            None,
        )
        .await?;

        let entries = result
            .get("in")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        let mut transfers = Vec::new();
        for entry in entries {
            let txid: String = field(&entry, "txid")?;
            let height: i64 = field(&entry, "height")?;
            let amount_atomic: i64 = field(&entry, "amount")?;
            let payment_id: String = field(&entry, "payment_id").unwrap_or_default();
            let amount = Decimal::from(amount_atomic) / Decimal::from(10u64.pow(self.decimal));

            transfers.push(DriverTransfer {
                txid,
                height,
                amount,
                payment_id_or_address: payment_id,
                block_hash: None,
            });
        }
        Ok(transfers)
    }

    async fn send_external(
        &self,
        _from: &str,
        to: &str,
        amount: Decimal,
        settings: &CoinSetting,
    ) -> Result<SendResult, BackendError> {
        let atomic_amount = (amount * Decimal::from(10u64.pow(settings.decimal)))
            .to_string()
            .parse::<i64>()
            .unwrap_or(0);

        let result = call_jsonrpc_2_0(
            &self.client,
            &self.wallet_address,
            "transfer",
            serde_json::json!({
                "destinations": [{ "amount": atomic_amount, "address": to }],
                "account_index": 0,
                "priority": 0,
                "ring_size": settings.mixin,
            }),
            SEND_TIMEOUT,
            None,
        )
        .await?;

        let hash: String = field(&result, "tx_hash")?;
        let key: Option<String> = field(&result, "tx_key").ok();
        Ok(SendResult { hash, key })
    }
}
