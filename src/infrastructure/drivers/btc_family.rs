//! BTC-family driver: Bitcoin-core-style JSON-RPC 1.0 over `daemon_address`.

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::json_rpc::{call_jsonrpc_1_0, field};
use crate::domain::entities::CoinSetting;
use crate::domain::services::{BackendError, Driver, DriverTransfer, MadeAddress, SendResult, TopBlock};

const STATUS_TIMEOUT: Duration = Duration::from_secs(30);
const SEND_TIMEOUT: Duration = Duration::from_secs(200);

pub struct BtcFamilyDriver {
    client: reqwest::Client,
    daemon_address: String,
    use_getinfo: bool,
}

impl BtcFamilyDriver {
    pub fn new(daemon_address: impl Into<String>, use_getinfo: bool) -> Self {
        Self {
            client: reqwest::Client::new(),
            daemon_address: daemon_address.into(),
            use_getinfo,
        }
    }
}

#[async_trait]
impl Driver for BtcFamilyDriver {
    async fn top_block(&self) -> Result<TopBlock, BackendError> {
        let method = if self.use_getinfo {
            "getinfo"
        } else {
            "getblockchaininfo"
        };
        let result = call_jsonrpc_1_0(
            &self.client,
            &self.daemon_address,
            method,
            serde_json::json!([]),
            STATUS_TIMEOUT,
        )
        .await?;

        let height: i64 = field(&result, "blocks")?;
        Ok(TopBlock { height })
    }

    async fn make_address(
        &self,
        _main_address: &str,
        _extra: Option<&str>,
    ) -> Result<MadeAddress, BackendError> {
        let address_result = call_jsonrpc_1_0(
            &self.client,
            &self.daemon_address,
            "getnewaddress",
            serde_json::json!([]),
            STATUS_TIMEOUT,
        )
        .await?;
        let address: String = serde_json::from_value(address_result.clone())
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        let key_result = call_jsonrpc_1_0(
            &self.client,
            &self.daemon_address,
            "dumpprivkey",
            serde_json::json!([address]),
            STATUS_TIMEOUT,
        )
        .await?;
        let private_key: String = serde_json::from_value(key_result)
            .map_err(|e| BackendError::Rejected(e.to_string()))?;

        Ok(MadeAddress {
            address,
            extra: None,
            private_key: Some(private_key),
        })
    }

    async fn list_transfers(
        &self,
        from_height: i64,
        to_height: i64,
    ) -> Result<Vec<DriverTransfer>, BackendError> {
        let result = call_jsonrpc_1_0(
            &self.client,
            &self.daemon_address,
            "listtransactions",
            serde_json::json!(["*", 100, 0]),
            STATUS_TIMEOUT,
        )
        .await?;

        let entries = result.as_array().cloned().unwrap_or_default();
        let mut transfers = Vec::new();
        for entry in entries {
            let height: i64 = field(&entry, "blockheight").unwrap_or(0);
            if height < from_height || height > to_height {
                continue;
            }
            let txid: String = field(&entry, "txid")?;
            let amount: Decimal = field(&entry, "amount")?;
            let address: String = field(&entry, "address")?;
            let block_hash: Option<String> = field(&entry, "blockhash").ok();

            transfers.push(DriverTransfer {
                txid,
                height,
                amount,
                payment_id_or_address: address,
                block_hash,
            });
        }
        Ok(transfers)
    }

    async fn send_external(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
        _settings: &CoinSetting,
    ) -> Result<SendResult, BackendError> {
        let result = call_jsonrpc_1_0(
            &self.client,
            &self.daemon_address,
            "sendtoaddress",
            serde_json::json!([to, amount, from, to, false]),
            SEND_TIMEOUT,
        )
        .await?;

        let hash: String =
            serde_json::from_value(result).map_err(|e| BackendError::Rejected(e.to_string()))?;
        Ok(SendResult { hash, key: None })
    }
}
