//! Configuration loading for the coin gateway.
//!
//! Supports a JSON configuration file describing:
//! - Server bind address
//! - Coin backend settings (one entry per supported coin)
//! - API users and their allowed coins
//! - The Discord-style webhook URL and the master key for `/status`/`/reload`

use std::collections::HashSet;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{ApiUser, CoinSetting};
use crate::domain::value_objects::{ApiId, CoinType};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub coins: Vec<CoinSettingDto>,

    #[serde(default)]
    pub api_users: Vec<ApiUserDto>,

    /// Header value that unlocks `/status`, `/status/{coin}`, and `/reload`.
    #[serde(default)]
    pub master_key: String,

    /// Discord-style webhook URL; webhooks are dropped silently if absent.
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            coins: Vec::new(),
            api_users: Vec::new(),
            master_key: String::new(),
            webhook_url: None,
        }
    }
}

impl GatewayConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn coin_settings(&self) -> Vec<CoinSetting> {
        self.coins.iter().map(CoinSettingDto::to_domain).collect()
    }

    pub fn api_users(&self) -> Vec<ApiUser> {
        self.api_users.iter().map(ApiUserDto::to_domain).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// JSON-facing view of [`CoinSetting`], carrying its own field defaults so
/// a config file only has to spell out the coins it actually deviates on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoinSettingDto {
    pub coin_name: String,
    pub coin_type: CoinType,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub enable_create: bool,
    #[serde(default = "default_true")]
    pub enable_deposit: bool,
    #[serde(default = "default_true")]
    pub enable_withdraw: bool,
    #[serde(default)]
    pub daemon_address: String,
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default)]
    pub wallet_header: String,
    #[serde(default)]
    pub main_address: String,
    #[serde(default = "default_decimal_places")]
    pub decimal: u32,
    #[serde(default = "default_confirmation_depth")]
    pub confirmation_depth: i64,
    #[serde(default)]
    pub min_deposit: Decimal,
    #[serde(default)]
    pub min_transfer: Decimal,
    #[serde(default)]
    pub max_transfer: Decimal,
    #[serde(default)]
    pub min_withdraw: Decimal,
    #[serde(default)]
    pub max_withdraw: Decimal,
    #[serde(default)]
    pub fee_withdraw: Decimal,
    #[serde(default)]
    pub mixin: u32,
    #[serde(default)]
    pub is_fee_per_byte: bool,
    #[serde(default)]
    pub has_pos: bool,
    #[serde(default = "default_decimal_places")]
    pub round_places: u32,
    #[serde(default)]
    pub use_getinfo_btc: bool,
}

fn default_true() -> bool {
    true
}

fn default_decimal_places() -> u32 {
    8
}

fn default_confirmation_depth() -> i64 {
    6
}

impl CoinSettingDto {
    fn to_domain(&self) -> CoinSetting {
        CoinSetting {
            coin_name: self.coin_name.clone(),
            coin_type: self.coin_type,
            enabled: self.enabled,
            enable_create: self.enable_create,
            enable_deposit: self.enable_deposit,
            enable_withdraw: self.enable_withdraw,
            daemon_address: self.daemon_address.clone(),
            wallet_address: self.wallet_address.clone(),
            wallet_header: self.wallet_header.clone(),
            main_address: self.main_address.clone(),
            decimal: self.decimal,
            confirmation_depth: self.confirmation_depth,
            min_deposit: self.min_deposit,
            min_transfer: self.min_transfer,
            max_transfer: self.max_transfer,
            min_withdraw: self.min_withdraw,
            max_withdraw: self.max_withdraw,
            fee_withdraw: self.fee_withdraw,
            mixin: self.mixin,
            is_fee_per_byte: self.is_fee_per_byte,
            has_pos: self.has_pos,
            round_places: self.round_places,
            chain_height: 0,
            chain_height_set_time: None,
            use_getinfo_btc: self.use_getinfo_btc,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUserDto {
    #[serde(default)]
    pub id: Option<uuid::Uuid>,
    pub api_key: String,
    #[serde(default)]
    pub allowed_coin: HashSet<String>,
    #[serde(default)]
    pub is_suspended: bool,
}

impl ApiUserDto {
    fn to_domain(&self) -> ApiUser {
        let mut user = ApiUser::new(self.api_key.clone(), self.allowed_coin.clone());
        if let Some(id) = self.id {
            user.id = ApiId::from_uuid(id);
        }
        user.is_suspended = self.is_suspended;
        user
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, error: String },
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, error } => {
                write!(f, "failed to read config file '{}': {}", path, error)
            }
            ConfigError::Parse(e) => write!(f, "failed to parse config: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_json() {
        let json = r#"{
            "coins": [{"coin_name": "BTC", "coin_type": "BTC", "daemon_address": "http://127.0.0.1:8332"}],
            "api_users": [{"api_key": "key-1", "allowed_coin": ["BTC"]}]
        }"#;
        let config = GatewayConfig::from_json(json).unwrap();
        assert_eq!(config.coins.len(), 1);
        assert_eq!(config.coin_settings()[0].decimal, 8);
        assert_eq!(config.api_users()[0].allowed_coin.len(), 1);
    }

    #[test]
    fn defaults_to_empty_config() {
        let config = GatewayConfig::from_json("{}").unwrap();
        assert!(config.coins.is_empty());
        assert_eq!(config.server.port, 8080);
    }
}
