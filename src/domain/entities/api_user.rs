//! Third-party application identity.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ApiId, CoinName};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiUser {
    pub id: ApiId,
    pub api_key: String,
    pub allowed_coin: HashSet<CoinName>,
    pub is_suspended: bool,
}

impl ApiUser {
    pub fn new(api_key: impl Into<String>, allowed_coin: HashSet<CoinName>) -> Self {
        Self {
            id: ApiId::new(),
            api_key: api_key.into(),
            allowed_coin,
            is_suspended: false,
        }
    }

    pub fn allows(&self, coin: &str) -> bool {
        self.allowed_coin.contains(coin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_only_configured_coins() {
        let user = ApiUser::new("key-1", HashSet::from(["BTC".to_string()]));
        assert!(user.allows("BTC"));
        assert!(!user.allows("XMR"));
    }
}
