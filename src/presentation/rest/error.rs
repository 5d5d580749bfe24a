//! Every response is HTTP 200; `success` is the only thing callers should
//! branch on. Handlers fold these into `Envelope::error` directly rather
//! than implementing `IntoResponse`, since there's no status code to vary.

#[derive(Debug, Clone)]
pub enum GatewayError {
    ColdStart,
    UnsupportedCoin(String),
    MissingAuth,
    WrongKey,
    Suspended,
    CoinNotAllowed,
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::ColdStart => write!(f, "internal error."),
            GatewayError::UnsupportedCoin(coin) => write!(f, "coin {coin} not in the supported list!"),
            GatewayError::MissingAuth => write!(f, "you need Authorization key in header!"),
            GatewayError::WrongKey => write!(f, "wrong API key!"),
            GatewayError::Suspended => write!(f, "this API key is suspended."),
            GatewayError::CoinNotAllowed => write!(f, "this API key is not allowed for that coin."),
        }
    }
}

impl std::error::Error for GatewayError {}
