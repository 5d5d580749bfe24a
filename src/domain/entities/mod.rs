mod api_user;
mod audit_log;
mod coin_setting;
mod deposit;
mod deposit_address;
mod hold;
mod transfer;
mod withdraw;

pub use api_user::ApiUser;
pub use audit_log::{ApiFailedLog, ApiLog};
pub use coin_setting::CoinSetting;
pub use deposit::Deposit;
pub use deposit_address::{AddressId, BalanceView, DepositAddress};
pub use hold::{Hold, MAX_EXPIRING_SECS, MAX_PURPOSE_LEN, MIN_EXPIRING_SECS};
pub use transfer::Transfer;
pub use withdraw::Withdraw;
