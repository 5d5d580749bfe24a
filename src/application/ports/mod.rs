mod address_registry;
mod api_users;
mod cache;
mod coin_settings;
mod drivers;
mod ledger_store;
mod notifier;

pub use address_registry::AddressRegistry;
pub use api_users::ApiUserRepository;
pub use cache::Cache;
pub use coin_settings::CoinSettingsRepository;
pub use drivers::DriverLookup;
pub use ledger_store::{
    AddressReader, AddressRepository, AddressWriter, DepositReader, DepositRepository,
    DepositWriter, HoldReader, HoldRepository, HoldWriter, LedgerStore, TransferReader,
    TransferRepository, TransferWriter, WithdrawReader, WithdrawRepository, WithdrawWriter,
};
pub use notifier::{AuditLog, WebhookEvent, WebhookNotifier};
