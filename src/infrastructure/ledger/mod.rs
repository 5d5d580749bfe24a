mod api_user_repo;
mod coin_settings_repo;
mod in_memory_ledger;

pub use api_user_repo::InMemoryApiUserRepository;
pub use coin_settings_repo::InMemoryCoinSettingsRepository;
pub use in_memory_ledger::InMemoryLedgerStore;
