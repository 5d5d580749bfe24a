mod audit_log;
mod discord_webhook;

pub use audit_log::InMemoryAuditLog;
pub use discord_webhook::DiscordWebhookNotifier;
