//! Port for API credential lookup (C6).

use async_trait::async_trait;

use crate::domain::entities::ApiUser;

#[async_trait]
pub trait ApiUserRepository: Send + Sync {
    async fn get_by_api_key(&self, api_key: &str) -> Option<ApiUser>;
    async fn get(&self, id: &uuid::Uuid) -> Option<ApiUser>;
}
