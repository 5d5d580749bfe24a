//! In-memory API credential table (part of C2).

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use crate::application::ports::ApiUserRepository;
use crate::domain::entities::ApiUser;

pub struct InMemoryApiUserRepository {
    by_id: DashMap<Uuid, ApiUser>,
}

impl InMemoryApiUserRepository {
    pub fn new() -> Self {
        Self {
            by_id: DashMap::new(),
        }
    }

    pub fn seed(users: Vec<ApiUser>) -> Self {
        let repo = Self::new();
        for user in users {
            repo.by_id.insert(user.id.as_uuid(), user);
        }
        repo
    }
}

impl Default for InMemoryApiUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ApiUserRepository for InMemoryApiUserRepository {
    async fn get_by_api_key(&self, api_key: &str) -> Option<ApiUser> {
        self.by_id
            .iter()
            .find(|e| e.api_key == api_key)
            .map(|e| e.value().clone())
    }

    async fn get(&self, id: &Uuid) -> Option<ApiUser> {
        self.by_id.get(id).map(|e| e.value().clone())
    }
}
