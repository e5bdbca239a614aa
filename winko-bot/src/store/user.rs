use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

/// A bot user as known to the application, keyed by Telegram user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub tg_user_id: i64,
    pub last_thread_id: Option<String>,
    pub wallet_address: Option<String>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_tg_id(&self, tg_user_id: i64) -> Result<Option<UserRecord>>;

    /// Remembers the conversation thread to continue for this user.
    async fn set_last_thread(&self, tg_user_id: i64, thread_id: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<i64, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.get_mut().insert(user.tg_user_id, user);
        self
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_tg_id(&self, tg_user_id: i64) -> Result<Option<UserRecord>> {
        Ok(self.users.read().await.get(&tg_user_id).cloned())
    }

    async fn set_last_thread(&self, tg_user_id: i64, thread_id: &str) -> Result<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&tg_user_id)
            .ok_or_else(|| anyhow::anyhow!("no user with tg id {}", tg_user_id))?;
        user.last_thread_id = Some(thread_id.to_string());
        info!(tg_user_id, thread_id = %thread_id, "Recorded last thread for user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 1,
            tg_user_id: 504459620,
            last_thread_id: None,
            wallet_address: Some("0xabc".to_string()),
        }
    }

    #[tokio::test]
    async fn test_find_and_update_thread() {
        let store = InMemoryUserStore::new().with_user(record());

        assert!(store.find_by_tg_id(1).await.unwrap().is_none());
        store.set_last_thread(504459620, "thread_1").await.unwrap();

        let user = store.find_by_tg_id(504459620).await.unwrap().unwrap();
        assert_eq!(user.last_thread_id.as_deref(), Some("thread_1"));
    }

    #[tokio::test]
    async fn test_set_thread_for_unknown_user_fails() {
        let store = InMemoryUserStore::new();
        assert!(store.set_last_thread(7, "thread_1").await.is_err());
    }
}
