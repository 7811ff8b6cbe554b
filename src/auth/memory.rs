//! In-process [`UserStore`]s used by handler tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::auth::{
    repo::{StoreError, UserStore},
    repo_types::{ProgressUpdate, User},
};

#[derive(Default)]
struct Inner {
    next_id: i32,
    rows: BTreeMap<i32, User>,
}

#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<Inner>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;
        Ok(inner.rows.values().find(|u| u.name == name).cloned())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.inner.lock().await.rows.get(&id).cloned())
    }

    async fn create(&self, name: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        if inner.rows.values().any(|u| u.name == name) {
            return Err(StoreError::UniqueViolation);
        }
        // ids are never handed out twice, even after a delete
        inner.next_id += 1;
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: inner.next_id,
            name: name.to_string(),
            password_hash: password_hash.to_string(),
            check_point: 0,
            high_score: 0,
            created_at: now,
            updated_at: now,
        };
        inner.rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_progress(&self, id: i32, update: ProgressUpdate) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;
        let user = inner.rows.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(check_point) = update.check_point {
            user.check_point = check_point;
        }
        if let Some(high_score) = update.high_score {
            user.high_score = high_score;
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(user.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        self.inner
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Store whose every call fails with a non-constraint error.
pub struct FailingUserStore;

fn unavailable() -> StoreError {
    StoreError::Other(anyhow::anyhow!("database unavailable"))
}

#[async_trait]
impl UserStore for FailingUserStore {
    async fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
        Err(unavailable())
    }

    async fn find_by_id(&self, _id: i32) -> Result<Option<User>, StoreError> {
        Err(unavailable())
    }

    async fn create(&self, _name: &str, _password_hash: &str) -> Result<User, StoreError> {
        Err(unavailable())
    }

    async fn update_progress(&self, _id: i32, _update: ProgressUpdate) -> Result<User, StoreError> {
        Err(unavailable())
    }

    async fn delete(&self, _id: i32) -> Result<(), StoreError> {
        Err(unavailable())
    }
}
