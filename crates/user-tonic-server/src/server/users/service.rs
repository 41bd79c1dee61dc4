//! Business rules for user records.
//!
//! [`UserService`] turns primitive request values into gateway calls. It does
//! no input validation (the RPC handler has already done that) and signals
//! "not found" through `Option`/`bool` rather than errors. Gateway failures
//! are returned untouched.

use crate::server::gateway::UserGateway;
use std::sync::Arc;
use user_tonic_core::types::{Page, PageRequest, User, UserId};

/// Stateless orchestration over a [`UserGateway`].
///
/// Cloning is cheap; all clones share the same gateway. Nothing is cached
/// between calls.
#[derive(Clone)]
pub struct UserService {
    gateway: Arc<dyn UserGateway>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn UserGateway>) -> Self {
        Self { gateway }
    }

    pub async fn create_user(
        &self,
        name: String,
        email: String,
        age: Option<i32>,
    ) -> anyhow::Result<User> {
        self.gateway.save(User::new(name, email, age)).await
    }

    pub async fn get_user_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        self.gateway.find_by_id(id).await
    }

    /// Applies a partial update and returns the stored result, or `None` if
    /// no user has this id.
    ///
    /// Empty `name`/`email` and an absent or non-positive `age` leave the
    /// corresponding field unchanged.
    pub async fn update_user(
        &self,
        id: UserId,
        name: String,
        email: String,
        age: Option<i32>,
    ) -> anyhow::Result<Option<User>> {
        let Some(mut user) = self.gateway.find_by_id(id).await? else {
            return Ok(None);
        };

        if !name.is_empty() {
            user.name = name;
        }
        if !email.is_empty() {
            user.email = email;
        }
        if let Some(age) = age.filter(|age| *age > 0) {
            user.age = Some(age);
        }

        self.gateway.save(user).await.map(Some)
    }

    /// Returns `true` if a user was removed, `false` if none existed.
    pub async fn delete_user(&self, id: UserId) -> anyhow::Result<bool> {
        if !self.gateway.exists_by_id(id).await? {
            return Ok(false);
        }
        self.gateway.delete_by_id(id).await?;
        Ok(true)
    }

    /// Lists users for a 1-based `page`. See [`PageRequest::from_client`] for
    /// how out-of-range values are normalized.
    pub async fn list_users(&self, page: i32, size: i32) -> anyhow::Result<Page<User>> {
        self.gateway
            .find_all(PageRequest::from_client(page, size))
            .await
    }

    pub async fn close(&self) {
        self.gateway.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::gateway::memory::InMemoryUserGateway;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryUserGateway::new()))
    }

    async fn seed(service: &UserService, count: usize) {
        for i in 0..count {
            service
                .create_user(format!("user{i}"), format!("user{i}@example.com"), Some(20))
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let service = service();
        let created = service
            .create_user("Alice".into(), "alice@example.com".into(), Some(30))
            .await
            .unwrap();
        let id = created.id.unwrap();
        assert!(id > 0);

        let fetched = service.get_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Alice");
        assert_eq!(fetched.email, "alice@example.com");
        assert_eq!(fetched.age, Some(30));
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        assert_eq!(service().get_user_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn update_missing_is_none() {
        let updated = service()
            .update_user(5, "Bob".into(), String::new(), Some(30))
            .await
            .unwrap();
        assert_eq!(updated, None);
    }

    #[tokio::test]
    async fn update_with_nothing_supplied_changes_nothing() {
        let service = service();
        let created = service
            .create_user("Alice".into(), "alice@example.com".into(), Some(30))
            .await
            .unwrap();

        let updated = service
            .update_user(created.id.unwrap(), String::new(), String::new(), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.email, created.email);
        assert_eq!(updated.age, created.age);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_ignores_non_positive_age() {
        let service = service();
        let created = service
            .create_user("Alice".into(), "alice@example.com".into(), Some(30))
            .await
            .unwrap();

        let updated = service
            .update_user(created.id.unwrap(), String::new(), String::new(), Some(-4))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.age, Some(30));
    }

    #[tokio::test]
    async fn update_overwrites_supplied_fields_only() {
        let service = service();
        let created = service
            .create_user("Alice".into(), "alice@example.com".into(), Some(30))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let updated = service
            .update_user(id, "Bob".into(), String::new(), Some(41))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Bob");
        assert_eq!(updated.email, "alice@example.com");
        assert_eq!(updated.age, Some(41));

        let stored = service.get_user_by_id(id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let service = service();
        seed(&service, 1).await;

        assert!(service.delete_user(1).await.unwrap());
        assert!(!service.delete_user(1).await.unwrap());
        assert_eq!(service.get_user_by_id(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_normalizes_page_and_size() {
        let service = service();
        seed(&service, 12).await;

        let first = service.list_users(0, 0).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.total, 12);

        let second = service.list_users(2, 10).await.unwrap();
        assert_eq!(second.items.len(), 2);
        assert_eq!(second.total, 12);
        assert_eq!(second.items[0].name, "user10");
    }
}
