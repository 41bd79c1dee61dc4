use super::UserGateway;
use chrono::Utc;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use user_tonic_core::types::{Page, PageRequest, User, UserId};

#[derive(Default)]
struct Store {
    last_id: UserId,
    users: BTreeMap<UserId, User>,
}

/// Process-local [`UserGateway`].
///
/// Ids are assigned from a counter starting at 1 and are never reused.
/// Timestamps are UTC wall-clock time without a zone.
#[derive(Default)]
pub struct InMemoryUserGateway {
    store: RwLock<Store>,
}

impl InMemoryUserGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[tonic::async_trait]
impl UserGateway for InMemoryUserGateway {
    async fn find_by_id(&self, id: UserId) -> anyhow::Result<Option<User>> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn save(&self, mut user: User) -> anyhow::Result<User> {
        let now = Utc::now().naive_utc();
        let mut store = self.store.write().await;

        let id = match user.id {
            Some(id) => id,
            None => {
                store.last_id += 1;
                store.last_id
            }
        };
        store.last_id = store.last_id.max(id);

        let created_at = store
            .users
            .get(&id)
            .and_then(|existing| existing.created_at)
            .unwrap_or(now);

        user.id = Some(id);
        user.created_at = Some(created_at);
        user.updated_at = Some(now);
        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn exists_by_id(&self, id: UserId) -> anyhow::Result<bool> {
        let store = self.store.read().await;
        Ok(store.users.contains_key(&id))
    }

    async fn delete_by_id(&self, id: UserId) -> anyhow::Result<()> {
        let mut store = self.store.write().await;
        store.users.remove(&id);
        Ok(())
    }

    async fn find_all(&self, page: PageRequest) -> anyhow::Result<Page<User>> {
        let store = self.store.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let items = store
            .users
            .values()
            .skip(skip)
            .take(page.size as usize)
            .cloned()
            .collect();
        Ok(Page {
            items,
            total: store.users.len() as u64,
        })
    }
}
