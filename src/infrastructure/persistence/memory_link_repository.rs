//! Process-local link repository.
//!
//! Used when no database is configured, and by the integration tests.
//! Contents are lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    links: HashMap<String, Link>,
    next_id: i64,
}

/// In-memory repository keyed by short code.
///
/// A single write lock covers the existence check and the insert, so
/// [`LinkRepository::insert_if_absent`] is atomic.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    store: RwLock<Store>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a link inactive. Inactive links keep their code reserved.
    pub async fn deactivate(&self, code: &str) -> bool {
        let mut store = self.store.write().await;
        match store.links.get_mut(code) {
            Some(link) => {
                link.is_active = false;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert_if_absent(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        let mut store = self.store.write().await;

        if store.links.contains_key(&new_link.code) {
            return Ok(None);
        }

        store.next_id += 1;
        let link = Link::new(
            store.next_id,
            new_link.code,
            new_link.long_url,
            new_link.description,
            Utc::now(),
        );
        store.links.insert(link.code.clone(), link.clone());

        Ok(Some(link))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        let store = self.store.read().await;
        Ok(store.links.get(code).filter(|l| l.is_active).cloned())
    }

    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<Link>, AppError> {
        let store = self.store.read().await;
        Ok(store
            .links
            .values()
            .filter(|l| l.is_active && l.long_url == long_url)
            .min_by_key(|l| l.id)
            .cloned())
    }

    async fn existing_codes(&self) -> Result<HashSet<String>, AppError> {
        let store = self.store.read().await;
        Ok(store.links.keys().cloned().collect())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.store.read().await.links.contains_key(code))
    }

    async fn record_click(&self, code: &str) -> Result<bool, AppError> {
        let mut store = self.store.write().await;
        match store.links.get_mut(code).filter(|l| l.is_active) {
            Some(link) => {
                link.register_click(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_all(&self) -> Result<Vec<Link>, AppError> {
        let store = self.store.read().await;
        let mut links: Vec<Link> = store
            .links
            .values()
            .filter(|l| l.is_active)
            .cloned()
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn count(&self) -> Result<i64, AppError> {
        let store = self.store.read().await;
        Ok(store.links.values().filter(|l| l.is_active).count() as i64)
    }

    async fn total_clicks(&self) -> Result<i64, AppError> {
        let store = self.store.read().await;
        Ok(store
            .links
            .values()
            .filter(|l| l.is_active)
            .map(|l| l.click_count)
            .sum())
    }
}
