use async_trait::async_trait;
use std::sync::Arc;
use tn_core::{Article, ArticleStore, Result};
use tokio::sync::RwLock;

/// In-memory store, used by pipeline tests to assert on persisted rows
/// without a live database.
#[derive(Default, Clone)]
pub struct MemoryStore {
    rows: Arc<RwLock<Vec<Article>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn rows_for(&self, resource: &str) -> Vec<Article> {
        self.rows
            .read()
            .await
            .iter()
            .filter(|a| a.resource == resource)
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<Article> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn clear(&self, resource: &str) -> Result<()> {
        self.rows.write().await.retain(|a| a.resource != resource);
        Ok(())
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        self.rows.write().await.push(article.clone());
        Ok(())
    }
}
