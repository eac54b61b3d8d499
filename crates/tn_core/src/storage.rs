use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

/// The slice of the relational store this pipeline consumes. The run
/// clears prior rows for its source once, then inserts in seed order
/// ("replace" semantics, no upsert).
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Delete every row whose `resource` column matches.
    async fn clear(&self, resource: &str) -> Result<()>;

    /// Append one row. Implementations must bind values as parameters,
    /// never interpolate scraped text into SQL.
    async fn insert(&self, article: &Article) -> Result<()>;
}
