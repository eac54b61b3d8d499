use async_trait::async_trait;
use sqlx::postgres::PgPool;
use tn_core::{Article, ArticleStore, Error, Result};
use tracing::info;

/// Postgres-backed gateway over the shared `"Article"` table. The pool is
/// acquired once per run and must be released with [`close`](Self::close)
/// on every exit path.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = PgPool::connect(url)
            .await
            .map_err(|e| Error::Database(format!("Failed to connect: {}", e)))?;
        info!("Connected to the database");
        Ok(Self { pool })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed");
    }
}

#[async_trait]
impl ArticleStore for PostgresStore {
    async fn clear(&self, resource: &str) -> Result<()> {
        sqlx::query(r#"DELETE FROM "Article" WHERE resource = $1"#)
            .bind(resource)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to clear articles: {}", e)))?;
        info!("Cleared existing articles for resource {:?}", resource);
        Ok(())
    }

    async fn insert(&self, article: &Article) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "Article" (id, slug, headline, summary, body, author, resource, media, link, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&article.id)
        .bind(&article.slug)
        .bind(&article.headline)
        .bind(&article.summary)
        .bind(&article.body)
        .bind(&article.author)
        .bind(&article.resource)
        .bind(&article.media)
        .bind(&article.link)
        .bind(&article.date)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to insert article: {}", e)))?;
        Ok(())
    }
}
