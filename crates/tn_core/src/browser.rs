use async_trait::async_trait;
use std::time::Duration;

use crate::Result;

/// The slice of a headless browser this pipeline consumes. One page is
/// shared for the whole run; every method is a suspension point.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    /// Navigate the page and wait for the document to load, failing with
    /// `Error::Navigation` on timeout or network failure.
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Serialized DOM of the current document.
    async fn html(&self) -> Result<String>;

    /// Whether any element currently matches `selector`.
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Click the first element matching `selector`, failing with
    /// `Error::SelectorNotFound` when nothing matches.
    async fn click(&self, selector: &str) -> Result<()>;

    /// Scroll the viewport by the given offsets.
    async fn scroll_by(&self, dx: f64, dy: f64) -> Result<()>;
}
