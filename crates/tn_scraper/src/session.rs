use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::time::Duration;
use tn_core::{BrowserPage, Error, Result};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One headless Chromium instance with a single page, shared for the whole
/// run. The CDP event handler runs on its own task for the session's
/// lifetime; call [`close`](Self::close) on every exit path.
pub struct BrowserSession {
    browser: Browser,
    page: chromiumoxide::Page,
    handler_task: JoinHandle<()>,
}

impl BrowserSession {
    pub async fn launch() -> Result<Self> {
        let config = BrowserConfig::builder()
            .no_sandbox()
            .build()
            .map_err(Error::Browser)?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| Error::Browser(format!("Failed to launch browser: {}", e)))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Browser(format!("Failed to open page: {}", e)))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }

    pub async fn close(mut self) {
        if let Err(e) = self.page.clone().close().await {
            warn!("Failed to close page: {}", e);
        }
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {}", e);
        }
        self.handler_task.abort();
        debug!("Browser session closed");
    }
}

#[async_trait]
impl BrowserPage for BrowserSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        let load = async {
            self.page
                .goto(url)
                .await
                .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| Error::Navigation(format!("{}: {}", url, e)))?;
            Ok(())
        };
        tokio::time::timeout(timeout, load)
            .await
            .map_err(|_| Error::Navigation(format!("Timed out after {:?} loading {}", timeout, url)))?
    }

    async fn html(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| Error::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| Error::SelectorNotFound(selector.to_string()))?;
        element
            .click()
            .await
            .map_err(|e| Error::Browser(format!("Click failed on {}: {}", selector, e)))?;
        Ok(())
    }

    async fn scroll_by(&self, dx: f64, dy: f64) -> Result<()> {
        self.page
            .evaluate(format!("window.scrollBy({}, {})", dx, dy))
            .await
            .map_err(|e| Error::Browser(format!("Scroll failed: {}", e)))?;
        Ok(())
    }
}
