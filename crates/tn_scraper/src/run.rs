use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use tn_core::{Article, ArticleStore, BrowserPage, Result, Seed};
use tracing::{error, info, warn};

use crate::extract::enrich_article;
use crate::listing::{dismiss_consent, extract_seeds, wait_for_listing, ScrollOptions};
use crate::normalize;
use crate::sources::SourceProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistMode {
    /// Insert each article as soon as it is enriched (the default). A crash
    /// mid-run leaves the rows inserted so far.
    Immediate,
    /// Enrich everything first, then insert the whole batch.
    Collected,
}

/// Whether dropped articles flip the run outcome to a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialFailure {
    Lenient,
    Strict,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub persist_mode: PersistMode,
    pub partial_failure: PartialFailure,
    /// Attempts per seed; each attempt is navigate + extract (+ insert in
    /// immediate mode), retried with no backoff.
    pub max_attempts: u32,
    pub listing_timeout: Duration,
    /// Deliberately shorter than the listing timeout.
    pub article_timeout: Duration,
    pub scroll: ScrollOptions,
    /// Diagnostics JSON dump of the enriched seed list, written best-effort.
    pub dump_path: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            persist_mode: PersistMode::Immediate,
            partial_failure: PartialFailure::Lenient,
            max_attempts: 3,
            listing_timeout: Duration::from_secs(60),
            article_timeout: Duration::from_secs(10),
            scroll: ScrollOptions::default(),
            dump_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub status_code: u16,
    pub message: String,
    pub articles: Vec<Article>,
}

impl RunOutcome {
    pub fn failure(message: &str) -> Self {
        Self {
            status_code: 500,
            message: message.to_string(),
            articles: Vec::new(),
        }
    }

    /// The caller-facing response shape: a body object on success, a bare
    /// message on failure.
    pub fn to_response(&self) -> serde_json::Value {
        if self.status_code == 200 {
            json!({
                "statusCode": self.status_code,
                "body": { "message": self.message, "articles": self.articles }
            })
        } else {
            json!({ "statusCode": self.status_code, "body": self.message })
        }
    }
}

/// One full scrape run: clear prior rows for the source, locate the
/// trending list, enrich and persist each seed sequentially. Always returns
/// a structured outcome; the store connection lifecycle belongs to the
/// caller.
pub async fn run(
    page: &dyn BrowserPage,
    store: &dyn ArticleStore,
    profile: &SourceProfile,
    opts: &RunOptions,
) -> RunOutcome {
    match scrape(page, store, profile, opts).await {
        Ok((articles, dropped)) => {
            let message = if dropped > 0 {
                format!("Scraping completed, {} article(s) dropped", dropped)
            } else {
                "Scraping completed successfully".to_string()
            };
            let status_code = match opts.partial_failure {
                PartialFailure::Strict if dropped > 0 => 500,
                _ => 200,
            };
            RunOutcome {
                status_code,
                message,
                articles,
            }
        }
        Err(e) => {
            error!("Scrape run failed: {}", e);
            RunOutcome::failure("Scraping failed")
        }
    }
}

async fn scrape(
    page: &dyn BrowserPage,
    store: &dyn ArticleStore,
    profile: &SourceProfile,
    opts: &RunOptions,
) -> Result<(Vec<Article>, usize)> {
    // Replace semantics: prior rows go away before any insert.
    store.clear(profile.resource).await?;

    info!("Navigating to {}", profile.listing_url);
    page.navigate(profile.listing_url, opts.listing_timeout)
        .await?;
    dismiss_consent(page, profile).await;
    wait_for_listing(page, profile, &opts.scroll).await?;

    let seeds = extract_seeds(&page.html().await?, profile)?;
    info!("Collected {} headline(s) from the trending list", seeds.len());

    let mut articles = Vec::new();
    let mut dropped = 0usize;
    for seed in &seeds {
        info!("Visiting article: {}", seed.headline);
        match enrich_with_retry(page, store, profile, seed, opts).await {
            Some(article) => articles.push(article),
            None => dropped += 1,
        }
    }

    if opts.persist_mode == PersistMode::Collected {
        for article in &articles {
            store.insert(article).await?;
        }
    }

    if let Some(path) = &opts.dump_path {
        match serde_json::to_string_pretty(&articles) {
            Ok(dump) => {
                if let Err(e) = std::fs::write(path, dump) {
                    warn!("Could not write diagnostics dump to {:?}: {}", path, e);
                }
            }
            Err(e) => warn!("Could not serialize diagnostics dump: {}", e),
        }
    }

    Ok((articles, dropped))
}

/// Per-article fault isolation: up to `max_attempts` tries, then the seed
/// is dropped with a log line and the run moves on.
async fn enrich_with_retry(
    page: &dyn BrowserPage,
    store: &dyn ArticleStore,
    profile: &SourceProfile,
    seed: &Seed,
    opts: &RunOptions,
) -> Option<Article> {
    for attempt in 1..=opts.max_attempts {
        match attempt_article(page, store, profile, seed, opts).await {
            Ok(article) => return Some(article),
            Err(e) => warn!(
                "Attempt {}/{} failed for {}: {}",
                attempt, opts.max_attempts, seed.link, e
            ),
        }
    }
    error!(
        "Dropping article after {} attempts: {}",
        opts.max_attempts, seed.headline
    );
    None
}

async fn attempt_article(
    page: &dyn BrowserPage,
    store: &dyn ArticleStore,
    profile: &SourceProfile,
    seed: &Seed,
    opts: &RunOptions,
) -> Result<Article> {
    page.navigate(&seed.link, opts.article_timeout).await?;
    let html = page.html().await?;
    let mut article = enrich_article(&html, seed, profile);
    normalize::finalize(&mut article, profile.resource);
    if opts.persist_mode == PersistMode::Immediate {
        store.insert(&article).await?;
    }
    Ok(article)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::attribution_footer;
    use crate::sources::aljazeera::PROFILE;
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use tn_core::Error;
    use tn_storage::MemoryStore;

    const LISTING_HTML: &str = r#"
        <div class="trending-articles">
          <ul class="trending-articles__list">
            <li>
              <a class="article-trending__title-link" href="/news/one">
                <span class="article-trending__title"><span>First Big Story Today</span></span>
              </a>
            </li>
            <li>
              <a class="article-trending__title-link" href="/news/two">
                <span class="article-trending__title"><span>Second Big Story Today</span></span>
              </a>
            </li>
          </ul>
        </div>
    "#;

    const ARTICLE_HTML: &str = r#"
        <div id="wysiwyg" class="wysiwyg">
          <p>Some article body text.</p>
        </div>
    "#;

    /// Browser double: canned HTML per URL, optional always-failing
    /// navigations, and a log of every navigation.
    struct FakePage {
        pages: HashMap<String, String>,
        failing: HashSet<String>,
        current: Mutex<String>,
        nav_log: Mutex<Vec<String>>,
    }

    impl FakePage {
        fn new() -> Self {
            let mut pages = HashMap::new();
            pages.insert(PROFILE.listing_url.to_string(), LISTING_HTML.to_string());
            pages.insert(
                "https://www.aljazeera.com/news/one".to_string(),
                ARTICLE_HTML.to_string(),
            );
            pages.insert(
                "https://www.aljazeera.com/news/two".to_string(),
                ARTICLE_HTML.to_string(),
            );
            Self {
                pages,
                failing: HashSet::new(),
                current: Mutex::new(String::new()),
                nav_log: Mutex::new(Vec::new()),
            }
        }

        fn failing(mut self, url: &str) -> Self {
            self.failing.insert(url.to_string());
            self
        }

        fn navigations_to(&self, url: &str) -> usize {
            self.nav_log
                .lock()
                .unwrap()
                .iter()
                .filter(|u| *u == url)
                .count()
        }
    }

    #[async_trait]
    impl BrowserPage for FakePage {
        async fn navigate(&self, url: &str, _timeout: Duration) -> tn_core::Result<()> {
            self.nav_log.lock().unwrap().push(url.to_string());
            if self.failing.contains(url) {
                return Err(Error::Navigation(format!("timed out loading {}", url)));
            }
            *self.current.lock().unwrap() = url.to_string();
            Ok(())
        }

        async fn html(&self) -> tn_core::Result<String> {
            let current = self.current.lock().unwrap().clone();
            self.pages
                .get(&current)
                .cloned()
                .ok_or_else(|| Error::Browser(format!("no page loaded for {}", current)))
        }

        async fn exists(&self, selector: &str) -> tn_core::Result<bool> {
            Ok(selector == PROFILE.trending_container)
        }

        async fn click(&self, _selector: &str) -> tn_core::Result<()> {
            Ok(())
        }

        async fn scroll_by(&self, _dx: f64, _dy: f64) -> tn_core::Result<()> {
            Ok(())
        }
    }

    fn fast_opts() -> RunOptions {
        RunOptions {
            scroll: ScrollOptions {
                max_attempts: 3,
                deadline: Duration::from_secs(1),
                poll_interval: Duration::from_millis(1),
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_happy_path_persists_in_seed_order() {
        let page = FakePage::new();
        let store = MemoryStore::new();
        let outcome = run(&page, &store, &PROFILE, &fast_opts()).await;

        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.articles.len(), 2);

        let rows = store.rows_for("Al Jazeera").await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].headline, "First Big Story Today");
        assert_eq!(rows[1].headline, "Second Big Story Today");
        for row in &rows {
            assert!(!row.id.is_empty());
            assert!(!row.slug.is_empty());
            assert!(row.body.ends_with(&attribution_footer(&row.link, "Al Jazeera")));
            assert!(!row.summary.is_empty());
            assert!(row.media.starts_with("https://"));
        }
    }

    #[tokio::test]
    async fn test_run_replaces_prior_snapshot() {
        let store = MemoryStore::new();
        let mut stale = Article::from_seed(&Seed {
            headline: "Old news".to_string(),
            link: "https://www.aljazeera.com/old".to_string(),
            slug: "oldnews".to_string(),
        });
        stale.id = "stale".to_string();
        stale.resource = "Al Jazeera".to_string();
        store.insert(&stale).await.unwrap();

        let page = FakePage::new();
        run(&page, &store, &PROFILE, &fast_opts()).await;

        let rows = store.rows_for("Al Jazeera").await;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.id != "stale"));
    }

    #[tokio::test]
    async fn test_failing_article_tried_three_times_then_dropped() {
        let bad = "https://www.aljazeera.com/news/one";
        let page = FakePage::new().failing(bad);
        let store = MemoryStore::new();
        let outcome = run(&page, &store, &PROFILE, &fast_opts()).await;

        assert_eq!(page.navigations_to(bad), 3);
        // Lenient policy: partial success still reports 200.
        assert_eq!(outcome.status_code, 200);
        assert_eq!(outcome.articles.len(), 1);

        let rows = store.rows_for("Al Jazeera").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].headline, "Second Big Story Today");
    }

    #[tokio::test]
    async fn test_strict_policy_flips_outcome_on_drop() {
        let page = FakePage::new().failing("https://www.aljazeera.com/news/two");
        let store = MemoryStore::new();
        let opts = RunOptions {
            partial_failure: PartialFailure::Strict,
            ..fast_opts()
        };
        let outcome = run(&page, &store, &PROFILE, &opts).await;
        assert_eq!(outcome.status_code, 500);
    }

    #[tokio::test]
    async fn test_collected_mode_persists_whole_batch() {
        let page = FakePage::new();
        let store = MemoryStore::new();
        let opts = RunOptions {
            persist_mode: PersistMode::Collected,
            ..fast_opts()
        };
        let outcome = run(&page, &store, &PROFILE, &opts).await;

        assert_eq!(outcome.status_code, 200);
        let rows = store.rows_for("Al Jazeera").await;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].headline, "First Big Story Today");
    }

    #[tokio::test]
    async fn test_listing_never_found_fails_fast() {
        struct NoListing;

        #[async_trait]
        impl BrowserPage for NoListing {
            async fn navigate(&self, _url: &str, _t: Duration) -> tn_core::Result<()> {
                Ok(())
            }
            async fn html(&self) -> tn_core::Result<String> {
                Ok(String::new())
            }
            async fn exists(&self, _selector: &str) -> tn_core::Result<bool> {
                Ok(false)
            }
            async fn click(&self, _selector: &str) -> tn_core::Result<()> {
                Ok(())
            }
            async fn scroll_by(&self, _dx: f64, _dy: f64) -> tn_core::Result<()> {
                Ok(())
            }
        }

        let store = MemoryStore::new();
        let outcome = run(&NoListing, &store, &PROFILE, &fast_opts()).await;
        assert_eq!(outcome.status_code, 500);
        assert!(outcome.articles.is_empty());
        assert!(store.rows_for("Al Jazeera").await.is_empty());
    }

    #[test]
    fn test_response_shapes() {
        let ok = RunOutcome {
            status_code: 200,
            message: "Scraping completed successfully".to_string(),
            articles: vec![],
        };
        let body = ok.to_response();
        assert_eq!(body["statusCode"], 200);
        assert!(body["body"]["articles"].is_array());

        let failed = RunOutcome::failure("Database connection failed");
        assert_eq!(failed.to_response()["body"], "Database connection failed");
    }
}
