use scraper::Html;
use std::time::{Duration, Instant};
use tn_core::{BrowserPage, Error, Result, Seed};
use tracing::{debug, info};

use crate::extract::{absolutize, sel};
use crate::sources::SourceProfile;

/// One viewport-height worth of scrolling between polls.
const SCROLL_STEP_PX: f64 = 900.0;

/// Bounds on the scroll-and-poll loop. The trending section loads lazily,
/// so the locator scrolls until the container exists, but never waits
/// forever: exhausting either bound is `Error::ListingNotFound`.
#[derive(Debug, Clone)]
pub struct ScrollOptions {
    pub max_attempts: u32,
    pub deadline: Duration,
    pub poll_interval: Duration,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            deadline: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Best-effort consent interstitial dismissal. Absence and click failures
/// are both non-fatal.
pub async fn dismiss_consent(page: &dyn BrowserPage, profile: &SourceProfile) {
    match page.exists(profile.consent_selector).await {
        Ok(true) => {
            info!("Consent banner found, dismissing");
            if let Err(e) = page.click(profile.consent_selector).await {
                debug!("Consent click failed: {}", e);
            }
        }
        Ok(false) => {}
        Err(e) => debug!("Consent probe failed: {}", e),
    }
}

/// Scroll-and-poll until the trending container materializes.
pub async fn wait_for_listing(
    page: &dyn BrowserPage,
    profile: &SourceProfile,
    opts: &ScrollOptions,
) -> Result<()> {
    let started = Instant::now();
    for attempt in 0..opts.max_attempts {
        if page.exists(profile.trending_container).await? {
            info!("Trending section found after {} scroll(s)", attempt);
            return Ok(());
        }
        if started.elapsed() >= opts.deadline {
            break;
        }
        debug!("Scrolling down looking for {}", profile.trending_container);
        page.scroll_by(0.0, SCROLL_STEP_PX).await?;
        tokio::time::sleep(opts.poll_interval).await;
    }
    Err(Error::ListingNotFound(format!(
        "{} did not appear within {} attempts",
        profile.trending_container, opts.max_attempts
    )))
}

/// Pull seeds out of the listing page DOM. Seeds keep document order and
/// duplicates; items missing a headline or href are skipped.
pub fn extract_seeds(html: &str, profile: &SourceProfile) -> Result<Vec<Seed>> {
    let doc = Html::parse_document(html);
    let item_sel = sel(profile.trending_items)?;
    let headline_sel = sel(profile.trending_headline)?;
    let link_sel = sel(profile.trending_link)?;

    let mut seeds = Vec::new();
    for item in doc.select(&item_sel) {
        let Some(headline) = item
            .select(&headline_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty())
        else {
            continue;
        };
        let Some(link) = item
            .select(&link_sel)
            .next()
            .and_then(|el| el.value().attr("href"))
            .and_then(|href| absolutize(profile.base_url, href.trim()))
        else {
            continue;
        };
        seeds.push(Seed {
            slug: derive_slug(&headline),
            headline,
            link,
        });
    }
    Ok(seeds)
}

/// First three whitespace-separated headline tokens, concatenated,
/// lowercased, stripped to ASCII letters. Not unique across seeds.
pub fn derive_slug(headline: &str) -> String {
    headline
        .split_whitespace()
        .take(3)
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}
