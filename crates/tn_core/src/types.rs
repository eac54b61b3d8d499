use serde::{Deserialize, Serialize};

/// Minimal identifying tuple for a discovered article, before enrichment.
///
/// `slug` is derived from the first three headline words and is *not*
/// guaranteed unique across seeds; `Article::id` carries uniqueness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    pub headline: String,
    pub link: String,
    pub slug: String,
}

/// A fully enriched article as persisted. All fields are strings; `date`
/// is RFC 3339 or empty when the page's date text could not be parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub id: String,
    pub slug: String,
    pub headline: String,
    pub summary: String,
    pub body: String,
    pub author: String,
    pub resource: String,
    pub media: String,
    pub link: String,
    pub date: String,
}

impl Article {
    /// Start an in-memory record from a listing seed, enrichment fields
    /// empty. `id` and `resource` are filled by the normalizer just before
    /// persistence.
    pub fn from_seed(seed: &Seed) -> Self {
        Self {
            id: String::new(),
            slug: seed.slug.clone(),
            headline: seed.headline.clone(),
            summary: String::new(),
            body: String::new(),
            author: String::new(),
            resource: String::new(),
            media: String::new(),
            link: seed.link.clone(),
            date: String::new(),
        }
    }
}
