use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tn_core::{Article, Error, Result, Seed};
use url::Url;

use crate::sources::SourceProfile;

/// Placeholder author when no byline element matches.
pub const AUTHOR_FALLBACK: &str = "See article for details";

/// Word caps from the article template: structured summaries are cut at 40
/// words, the strip-tags fallback at 25.
const SUMMARY_WORDS: usize = 40;
const FALLBACK_SUMMARY_WORDS: usize = 25;

pub(crate) fn sel(raw: &str) -> Result<Selector> {
    Selector::parse(raw)
        .map_err(|e| Error::Extraction(format!("Invalid selector {:?}: {}", raw, e)))
}

/// Build an article record from a seed and the article page's serialized
/// DOM. Every field has its own fallback, so a template that is missing
/// pieces still yields a usable record.
pub fn enrich_article(html: &str, seed: &Seed, profile: &SourceProfile) -> Article {
    let doc = Html::parse_document(html);
    let mut article = Article::from_seed(seed);

    let raw_body = extract_body(&doc, profile);
    // The fallback summary reads the body before the footer is appended so
    // attribution markup never leaks into it.
    article.summary =
        extract_summary(&doc, profile).unwrap_or_else(|| fallback_summary(&raw_body));
    article.body = append_footer(&raw_body, &seed.link, profile.resource);
    article.author = extract_author(&doc, profile).unwrap_or_else(|| AUTHOR_FALLBACK.to_string());
    article.media =
        extract_media(&doc, profile).unwrap_or_else(|| profile.fallback_logo.to_string());
    article.date = extract_date(&doc, profile).unwrap_or_default();
    article
}

/// Walk the body container in document order, emitting a minimal HTML
/// fragment per `h2`, `p` and `img` node. Nodes sitting under a noise
/// subtree (related-content boxes, newsletter forms, ads, widgets) are
/// skipped. No matching container yields an empty string, not an error.
pub fn extract_body(doc: &Html, profile: &SourceProfile) -> String {
    let container_sel = match sel(profile.body_container) {
        Ok(s) => s,
        Err(_) => return String::new(),
    };
    let Some(container) = doc.select(&container_sel).next() else {
        return String::new();
    };

    let mut noise_roots: HashSet<_> = HashSet::new();
    for raw in profile.noise_selectors {
        if let Ok(noise_sel) = Selector::parse(raw) {
            noise_roots.extend(container.select(&noise_sel).map(|el| el.id()));
        }
    }

    let mut body = String::new();
    for node in container.descendants() {
        let Some(el) = ElementRef::wrap(node) else {
            continue;
        };
        if noise_roots.contains(&el.id()) || el.ancestors().any(|a| noise_roots.contains(&a.id()))
        {
            continue;
        }
        match el.value().name() {
            "img" => {
                let src = el.value().attr("src").unwrap_or_default();
                let alt = el.value().attr("alt").unwrap_or_default();
                body.push_str(&format!(
                    "<figure><img src=\"{}\" alt=\"{}\"/><figcaption>{}</figcaption></figure>",
                    src, alt, alt
                ));
            }
            tag @ ("h2" | "p") => {
                let text = el.text().collect::<String>();
                body.push_str(&format!("<{}>{}</{}>", tag, text.trim(), tag));
            }
            _ => {}
        }
    }
    body
}

type SummaryStrategy = fn(&Html, &SourceProfile) -> Option<String>;

/// Ordered summary cascade: first strategy producing text wins. Exhaustion
/// returns `None` and the caller falls back to [`fallback_summary`].
const SUMMARY_STRATEGIES: &[SummaryStrategy] =
    &[summary_from_list_item, summary_from_subhead, summary_from_paragraph];

pub fn extract_summary(doc: &Html, profile: &SourceProfile) -> Option<String> {
    SUMMARY_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(doc, profile))
}

fn summary_from_list_item(doc: &Html, profile: &SourceProfile) -> Option<String> {
    first_text(doc, profile.summary_list_item).map(|t| truncate_words(&t, SUMMARY_WORDS))
}

fn summary_from_subhead(doc: &Html, profile: &SourceProfile) -> Option<String> {
    first_text(doc, profile.summary_subhead)
}

fn summary_from_paragraph(doc: &Html, profile: &SourceProfile) -> Option<String> {
    first_text(doc, profile.summary_paragraph).map(|t| truncate_words(&t, SUMMARY_WORDS))
}

/// Strip markup from the leading words of the body and mark the cut with an
/// ellipsis. An empty body yields just `"..."`.
pub fn fallback_summary(body: &str) -> String {
    let snippet = truncate_words(body, FALLBACK_SUMMARY_WORDS);
    format!("{}...", strip_tags(&snippet))
}

pub fn extract_author(doc: &Html, profile: &SourceProfile) -> Option<String> {
    first_text(doc, profile.author)
}

/// Featured image: primary selector, then secondary, relative srcs resolved
/// against the site origin.
pub fn extract_media(doc: &Html, profile: &SourceProfile) -> Option<String> {
    [profile.media_primary, profile.media_secondary]
        .iter()
        .find_map(|raw| {
            let media_sel = Selector::parse(raw).ok()?;
            let src = doc.select(&media_sel).next()?.value().attr("src")?;
            absolutize(profile.base_url, src.trim())
        })
}

pub fn extract_date(doc: &Html, profile: &SourceProfile) -> Option<String> {
    parse_date_text(&first_text(doc, profile.date)?)
}

/// Parse the display date into an RFC 3339 UTC timestamp. Returns `None`
/// for text no known format matches; the caller persists an empty string.
pub fn parse_date_text(raw: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc).to_rfc3339());
    }
    const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%B %d, %Y", "%d %b %Y", "%d %B %Y", "%Y-%m-%d"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            let midnight = date.and_hms_opt(0, 0, 0)?;
            return Some(Utc.from_utc_datetime(&midnight).to_rfc3339());
        }
    }
    None
}

/// The canonical attribution footer linking back to the source.
pub fn attribution_footer(link: &str, resource: &str) -> String {
    format!(
        "<br><br><ul><li><a href='{}'>Visit {}</a></li></ul>",
        link, resource
    )
}

/// Append the footer exactly once, including on an empty body.
pub fn append_footer(body: &str, link: &str, resource: &str) -> String {
    format!("{}{}", body, attribution_footer(link, resource))
}

pub fn strip_tags(html: &str) -> String {
    Html::parse_fragment(html)
        .root_element()
        .text()
        .collect::<String>()
        .trim()
        .to_string()
}

pub fn truncate_words(text: &str, cap: usize) -> String {
    text.split_whitespace()
        .take(cap)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an href against the site origin; already-absolute URLs pass
/// through untouched.
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    let joined = Url::parse(base).ok()?.join(href).ok()?;
    Some(joined.to_string())
}

fn first_text(doc: &Html, raw: &str) -> Option<String> {
    let selector = Selector::parse(raw).ok()?;
    let text = doc
        .select(&selector)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    (!text.is_empty()).then_some(text)
}
