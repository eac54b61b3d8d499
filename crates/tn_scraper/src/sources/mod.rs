pub mod aljazeera;

/// Everything the pipeline needs to know about one outlet: where its
/// trending list lives and which selectors its article templates use.
/// One profile per outlet module, selectors fixed per run.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    /// Source identifier stored in the `resource` column.
    pub resource: &'static str,
    /// Origin used to resolve relative hrefs and image srcs.
    pub base_url: &'static str,
    pub listing_url: &'static str,
    /// Cookie/consent interstitial button, dismissed best-effort.
    pub consent_selector: &'static str,
    pub trending_container: &'static str,
    pub trending_items: &'static str,
    pub trending_headline: &'static str,
    pub trending_link: &'static str,
    /// Primary and secondary body containers as one selector list.
    pub body_container: &'static str,
    /// Subtrees dropped from the body before walking it.
    pub noise_selectors: &'static [&'static str],
    pub summary_list_item: &'static str,
    pub summary_subhead: &'static str,
    pub summary_paragraph: &'static str,
    pub author: &'static str,
    pub media_primary: &'static str,
    pub media_secondary: &'static str,
    pub date: &'static str,
    /// Terminal media fallback when no featured image is found.
    pub fallback_logo: &'static str,
}
