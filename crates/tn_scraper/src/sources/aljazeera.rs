use super::SourceProfile;

pub const PROFILE: SourceProfile = SourceProfile {
    resource: "Al Jazeera",
    base_url: "https://www.aljazeera.com",
    listing_url: "https://www.aljazeera.com",
    consent_selector: "#onetrust-accept-btn-handler",
    trending_container: ".trending-articles",
    trending_items: ".trending-articles__list li",
    trending_headline: ".article-trending__title span",
    trending_link: ".article-trending__title-link",
    body_container: "div.wysiwyg, div.wysiwyg--all-content",
    noise_selectors: &[
        ".more-on",
        ".sib-newsletter-form",
        ".advertisement",
        ".ad-container",
        ".widget",
    ],
    summary_list_item: "#wysiwyg li",
    summary_subhead: ".article__subhead em",
    summary_paragraph: "#wysiwyg p",
    author: ".article-author-name-item a.author-link",
    media_primary: ".featured-media__image-wrap img",
    media_secondary: "figure.article-featured-image div.responsive-image img",
    date: r#".date-simple span[aria-hidden="true"]"#,
    fallback_logo: "https://upload.wikimedia.org/wikipedia/en/thumb/8/8f/Al_Jazeera_Media_Network_Logo.svg/1200px-Al_Jazeera_Media_Network_Logo.svg.png",
};
