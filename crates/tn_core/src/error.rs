use thiserror::Error;

/// Failure classes the pipeline actually produces: navigation and listing
/// failures from the browser phase, extraction failures from the selector
/// layer, database failures from the gateway.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Trending list never appeared: {0}")]
    ListingNotFound(String),

    #[error("No element matched selector: {0}")]
    SelectorNotFound(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Database error: {0}")]
    Database(String),
}

pub type Result<T> = std::result::Result<T, Error>;
