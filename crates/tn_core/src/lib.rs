pub mod browser;
pub mod error;
pub mod storage;
pub mod types;

pub use browser::BrowserPage;
pub use error::Error;
pub use storage::ArticleStore;
pub use types::{Article, Seed};

pub type Result<T> = std::result::Result<T, Error>;
