pub mod extract;
pub mod listing;
pub mod logging;
pub mod normalize;
pub mod run;
pub mod session;
pub mod sources;

pub use logging::init_logging;
pub use run::{run, PartialFailure, PersistMode, RunOptions, RunOutcome};
pub use session::BrowserSession;
pub use sources::SourceProfile;

pub mod prelude {
    pub use crate::sources::SourceProfile;
    pub use tn_core::{Article, BrowserPage, Error, Result, Seed};
}
