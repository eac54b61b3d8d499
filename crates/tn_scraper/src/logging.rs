use std::sync::Once;
use tracing::Level;

static INIT: Once = Once::new();

pub fn init_logging() {
    if !tracing::dispatcher::has_been_set() {
        INIT.call_once(|| {
            tracing_subscriber::fmt()
                .with_max_level(Level::INFO)
                .init();
        });
    }
}
