use clap::Parser;
use std::path::PathBuf;
use tn_scraper::sources::aljazeera;
use tn_scraper::{
    init_logging, run, BrowserSession, PartialFailure, PersistMode, RunOptions, RunOutcome,
};
use tn_storage::PostgresStore;
use tracing::error;

#[derive(Parser)]
#[command(name = "tn", about = "Scrape a site's trending articles into Postgres")]
struct Cli {
    /// Postgres connection string
    #[arg(long, env = "POSTGRES_CONNECTION_STRING")]
    database_url: String,

    /// Write the enriched article list to this JSON file for diagnostics
    #[arg(long, default_value = "enriched-articles.json")]
    dump: PathBuf,

    /// Enrich every article before persisting instead of inserting one by one
    #[arg(long)]
    collect: bool,

    /// Report failure (500) when any article is dropped
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();

    let outcome = handler(&cli).await;
    println!("{}", serde_json::to_string_pretty(&outcome.to_response())?);

    if outcome.status_code != 200 {
        std::process::exit(1);
    }
    Ok(())
}

/// Run entry point: connect, scrape, and always release the store
/// connection, whatever the scrape phase did.
async fn handler(cli: &Cli) -> RunOutcome {
    let store = match PostgresStore::connect(&cli.database_url).await {
        Ok(store) => store,
        Err(e) => {
            error!("Could not connect to the database: {}", e);
            return RunOutcome::failure("Database connection failed");
        }
    };

    let opts = RunOptions {
        persist_mode: if cli.collect {
            PersistMode::Collected
        } else {
            PersistMode::Immediate
        },
        partial_failure: if cli.strict {
            PartialFailure::Strict
        } else {
            PartialFailure::Lenient
        },
        dump_path: Some(cli.dump.clone()),
        ..Default::default()
    };

    let outcome = match BrowserSession::launch().await {
        Ok(session) => {
            let outcome = run(&session, &store, &aljazeera::PROFILE, &opts).await;
            session.close().await;
            outcome
        }
        Err(e) => {
            error!("Could not launch the browser: {}", e);
            RunOutcome::failure("Scraping failed")
        }
    };

    store.close().await;
    outcome
}
