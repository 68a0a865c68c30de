//! Search command - run one search and print the settled gallery.

use std::time::Duration;

use imagesearch::report::EngineFailure;
use tokio::sync::mpsc;
use tracing::info;

use super::common::{print_gallery, EngineArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, StartedEngine};

/// How long to wait for results and for every tile to settle.
const SETTLE_TIMEOUT: Duration = Duration::from_secs(60);

/// Arguments for the search command.
pub struct SearchArgs {
    pub term: String,
    pub engine: EngineArgs,
    pub select: Option<usize>,
    pub verbose: bool,
}

/// Run the search command.
pub fn run(args: SearchArgs) -> Result<(), CliError> {
    if args.term.is_empty() {
        return Err(CliError::Config("Search term must not be empty".to_string()));
    }

    let runner = CliRunner::new(args.verbose)?;
    runner.log_startup("search");
    let config = runner.config();

    let source_config = args.engine.source_config(config)?;
    let throttle = args.engine.throttle(config);
    let engine_config = args.engine.engine_config(config);

    println!("Searching {} for \"{}\"...", source_config.name(), args.term);

    let engine = runner.start_engine(&source_config, throttle, engine_config)?;
    runner.block_on(search(engine, args.term, args.select))
}

async fn search(
    engine: StartedEngine,
    term: String,
    select: Option<usize>,
) -> Result<(), CliError> {
    let StartedEngine {
        runtime,
        mut failures,
        config,
    } = engine;
    let handle = runtime.handle();
    let mut results = handle.bindings().result_urls();
    let mut gallery = handle.bindings().gallery();

    handle.set_search_term(term.as_str())?;

    // Results arrive on the watch; a failed search only reaches the reporter.
    tokio::select! {
        changed = results.changed() => {
            changed.map_err(|_| CliError::Timeout("search results".to_string()))?;
        }
        Some(failure) = failures.recv() => {
            runtime.shutdown().await;
            return Err(CliError::Search(failure));
        }
        _ = tokio::time::sleep(SETTLE_TIMEOUT) => {
            runtime.shutdown().await;
            return Err(CliError::Timeout("search results".to_string()));
        }
    }

    let count = results.borrow_and_update().len();
    info!(term = term.as_str(), results = count, "Search results received");
    println!("{} result(s)", count);

    let settled = tokio::time::timeout(SETTLE_TIMEOUT, gallery.wait_for(|g| g.is_settled()))
        .await
        .map_err(|_| CliError::Timeout("images to load".to_string()))?
        .map(|snapshot| snapshot.clone())
        .map_err(|_| CliError::Timeout("images to load".to_string()))?;

    print_tile_failures(&mut failures);
    println!();
    print_gallery(&settled, config.per_row());

    if let Some(index) = select {
        let outcome = handle.select(index).await;
        match outcome {
            Ok(url) => {
                println!();
                println!("Chosen image: {}", url);
            }
            Err(e) => {
                runtime.shutdown().await;
                return Err(e.into());
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}

fn print_tile_failures(failures: &mut mpsc::UnboundedReceiver<EngineFailure>) {
    while let Ok(failure) = failures.try_recv() {
        eprintln!("Warning: {}", failure);
    }
}
