//! Interactive command - every stdin line is a new search term.
//!
//! Lines arrive faster than searches finish when input is piped, which
//! exercises the superseding behaviour: only the last term's results are
//! shown.

use imagesearch::runtime::EngineError;
use tokio::io::{AsyncBufReadExt, BufReader};

use super::common::{print_gallery, EngineArgs};
use crate::error::CliError;
use crate::runner::{CliRunner, StartedEngine};

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// Anything that is not a command: the new search term.
    Term(String),
    Pick(usize),
    Show,
    Help,
    Quit,
    Invalid(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix(':') else {
        return Input::Term(line.to_string());
    };

    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("quit" | "q"), None, _) => Input::Quit,
        (Some("show"), None, _) => Input::Show,
        (Some("help"), None, _) => Input::Help,
        (Some("pick"), Some(index), None) => match index.parse() {
            Ok(index) => Input::Pick(index),
            Err(_) => Input::Invalid(format!("Not a slot number: {}", index)),
        },
        (Some("pick"), _, _) => Input::Invalid("Usage: :pick N".to_string()),
        _ => Input::Invalid(format!("Unknown command: {}", trimmed)),
    }
}

fn print_help() {
    println!("Type to search. Each line replaces the previous search.");
    println!("  :pick N   choose the image in slot N");
    println!("  :show     print the gallery");
    println!("  :help     show this help");
    println!("  :quit     exit");
}

/// Run the interactive command.
pub fn run(engine_args: EngineArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("interactive");
    let config = runner.config();

    let source_config = engine_args.source_config(config)?;
    let throttle = engine_args.throttle(config);
    let engine_config = engine_args.engine_config(config);

    println!(
        "imagesearch {} - {} source, {} slots",
        imagesearch::VERSION,
        source_config.name(),
        engine_config.limit()
    );
    print_help();

    let engine = runner.start_engine(&source_config, throttle, engine_config)?;
    runner.block_on(interact(engine))
}

async fn interact(engine: StartedEngine) -> Result<(), CliError> {
    let StartedEngine {
        runtime,
        mut failures,
        config,
    } = engine;
    let handle = runtime.handle();
    let mut pulses = handle.bindings().subscribe_pulses();
    let mut results = handle.bindings().result_urls();
    let mut chosen = handle.bindings().chosen_image_url();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let outcome = loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break Ok(()),
                    Err(e) => break Err(CliError::Input(e)),
                };

                match parse_input(&line) {
                    Input::Term(term) => {
                        if let Err(e) = handle.set_search_term(term) {
                            break Err(e.into());
                        }
                    }
                    Input::Pick(index) => match handle.select(index).await {
                        Ok(_) => {}
                        Err(EngineError::Rejected(reason)) => println!("{}", reason),
                        Err(e) => break Err(e.into()),
                    },
                    Input::Show => {
                        let snapshot = handle.bindings().gallery().borrow().clone();
                        print_gallery(&snapshot, config.per_row());
                    }
                    Input::Help => print_help(),
                    Input::Quit => break Ok(()),
                    Input::Invalid(message) => println!("{}", message),
                }
            }
            Ok(pulse) = pulses.recv() => {
                println!("[{}] searching \"{}\"...", pulse.generation, pulse.term.trim());
            }
            Ok(()) = results.changed() => {
                let count = results.borrow_and_update().len();
                println!("{} result(s), loading. Type :show to see the gallery.", count);
            }
            Ok(()) = chosen.changed() => {
                if let Some(url) = chosen.borrow_and_update().clone() {
                    println!("Chosen image: {}", url);
                }
            }
            Some(failure) = failures.recv() => {
                println!("Warning: {}", failure);
            }
        }
    };

    runtime.shutdown().await;
    outcome
}
