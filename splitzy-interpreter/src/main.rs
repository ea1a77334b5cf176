#![warn(clippy::uninlined_format_args)]

mod config;
mod error;
mod presenter;

use config::AppConfig;
use error::CliError;
use presenter::ReportPresenter;
use splitzy_application::{ExpenseLedger, ScriptProcessor};
use splitzy_infrastructure::{KeyValueSessionStore, MemoryBackend, SplitzyScriptParser};
use std::{env, fs, process};

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run() -> Result<(), CliError> {
    let config = AppConfig::from_env();
    config::init_logging();

    let path = env::args().nth(1).ok_or(CliError::Usage)?;
    let source = fs::read_to_string(&path).map_err(|source| CliError::Read {
        path: path.clone(),
        source,
    })?;

    let store = KeyValueSessionStore::new(MemoryBackend::new());
    let ledger = ExpenseLedger::new(&store, config.planner_context());
    let processor = ScriptProcessor::new(&SplitzyScriptParser, &ledger);

    let script = processor.parse(&source, &config.default_currency)?;
    tracing::debug!(
        path = %path,
        statement_count = script.statements().len(),
        "Script parsed"
    );

    for report in processor.run(&script, &config.session)? {
        println!("{}", ReportPresenter::render(&report));
    }
    Ok(())
}
