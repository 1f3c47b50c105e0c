use log::{debug, info};

use legis_analysis::bill::InvalidBillId;
use legis_analysis::{ConfigurationError, FormatError};
use snafu::{prelude::*, Snafu};

use std::path::Path;

use crate::args::{Args, Command};
use crate::tracker::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_corpus;
mod io_ledger;
mod io_relations;
mod io_roster;
mod io_stats;
mod similarity;
mod sponsorship;
mod text_incorporation;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TrackerError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing JSON file {path}"))]
    WritingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error reading CSV file {path}"))]
    ReadingCsv { source: csv::Error, path: String },
    #[snafu(display("Error writing CSV file {path}"))]
    WritingCsv { source: csv::Error, path: String },

    #[snafu(display("No {what} at {path}"))]
    NotAvailable { what: String, path: String },
    #[snafu(display("Could not extract the text of {bill}"))]
    Format { source: FormatError, bill: String },
    #[snafu(display("Cannot score the members of the {chamber}"))]
    Configuration {
        source: ConfigurationError,
        chamber: String,
    },
    #[snafu(display("Not a bill id: {value}"))]
    InvalidBill {
        source: InvalidBillId,
        value: String,
    },
    #[snafu(display("Invalid date {value:?} in {path}"))]
    InvalidDate { value: String, path: String },
    #[snafu(display("No session {session} of Congress {congress} in {path}"))]
    UnknownSession {
        congress: u32,
        session: String,
        path: String,
    },
    #[snafu(display("Could not lock {path}"))]
    Lock {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TrackerResult<T> = Result<T, TrackerError>;

/// Runs the command of the arguments.
pub fn run(args: &Args) -> TrackerResult<()> {
    let config = match &args.config {
        Some(p) => Some((read_config(p)?, p.as_str())),
        None => None,
    };
    let paths = match &config {
        Some((c, p)) => DataPaths::resolve(Some((c, config_directory(p))), args.data_dir.as_deref()),
        None => DataPaths::resolve(None, args.data_dir.as_deref()),
    };
    debug!("run: paths: {:?}", paths);

    match &args.command {
        Command::Analyze { congress } => {
            let stats = text_incorporation::run_analyze(&paths, *congress)?;
            info!("analyze: {:?}", stats);
        }
        Command::Load { congress } => {
            let plan = text_incorporation::run_load(&paths, *congress)?;
            info!(
                "load: {} bills updated, {} bills cleared",
                plan.updates.len(),
                plan.clears.len()
            );
        }
        Command::Compare { bill1, bill2, diff } => {
            text_incorporation::run_compare(&paths, bill1, bill2, *diff)?;
        }
        Command::ExtractText { path } => {
            let text = legis_analysis::text::extract_text(Path::new(path))
                .context(FormatSnafu { bill: path.clone() })?;
            println!("{}", text);
        }
        Command::Cosponsors {
            congress,
            since,
            session,
        } => {
            let since = since.unwrap_or_else(|| congress.saturating_sub(2));
            sponsorship::run_cosponsorship(&paths, *congress, since, session.as_deref())?;
        }
    }
    Ok(())
}

fn config_directory(config_path: &str) -> &Path {
    Path::new(config_path)
        .parent()
        .unwrap_or_else(|| Path::new("."))
}
