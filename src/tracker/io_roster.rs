// Legislators and the dates of the Congresses.

use chrono::NaiveDate;
use csv::ReaderBuilder;
use legis_analysis::{Chamber, Term};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::tracker::io_common::parse_date;
use crate::tracker::*;

// ********* Input data structures ***********

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct LegislatorIds {
    bioguide: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct LegislatorName {
    last: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct TermRecord {
    #[serde(rename = "type")]
    term_type: String,
    start: String,
    end: String,
    state: String,
    district: Option<i64>,
    party: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct LegislatorRecord {
    id: LegislatorIds,
    name: LegislatorName,
    #[serde(default)]
    terms: Vec<TermRecord>,
}

/// Reads the terms of all the legislators.
pub fn read_legislators(path: &Path) -> TrackerResult<Vec<Term>> {
    let path_s = path.display().to_string();
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: &path_s })?;
    let records: Vec<LegislatorRecord> =
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: &path_s })?;

    let mut terms: Vec<Term> = Vec::new();
    for r in records.iter() {
        for t in r.terms.iter() {
            let chamber = match Chamber::from_term_type(&t.term_type) {
                Some(c) => c,
                None => {
                    warn!(
                        "read_legislators: {}: unknown term type {:?}",
                        r.id.bioguide, t.term_type
                    );
                    continue;
                }
            };
            let start = parse_date(&t.start).context(InvalidDateSnafu {
                value: &t.start,
                path: &path_s,
            })?;
            let end = parse_date(&t.end).context(InvalidDateSnafu {
                value: &t.end,
                path: &path_s,
            })?;
            terms.push(Term {
                person: r.id.bioguide.clone(),
                last_name: r.name.last.clone(),
                chamber,
                start,
                end,
                state: t.state.clone(),
                // At-large districts are 0. Unknown ones are negative.
                district: t.district.and_then(|d| u32::try_from(d).ok()),
                party: t.party.clone(),
            });
        }
    }
    debug!(
        "read_legislators: {} legislators, {} terms",
        records.len(),
        terms.len()
    );
    Ok(terms)
}

/// The dates of one session of a Congress.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Session {
    pub congress: u32,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Reads the tab-separated sessions file: congress, session, start date, end date. Lines
/// that do not start with a Congress number are headers.
pub fn read_sessions(path: &Path) -> TrackerResult<Vec<Session>> {
    let path_s = path.display().to_string();
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(ReadingCsvSnafu { path: &path_s })?;
    let mut sessions: Vec<Session> = Vec::new();
    for row in reader.records() {
        let row = row.context(ReadingCsvSnafu { path: &path_s })?;
        let congress = match row.get(0).and_then(|c| c.trim().parse::<u32>().ok()) {
            Some(c) => c,
            None => continue,
        };
        let field = |idx: usize| row.get(idx).unwrap_or("").trim().to_string();
        let (name, start, end) = (field(1), field(2), field(3));
        sessions.push(Session {
            congress,
            name,
            start: parse_date(&start).context(InvalidDateSnafu {
                value: &start,
                path: &path_s,
            })?,
            end: parse_date(&end).context(InvalidDateSnafu {
                value: &end,
                path: &path_s,
            })?,
        });
    }
    Ok(sessions)
}

/// The first and last days of a Congress.
pub fn congress_dates(sessions: &[Session], congress: u32) -> Option<(NaiveDate, NaiveDate)> {
    let of_congress: Vec<&Session> = sessions.iter().filter(|s| s.congress == congress).collect();
    let start = of_congress.iter().map(|s| s.start).min()?;
    let end = of_congress.iter().map(|s| s.end).max()?;
    Some((start, end))
}

pub fn session_dates(sessions: &[Session], congress: u32, name: &str) -> Option<(NaiveDate, NaiveDate)> {
    sessions
        .iter()
        .find(|s| s.congress == congress && s.name == name)
        .map(|s| (s.start, s.end))
}
