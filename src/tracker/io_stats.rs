// Output files of the cosponsorship analysis.

use chrono::NaiveDate;
use csv::WriterBuilder;
use legis_analysis::builder::ActivityCounts;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::tracker::io_common::replace_file;
use crate::tracker::*;

/// One line of the output: a member and their scores.
#[derive(PartialEq, Debug, Clone)]
pub struct MemberScore {
    pub id: String,
    pub ideology: f64,
    pub leadership: f64,
    pub name: String,
    pub party: String,
    pub description: String,
    pub activity: ActivityCounts,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StatsMeta {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl StatsMeta {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> StatsMeta {
        StatsMeta {
            start_date: start.map(|d| d.format("%Y-%m-%d").to_string()),
            end_date: end.map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

fn header(congress: u32) -> Vec<String> {
    let mut h: Vec<String> = ["ID", "ideology", "leadership", "name", "party", "description"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    for column in [
        "introduced_bills",
        "cosponsored_bills",
        "unique_cosponsors",
        "total_cosponsors",
    ] {
        h.push(format!("{}_{}", column, congress));
    }
    h
}

/// Writes the scores of the members of a chamber as CSV with a header line.
pub fn write_member_scores(path: &Path, congress: u32, scores: &[MemberScore]) -> TrackerResult<()> {
    let path_s = path.display().to_string();
    replace_file(path, |tmp| {
        let mut writer = WriterBuilder::new()
            .from_path(tmp)
            .context(WritingCsvSnafu { path: &path_s })?;
        writer
            .write_record(header(congress))
            .context(WritingCsvSnafu { path: &path_s })?;
        for s in scores {
            let a = &s.activity;
            writer
                .write_record([
                    s.id.clone(),
                    s.ideology.to_string(),
                    s.leadership.to_string(),
                    s.name.clone(),
                    s.party.clone(),
                    s.description.clone(),
                    a.introduced_bills.to_string(),
                    a.cosponsored_bills.to_string(),
                    a.unique_cosponsors.to_string(),
                    a.total_cosponsors.to_string(),
                ])
                .context(WritingCsvSnafu { path: &path_s })?;
        }
        writer.flush().context(WritingFileSnafu { path: &path_s })
    })
}

pub fn write_meta(path: &Path, meta: &StatsMeta) -> TrackerResult<()> {
    let path_s = path.display().to_string();
    let js = serde_json::to_string_pretty(meta).context(WritingJsonSnafu { path: &path_s })?;
    replace_file(path, |tmp| {
        fs::write(tmp, js + "\n").context(WritingFileSnafu { path: &path_s })
    })
}
