// Reading the bill data of the congress project scrapers.

use chrono::{NaiveDate, NaiveDateTime};
use legis_analysis::bill::BillStatus;
use legis_analysis::builder::{CosponsorRecord, SponsoredBill};
use legis_analysis::{BillId, BillType};
use log::{debug, warn};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::tracker::io_common::{parse_date, parse_datetime};
use crate::tracker::*;

// ********* Input data structures ***********

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct PersonRef {
    pub bioguide_id: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct CosponsorRef {
    pub bioguide_id: Option<String>,
    pub sponsored_at: Option<String>,
    pub withdrawn_at: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct RelatedBillRef {
    pub bill_id: Option<String>,
}

/// The `data.json` file of a bill.
#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
pub struct BillMetadata {
    pub bill_id: String,
    pub official_title: Option<String>,
    pub short_title: Option<String>,
    pub status: String,
    pub status_at: String,
    pub introduced_at: String,
    #[serde(default)]
    pub sponsor: Option<PersonRef>,
    #[serde(default)]
    pub cosponsors: Vec<CosponsorRef>,
    #[serde(default)]
    pub related_bills: Vec<RelatedBillRef>,
}

impl BillMetadata {
    /// The short title if there is one, the official title otherwise.
    pub fn title(&self) -> &str {
        self.short_title
            .as_deref()
            .or(self.official_title.as_deref())
            .unwrap_or("")
    }

    pub fn is_enacted(&self) -> bool {
        BillStatus::from_code(&self.status)
            .map(|s| s.is_enacted())
            .unwrap_or(false)
    }

    /// The time of the last major action.
    pub fn status_time(&self) -> Option<NaiveDateTime> {
        parse_datetime(&self.status_at)
    }

    pub fn related_bill_ids(&self) -> Vec<BillId> {
        self.related_bills
            .iter()
            .filter_map(|r| r.bill_id.as_deref())
            .filter_map(|id| id.parse::<BillId>().ok())
            .collect()
    }

    /// The sponsorship data of the bill. Cosponsors without an id or a join date are
    /// left out.
    pub fn sponsorship(&self, id: &BillId) -> Option<SponsoredBill> {
        let introduced = parse_date(&self.introduced_at)?;
        let cosponsors = self
            .cosponsors
            .iter()
            .filter_map(|c| {
                let person = c.bioguide_id.clone()?;
                let joined = c.sponsored_at.as_deref().and_then(parse_date);
                if joined.is_none() {
                    warn!("sponsorship: {}: no join date for cosponsor {}", id, person);
                }
                Some(CosponsorRecord {
                    person,
                    joined: joined?,
                    withdrawn: c.withdrawn_at.as_deref().and_then(parse_date),
                })
            })
            .collect();
        Some(SponsoredBill {
            id: *id,
            introduced,
            sponsor: self.sponsor.as_ref().and_then(|s| s.bioguide_id.clone()),
            cosponsors,
        })
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Deserialize)]
struct TextVersionMetadata {
    issued_on: Option<String>,
}

/// A text version of a bill that has an XML document.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TextVersion {
    pub code: String,
    pub issued_on: Option<NaiveDate>,
    pub document: PathBuf,
}

// ********* Corpus ***********

/// Access to the bills of the corpus.
pub trait BillCorpus {
    fn bill(&self, id: &BillId) -> TrackerResult<BillMetadata>;

    /// The text version `code` of a bill, or its most recently issued version.
    fn text_version(&self, id: &BillId, code: Option<&str>) -> TrackerResult<TextVersion>;

    /// The bills of the given types in a Congress, in (congress, type, number) order.
    fn bills_in_congress(&self, congress: u32, types: &[BillType]) -> TrackerResult<Vec<BillId>>;
}

/// The corpus in the directory layout of the congress project:
/// `{congress}/bills/{type}/{type}{number}/data.json`.
#[derive(Debug, Clone)]
pub struct CongressDataCorpus {
    root: PathBuf,
}

impl CongressDataCorpus {
    pub fn new(root: PathBuf) -> CongressDataCorpus {
        CongressDataCorpus { root }
    }

    fn type_dir(&self, congress: u32, bill_type: BillType) -> PathBuf {
        self.root
            .join(congress.to_string())
            .join("bills")
            .join(bill_type.slug())
    }

    fn bill_dir(&self, id: &BillId) -> PathBuf {
        self.type_dir(id.congress, id.bill_type).join(id.slug())
    }

    fn read_version(&self, dir: PathBuf, code: String) -> Option<TextVersion> {
        let document = dir.join("document.xml");
        if !document.is_file() {
            return None;
        }
        let issued_on = fs::read_to_string(dir.join("data.json"))
            .ok()
            .and_then(|s| serde_json::from_str::<TextVersionMetadata>(&s).ok())
            .and_then(|m| m.issued_on)
            .and_then(|d| parse_date(&d));
        Some(TextVersion {
            code,
            issued_on,
            document,
        })
    }
}

impl BillCorpus for CongressDataCorpus {
    fn bill(&self, id: &BillId) -> TrackerResult<BillMetadata> {
        let path = self.bill_dir(id).join("data.json");
        let path_s = path.display().to_string();
        ensure!(
            path.is_file(),
            NotAvailableSnafu {
                what: format!("metadata for {}", id),
                path: path_s
            }
        );
        let contents = fs::read_to_string(&path).context(OpeningFileSnafu { path: &path_s })?;
        serde_json::from_str(&contents).context(ParsingJsonSnafu { path: path_s })
    }

    fn text_version(&self, id: &BillId, code: Option<&str>) -> TrackerResult<TextVersion> {
        let versions_dir = self.bill_dir(id).join("text-versions");
        let missing = || NotAvailableSnafu {
            what: format!("text for {}", id),
            path: versions_dir.display().to_string(),
        };
        if let Some(code) = code {
            return self
                .read_version(versions_dir.join(code), code.to_string())
                .with_context(missing);
        }
        let entries = match fs::read_dir(&versions_dir) {
            Ok(entries) => entries,
            Err(_) => return missing().fail(),
        };
        entries
            .filter_map(|e| e.ok())
            .filter_map(|e| {
                let code = e.file_name().to_str()?.to_string();
                self.read_version(e.path(), code)
            })
            .max_by(|x, y| (x.issued_on, &x.code).cmp(&(y.issued_on, &y.code)))
            .with_context(missing)
    }

    fn bills_in_congress(&self, congress: u32, types: &[BillType]) -> TrackerResult<Vec<BillId>> {
        let mut ids: Vec<BillId> = Vec::new();
        for bill_type in types {
            let dir = self.type_dir(congress, *bill_type);
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(_) => {
                    debug!("bills_in_congress: no directory {}", dir.display());
                    continue;
                }
            };
            for entry in entries {
                let entry = entry.context(OpeningFileSnafu {
                    path: dir.display().to_string(),
                })?;
                let name = entry.file_name();
                let number = name
                    .to_str()
                    .and_then(|n| n.strip_prefix(bill_type.slug()))
                    .and_then(|n| n.parse::<u32>().ok());
                match number {
                    Some(number) => ids.push(BillId::new(*bill_type, number, congress)),
                    None => warn!("bills_in_congress: skipping {:?} in {}", name, dir.display()),
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}
