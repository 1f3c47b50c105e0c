//! Ledger records of the text comparisons and the incorporation relations derived from them.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::classify::classify;
use crate::compare::Comparison;
use crate::config::SAMPLE_MAX_CHARS;

/// One line of the comparison ledger.
///
/// `bill1` is the enacted bill and `bill2` the candidate compared against it.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRecord {
    pub timestamp: String,
    pub bill1_id: String,
    pub bill1_version: String,
    pub ratio1: f64,
    pub bill2_id: String,
    pub bill2_version: String,
    pub ratio2: f64,
    pub matched_length: usize,
    pub sample_text: String,
}

/// ((bill1 id, bill1 version), (bill2 id, bill2 version))
pub type PairKey = ((String, String), (String, String));

impl ComparisonRecord {
    /// The record of comparing `candidate` (side `a`) against the prepared text of the
    /// enacted bill (side `b`).
    pub fn from_comparison(
        timestamp: String,
        enacted: (&str, &str),
        candidate: (&str, &str),
        comparison: &Comparison,
    ) -> ComparisonRecord {
        let matched_length = comparison.matched_length();
        let keep_sample =
            (comparison.ratio_b > 0.1 || comparison.ratio_a > 0.1) && matched_length > 500;
        ComparisonRecord {
            timestamp,
            bill1_id: enacted.0.to_string(),
            bill1_version: enacted.1.to_string(),
            ratio1: comparison.ratio_b,
            bill2_id: candidate.0.to_string(),
            bill2_version: candidate.1.to_string(),
            ratio2: comparison.ratio_a,
            matched_length,
            sample_text: if keep_sample {
                comparison.extract.chars().take(SAMPLE_MAX_CHARS).collect()
            } else {
                String::new()
            },
        }
    }

    pub fn key(&self) -> PairKey {
        (
            (self.bill1_id.clone(), self.bill1_version.clone()),
            (self.bill2_id.clone(), self.bill2_version.clone()),
        )
    }
}

/// The pairs of bill versions already present in the ledger.
pub fn compared_pairs(records: &[ComparisonRecord]) -> HashSet<PairKey> {
    records.iter().map(|r| r.key()).collect()
}

/// The latest version of each bill. The ledger is chronological: the last occurrence wins.
pub fn latest_versions(records: &[ComparisonRecord]) -> HashMap<&str, &str> {
    let mut latest: HashMap<&str, &str> = HashMap::new();
    for r in records.iter() {
        latest.insert(r.bill1_id.as_str(), r.bill1_version.as_str());
        latest.insert(r.bill2_id.as_str(), r.bill2_version.as_str());
    }
    latest
}

/// One side of an incorporation between two bills, as seen from one of them.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IncorporationRelation {
    pub my_version: String,
    pub my_ratio: f64,
    pub other: String,
    pub other_version: String,
    pub other_ratio: f64,
}

fn relation_order(x: &IncorporationRelation, y: &IncorporationRelation) -> Ordering {
    y.my_ratio
        .total_cmp(&x.my_ratio)
        .then(x.other_ratio.total_cmp(&y.other_ratio))
        .then_with(|| x.my_version.cmp(&y.my_version))
        .then_with(|| x.other.cmp(&y.other))
        .then_with(|| x.other_version.cmp(&y.other_version))
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}

/// Derives the incorporation relations of each bill from the ledger.
///
/// Records about an outdated version of either bill are ignored. The ratios are
/// rounded to three decimals before classification. `is_formulaic` tells whether
/// an enacted bill has a formulaic title.
pub fn derive_relations<F>(
    records: &[ComparisonRecord],
    mut is_formulaic: F,
) -> BTreeMap<String, Vec<IncorporationRelation>>
where
    F: FnMut(&str) -> bool,
{
    let latest = latest_versions(records);
    let mut by_bill: BTreeMap<String, BTreeMap<String, IncorporationRelation>> = BTreeMap::new();
    let mut outdated = 0;
    for r in records.iter() {
        if latest.get(r.bill1_id.as_str()) != Some(&r.bill1_version.as_str())
            || latest.get(r.bill2_id.as_str()) != Some(&r.bill2_version.as_str())
        {
            outdated += 1;
            continue;
        }
        let ratio1 = round3(r.ratio1);
        let ratio2 = round3(r.ratio2);
        if !classify(ratio1, ratio2, r.matched_length, is_formulaic(&r.bill1_id)) {
            continue;
        }
        debug!(
            "derive_relations: {} incorporates {} ({}, {}, {})",
            r.bill1_id, r.bill2_id, ratio1, ratio2, r.matched_length
        );
        by_bill.entry(r.bill2_id.clone()).or_default().insert(
            r.bill1_id.clone(),
            IncorporationRelation {
                my_version: r.bill2_version.clone(),
                my_ratio: ratio2,
                other: r.bill1_id.clone(),
                other_version: r.bill1_version.clone(),
                other_ratio: ratio1,
            },
        );
        by_bill.entry(r.bill1_id.clone()).or_default().insert(
            r.bill2_id.clone(),
            IncorporationRelation {
                my_version: r.bill1_version.clone(),
                my_ratio: ratio1,
                other: r.bill2_id.clone(),
                other_version: r.bill2_version.clone(),
                other_ratio: ratio2,
            },
        );
    }
    info!(
        "derive_relations: {} records, {} outdated, {} bills with relations",
        records.len(),
        outdated,
        by_bill.len()
    );
    by_bill
        .into_iter()
        .map(|(bill, others)| {
            let mut relations: Vec<IncorporationRelation> = others.into_values().collect();
            relations.sort_by(relation_order);
            (bill, relations)
        })
        .collect()
}

/// The changes to bring a relation store in line with freshly derived relations.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RelationPlan {
    /// Bills whose relation list is new or different.
    pub updates: Vec<(String, Vec<IncorporationRelation>)>,
    /// Bills that had relations and no longer have any.
    pub clears: Vec<String>,
}

impl RelationPlan {
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.clears.is_empty()
    }

    /// Applies the plan to a store of relation lists.
    pub fn apply(&self, store: &mut BTreeMap<String, Vec<IncorporationRelation>>) {
        for (bill, relations) in self.updates.iter() {
            store.insert(bill.clone(), relations.clone());
        }
        for bill in self.clears.iter() {
            store.remove(bill);
        }
    }
}

/// Compares derived relations with the current ones. Bills whose list did not change
/// are left alone.
pub fn plan_updates(
    derived: &BTreeMap<String, Vec<IncorporationRelation>>,
    current: &BTreeMap<String, Vec<IncorporationRelation>>,
) -> RelationPlan {
    let updates = derived
        .iter()
        .filter(|(bill, relations)| current.get(*bill) != Some(*relations))
        .map(|(bill, relations)| (bill.clone(), relations.clone()))
        .collect();
    let clears = current
        .iter()
        .filter(|(bill, relations)| !relations.is_empty() && !derived.contains_key(*bill))
        .map(|(bill, _)| bill.clone())
        .collect();
    RelationPlan { updates, clears }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(b1: (&str, &str), r1: f64, b2: (&str, &str), r2: f64, len: usize) -> ComparisonRecord {
        ComparisonRecord {
            timestamp: "2016-01-01T00:00:00+00:00".to_string(),
            bill1_id: b1.0.to_string(),
            bill1_version: b1.1.to_string(),
            ratio1: r1,
            bill2_id: b2.0.to_string(),
            bill2_version: b2.1.to_string(),
            ratio2: r2,
            matched_length: len,
            sample_text: String::new(),
        }
    }

    fn ledger() -> Vec<ComparisonRecord> {
        vec![
            // Outdated version of s10-114: superseded below.
            record(("hr1-114", "enr"), 0.9, ("s10-114", "is"), 0.9, 5000),
            record(("hr1-114", "enr"), 0.2, ("hr20-114", "ih"), 0.95, 4000),
            record(("hr1-114", "enr"), 0.01, ("hr30-114", "ih"), 0.02, 100),
            record(("hr1-114", "enr"), 0.5, ("s10-114", "rs"), 0.98, 3000),
            record(("hr2-114", "enr"), 0.3, ("hr20-114", "ih"), 0.9, 2000),
        ]
    }

    #[test]
    fn latest_version_wins() {
        let records = ledger();
        let latest = latest_versions(&records);
        assert_eq!(latest.get("s10-114"), Some(&"rs"));
        assert_eq!(latest.get("hr1-114"), Some(&"enr"));
    }

    #[test]
    fn relations_are_bidirectional_and_sorted() {
        let derived = derive_relations(&ledger(), |_| false);
        let hr1 = &derived["hr1-114"];
        assert_eq!(hr1.len(), 2);
        assert_eq!(hr1[0].other, "s10-114");
        assert_eq!(hr1[0].other_version, "rs");
        assert_eq!(hr1[0].my_ratio, 0.5);
        assert_eq!(hr1[1].other, "hr20-114");

        let hr20 = &derived["hr20-114"];
        assert_eq!(hr20.len(), 2);
        // Sorted by decreasing own ratio.
        assert_eq!(hr20[0].other, "hr1-114");
        assert_eq!(hr20[0].my_ratio, 0.95);
        assert_eq!(hr20[1].other, "hr2-114");

        assert!(!derived.contains_key("hr30-114"));
    }

    #[test]
    fn ratios_are_rounded() {
        let records = vec![record(("hr1-114", "enr"), 0.12345, ("hr9-114", "ih"), 0.98765, 3000)];
        let derived = derive_relations(&records, |_| false);
        assert_eq!(derived["hr9-114"][0].my_ratio, 0.988);
        assert_eq!(derived["hr9-114"][0].other_ratio, 0.123);
    }

    #[test]
    fn formulaic_bills_need_near_identity() {
        let derived = derive_relations(&ledger(), |id| id == "hr1-114");
        assert!(!derived.contains_key("hr1-114"));
        assert!(derived.contains_key("hr2-114"));
    }

    #[test]
    fn load_is_idempotent() {
        let records = ledger();
        let mut store: BTreeMap<String, Vec<IncorporationRelation>> = BTreeMap::new();
        store.insert(
            "hr99-114".to_string(),
            vec![IncorporationRelation {
                my_version: "ih".to_string(),
                my_ratio: 0.5,
                other: "hr1-114".to_string(),
                other_version: "enr".to_string(),
                other_ratio: 0.5,
            }],
        );
        let first = plan_updates(&derive_relations(&records, |_| false), &store);
        assert_eq!(first.updates.len(), 4);
        assert_eq!(first.clears, vec!["hr99-114".to_string()]);
        first.apply(&mut store);
        let snapshot = store.clone();

        let second = plan_updates(&derive_relations(&records, |_| false), &store);
        assert!(second.is_empty());
        second.apply(&mut store);
        assert_eq!(store, snapshot);
    }

    #[test]
    fn samples_are_bounded() {
        let cmp = Comparison {
            ratio_a: 0.5,
            ratio_b: 0.05,
            matched_words: 400,
            extract: "word ".repeat(400),
        };
        let r = ComparisonRecord::from_comparison(
            "t".to_string(),
            ("hr1-114", "enr"),
            ("hr2-114", "ih"),
            &cmp,
        );
        assert_eq!(r.ratio1, 0.05);
        assert_eq!(r.ratio2, 0.5);
        assert_eq!(r.matched_length, 2000);
        assert_eq!(r.sample_text.chars().count(), SAMPLE_MAX_CHARS);

        let small = Comparison {
            extract: "word ".repeat(50),
            ..cmp
        };
        let r = ComparisonRecord::from_comparison(
            "t".to_string(),
            ("hr1-114", "enr"),
            ("hr2-114", "ih"),
            &small,
        );
        assert!(r.sample_text.is_empty());
    }
}
