// The two phases of the text incorporation analysis, and the comparison of two bills.

use chrono::Utc;
use fd_lock::RwLock;
use legis_analysis::bill::text_version_name;
use legis_analysis::classify::{classify, is_formulaic_title};
use legis_analysis::incorporation::{compared_pairs, derive_relations, plan_updates, PairKey};
use legis_analysis::text::extract_text;
use legis_analysis::{BillId, BillType, ComparisonRecord, PreparedText, RelationPlan};
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::{self, OpenOptions};
use text_diff::print_diff;

use crate::tracker::io_corpus::*;
use crate::tracker::io_ledger::*;
use crate::tracker::io_relations::*;
use crate::tracker::similarity::*;
use crate::tracker::*;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct AnalyzeStats {
    /// Enacted bills with a text.
    pub enacted: usize,
    pub compared: usize,
    /// Candidates that are not comparable with the enacted bill.
    pub skipped: usize,
    /// Candidates whose metadata or text could not be read.
    pub failed: usize,
}

/// Runs `f` while holding the exclusive lock of a Congress's analysis directory.
fn with_lock<T, F>(paths: &DataPaths, congress: u32, f: F) -> TrackerResult<T>
where
    F: FnOnce() -> TrackerResult<T>,
{
    let path = paths.lock_file(congress);
    let path_s = path.display().to_string();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context(LockSnafu { path: &path_s })?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(&path)
        .context(LockSnafu { path: &path_s })?;
    let mut lock = RwLock::new(file);
    let _guard = lock.write().context(LockSnafu { path: &path_s })?;
    debug!("with_lock: holding {}", path_s);
    f()
}

/// The number of similar bills to compare with an enacted bill: one per thousand
/// characters of its text, within bounds.
pub fn shortlist_size(text_chars: usize, min_candidates: usize, max_candidates: usize) -> usize {
    (text_chars / 1000).max(min_candidates).min(max_candidates)
}

fn load_text(corpus: &dyn BillCorpus, id: &BillId) -> TrackerResult<(TextVersion, String)> {
    let version = corpus.text_version(id, None)?;
    let text = extract_text(&version.document).context(FormatSnafu {
        bill: id.to_string(),
    })?;
    Ok((version, text))
}

/// Indexes the text of every bill of the Congress that is not enacted.
pub fn build_index(corpus: &dyn BillCorpus, congress: u32) -> TrackerResult<TermVectorIndex> {
    let all_types: Vec<BillType> = BillType::all().collect();
    let mut index = TermVectorIndex::new();
    for id in corpus.bills_in_congress(congress, &all_types)? {
        let enacted = match corpus.bill(&id) {
            Ok(md) => md.is_enacted(),
            Err(e) => {
                warn!("build_index: skipping {}: {}", id, e);
                continue;
            }
        };
        if enacted {
            continue;
        }
        match load_text(corpus, &id) {
            Ok((_, text)) => index.add(id, &text),
            Err(e) => warn!("build_index: skipping {}: {}", id, e),
        }
    }
    Ok(index.finish())
}

// The enacted bill of the comparisons in progress.
struct EnactedBill<'a> {
    id: &'a BillId,
    metadata: BillMetadata,
    version: TextVersion,
    prepared: PreparedText,
}

enum Outcome {
    Compared(ComparisonRecord),
    Skipped(String),
    Failed(TrackerError),
}

fn compare_candidate(
    corpus: &dyn BillCorpus,
    enacted: &EnactedBill,
    other: &BillId,
    done: &HashSet<PairKey>,
) -> Outcome {
    let skip = |reason: String| Outcome::Skipped(reason);
    let md = match corpus.bill(other) {
        Ok(md) => md,
        Err(e) => return Outcome::Failed(e),
    };
    if md.is_enacted() {
        return skip("enacted".to_string());
    }
    if other.bill_type.noun() != enacted.id.bill_type.noun() {
        return skip("not the same kind of measure".to_string());
    }
    let version = match corpus.text_version(other, None) {
        Ok(v) => v,
        Err(e) => return Outcome::Failed(e),
    };
    let key: PairKey = (
        (enacted.id.to_string(), enacted.version.code.clone()),
        (other.to_string(), version.code.clone()),
    );
    if done.contains(&key) {
        return skip("already compared".to_string());
    }
    // The candidate must precede the enacted bill, which excludes the authorizations
    // that are repeated every year.
    match (enacted.metadata.status_time(), md.status_time()) {
        (Some(t1), Some(t2)) if t1 > t2 => {}
        (Some(_), Some(_)) => return skip("more recent than the enacted bill".to_string()),
        _ => return skip("no status date".to_string()),
    }
    let text = match extract_text(&version.document).context(FormatSnafu {
        bill: other.to_string(),
    }) {
        Ok(t) => t,
        Err(e) => return Outcome::Failed(e),
    };
    let comparison = enacted.prepared.compare_with(&text);
    Outcome::Compared(ComparisonRecord::from_comparison(
        Utc::now().to_rfc3339(),
        (key.0 .0.as_str(), key.0 .1.as_str()),
        (key.1 .0.as_str(), key.1 .1.as_str()),
        &comparison,
    ))
}

/// Compares every enacted bill of the corpus with its shortlist of candidates and adds the
/// new comparisons to the ledger.
///
/// Arguments:
/// * `corpus`: the bills
/// * `search`: the source of the shortlists
/// * `paths`: where the ledger is, and the bounds of the shortlists
pub fn analyze(
    corpus: &dyn BillCorpus,
    search: &dyn SimilaritySearch,
    paths: &DataPaths,
    congress: u32,
) -> TrackerResult<AnalyzeStats> {
    let ledger_path = paths.ledger_file(congress);
    let existing = read_ledger_if_exists(&ledger_path)?;
    let mut done = compared_pairs(&existing);
    let mut stats = AnalyzeStats::default();
    let lawmaking = corpus.bills_in_congress(congress, &BillType::LAWMAKING)?;

    rewrite_ledger(&ledger_path, &existing, |ledger| {
        for id in lawmaking.iter() {
            let metadata = match corpus.bill(id) {
                Ok(md) if md.is_enacted() => md,
                Ok(_) => continue,
                Err(e) => {
                    warn!("analyze: skipping {}: {}", id, e);
                    continue;
                }
            };
            let (version, text) = match load_text(corpus, id) {
                Ok(x) => x,
                Err(e) => {
                    warn!("analyze: skipping enacted bill {}: {}", id, e);
                    continue;
                }
            };
            stats.enacted += 1;

            let how_many = shortlist_size(
                text.chars().count(),
                paths.min_candidates,
                paths.max_candidates,
            );
            let mut candidates: BTreeSet<BillId> =
                search.more_like_this(&text, how_many).into_iter().collect();
            candidates.extend(metadata.related_bill_ids());
            candidates.remove(id);
            info!(
                "analyze: {} ({}, {} words): {} candidates",
                id,
                version.code,
                text.split_whitespace().count(),
                candidates.len()
            );

            let enacted = EnactedBill {
                id,
                prepared: PreparedText::new(&text),
                metadata,
                version,
            };
            for other in candidates.iter() {
                match compare_candidate(corpus, &enacted, other, &done) {
                    Outcome::Compared(record) => {
                        debug!(
                            "analyze: {} / {}: {} {} {}",
                            record.bill1_id,
                            record.bill2_id,
                            record.ratio1,
                            record.ratio2,
                            record.matched_length
                        );
                        ledger.append(&record)?;
                        done.insert(record.key());
                        stats.compared += 1;
                    }
                    Outcome::Skipped(reason) => {
                        debug!("analyze: {} / {}: skipped: {}", id, other, reason);
                        stats.skipped += 1;
                    }
                    Outcome::Failed(e) => {
                        warn!("analyze: {} / {}: not compared: {}", id, other, e);
                        stats.failed += 1;
                    }
                }
            }
        }
        Ok(())
    })?;
    info!(
        "analyze: congress {}: {} enacted bills, {} comparisons, {} skipped, {} failed",
        congress, stats.enacted, stats.compared, stats.skipped, stats.failed
    );
    Ok(stats)
}

pub fn run_analyze(paths: &DataPaths, congress: u32) -> TrackerResult<AnalyzeStats> {
    with_lock(paths, congress, || {
        let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
        let index = build_index(&corpus, congress)?;
        info!("run_analyze: indexed {} bills", index.len());
        analyze(&corpus, &index, paths, congress)
    })
}

/// Remembers which enacted bills have formulaic titles, for the duration of one load.
pub struct FormulaicTitles<'a> {
    corpus: &'a dyn BillCorpus,
    cache: HashMap<String, bool>,
}

impl<'a> FormulaicTitles<'a> {
    pub fn new(corpus: &'a dyn BillCorpus) -> FormulaicTitles<'a> {
        FormulaicTitles {
            corpus,
            cache: HashMap::new(),
        }
    }

    pub fn is_formulaic(&mut self, bill_id: &str) -> bool {
        if let Some(f) = self.cache.get(bill_id) {
            return *f;
        }
        let formulaic = match bill_id.parse::<BillId>() {
            Ok(id) => match self.corpus.bill(&id) {
                Ok(md) => is_formulaic_title(md.title()),
                Err(e) => {
                    warn!("is_formulaic: no title for {}: {}", bill_id, e);
                    false
                }
            },
            Err(e) => {
                warn!("is_formulaic: {}", e);
                false
            }
        };
        self.cache.insert(bill_id.to_string(), formulaic);
        formulaic
    }
}

/// Derives the relations from the ledger and updates the relation store with them.
pub fn load(corpus: &dyn BillCorpus, paths: &DataPaths, congress: u32) -> TrackerResult<RelationPlan> {
    let records = read_ledger(&paths.ledger_file(congress))?;
    let mut titles = FormulaicTitles::new(corpus);
    let derived = derive_relations(&records, |bill| titles.is_formulaic(bill));

    let store_path = paths.relations_file(congress);
    let mut store = read_relations(&store_path)?;
    let plan = plan_updates(&derived, &store);
    if plan.is_empty() {
        info!("load: congress {}: no change", congress);
        return Ok(plan);
    }
    for (bill, relations) in plan.updates.iter() {
        debug!("load: {}: {} relations", bill, relations.len());
    }
    for bill in plan.clears.iter() {
        debug!("load: {}: relations cleared", bill);
    }
    plan.apply(&mut store);
    write_relations(&store_path, &store)?;
    info!(
        "load: congress {}: {} bills updated, {} cleared",
        congress,
        plan.updates.len(),
        plan.clears.len()
    );
    Ok(plan)
}

pub fn run_load(paths: &DataPaths, congress: u32) -> TrackerResult<RelationPlan> {
    with_lock(paths, congress, || {
        let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
        load(&corpus, paths, congress)
    })
}

fn describe_version(id: &BillId, version: &TextVersion) -> String {
    format!(
        "{} ({})",
        id.display_number(),
        text_version_name(&version.code).unwrap_or(version.code.as_str())
    )
}

/// Compares the latest texts of two bills and prints the outcome.
pub fn run_compare(paths: &DataPaths, bill1: &str, bill2: &str, diff: bool) -> TrackerResult<()> {
    let id1: BillId = bill1.parse().context(InvalidBillSnafu { value: bill1 })?;
    let id2: BillId = bill2.parse().context(InvalidBillSnafu { value: bill2 })?;
    let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
    let (v1, text1) = load_text(&corpus, &id1)?;
    let (v2, text2) = load_text(&corpus, &id2)?;
    let comparison = PreparedText::new(&text1).compare_with(&text2);
    let (ratio1, ratio2) = (comparison.ratio_b, comparison.ratio_a);
    let formulaic = FormulaicTitles::new(&corpus).is_formulaic(&id1.to_string());

    println!("{} {}", id1, describe_version(&id1, &v1));
    println!("{} {}", id2, describe_version(&id2, &v2));
    println!("{} {} {}", ratio1, ratio2, comparison.matched_length());
    println!("{}", comparison.extract);
    println!(
        "{}",
        classify(ratio1, ratio2, comparison.matched_length(), formulaic)
    );
    if diff {
        print_diff(text1.as_str(), text2.as_str(), " ");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    #[test]
    fn shortlist_bounds() {
        assert_eq!(shortlist_size(0, 10, 50), 10);
        assert_eq!(shortlist_size(23_999, 10, 50), 23);
        assert_eq!(shortlist_size(2_000_000, 10, 50), 50);
    }

    struct FixedSearch(Vec<BillId>);

    impl SimilaritySearch for FixedSearch {
        fn more_like_this(&self, _text: &str, limit: usize) -> Vec<BillId> {
            self.0.iter().take(limit).copied().collect()
        }
    }

    fn write_metadata(paths: &DataPaths, id: &str, status: &str, status_at: &str) -> PathBuf {
        let id: BillId = id.parse().unwrap();
        let bill_dir = paths
            .congress_dir
            .join(id.congress.to_string())
            .join("bills")
            .join(id.bill_type.slug())
            .join(id.slug());
        fs::create_dir_all(&bill_dir).unwrap();
        fs::write(
            bill_dir.join("data.json"),
            format!(
                r#"{{"bill_id": "{}", "official_title": "To name a post office", "status": "{}", "status_at": "{}", "introduced_at": "2015-01-06"}}"#,
                id, status, status_at
            ),
        )
        .unwrap();
        bill_dir
    }

    fn write_document(bill_dir: &Path, xml: &str) {
        let v = bill_dir.join("text-versions").join("ih");
        fs::create_dir_all(&v).unwrap();
        fs::write(v.join("document.xml"), xml).unwrap();
    }

    fn write_bill(paths: &DataPaths, id: &str, status: &str, status_at: &str, body: &str) {
        let bill_dir = write_metadata(paths, id, status, status_at);
        write_document(
            &bill_dir,
            &format!("<bill><legis-body><text>{}</text></legis-body></bill>", body),
        );
    }

    fn bill_ids(ids: &[&str]) -> Vec<BillId> {
        ids.iter().map(|id| id.parse().unwrap()).collect()
    }

    #[test]
    fn candidates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::resolve(None, Some(dir.path().to_str().unwrap()));
        let street = "designate the facility at main street";
        write_bill(&paths, "hr5-114", "ENACTED:SIGNED", "2015-06-01", street);
        write_bill(&paths, "hr9-114", "REFERRED", "2015-02-01", "designate the facility at elm street");
        write_bill(&paths, "s3-114", "REFERRED", "2015-02-01", street);
        write_bill(&paths, "hr7-114", "PASSED:BILL", "2015-07-01", street);

        let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
        let search = FixedSearch(bill_ids(&["hr9-114", "hr7-114", "s3-114"]));
        let stats = analyze(&corpus, &search, &paths, 114).unwrap();
        assert_eq!(stats.enacted, 1);
        assert_eq!(stats.compared, 2);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.failed, 0);
        let records = read_ledger(&paths.ledger_file(114)).unwrap();
        // Senate bills sort before House bills.
        let compared: Vec<&str> = records.iter().map(|r| r.bill2_id.as_str()).collect();
        assert_eq!(compared, vec!["s3-114", "hr9-114"]);

        let mut titles = FormulaicTitles::new(&corpus);
        assert!(titles.is_formulaic("hr5-114"));
        assert!(!titles.is_formulaic("hr404-114"));
        assert!(!titles.is_formulaic("not-a-bill"));
    }

    #[test]
    fn unreadable_candidates_do_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::resolve(None, Some(dir.path().to_str().unwrap()));
        let street = "designate the facility at main street";
        write_bill(&paths, "hr5-114", "ENACTED:SIGNED", "2015-06-01", street);
        write_bill(&paths, "hr9-114", "REFERRED", "2015-02-01", street);
        // Truncated document.
        let truncated = write_metadata(&paths, "hr11-114", "REFERRED", "2015-02-01");
        write_document(&truncated, "<bill><legis-body>");
        // No text at all.
        write_metadata(&paths, "hr13-114", "REFERRED", "2015-02-01");

        let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
        // hr15 has neither metadata nor text.
        let search = FixedSearch(bill_ids(&["hr11-114", "hr13-114", "hr15-114", "hr9-114"]));
        let stats = analyze(&corpus, &search, &paths, 114).unwrap();
        assert_eq!(stats.compared, 1);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.skipped, 0);
        let records = read_ledger(&paths.ledger_file(114)).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bill2_id, "hr9-114");
        assert_eq!(records[0].ratio2, 1.0);

        // The failed pairs were not recorded, so they are tried again once readable.
        write_document(
            &truncated,
            &format!("<bill><legis-body><text>{}</text></legis-body></bill>", street),
        );
        let again = analyze(&corpus, &search, &paths, 114).unwrap();
        assert_eq!(again.compared, 1);
        assert_eq!(again.failed, 2);
        assert_eq!(again.skipped, 1);
        let records = read_ledger(&paths.ledger_file(114)).unwrap();
        let compared: Vec<&str> = records.iter().map(|r| r.bill2_id.as_str()).collect();
        assert_eq!(compared, vec!["hr9-114", "hr11-114"]);
    }
}
