// The comparison ledger: a CSV file without header, one comparison per line, in the
// order the comparisons were made.

use csv::{ReaderBuilder, Writer, WriterBuilder};
use legis_analysis::ComparisonRecord;
use std::fs::File;
use std::path::Path;

use crate::tracker::io_common::replace_file;
use crate::tracker::*;

/// Reads the whole ledger. A missing ledger is an error.
pub fn read_ledger(path: &Path) -> TrackerResult<Vec<ComparisonRecord>> {
    let path_s = path.display().to_string();
    ensure!(
        path.is_file(),
        NotAvailableSnafu {
            what: "comparison ledger",
            path: path_s
        }
    );
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .context(ReadingCsvSnafu { path: &path_s })?;
    let mut records: Vec<ComparisonRecord> = Vec::new();
    for row in reader.deserialize() {
        let record: ComparisonRecord = row.context(ReadingCsvSnafu { path: &path_s })?;
        records.push(record);
    }
    debug!("read_ledger: {} records in {}", records.len(), path_s);
    Ok(records)
}

/// Reads the ledger, or nothing if there is none yet.
pub fn read_ledger_if_exists(path: &Path) -> TrackerResult<Vec<ComparisonRecord>> {
    if path.exists() {
        read_ledger(path)
    } else {
        Ok(Vec::new())
    }
}

/// Appends records to a copy of a ledger. The ledger itself is only replaced when
/// all the records have been written.
pub struct LedgerWriter {
    writer: Writer<File>,
    tmp_path: String,
}

impl LedgerWriter {
    fn create(tmp: &Path, existing: &[ComparisonRecord]) -> TrackerResult<LedgerWriter> {
        let tmp_path = tmp.display().to_string();
        let writer = WriterBuilder::new()
            .has_headers(false)
            .from_path(tmp)
            .context(WritingCsvSnafu { path: &tmp_path })?;
        let mut lw = LedgerWriter { writer, tmp_path };
        for r in existing {
            lw.append(r)?;
        }
        Ok(lw)
    }

    pub fn append(&mut self, record: &ComparisonRecord) -> TrackerResult<()> {
        self.writer.serialize(record).context(WritingCsvSnafu {
            path: &self.tmp_path,
        })?;
        // Each record is on disk before the next comparison starts.
        self.writer.flush().context(WritingFileSnafu {
            path: &self.tmp_path,
        })
    }
}

/// Rewrites the ledger at `path`: the `existing` records first, then the records `fill`
/// appends. If `fill` fails, the ledger is left as it was.
pub fn rewrite_ledger<F>(path: &Path, existing: &[ComparisonRecord], fill: F) -> TrackerResult<()>
where
    F: FnOnce(&mut LedgerWriter) -> TrackerResult<()>,
{
    replace_file(path, |tmp| {
        let mut writer = LedgerWriter::create(tmp, existing)?;
        fill(&mut writer)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(b2: &str, ratio2: f64, sample: &str) -> ComparisonRecord {
        ComparisonRecord {
            timestamp: "2016-05-01T10:00:00+00:00".to_string(),
            bill1_id: "hr2029-114".to_string(),
            bill1_version: "enr".to_string(),
            ratio1: 0.012,
            bill2_id: b2.to_string(),
            bill2_version: "ih".to_string(),
            ratio2,
            matched_length: 1234,
            sample_text: sample.to_string(),
        }
    }

    #[test]
    fn ledger_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("114").join("text_comparison.csv");
        assert!(read_ledger_if_exists(&path).unwrap().is_empty());

        let first = vec![record("hr10-114", 0.5, "")];
        rewrite_ledger(&path, &[], |w| w.append(&first[0])).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2016-05-01T10:00:00+00:00,hr2029-114,enr,0.012,hr10-114,ih,0.5,1234,\n"
        );

        let second = record("s7-114", 0.9, "the secretary, shall \"report\"");
        rewrite_ledger(&path, &first, |w| w.append(&second)).unwrap();
        assert_eq!(read_ledger(&path).unwrap(), vec![first[0].clone(), second]);
    }

    #[test]
    fn failed_runs_keep_the_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text_comparison.csv");
        let first = vec![record("hr10-114", 0.5, "")];
        rewrite_ledger(&path, &[], |w| w.append(&first[0])).unwrap();
        let res = rewrite_ledger(&path, &first, |w| {
            w.append(&record("hr11-114", 0.1, ""))?;
            whatever!("interrupted")
        });
        assert!(res.is_err());
        assert_eq!(read_ledger(&path).unwrap(), first);
    }
}
