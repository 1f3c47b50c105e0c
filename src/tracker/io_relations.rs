// The relation store: a JSON object from bill id to the incorporation relations of
// the bill.

use legis_analysis::IncorporationRelation;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::tracker::io_common::replace_file;
use crate::tracker::*;

pub type RelationStore = BTreeMap<String, Vec<IncorporationRelation>>;

/// Reads the relation store, or an empty store if there is none yet.
pub fn read_relations(path: &Path) -> TrackerResult<RelationStore> {
    let path_s = path.display().to_string();
    if !path.exists() {
        debug!("read_relations: no store at {}", path_s);
        return Ok(RelationStore::new());
    }
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path: &path_s })?;
    serde_json::from_str(&contents).context(ParsingJsonSnafu { path: path_s })
}

pub fn write_relations(path: &Path, store: &RelationStore) -> TrackerResult<()> {
    let path_s = path.display().to_string();
    let js = serde_json::to_string_pretty(store).context(WritingJsonSnafu { path: &path_s })?;
    replace_file(path, |tmp| {
        fs::write(tmp, js + "\n").context(WritingFileSnafu { path: &path_s })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("text_incorporation.json");
        assert!(read_relations(&path).unwrap().is_empty());

        let mut store = RelationStore::new();
        store.insert(
            "hr2029-114".to_string(),
            vec![IncorporationRelation {
                my_version: "enr".to_string(),
                my_ratio: 0.12,
                other: "hr1314-114".to_string(),
                other_version: "ih".to_string(),
                other_ratio: 0.98,
            }],
        );
        write_relations(&path, &store).unwrap();
        assert_eq!(read_relations(&path).unwrap(), store);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            read_relations(&path),
            Err(TrackerError::ParsingJson { .. })
        ));
    }
}
