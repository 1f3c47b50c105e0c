use crate::tracker::*;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const DEFAULT_DATA_DIRECTORY: &str = "data";
const DEFAULT_MIN_CANDIDATES: usize = 10;
const DEFAULT_MAX_CANDIDATES: usize = 50;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "congressDirectory")]
    pub congress_directory: Option<String>,
    #[serde(rename = "analysisDirectory")]
    pub analysis_directory: Option<String>,
    #[serde(rename = "legislatorsFile")]
    pub legislators_file: Option<String>,
    #[serde(rename = "sessionsFile")]
    pub sessions_file: Option<String>,
    #[serde(rename = "minCandidates")]
    pub min_candidates: Option<usize>,
    #[serde(rename = "maxCandidates")]
    pub max_candidates: Option<usize>,
}

pub fn read_config(path: &str) -> TrackerResult<TrackerConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    let config: TrackerConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

/// The locations of all the inputs and outputs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataPaths {
    pub congress_dir: PathBuf,
    pub analysis_dir: PathBuf,
    pub legislators_file: PathBuf,
    pub sessions_file: PathBuf,
    /// Bounds of the number of similar bills compared with each enacted bill.
    pub min_candidates: usize,
    pub max_candidates: usize,
}

fn resolve(base: &Path, value: Option<&String>, default: &str) -> PathBuf {
    let p = Path::new(value.map(|s| s.as_str()).unwrap_or(default));
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base.join(p)
    }
}

impl DataPaths {
    /// Resolves the paths of a configuration file found in `config_dir`.
    ///
    /// Arguments:
    /// * `config`: the configuration and the directory of its file, if any
    /// * `data_dir`: overrides the data directory of the configuration
    pub fn resolve(config: Option<(&TrackerConfig, &Path)>, data_dir: Option<&str>) -> DataPaths {
        let empty = TrackerConfig::default();
        let (c, config_dir) = config.unwrap_or((&empty, Path::new(".")));
        let data = match data_dir {
            Some(d) => PathBuf::from(d),
            None => resolve(config_dir, c.data_directory.as_ref(), DEFAULT_DATA_DIRECTORY),
        };
        DataPaths {
            congress_dir: resolve(&data, c.congress_directory.as_ref(), "congress"),
            analysis_dir: resolve(&data, c.analysis_directory.as_ref(), "analysis"),
            legislators_file: resolve(&data, c.legislators_file.as_ref(), "legislators.json"),
            sessions_file: resolve(&data, c.sessions_file.as_ref(), "sessions.tsv"),
            min_candidates: c.min_candidates.unwrap_or(DEFAULT_MIN_CANDIDATES),
            max_candidates: c.max_candidates.unwrap_or(DEFAULT_MAX_CANDIDATES),
        }
    }

    /// The analysis outputs of one Congress.
    pub fn congress_analysis_dir(&self, congress: u32) -> PathBuf {
        self.analysis_dir
            .join("by-congress")
            .join(congress.to_string())
    }

    pub fn ledger_file(&self, congress: u32) -> PathBuf {
        self.congress_analysis_dir(congress)
            .join("text_comparison.csv")
    }

    pub fn relations_file(&self, congress: u32) -> PathBuf {
        self.congress_analysis_dir(congress)
            .join("text_incorporation.json")
    }

    pub fn lock_file(&self, congress: u32) -> PathBuf {
        self.congress_analysis_dir(congress).join(".lock")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let paths = DataPaths::resolve(None, None);
        assert_eq!(paths.congress_dir, PathBuf::from("./data/congress"));
        assert_eq!(
            paths.ledger_file(114),
            PathBuf::from("./data/analysis/by-congress/114/text_comparison.csv")
        );
        assert_eq!(paths.min_candidates, 10);
        assert_eq!(paths.max_candidates, 50);
    }

    #[test]
    fn config_paths() {
        let config: TrackerConfig = serde_json::from_str(
            r#"{"dataDirectory": "govtrack", "sessionsFile": "/etc/sessions.tsv", "maxCandidates": 20}"#,
        )
        .unwrap();
        let paths = DataPaths::resolve(Some((&config, Path::new("/srv"))), None);
        assert_eq!(paths.congress_dir, PathBuf::from("/srv/govtrack/congress"));
        assert_eq!(paths.sessions_file, PathBuf::from("/etc/sessions.tsv"));
        assert_eq!(paths.max_candidates, 20);

        let overridden = DataPaths::resolve(Some((&config, Path::new("/srv"))), Some("/tmp/data"));
        assert_eq!(
            overridden.legislators_file,
            PathBuf::from("/tmp/data/legislators.json")
        );
    }
}
