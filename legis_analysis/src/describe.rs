//! Human-readable descriptions and display names of the members of a chamber.

use std::collections::HashMap;

use crate::roster::Member;
use crate::scores::REPUBLICAN;

const DEMOCRAT: &str = "Democrat";

// Rows: leadership band, most to least. Columns: ideology band, left to right.
type LabelTable = [[&'static str; 3]; 3];

// The labels are published as they are, including their trailing spaces and spelling.
const DEMOCRAT_LABELS: LabelTable = [
    [
        "progressive Democratic leader",
        "moderate Democratic leader",
        "centrist Democratic leader",
    ],
    ["progressive Democrat", "rank-and-file Democrat", "centrist Democrat"],
    [
        "lonely progressive Democratic ",
        "moderate Democratic follower",
        "centrist Democratic follower",
    ],
];

const REPUBLICAN_LABELS: LabelTable = [
    [
        "centrist Republican leader",
        "moderate Republican leader",
        "conservative Republican leader",
    ],
    ["centrist Republican", "rank-and-file Republican", "conservative Republican"],
    [
        "centrist Republican follower ",
        "moderate Republican follower",
        "lonley conservative Republican follower",
    ],
];

const INDEPENDENT_LABELS: LabelTable = [
    [
        "left-leaning Independent leader",
        "moderate Independent leader",
        "right-leaning Independent leader",
    ],
    ["left-leaning Independent", "centrist Independent", "right-leaning Independent"],
    [
        "lonely left-leaning Independent",
        "lonely centrist Independent",
        "lonely right-leaning Independent",
    ],
];

/// The score below which `percentile` percent of the values lie, interpolating linearly
/// between the two nearest ranks.
pub fn score_at_percentile(values: &[f64], percentile: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let idx = percentile / 100.0 * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let frac = idx - lower as f64;
    match sorted.get(lower + 1) {
        Some(next) => sorted[lower] + (next - sorted[lower]) * frac,
        None => sorted[lower],
    }
}

struct Bands {
    leadership: (f64, f64),
    ideology: (f64, f64),
}

impl Bands {
    fn of(ideology: &[f64], leadership: &[f64]) -> Bands {
        Bands {
            leadership: (
                score_at_percentile(leadership, 20.0),
                score_at_percentile(leadership, 80.0),
            ),
            ideology: (
                score_at_percentile(ideology, 20.0),
                score_at_percentile(ideology, 80.0),
            ),
        }
    }

    fn cell(&self, ideology: f64, leadership: f64) -> (usize, usize) {
        let row = if leadership < self.leadership.0 {
            2
        } else if leadership < self.leadership.1 {
            1
        } else {
            0
        };
        let col = if ideology < self.ideology.0 {
            0
        } else if ideology < self.ideology.1 {
            1
        } else {
            2
        };
        (row, col)
    }
}

/// Describes every member by where they fall among their own party.
///
/// Democrats and Republicans are banded against the members of their party. Everyone
/// else is banded against the whole chamber.
///
/// Arguments:
/// * `parties`, `ideology`, `leadership`: one entry per member, in the same order
pub fn describe_members(parties: &[&str], ideology: &[f64], leadership: &[f64]) -> Vec<String> {
    let party_scores = |party: &str| -> (Vec<f64>, Vec<f64>) {
        parties
            .iter()
            .zip(ideology.iter().zip(leadership.iter()))
            .filter(|(p, _)| **p == party)
            .map(|(_, (i, l))| (*i, *l))
            .unzip()
    };
    let (dem_ideology, dem_leadership) = party_scores(DEMOCRAT);
    let (rep_ideology, rep_leadership) = party_scores(REPUBLICAN);
    let dem = Bands::of(&dem_ideology, &dem_leadership);
    let rep = Bands::of(&rep_ideology, &rep_leadership);
    let everyone = Bands::of(ideology, leadership);

    parties
        .iter()
        .zip(ideology.iter().zip(leadership.iter()))
        .map(|(party, (i, l))| {
            let (bands, table) = match *party {
                DEMOCRAT => (&dem, &DEMOCRAT_LABELS),
                REPUBLICAN => (&rep, &REPUBLICAN_LABELS),
                _ => (&everyone, &INDEPENDENT_LABELS),
            };
            let (row, col) = bands.cell(*i, *l);
            table[row][col].to_string()
        })
        .collect()
}

/// Last names, with the seat appended for every member whose last name is shared
/// with another member of the list.
pub fn display_names(members: &[&Member]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for m in members {
        *counts.entry(m.last_name.as_str()).or_default() += 1;
    }
    members
        .iter()
        .map(|m| {
            if counts.get(m.last_name.as_str()).copied().unwrap_or(0) > 1 {
                format!("{} [{}]", m.last_name, m.seat())
            } else {
                m.last_name.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::Chamber;

    #[test]
    fn percentiles_interpolate() {
        let values = [4.0, 1.0, 3.0, 2.0, 5.0];
        assert_eq!(score_at_percentile(&values, 0.0), 1.0);
        assert_eq!(score_at_percentile(&values, 50.0), 3.0);
        assert_eq!(score_at_percentile(&values, 100.0), 5.0);
        assert!((score_at_percentile(&values, 20.0) - 1.8).abs() < 1e-12);
        assert!((score_at_percentile(&[1.0, 2.0], 80.0) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn descriptions_per_party() {
        let parties = [
            "Democrat",
            "Democrat",
            "Democrat",
            "Republican",
            "Republican",
            "Republican",
            "Independent",
        ];
        let ideology = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0, 0.5];
        let leadership = [1.0, 0.5, 0.0, 0.0, 0.5, 1.0, 0.5];
        let labels = describe_members(&parties, &ideology, &leadership);
        assert_eq!(labels[0], "progressive Democratic leader");
        assert_eq!(labels[1], "rank-and-file Democrat");
        assert_eq!(labels[2], "centrist Democratic follower");
        assert_eq!(labels[3], "centrist Republican follower ");
        assert_eq!(labels[4], "rank-and-file Republican");
        assert_eq!(labels[5], "conservative Republican leader");
        assert_eq!(labels[6], "centrist Independent");
    }

    #[test]
    fn every_band_has_its_label() {
        let bands = Bands {
            leadership: (0.2, 0.8),
            ideology: (0.2, 0.8),
        };
        // Scores equal to a threshold fall in the band above it.
        assert_eq!(bands.cell(0.2, 0.2), (1, 1));
        assert_eq!(bands.cell(0.8, 0.8), (0, 2));
        assert_eq!(bands.cell(0.19, 0.19), (2, 0));

        let label = |table: &LabelTable, ideology: f64, leadership: f64| {
            let (row, col) = bands.cell(ideology, leadership);
            table[row][col]
        };
        let cells: Vec<(f64, f64)> = [0.9, 0.5, 0.1]
            .into_iter()
            .flat_map(|l| [0.1, 0.5, 0.9].into_iter().map(move |i| (i, l)))
            .collect();
        let labels_of = |table: &LabelTable| -> Vec<&'static str> {
            cells.iter().map(|(i, l)| label(table, *i, *l)).collect()
        };
        assert_eq!(
            labels_of(&DEMOCRAT_LABELS),
            vec![
                "progressive Democratic leader",
                "moderate Democratic leader",
                "centrist Democratic leader",
                "progressive Democrat",
                "rank-and-file Democrat",
                "centrist Democrat",
                "lonely progressive Democratic ",
                "moderate Democratic follower",
                "centrist Democratic follower",
            ]
        );
        assert_eq!(
            labels_of(&REPUBLICAN_LABELS),
            vec![
                "centrist Republican leader",
                "moderate Republican leader",
                "conservative Republican leader",
                "centrist Republican",
                "rank-and-file Republican",
                "conservative Republican",
                "centrist Republican follower ",
                "moderate Republican follower",
                "lonley conservative Republican follower",
            ]
        );
        assert_eq!(
            labels_of(&INDEPENDENT_LABELS),
            vec![
                "left-leaning Independent leader",
                "moderate Independent leader",
                "right-leaning Independent leader",
                "left-leaning Independent",
                "centrist Independent",
                "right-leaning Independent",
                "lonely left-leaning Independent",
                "lonely centrist Independent",
                "lonely right-leaning Independent",
            ]
        );
    }

    #[test]
    fn shared_last_names_get_seats() {
        let member = |id: &str, last: &str, chamber: Chamber, state: &str, district: Option<u32>| Member {
            id: id.to_string(),
            last_name: last.to_string(),
            chamber,
            state: state.to_string(),
            district,
            party: DEMOCRAT.to_string(),
        };
        let a = member("A", "Smith", Chamber::House, "WA", Some(9));
        let b = member("B", "Smith", Chamber::House, "NJ", Some(4));
        let c = member("C", "Jones", Chamber::House, "NC", Some(3));
        let names = display_names(&[&a, &b, &c]);
        assert_eq!(names, vec!["Smith [WA9]", "Smith [NJ4]", "Jones"]);
        let s = member("S", "Reed", Chamber::Senate, "RI", None);
        let t = member("T", "Reed", Chamber::Senate, "NV", None);
        assert_eq!(display_names(&[&s, &t]), vec!["Reed [RI]", "Reed [NV]"]);
    }
}
