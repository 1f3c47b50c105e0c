use chrono::NaiveDate;
use log::debug;
use std::collections::BTreeMap;

use crate::bill::Chamber;

/// A term of service of a legislator, as listed in the legislator records.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Term {
    pub person: String,
    pub last_name: String,
    pub chamber: Chamber,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub state: String,
    pub district: Option<u32>,
    pub party: Option<String>,
}

/// A legislator who served during a Congress, with the details of their most recent
/// term in it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Member {
    pub id: String,
    pub last_name: String,
    pub chamber: Chamber,
    pub state: String,
    pub district: Option<u32>,
    /// Empty when the records do not give a party.
    pub party: String,
}

impl Member {
    /// `ST` for senators and `ST12` for representatives. Districts are not padded: `CA5`.
    pub fn seat(&self) -> String {
        match self.district {
            Some(d) if self.chamber == Chamber::House => format!("{}{}", self.state, d),
            _ => self.state.clone(),
        }
    }
}

/// Everyone who served in a Congress. A person who served in both chambers is listed
/// in the chamber of their most recent term.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Roster {
    members: BTreeMap<String, Member>,
}

impl Roster {
    /// Builds the roster of the Congress that sat from `congress_start` to `congress_end`.
    ///
    /// Terms that merely touch the Congress dates (ending on its first day or starting on
    /// its last day) belong to the neighbouring Congresses.
    pub fn from_terms(terms: &[Term], congress_start: NaiveDate, congress_end: NaiveDate) -> Roster {
        let mut overlapping: Vec<&Term> = terms
            .iter()
            .filter(|t| t.start < congress_end && t.end > congress_start)
            .collect();
        // Most recent first; the sort is stable for equal start dates.
        overlapping.sort_by(|x, y| y.start.cmp(&x.start));

        let mut members: BTreeMap<String, Member> = BTreeMap::new();
        for t in overlapping {
            if members.contains_key(&t.person) {
                continue;
            }
            members.insert(
                t.person.clone(),
                Member {
                    id: t.person.clone(),
                    last_name: t.last_name.clone(),
                    chamber: t.chamber,
                    state: t.state.clone(),
                    district: t.district,
                    party: t.party.clone().unwrap_or_default(),
                },
            );
        }
        debug!(
            "from_terms: {} terms, {} members between {} and {}",
            terms.len(),
            members.len(),
            congress_start,
            congress_end
        );
        Roster { members }
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    pub fn in_chamber(&self, id: &str, chamber: Chamber) -> bool {
        self.members
            .get(id)
            .map(|m| m.chamber == chamber)
            .unwrap_or(false)
    }

    /// The members of one chamber, ordered by id.
    pub fn chamber_members(&self, chamber: Chamber) -> impl Iterator<Item = &Member> + '_ {
        self.members.values().filter(move |m| m.chamber == chamber)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub(crate) fn term(person: &str, chamber: Chamber, start: &str, end: &str, party: &str) -> Term {
        Term {
            person: person.to_string(),
            last_name: format!("Name{}", person),
            chamber,
            start: date(start),
            end: date(end),
            state: "CA".to_string(),
            district: if chamber == Chamber::House { Some(3) } else { None },
            party: Some(party.to_string()),
        }
    }

    #[test]
    fn most_recent_term_wins() {
        let terms = vec![
            term("A", Chamber::House, "2013-01-03", "2015-01-03", "Democrat"),
            term("A", Chamber::Senate, "2015-01-06", "2021-01-03", "Democrat"),
            term("B", Chamber::House, "2015-01-06", "2017-01-03", "Republican"),
            // Ended on the first day of the Congress.
            term("C", Chamber::House, "2013-01-03", "2015-01-03", "Republican"),
            // Starts on the first day of the next Congress.
            term("D", Chamber::Senate, "2017-01-03", "2023-01-03", "Republican"),
        ];
        let roster = Roster::from_terms(&terms, date("2015-01-03"), date("2017-01-03"));
        assert_eq!(roster.len(), 2);
        assert!(roster.in_chamber("A", Chamber::Senate));
        assert!(!roster.in_chamber("A", Chamber::House));
        assert!(roster.in_chamber("B", Chamber::House));
        assert!(roster.member("C").is_none());
        assert!(roster.member("D").is_none());
        assert_eq!(roster.member("B").unwrap().seat(), "CA3");
        assert_eq!(roster.member("A").unwrap().seat(), "CA");
        let house: Vec<&str> = roster
            .chamber_members(Chamber::House)
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(house, vec!["B"]);
    }
}
