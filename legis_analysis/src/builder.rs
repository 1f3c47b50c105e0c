use chrono::NaiveDate;
use log::debug;
use nalgebra::DMatrix;
use std::collections::{HashMap, HashSet};

use crate::bill::{BillId, Chamber};
use crate::roster::Roster;

/// A legislator joining a bill as cosponsor.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct CosponsorRecord {
    pub person: String,
    pub joined: NaiveDate,
    pub withdrawn: Option<NaiveDate>,
}

/// The sponsorship data of one bill.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SponsoredBill {
    pub id: BillId,
    pub introduced: NaiveDate,
    /// Some bills, such as debt limit resolutions, have no sponsor.
    pub sponsor: Option<String>,
    pub cosponsors: Vec<CosponsorRecord>,
}

/// The mapping between legislator ids and matrix rows.
///
/// Rows are given in order of first encounter.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct MemberIndex {
    ids: Vec<String>,
    rows: HashMap<String, usize>,
}

impl MemberIndex {
    fn row_of(&mut self, id: &str) -> usize {
        if let Some(row) = self.rows.get(id) {
            return *row;
        }
        let row = self.ids.len();
        self.ids.push(id.to_string());
        self.rows.insert(id.to_string(), row);
        row
    }

    pub fn row(&self, id: &str) -> Option<usize> {
        self.rows.get(id).copied()
    }

    pub fn id(&self, row: usize) -> Option<&str> {
        self.ids.get(row).map(|s| s.as_str())
    }

    /// The ids, in row order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Cosponsorship counts between the members of one chamber.
///
/// `counts[(sponsor_row, cosponsor_row)]` is the number of bills of the sponsor the
/// cosponsor joined, plus one on the diagonal.
#[derive(PartialEq, Debug, Clone)]
pub struct CosponsorshipMatrix {
    pub chamber: Chamber,
    pub index: MemberIndex,
    pub counts: DMatrix<f64>,
    /// Introduced dates of the earliest and latest bills that contributed a count.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CosponsorshipMatrix {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// A builder for cosponsorship matrices.
///
/// ```
/// # use legis_analysis::builder::MatrixBuilder;
/// # use legis_analysis::{Chamber, Roster};
/// let roster = Roster::default();
/// let matrix = MatrixBuilder::new(Chamber::House, &roster)
///     .congresses(113, 114)
///     .build();
/// assert!(matrix.is_empty());
/// ```
pub struct MatrixBuilder<'a> {
    roster: &'a Roster,
    chamber: Chamber,
    congresses: Option<(u32, u32)>,
    window: Option<(NaiveDate, NaiveDate)>,
    index: MemberIndex,
    cells: Vec<(usize, usize)>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
}

impl<'a> MatrixBuilder<'a> {
    pub fn new(chamber: Chamber, roster: &'a Roster) -> MatrixBuilder<'a> {
        MatrixBuilder {
            roster,
            chamber,
            congresses: None,
            window: None,
            index: MemberIndex::default(),
            cells: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    /// Only bills of the Congresses `starting_congress..=congress` are counted.
    pub fn congresses(self, starting_congress: u32, congress: u32) -> MatrixBuilder<'a> {
        MatrixBuilder {
            congresses: Some((starting_congress, congress)),
            ..self
        }
    }

    /// Only cosponsors who joined between `start` and `end` (inclusive) are counted.
    pub fn join_window(self, start: NaiveDate, end: NaiveDate) -> MatrixBuilder<'a> {
        MatrixBuilder {
            window: Some((start, end)),
            ..self
        }
    }

    /// Adds the cosponsorships of a bill. Returns whether the bill contributed a count.
    ///
    /// Bills of the other chamber, or whose sponsor is not a member of the chamber, are
    /// ignored. Cosponsors outside of the chamber are ignored.
    pub fn add_bill(&mut self, bill: &SponsoredBill) -> bool {
        if bill.id.bill_type.chamber() != self.chamber {
            return false;
        }
        if let Some((first, last)) = self.congresses {
            if bill.id.congress < first || bill.id.congress > last {
                return false;
            }
        }
        let sponsor = match bill.sponsor.as_deref() {
            Some(s) if self.roster.in_chamber(s, self.chamber) => self.index.row_of(s),
            _ => return false,
        };

        let mut has_entry = false;
        for c in bill.cosponsors.iter() {
            if !self.roster.in_chamber(&c.person, self.chamber) {
                continue;
            }
            if let Some((start, end)) = self.window {
                if c.joined < start || c.joined > end {
                    continue;
                }
            }
            let cosponsor = self.index.row_of(&c.person);
            self.cells.push((sponsor, cosponsor));
            has_entry = true;
        }

        if has_entry {
            self.start_date = Some(match self.start_date {
                Some(d) => d.min(bill.introduced),
                None => bill.introduced,
            });
            self.end_date = Some(match self.end_date {
                Some(d) => d.max(bill.introduced),
                None => bill.introduced,
            });
        }
        has_entry
    }

    pub fn build(mut self) -> CosponsorshipMatrix {
        // Members without any activity still get a row.
        for m in self.roster.chamber_members(self.chamber) {
            self.index.row_of(&m.id);
        }
        let n = self.index.len();
        let mut counts: DMatrix<f64> = DMatrix::identity(n, n);
        for (sponsor, cosponsor) in self.cells.iter() {
            counts[(*sponsor, *cosponsor)] += 1.0;
        }
        debug!(
            "build: {} matrix: {} members, {} cosponsorships",
            self.chamber.name(),
            n,
            self.cells.len()
        );
        CosponsorshipMatrix {
            chamber: self.chamber,
            index: self.index,
            counts,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Builds the cosponsorship matrix of a chamber from the bills of the Congresses
/// `starting_congress..=congress`.
///
/// Arguments:
/// * `roster`: the members of the analysed Congress
/// * `window`: if given, the inclusive range of cosponsor join dates to count
pub fn build_matrix<'b, I>(
    congress: u32,
    starting_congress: u32,
    chamber: Chamber,
    roster: &Roster,
    bills: I,
    window: Option<(NaiveDate, NaiveDate)>,
) -> CosponsorshipMatrix
where
    I: IntoIterator<Item = &'b SponsoredBill>,
{
    let mut builder = MatrixBuilder::new(chamber, roster).congresses(starting_congress, congress);
    if let Some((start, end)) = window {
        builder = builder.join_window(start, end);
    }
    for bill in bills {
        builder.add_bill(bill);
    }
    builder.build()
}

/// Sponsorship activity of a legislator during one Congress.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct ActivityCounts {
    pub introduced_bills: usize,
    pub cosponsored_bills: usize,
    /// Distinct legislators who cosponsored one of their bills.
    pub unique_cosponsors: usize,
    /// Cosponsorships of their bills.
    pub total_cosponsors: usize,
}

/// Counts the sponsorship activity of every legislator on the bills of `congress`.
pub fn tally_activity<'b, I>(congress: u32, bills: I) -> HashMap<String, ActivityCounts>
where
    I: IntoIterator<Item = &'b SponsoredBill>,
{
    let mut counts: HashMap<String, ActivityCounts> = HashMap::new();
    let mut cosponsors_of: HashMap<String, HashSet<&str>> = HashMap::new();
    for bill in bills.into_iter().filter(|b| b.id.congress == congress) {
        if let Some(sponsor) = bill.sponsor.as_deref() {
            let entry = counts.entry(sponsor.to_string()).or_default();
            entry.introduced_bills += 1;
            entry.total_cosponsors += bill.cosponsors.len();
            cosponsors_of
                .entry(sponsor.to_string())
                .or_default()
                .extend(bill.cosponsors.iter().map(|c| c.person.as_str()));
        }
        for c in bill.cosponsors.iter() {
            counts.entry(c.person.clone()).or_default().cosponsored_bills += 1;
        }
    }
    for (sponsor, cosponsors) in cosponsors_of {
        counts.entry(sponsor).or_default().unique_cosponsors = cosponsors.len();
    }
    counts
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::bill::BillType;
    use crate::roster::tests::{date, term};

    pub(crate) fn bill(
        bill_type: BillType,
        number: u32,
        congress: u32,
        introduced: &str,
        sponsor: &str,
        cosponsors: &[(&str, &str)],
    ) -> SponsoredBill {
        SponsoredBill {
            id: BillId::new(bill_type, number, congress),
            introduced: date(introduced),
            sponsor: Some(sponsor.to_string()),
            cosponsors: cosponsors
                .iter()
                .map(|(p, joined)| CosponsorRecord {
                    person: p.to_string(),
                    joined: date(joined),
                    withdrawn: None,
                })
                .collect(),
        }
    }

    fn roster() -> Roster {
        let terms = vec![
            term("A", Chamber::House, "2015-01-06", "2017-01-03", "Democrat"),
            term("B", Chamber::House, "2015-01-06", "2017-01-03", "Republican"),
            term("C", Chamber::House, "2015-01-06", "2017-01-03", "Republican"),
            term("Q", Chamber::House, "2015-01-06", "2017-01-03", "Independent"),
            term("S", Chamber::Senate, "2015-01-06", "2021-01-03", "Democrat"),
        ];
        Roster::from_terms(&terms, date("2015-01-03"), date("2017-01-03"))
    }

    #[test]
    fn counts_cosponsorships() {
        let roster = roster();
        let bills = vec![
            bill(BillType::HouseBill, 1, 114, "2015-02-01", "B", &[("A", "2015-02-01"), ("C", "2015-03-01"), ("S", "2015-03-01")]),
            bill(BillType::HouseResolution, 2, 114, "2015-06-01", "B", &[("A", "2015-06-02")]),
            // Senate bill, other Congress, unknown sponsor: all ignored.
            bill(BillType::SenateBill, 3, 114, "2015-01-01", "S", &[("A", "2015-01-02")]),
            bill(BillType::HouseBill, 4, 110, "2007-01-01", "A", &[("B", "2007-01-02")]),
            bill(BillType::HouseBill, 5, 114, "2016-01-01", "Z", &[("A", "2016-01-02")]),
        ];
        let m = build_matrix(114, 113, Chamber::House, &roster, &bills, None);
        assert_eq!(m.len(), 4);
        // Rows in order of first encounter, then the remaining members by id.
        assert_eq!(m.index.ids(), &["B", "A", "C", "Q"]);
        let (b, a, c, q) = (0, 1, 2, 3);
        assert_eq!(m.counts[(b, a)], 2.0);
        assert_eq!(m.counts[(b, c)], 1.0);
        assert_eq!(m.counts[(a, b)], 0.0);
        assert_eq!(m.counts[(q, q)], 1.0);
        assert_eq!(m.counts[(b, b)], 1.0);
        assert_eq!(m.start_date, Some(date("2015-02-01")));
        assert_eq!(m.end_date, Some(date("2015-06-01")));
    }

    #[test]
    fn join_window_is_inclusive() {
        let roster = roster();
        let bills = vec![bill(
            BillType::HouseBill,
            1,
            114,
            "2015-02-01",
            "B",
            &[("A", "2015-01-06"), ("C", "2015-12-31"), ("Q", "2016-01-04")],
        )];
        let m = build_matrix(
            114,
            114,
            Chamber::House,
            &roster,
            &bills,
            Some((date("2015-01-06"), date("2015-12-31"))),
        );
        let b = m.index.row("B").unwrap();
        assert_eq!(m.counts[(b, m.index.row("A").unwrap())], 1.0);
        assert_eq!(m.counts[(b, m.index.row("C").unwrap())], 1.0);
        assert_eq!(m.counts[(b, m.index.row("Q").unwrap())], 0.0);
    }

    #[test]
    fn activity() {
        let bills = vec![
            bill(BillType::HouseBill, 1, 114, "2015-02-01", "B", &[("A", "2015-02-01"), ("C", "2015-03-01")]),
            bill(BillType::HouseBill, 2, 114, "2015-02-01", "B", &[("A", "2015-02-01")]),
            bill(BillType::HouseBill, 3, 113, "2014-02-01", "B", &[("A", "2014-02-01")]),
        ];
        let counts = tally_activity(114, &bills);
        assert_eq!(
            counts["B"],
            ActivityCounts {
                introduced_bills: 2,
                cosponsored_bills: 0,
                unique_cosponsors: 2,
                total_cosponsors: 3
            }
        );
        assert_eq!(counts["A"].cosponsored_bills, 2);
        assert_eq!(counts["A"].introduced_bills, 0);
    }
}
