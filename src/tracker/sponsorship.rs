// The cosponsorship analysis of a Congress: ideology and leadership scores for the
// members of each chamber.

use chrono::NaiveDate;
use legis_analysis::builder::{build_matrix, tally_activity, ActivityCounts, SponsoredBill};
use legis_analysis::describe::{describe_members, display_names};
use legis_analysis::scores::{ideology, leadership, smooth};
use legis_analysis::{BillType, Chamber, Member, Roster, ScoringConfig};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::tracker::io_corpus::*;
use crate::tracker::io_roster::*;
use crate::tracker::io_stats::*;
use crate::tracker::*;

/// Reads the sponsorship data of the bills of the Congresses `since..=congress`.
pub fn load_sponsored_bills(
    corpus: &dyn BillCorpus,
    since: u32,
    congress: u32,
) -> TrackerResult<Vec<SponsoredBill>> {
    let all_types: Vec<BillType> = BillType::all().collect();
    let mut bills: Vec<SponsoredBill> = Vec::new();
    for c in since..=congress {
        for id in corpus.bills_in_congress(c, &all_types)? {
            match corpus.bill(&id) {
                Ok(md) => match md.sponsorship(&id) {
                    Some(b) => bills.push(b),
                    None => warn!("load_sponsored_bills: {}: no introduction date", id),
                },
                Err(e) => warn!("load_sponsored_bills: skipping {}: {}", id, e),
            }
        }
    }
    debug!(
        "load_sponsored_bills: {} bills in congresses {} to {}",
        bills.len(),
        since,
        congress
    );
    Ok(bills)
}

/// The scores of the members of one chamber.
#[derive(PartialEq, Debug, Clone)]
pub struct ChamberScores {
    pub chamber: Chamber,
    pub scores: Vec<MemberScore>,
    pub meta: StatsMeta,
}

/// Scores the members of a chamber.
///
/// Arguments:
/// * `bills`: the bills of all the Congresses counted in the matrix
/// * `window`: the join dates of the cosponsorships to count, for a single session
/// * `activity`: the sponsorship activity of each legislator in `congress`
pub fn score_chamber(
    chamber: Chamber,
    congress: u32,
    since: u32,
    roster: &Roster,
    bills: &[SponsoredBill],
    window: Option<(NaiveDate, NaiveDate)>,
    activity: &HashMap<String, ActivityCounts>,
) -> TrackerResult<ChamberScores> {
    let matrix = build_matrix(congress, since, chamber, roster, bills.iter(), window);
    let mut members: Vec<&Member> = Vec::with_capacity(matrix.len());
    for id in matrix.index.ids() {
        match roster.member(id) {
            Some(m) => members.push(m),
            None => whatever!("{} is in the matrix but not in the roster", id),
        }
    }
    let parties: Vec<&str> = members.iter().map(|m| m.party.as_str()).collect();

    let smoothed = smooth(&matrix.counts);
    let ideology = ideology(&smoothed, &parties).context(ConfigurationSnafu {
        chamber: chamber.name(),
    })?;
    let leadership = leadership(&smoothed, &ScoringConfig::DEFAULT).context(ConfigurationSnafu {
        chamber: chamber.name(),
    })?;
    let descriptions = describe_members(&parties, &ideology, &leadership);
    let names = display_names(&members);

    let scores: Vec<MemberScore> = members
        .iter()
        .enumerate()
        .map(|(i, m)| MemberScore {
            id: m.id.clone(),
            ideology: ideology[i],
            leadership: leadership[i],
            name: names[i].clone(),
            party: m.party.clone(),
            description: descriptions[i].clone(),
            activity: activity.get(&m.id).copied().unwrap_or_default(),
        })
        .collect();
    Ok(ChamberScores {
        chamber,
        scores,
        meta: StatsMeta::new(matrix.start_date, matrix.end_date),
    })
}

fn output_dir(paths: &DataPaths, congress: u32, session: Option<&str>) -> PathBuf {
    let dir = paths.congress_analysis_dir(congress);
    match session {
        Some(s) => dir.join(format!("session-{}", s)),
        None => dir,
    }
}

/// Runs the cosponsorship analysis of `congress`, counting the bills since `since`, and
/// writes the scores of each chamber.
///
/// Nothing is written unless both chambers could be scored.
pub fn run_cosponsorship(
    paths: &DataPaths,
    congress: u32,
    since: u32,
    session: Option<&str>,
) -> TrackerResult<Vec<ChamberScores>> {
    let sessions_s = paths.sessions_file.display().to_string();
    let sessions = read_sessions(&paths.sessions_file)?;
    let (start, end) = congress_dates(&sessions, congress).context(NotAvailableSnafu {
        what: format!("dates of Congress {}", congress),
        path: &sessions_s,
    })?;
    let window = match session {
        Some(s) => Some(session_dates(&sessions, congress, s).context(UnknownSessionSnafu {
            congress,
            session: s,
            path: &sessions_s,
        })?),
        None => None,
    };

    let terms = read_legislators(&paths.legislators_file)?;
    let roster = Roster::from_terms(&terms, start, end);
    info!(
        "run_cosponsorship: congress {} ({} to {}): {} members",
        congress,
        start,
        end,
        roster.len()
    );

    let corpus = CongressDataCorpus::new(paths.congress_dir.clone());
    let bills = load_sponsored_bills(&corpus, since.min(congress), congress)?;
    let activity = tally_activity(congress, bills.iter());

    let mut results: Vec<ChamberScores> = Vec::new();
    for chamber in Chamber::ALL {
        if roster.chamber_members(chamber).next().is_none() {
            warn!("run_cosponsorship: no members in the {}", chamber.name());
            continue;
        }
        results.push(score_chamber(
            chamber,
            congress,
            since.min(congress),
            &roster,
            &bills,
            window,
            &activity,
        )?);
    }

    let dir = output_dir(paths, congress, session);
    for r in results.iter() {
        let code = r.chamber.code();
        write_member_scores(
            &dir.join(format!("sponsorshipanalysis_{}.txt", code)),
            congress,
            &r.scores,
        )?;
        write_meta(&dir.join(format!("sponsorshipanalysis_{}_meta.txt", code)), &r.meta)?;
        info!(
            "run_cosponsorship: {}: {} members written to {}",
            r.chamber.name(),
            r.scores.len(),
            dir.display()
        );
    }
    Ok(results)
}
