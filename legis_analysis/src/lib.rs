/*!
Algorithms to follow legislation through the US Congress.

Two analyses live here:
* text incorporation: which bills had their text folded into an enacted bill. Bill XML is
  flattened with [text::extract_text], two texts are aligned word by word with
  [compare::compare] and the overlap is judged by [classify::classify]. The
  [incorporation] module turns the ledger of past comparisons into relations between bills.
* cosponsorship networks: the [builder] gathers who cosponsors whose bills in a chamber,
  and the [scores] module derives a leadership score (PageRank) and an ideology score
  (singular value decomposition) from it.

This crate does not read or write any file other than the bill XML. The `legistrack`
program provides the data layout around it, described in the [manual].
*/

mod config;

pub mod bill;
pub mod builder;
pub mod classify;
pub mod compare;
pub mod describe;
pub mod incorporation;
pub mod manual;
pub mod matcher;
pub mod roster;
pub mod scores;
pub mod text;

pub use crate::bill::{BillId, BillNoun, BillStatus, BillType, Chamber};
pub use crate::compare::{compare, Comparison, PreparedText};
pub use crate::config::*;
pub use crate::incorporation::{ComparisonRecord, IncorporationRelation, RelationPlan};
pub use crate::roster::{Member, Roster, Term};
