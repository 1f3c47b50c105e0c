// ********* Errors ***********

use snafu::Snafu;

/// A bill text document that could not be turned into comparable text.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FormatError {
    #[snafu(display("Could not read bill text {path}"))]
    Unreadable {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Malformed bill XML near byte {position}"))]
    XmlSyntax {
        source: quick_xml::Error,
        position: u64,
    },
    #[snafu(display("Undecodable text in bill XML near byte {position}: {message}"))]
    Undecodable { message: String, position: u64 },
    #[snafu(display("Bill XML ended before <{tag}> was closed"))]
    Unclosed { tag: String },
    #[snafu(display("Bill XML has no root element"))]
    EmptyDocument {},
    #[snafu(display("Bill XML has no legis-body or resolution-body under <{root}>"))]
    MissingBody { root: String },
}

/// An input that makes a scorer undefined. Nothing should be written when this happens.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConfigurationError {
    #[snafu(display("No Republican-labelled member to orient the ideology axis"))]
    NoRepublicans {},
    #[snafu(display("At least two members are needed, found {count}"))]
    TooFewMembers { count: usize },
    #[snafu(display("Column {column} of the cosponsorship matrix sums to zero"))]
    EmptyColumn { column: usize },
    #[snafu(display("Leadership scores did not converge after {iterations} iterations"))]
    NoConvergence { iterations: usize },
    #[snafu(display("The singular value decomposition did not produce right-singular vectors"))]
    MissingSingularVectors {},
    #[snafu(display("{count} party labels for {members} members"))]
    PartyCountMismatch { count: usize, members: usize },
}

// ********* Configuration **********

/// The constants of the cosponsorship scorers.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Probability of following a cosponsorship link rather than teleporting.
    pub damping: f64,
    /// Columns summing below this value are padded uniformly up to it before normalization.
    pub column_floor: f64,
    /// The power iteration stops when the L1 change falls below this value.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl ScoringConfig {
    pub const DEFAULT: ScoringConfig = ScoringConfig {
        damping: 0.85,
        column_floor: 10.0,
        tolerance: 1e-11,
        max_iterations: 10_000,
    };
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig::DEFAULT
    }
}

/// Blocks longer than this many words are always kept as matches.
pub const MIN_UNCONDITIONAL_BLOCK: usize = 10;

/// Exponent of the superlinear length test used to merge runs.
pub const MERGE_EXPONENT: f64 = 1.4;

/// Formulaic titles are only accepted when the two ratios multiply to at least this.
pub const FORMULAIC_MIN_PRODUCT: f64 = 0.85;

/// The part of the comparison text kept in the ledger.
pub const SAMPLE_MAX_CHARS: usize = 1000;
