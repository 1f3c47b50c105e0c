use clap::{Parser, Subcommand};

/// This program follows legislation through the US Congress: it finds the bills whose text was
/// incorporated into enacted bills, and scores legislators from their cosponsorships.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the locations of the data. See the manual of
    /// legis_analysis for the format. By default, everything is read from the `data` directory.
    #[clap(short, long, value_parser, global = true)]
    pub config: Option<String>,

    /// (directory, optional) The data directory. Setting this option overrides the data
    /// directory that may be specified with the --config option.
    #[clap(long, value_parser, global = true)]
    pub data_dir: Option<String>,

    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compares the enacted bills of a Congress with similar bills and appends the results
    /// to the comparison ledger.
    Analyze {
        #[clap(value_parser)]
        congress: u32,
    },
    /// Derives the incorporation relations of a Congress from the comparison ledger.
    Load {
        #[clap(value_parser)]
        congress: u32,
    },
    /// Compares the latest texts of two bills, e.g. `hr3590-111 hr3962-111`.
    Compare {
        /// The enacted bill.
        #[clap(value_parser)]
        bill1: String,
        /// The other bill.
        #[clap(value_parser)]
        bill2: String,
        /// Also prints a word diff of the two texts.
        #[clap(long, takes_value = false)]
        diff: bool,
    },
    /// Prints the comparable text of a bill XML document.
    ExtractText {
        #[clap(value_parser)]
        path: String,
    },
    /// Computes the leadership and ideology scores of the members of a Congress.
    Cosponsors {
        #[clap(value_parser)]
        congress: u32,
        /// (default: two Congresses earlier) The first Congress whose bills are counted.
        #[clap(long, value_parser)]
        since: Option<u32>,
        /// (optional) Only counts the cosponsorships made during this session.
        #[clap(long, value_parser)]
        session: Option<String>,
    },
}
