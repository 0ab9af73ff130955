use clap::{Args, Parser, Subcommand, ValueEnum};
use pairs_core::YearRange;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Sets the level of tracing.
    #[arg(short, long, global = true)]
    pub trace: Option<TraceLevel>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare every pair of tickers, ranked by how often they moved together after filing
    /// within a day of each other.
    Compare {
        /// Tickers to compare, read from `<dir>/<TICKER>.csv`.
        ///
        /// Ignored when an `--input` universe is provided.
        tickers: Vec<String>,

        #[command(flatten)]
        source: Source,

        /// Print the ranked pairs as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Display the markers between two tickers.
    Markers {
        /// The first ticker of the pair.
        first: String,

        /// The second ticker of the pair.
        second: String,

        #[command(flatten)]
        source: Source,
    },
}

/// Where filing records are read from, and how they are compared.
#[derive(Args, Debug)]
pub struct Source {
    /// A `.json` ticker universe; each ticker mapped to its filing records by year.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Directory of `<TICKER>.csv` filing records.
    ///
    /// Defaults to PAIRS_DATA_DIR, or `./filing_records`.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Which years of two tickers are compared.
    #[arg(short, long)]
    pub year_range: Option<RangeArg>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
#[clap(rename_all = "UPPERCASE")]
pub enum TraceLevel {
    DEBUG,
    ERROR,
    INFO,
    TRACE,
    WARN,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum RangeArg {
    /// Years both tickers have filings in.
    Intersection,

    /// Every year of the ticker with fewer years of filings.
    Shorter,
}

impl From<RangeArg> for YearRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::Intersection => YearRange::Intersection,
            RangeArg::Shorter => YearRange::Shorter,
        }
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_compare() {
        let cli = Cli::try_parse_from([
            "pairs", "compare", "KO", "PEP", "MO", "-y", "shorter", "--json", "-t", "DEBUG",
        ])
        .unwrap();
        assert_eq!(cli.trace, Some(TraceLevel::DEBUG));

        match cli.command {
            Commands::Compare {
                tickers,
                source,
                json,
            } => {
                assert_eq!(tickers, vec!["KO", "PEP", "MO"]);
                assert_eq!(source.year_range, Some(RangeArg::Shorter));
                assert!(source.input.is_none());
                assert!(json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parse_markers() {
        let cli =
            Cli::try_parse_from(["pairs", "markers", "KO", "PEP", "-d", "./records"]).unwrap();
        match cli.command {
            Commands::Markers {
                first,
                second,
                source,
            } => {
                assert_eq!((first.as_str(), second.as_str()), ("KO", "PEP"));
                assert_eq!(source.dir, Some(PathBuf::from("./records")));
                assert_eq!(YearRange::from(RangeArg::Intersection), YearRange::Intersection);
            }
            other => panic!("unexpected command {other:?}"),
        }

        assert!(Cli::try_parse_from(["pairs", "markers", "KO"]).is_err());
    }
}
