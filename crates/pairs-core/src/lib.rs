/// Environment & runtime settings for a comparison run.
pub mod config;

/// Pairwise orchestration across a ticker universe; pair generation, ranking & deduplication.
pub mod earnings_pairs;

mod error;

/// Filing records, as collected per ticker per year by the scraper.
pub mod filing;

/// Readers for the scraper's cached output (`.json` universes & per-ticker `.csv` files).
pub mod fs;

/// A single ordered ticker-to-ticker comparison.
pub mod pair;

pub use config::Config;
pub use earnings_pairs::{EarningsPairs, PairSummary, Report, Ticker, Universe};
pub use error::{Error, Result};
pub use filing::{FilingHistory, FilingRecord, FilingType};
pub use pair::{Marker, Movement, Pair, Relationship, YearRange};

/// Format the elapsed time since `time`, for trace & debug output.
pub(crate) fn time_elapsed(time: std::time::Instant) -> String {
    format!(
        "\x1b[38;5;208melapsed time: {} ms\x1b[0m",
        time.elapsed().as_millis()
    )
}
