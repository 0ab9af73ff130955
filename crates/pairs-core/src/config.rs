use crate::error::{Error, Result};
use crate::pair::YearRange;
use dotenv::var;
use std::path::PathBuf;
use tracing::{debug, trace};

/// Default directory holding the scraper's per-ticker `.csv` files.
pub const DEFAULT_DATA_DIR: &str = "./filing_records";

/// Two filings count as a marker when they are exactly this many days apart.
pub const DEFAULT_MARKER_GAP: i64 = 1;

/// Settings for a comparison run.
///
/// Read from the environment (and a `.env` file, if present) with [`Config::from_env`]:
///     - `PAIRS_DATA_DIR`: directory of `<TICKER>.csv` filing records;
///     - `PAIRS_YEAR_RANGE`: `intersection` or `shorter`, see [`YearRange`];
///     - `PAIRS_MARKER_GAP`: the filing gap, in days, that makes a marker.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub year_range: YearRange,
    pub marker_gap: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            year_range: YearRange::default(),
            marker_gap: DEFAULT_MARKER_GAP,
        }
    }
}

impl Config {
    /// Build a `Config` from environment variables, falling back to the defaults for any
    /// variable that is not set.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::default();

        if let Ok(dir) = var("PAIRS_DATA_DIR") {
            trace!("PAIRS_DATA_DIR={dir}");
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(range) = var("PAIRS_YEAR_RANGE") {
            trace!("PAIRS_YEAR_RANGE={range}");
            config.year_range = range.parse().map_err(|_| Error::InvalidConfig {
                var: "PAIRS_YEAR_RANGE",
                value: range.clone(),
            })?;
        }

        if let Ok(gap) = var("PAIRS_MARKER_GAP") {
            trace!("PAIRS_MARKER_GAP={gap}");
            config.marker_gap = gap
                .parse::<u32>()
                .map(i64::from)
                .map_err(|_| Error::InvalidConfig {
                    var: "PAIRS_MARKER_GAP",
                    value: gap.clone(),
                })?;
        }

        debug!("config loaded: {config:?}");
        Ok(config)
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.data_dir, PathBuf::from("./filing_records"));
        assert_eq!(config.year_range, YearRange::Intersection);
        assert_eq!(config.marker_gap, 1);
    }

    // a single test touches the process environment, so nothing else races it
    #[test]
    fn env_overrides() {
        std::env::set_var("PAIRS_DATA_DIR", "/tmp/filings");
        std::env::set_var("PAIRS_YEAR_RANGE", "shorter");
        std::env::set_var("PAIRS_MARKER_GAP", "2");
        let config = Config::from_env().unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/filings"));
        assert_eq!(config.year_range, YearRange::Shorter);
        assert_eq!(config.marker_gap, 2);

        std::env::set_var("PAIRS_MARKER_GAP", "-1");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig {
                var: "PAIRS_MARKER_GAP",
                ..
            }
        ));

        std::env::set_var("PAIRS_MARKER_GAP", "1");
        std::env::set_var("PAIRS_YEAR_RANGE", "overlap");
        assert!(Config::from_env().is_err());

        std::env::remove_var("PAIRS_DATA_DIR");
        std::env::remove_var("PAIRS_YEAR_RANGE");
        std::env::remove_var("PAIRS_MARKER_GAP");
    }
}
