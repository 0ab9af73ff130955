use crate::earnings_pairs::{Ticker, Universe};
use crate::filing::{FilingHistory, FilingRecord};
use std::path::Path;
use tracing::{debug, error, info, trace};

/// Reads a `.json` file from `path`.
///
/// A ticker universe is stored in the form:
/// ```json
/// {
///     "KO": [ { "2021": [ { "Filing Date": "2021-10-27", "1d % Change": 1.2 }, ... ], ... } ],
///     "PEP": [ ... ]
/// }
/// ```
pub fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let file = std::fs::read(path).map_err(|err| {
        error!("failed to read file at {}, error({err})", path.display());
        err
    })?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file).map_err(|err| {
        error!("failed to parse JSON at {}, error({err})", path.display());
        err
    })?;
    Ok(data)
}

/// Reads one ticker's cached filing records from a `.csv` file, with the header:
///
/// `Filing Date,Filing Type,Price,Next Price,1d % Change,Next Week Price,1w % Change`
///
/// A single malformed record (e.g. an unparseable date) rejects the whole file.
pub fn read_csv(path: impl AsRef<Path>) -> anyhow::Result<FilingHistory> {
    let path = path.as_ref();
    trace!("reading file path: {}", path.display());
    let mut reader = csv::Reader::from_path(path).map_err(|err| {
        error!("failed to open file at {}, error({err})", path.display());
        err
    })?;

    let records = reader
        .deserialize::<FilingRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| {
            error!("invalid filing record in {}, error({err})", path.display());
            err
        })?;
    debug!("{} filing records read from {}", records.len(), path.display());

    Ok(records.into_iter().collect())
}

/// Build a universe from `<dir>/<TICKER>.csv` for each of `tickers`, in the order given.
pub fn read_dir_universe(dir: impl AsRef<Path>, tickers: &[String]) -> anyhow::Result<Universe> {
    let dir = dir.as_ref();
    let time = std::time::Instant::now();

    let mut universe = Universe::new();
    for ticker in tickers {
        let symbol = normalize_ticker(ticker);
        if universe.get(&symbol).is_some() {
            debug!("[{symbol}] requested more than once, skipping");
            continue;
        }

        let path = dir.join(format!("{symbol}.csv"));
        let history = read_csv(&path)?;
        if history.is_empty() {
            anyhow::bail!("no filing records in {}", path.display());
        }
        universe.push(Ticker::new(symbol, history));
    }

    info!(
        "{} tickers read from {}. {}",
        universe.len(),
        dir.display(),
        crate::time_elapsed(time)
    );
    Ok(universe)
}

/// Tickers are upper case, and use dashes where some sources use dots; i.e. `brk.b` -> `BRK-B`.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase().replace('.', "-")
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
