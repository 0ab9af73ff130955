use crate::config::Config;
use crate::error::{Error, Result};
use crate::filing::FilingHistory;
use crate::pair::Pair;
use serde::de::{self, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, error, info, trace};

// universe
// ----------------------------------------------------------------------------

/// A ticker, with the filing data collected for it.
///
/// Only the first source is compared; the scraper has only ever produced one.
#[derive(Clone, Debug, PartialEq)]
pub struct Ticker {
    pub symbol: String,
    pub sources: Vec<FilingHistory>,
}

impl Ticker {
    pub fn new(symbol: impl Into<String>, history: FilingHistory) -> Self {
        Self {
            symbol: symbol.into(),
            sources: vec![history],
        }
    }

    /// The filing history that gets compared.
    pub fn history(&self) -> Option<&FilingHistory> {
        self.sources.first()
    }
}

/// Every ticker to be compared, in the order they were supplied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Universe(Vec<Ticker>);

impl Universe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ticker: Ticker) {
        self.0.push(ticker);
    }

    pub fn get(&self, symbol: &str) -> Option<&Ticker> {
        self.0.iter().find(|ticker| ticker.symbol == symbol)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticker> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Ticker> for Universe {
    fn from_iter<I: IntoIterator<Item = Ticker>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

struct UniverseVisitor;

impl<'de> Visitor<'de> for UniverseVisitor {
    type Value = Universe;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("Map of tickers to their filing data")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: de::MapAccess<'de>,
    {
        // each entry is in the form of:
        // `"KO": [ { "2021": [ { "Filing Date": "2021-10-27", ... }, ... ], ... } ],
        //  "PEP": [ ... ],
        //  ...`
        let mut tickers: Vec<Ticker> = Vec::new();
        while let Some((symbol, sources)) = map.next_entry::<String, Vec<FilingHistory>>()? {
            if tickers.iter().any(|ticker| ticker.symbol == symbol) {
                return Err(de::Error::custom(Error::DuplicateTicker { ticker: symbol }));
            }
            tickers.push(Ticker { symbol, sources });
        }
        Ok(Universe(tickers))
    }
}

impl<'de> Deserialize<'de> for Universe {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // ticker order decides pair order, so the map is read into a vector rather than a
        // HashMap
        deserializer.deserialize_map(UniverseVisitor)
    }
}

// pairs
// ----------------------------------------------------------------------------

/// All-pairs comparison of a ticker universe.
///
/// ```rust
/// use pairs_core::{EarningsPairs, FilingHistory, Ticker, Universe};
///
/// let ko: FilingHistory = serde_json::from_str(
///     r#"{ "2020": [ { "Filing Date": "2020-01-10", "1d % Change": 1.0 } ] }"#,
/// ).unwrap();
/// let pep: FilingHistory = serde_json::from_str(
///     r#"{ "2020": [ { "Filing Date": "2020-01-11", "1d % Change": 0.5 } ] }"#,
/// ).unwrap();
/// let universe: Universe = vec![Ticker::new("KO", ko), Ticker::new("PEP", pep)]
///     .into_iter()
///     .collect();
///
/// let mut earnings_pairs = EarningsPairs::new(&universe).unwrap();
/// earnings_pairs.generate_pairs().unwrap();
/// let report = earnings_pairs.compare_pairs();
///
/// assert_eq!(report.len(), 1);
/// assert_eq!(report[0].pair, "KO - PEP");
/// assert_eq!(report[0].perc_pos, 100.0);
/// ```
#[derive(Debug)]
pub struct EarningsPairs<'a> {
    universe: &'a Universe,
    config: Config,
    pairs: Vec<Pair<'a>>,
}

impl<'a> EarningsPairs<'a> {
    pub fn new(universe: &'a Universe) -> Result<Self> {
        Self::with_config(universe, Config::default())
    }

    /// Validate the universe; every ticker must be unique, and have a non-empty filing history.
    pub fn with_config(universe: &'a Universe, config: Config) -> Result<Self> {
        let mut symbols = HashSet::new();
        for ticker in universe.iter() {
            let symbol = &ticker.symbol;
            if !symbols.insert(symbol.as_str()) {
                error!("[{symbol}] appears more than once in the ticker universe");
                return Err(Error::DuplicateTicker {
                    ticker: symbol.clone(),
                });
            }

            match ticker.history() {
                None => {
                    error!("no filing data source provided for [{symbol}]");
                    return Err(Error::NoSource {
                        ticker: symbol.clone(),
                    });
                }
                Some(history) if history.is_empty() => {
                    error!("no filing records found for [{symbol}]");
                    return Err(Error::EmptyHistory {
                        ticker: symbol.clone(),
                    });
                }
                Some(history) => trace!(
                    "[{symbol}] {} filings over {} years",
                    history.num_filings(),
                    history.len()
                ),
            }
        }

        Ok(Self {
            universe,
            config,
            pairs: Vec::new(),
        })
    }

    /// Build a [`Pair`] for every ordered combination of two different tickers; both
    /// `A - B` and `B - A` are built.
    pub fn generate_pairs(&mut self) -> Result<&[Pair<'a>]> {
        let universe = self.universe;
        self.pairs.clear();

        for (i, ticker1) in universe.iter().enumerate() {
            for (j, ticker2) in universe.iter().enumerate() {
                if i == j {
                    continue;
                }

                let d1 = ticker1.history().ok_or_else(|| Error::NoSource {
                    ticker: ticker1.symbol.clone(),
                })?;
                let d2 = ticker2.history().ok_or_else(|| Error::NoSource {
                    ticker: ticker2.symbol.clone(),
                })?;

                self.pairs.push(Pair::with_config(
                    &ticker1.symbol,
                    &ticker2.symbol,
                    d1,
                    d2,
                    &self.config,
                )?);
            }
        }

        info!(
            "{} pairs generated from {} tickers",
            self.pairs.len(),
            universe.len()
        );
        Ok(&self.pairs)
    }

    /// Sort by percentage of positive markers, highest first; ties keep their order.
    pub fn organize_pairs(&mut self) {
        self.pairs.sort_by(|a, b| {
            b.relationship()
                .perc_pos
                .total_cmp(&a.relationship().perc_pos)
        });
    }

    /// Keep only the first of `A - B` & `B - A` found.
    pub fn delete_duplicates(&mut self) {
        let mut seen: HashSet<(&'a str, &'a str)> = HashSet::new();
        let pairs = std::mem::take(&mut self.pairs);

        self.pairs = pairs
            .into_iter()
            .filter(|pair| {
                let (t1, t2) = pair.tickers();
                let key = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
                let first = seen.insert(key);
                if !first {
                    trace!("[{}] is a duplicate, deleting", pair.label());
                }
                first
            })
            .collect();
    }

    /// Run every pair's markers & relationship, then rank & deduplicate them.
    pub fn compare_pairs(&mut self) -> Report {
        let time = std::time::Instant::now();

        info!("comparing {} pairs ...", self.pairs.len());
        for pair in self.pairs.iter_mut() {
            pair.generate_markers();
            pair.calculate_relationship();
        }

        self.organize_pairs();
        self.delete_duplicates();

        debug!(
            "{} pairs compared. {}",
            self.pairs.len(),
            crate::time_elapsed(time)
        );

        self.report()
    }

    /// Summaries of the pairs, in their current order.
    pub fn report(&self) -> Report {
        Report(self.pairs.iter().map(PairSummary::from).collect())
    }

    pub fn pairs(&self) -> &[Pair<'a>] {
        &self.pairs
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

// output
// ----------------------------------------------------------------------------

/// The reported outcome of one pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PairSummary {
    pub pair: String,
    pub total_pos: usize,
    pub total_neg: usize,
    pub perc_pos: f64,
    pub perc_neg: f64,
    pub total_markers: usize,
    pub years_searched: Option<(i32, i32)>,
    pub years_spanned: i32,
}

impl From<&Pair<'_>> for PairSummary {
    fn from(pair: &Pair<'_>) -> Self {
        let rel = pair.relationship();
        Self {
            pair: pair.label(),
            total_pos: rel.total_pos,
            total_neg: rel.total_neg,
            perc_pos: rel.perc_pos,
            perc_neg: rel.perc_neg,
            total_markers: rel.total_markers,
            years_searched: pair.years_searched(),
            years_spanned: pair.years_spanned(),
        }
    }
}

impl fmt::Display for PairSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = match self.years_searched {
            Some((first, last)) => format!("{first} - {last}"),
            None => "none".to_string(),
        };
        write!(
            f,
            "-----------------------------\n\
            [{}]\n\
            Total Positive: {}\n\
            Total Negative: {}\n\
            % Positive:  {:.2}%\n\
            Total Markers: {}\n\
            Years Searched: {years} ({} years)",
            self.pair,
            self.total_pos,
            self.total_neg,
            self.perc_pos,
            self.total_markers,
            self.years_spanned
        )
    }
}

/// Ranked pair summaries.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report(Vec<PairSummary>);

impl std::ops::Deref for Report {
    type Target = [PairSummary];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.0 {
            write!(f, "\n\n{summary}")?;
        }
        Ok(())
    }
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
