use crate::config::Config;
use crate::error::{Error, Result};
use crate::filing::{FilingHistory, FilingRecord};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, trace};

/// How the years compared between two tickers are chosen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum YearRange {
    /// Years on record for both tickers.
    #[default]
    Intersection,

    /// All years of whichever ticker has fewer years on record (the first ticker on a tie),
    /// whether or not the other ticker has filings in them.
    Shorter,
}

impl FromStr for YearRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "intersection" => Ok(Self::Intersection),
            "shorter" => Ok(Self::Shorter),
            other => Err(format!("unknown year range \"{other}\"")),
        }
    }
}

/// The direction two tickers moved in, the day after a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    /// Same direction; a change of exactly 0 counts as an increase.
    Positive,
    /// Opposite directions.
    Negative,
    /// At least one of the changes is unavailable.
    Invalid,
}

impl Movement {
    pub fn classify(change1: Option<f64>, change2: Option<f64>) -> Self {
        match (change1, change2) {
            (Some(a), Some(b)) if (a >= 0.0) == (b >= 0.0) => Self::Positive,
            (Some(_), Some(_)) => Self::Negative,
            _ => Self::Invalid,
        }
    }
}

/// Two filings, one per ticker, made within the marker gap of each other.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker<'a> {
    pub date1: NaiveDate,
    pub date2: NaiveDate,
    pub data1: &'a FilingRecord,
    pub data2: &'a FilingRecord,
}

impl Marker<'_> {
    pub fn movement(&self) -> Movement {
        Movement::classify(self.data1.one_day_change, self.data2.one_day_change)
    }
}

/// Pair-level co-movement across all markers.
///
/// `total_markers` excludes invalid markers, and so do both percentages.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Relationship {
    pub total_pos: usize,
    pub total_neg: usize,
    pub invalid: usize,
    pub total_markers: usize,
    pub perc_pos: f64,
    pub perc_neg: f64,
}

/// An ordered comparison of two tickers, e.g. `KO - PEP`.
///
/// Both filing histories are borrowed from the caller. Markers & the relationship are only
/// populated by [`Pair::generate_markers`] and [`Pair::calculate_relationship`].
#[derive(Clone, Debug)]
pub struct Pair<'a> {
    t1: &'a str,
    t2: &'a str,
    d1: &'a FilingHistory,
    d2: &'a FilingHistory,
    years_to_compare: Vec<i32>,
    marker_gap: i64,
    markers: Vec<Marker<'a>>,
    relationship: Relationship,
}

impl<'a> Pair<'a> {
    /// Build a pair with the default [`Config`].
    pub fn new(
        t1: &'a str,
        t2: &'a str,
        d1: &'a FilingHistory,
        d2: &'a FilingHistory,
    ) -> Result<Self> {
        Self::with_config(t1, t2, d1, d2, &Config::default())
    }

    /// Build a pair, choosing the years to compare by `config.year_range`.
    ///
    /// Fails if either ticker has no filings at all.
    pub fn with_config(
        t1: &'a str,
        t2: &'a str,
        d1: &'a FilingHistory,
        d2: &'a FilingHistory,
        config: &Config,
    ) -> Result<Self> {
        for (ticker, history) in [(t1, d1), (t2, d2)] {
            if history.is_empty() {
                return Err(Error::EmptyHistory {
                    ticker: ticker.to_string(),
                });
            }
        }

        let mut years_to_compare: Vec<i32> = match config.year_range {
            YearRange::Intersection => d1.years().filter(|y| d2.contains_year(*y)).collect(),
            YearRange::Shorter if d1.len() > d2.len() => d2.years().collect(),
            YearRange::Shorter => d1.years().collect(),
        };
        years_to_compare.sort_unstable();
        trace!("[{t1} - {t2}] years to compare: {years_to_compare:?}");

        Ok(Self {
            t1,
            t2,
            d1,
            d2,
            years_to_compare,
            marker_gap: config.marker_gap,
            markers: Vec::new(),
            relationship: Relationship::default(),
        })
    }

    /// The pair's title, e.g. `"KO - PEP"`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.t1, self.t2)
    }

    pub fn tickers(&self) -> (&'a str, &'a str) {
        (self.t1, self.t2)
    }

    pub fn years_to_compare(&self) -> &[i32] {
        &self.years_to_compare
    }

    /// First & last year compared, if any.
    pub fn years_searched(&self) -> Option<(i32, i32)> {
        Some((
            *self.years_to_compare.first()?,
            *self.years_to_compare.last()?,
        ))
    }

    /// Number of years between the first & last year compared.
    pub fn years_spanned(&self) -> i32 {
        self.years_searched()
            .map(|(first, last)| last - first)
            .unwrap_or(0)
    }

    /// Align both tickers' filings, year by year, by their position within the year; each
    /// aligned couple filed exactly `marker_gap` days apart becomes a marker.
    ///
    /// Any previously generated markers are replaced.
    pub fn generate_markers(&mut self) -> &[Marker<'a>] {
        let (d1, d2) = (self.d1, self.d2);
        self.markers.clear();

        for &year in &self.years_to_compare {
            let (Some(filings1), Some(filings2)) = (d1.year(year), d2.year(year)) else {
                trace!(
                    "[{} - {}] no filings in {year} for one side, skipping",
                    self.t1,
                    self.t2
                );
                continue;
            };

            for (i, f1) in filings1.iter().enumerate() {
                let Some(f2) = filings2.get(i) else {
                    trace!(
                        "[{} - {}] no filing at position {i} in {year} for {}, skipping",
                        self.t1,
                        self.t2,
                        self.t2
                    );
                    continue;
                };

                let difference = (f1.filing_date - f2.filing_date).num_days().abs();
                if difference == self.marker_gap {
                    trace!(
                        "[{} - {}] marker found: {} / {}",
                        self.t1,
                        self.t2,
                        f1.filing_date,
                        f2.filing_date
                    );
                    self.markers.push(Marker {
                        date1: f1.filing_date,
                        date2: f2.filing_date,
                        data1: f1,
                        data2: f2,
                    });
                }
            }
        }

        &self.markers
    }

    pub fn markers(&self) -> &[Marker<'a>] {
        &self.markers
    }

    /// Classify every marker and store the pair-level [`Relationship`].
    pub fn calculate_relationship(&mut self) -> &Relationship {
        let mut rel = Relationship::default();

        for marker in &self.markers {
            match marker.movement() {
                Movement::Positive => rel.total_pos += 1,
                Movement::Negative => rel.total_neg += 1,
                Movement::Invalid => {
                    debug!(
                        "[{} - {}] marker {} has no price change data, excluded",
                        self.t1, self.t2, marker.date1
                    );
                    rel.invalid += 1;
                }
            }
        }

        rel.total_markers = self.markers.len() - rel.invalid;
        rel.perc_pos = percentage(rel.total_pos, rel.total_markers);
        rel.perc_neg = percentage(rel.total_neg, rel.total_markers);

        debug!("[{} - {}] {rel:?}", self.t1, self.t2);
        self.relationship = rel;
        &self.relationship
    }

    pub fn relationship(&self) -> &Relationship {
        &self.relationship
    }
}

/// `count / total` as a percentage, to 2 decimal places; 0.0 when there is nothing to count.
fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let perc = count as f64 / total as f64 * 100.0;
    (perc * 100.0).round() / 100.0
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////
