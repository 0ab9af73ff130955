use crate::error::Error;
use chrono::{Datelike, NaiveDate};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// The SEC form a filing was made under; amendments (`10-Q/A`, etc.) are never collected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum FilingType {
    #[serde(rename = "10-Q")]
    Quarterly,
    #[serde(rename = "10-K")]
    Annual,
}

/// One filing, with the price reaction around it.
///
/// Field names follow the scraper's cache headers:
///
/// `Filing Date,Filing Type,Price,Next Price,1d % Change,Next Week Price,1w % Change`
///
/// Prices & changes may be missing, e.g. when a filing is too recent to have a following
/// trading day; these are held as `None`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FilingRecord {
    #[serde(rename = "Filing Date", deserialize_with = "de_date")]
    pub filing_date: NaiveDate,

    #[serde(rename = "Filing Type", default)]
    pub filing_type: Option<FilingType>,

    #[serde(rename = "Price", default, deserialize_with = "de_number")]
    pub price: Option<f64>,

    #[serde(rename = "Next Price", default, deserialize_with = "de_number")]
    pub next_price: Option<f64>,

    #[serde(rename = "1d % Change", default, deserialize_with = "de_number")]
    pub one_day_change: Option<f64>,

    #[serde(rename = "Next Week Price", default, deserialize_with = "de_number")]
    pub next_week_price: Option<f64>,

    #[serde(rename = "1w % Change", default, deserialize_with = "de_number")]
    pub one_week_change: Option<f64>,
}

impl FilingRecord {
    /// A record carrying only what the comparison reads: the date & the one day change.
    pub fn new(filing_date: NaiveDate, one_day_change: Option<f64>) -> Self {
        Self {
            filing_date,
            filing_type: None,
            price: None,
            next_price: None,
            one_day_change,
            next_week_price: None,
            one_week_change: None,
        }
    }

    pub fn year(&self) -> i32 {
        self.filing_date.year()
    }
}

/// A ticker's filings, keyed by year.
///
/// Years iterate in ascending order; the filings within each year are held in
/// reverse-chronological order (Q4 -> Q1), whatever order they were supplied in.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(from = "BTreeMap<i32, Vec<FilingRecord>>")]
pub struct FilingHistory(BTreeMap<i32, Vec<FilingRecord>>);

impl From<BTreeMap<i32, Vec<FilingRecord>>> for FilingHistory {
    fn from(mut map: BTreeMap<i32, Vec<FilingRecord>>) -> Self {
        for records in map.values_mut() {
            records.sort_by(|a, b| b.filing_date.cmp(&a.filing_date));
        }
        Self(map)
    }
}

impl FromIterator<FilingRecord> for FilingHistory {
    /// Group records by the year of their filing date.
    fn from_iter<I: IntoIterator<Item = FilingRecord>>(iter: I) -> Self {
        let mut map: BTreeMap<i32, Vec<FilingRecord>> = BTreeMap::new();
        for record in iter {
            map.entry(record.year()).or_default().push(record);
        }
        Self::from(map)
    }
}

impl FilingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The years with at least one filing, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.keys().copied()
    }

    /// Number of distinct years on record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_year(&self, year: i32) -> bool {
        self.0.contains_key(&year)
    }

    /// The filings of `year`, latest first.
    pub fn year(&self, year: i32) -> Option<&[FilingRecord]> {
        self.0.get(&year).map(Vec::as_slice)
    }

    /// Total filings across all years.
    pub fn num_filings(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

// de
// ----------------------------------------------------------------------------

/// Parse a `YYYY-MM-DD` filing date; anything else rejects the record.
pub(crate) fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_date(&value).map_err(de::Error::custom)
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}

struct NumberVisitor;

impl<'de> Visitor<'de> for NumberVisitor {
    type Value = Option<f64>;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a number, or a placeholder such as \"N/A\"")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(v.is_finite().then_some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v as f64))
    }

    // "N/A", "unavailable", "" and any other text are all unavailable values
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(v.trim().parse::<f64>().ok().filter(|v| v.is_finite()))
    }

    fn visit_bool<E: de::Error>(self, _v: bool) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }
}

/// Prices & percent changes arrive as numbers, numeric strings, or placeholders.
pub(crate) fn de_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NumberVisitor)
}

//////////////////////////////////////////////////////////////
// -- TESTS --
//////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn record_from_json() {
        let record: FilingRecord = serde_json::from_str(
            r#"{
                "Filing Date": "2021-04-28",
                "Filing Type": "10-Q",
                "Price": 54.12,
                "Next Price": 54.9,
                "1d % Change": 1.44,
                "Next Week Price": "N/A",
                "1w % Change": "N/A"
            }"#,
        )
        .unwrap();

        assert_eq!(record.filing_date, date("2021-04-28"));
        assert_eq!(record.filing_type, Some(FilingType::Quarterly));
        assert_eq!(record.price, Some(54.12));
        assert_eq!(record.one_day_change, Some(1.44));
        assert_eq!(record.next_week_price, None);
        assert_eq!(record.one_week_change, None);
        assert_eq!(record.year(), 2021);
    }

    #[test]
    fn changes_as_strings_and_placeholders() {
        let record: FilingRecord = serde_json::from_str(
            r#"{ "Filing Date": "2020-01-10", "1d % Change": "-0.75" }"#,
        )
        .unwrap();
        assert_eq!(record.one_day_change, Some(-0.75));
        assert_eq!(record.filing_type, None);

        for placeholder in [r#""unavailable""#, r#""N/A""#, r#""""#, "null"] {
            let json = format!(r#"{{ "Filing Date": "2020-01-10", "1d % Change": {placeholder} }}"#);
            let record: FilingRecord = serde_json::from_str(&json).unwrap();
            assert_eq!(record.one_day_change, None, "placeholder {placeholder}");
        }
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["2020-13-01", "01/10/2020", "2020-1-10x", ""] {
            let json = format!(r#"{{ "Filing Date": "{bad}", "1d % Change": 1.0 }}"#);
            assert!(
                serde_json::from_str::<FilingRecord>(&json).is_err(),
                "accepted {bad:?}"
            );
        }
        assert!(matches!(
            parse_date("10-01-2020"),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn unknown_filing_types_are_rejected() {
        let json = r#"{ "Filing Date": "2020-01-10", "Filing Type": "10-Q/A" }"#;
        assert!(serde_json::from_str::<FilingRecord>(json).is_err());
    }

    #[test]
    fn history_orders_years_and_filings() {
        let history: FilingHistory = serde_json::from_str(
            r#"{
                "2021": [
                    { "Filing Date": "2021-04-28", "1d % Change": 1.0 },
                    { "Filing Date": "2021-10-27", "1d % Change": 2.0 },
                    { "Filing Date": "2021-07-28", "1d % Change": 3.0 }
                ],
                "2019": [ { "Filing Date": "2019-10-30", "1d % Change": 4.0 } ]
            }"#,
        )
        .unwrap();

        assert_eq!(history.years().collect::<Vec<_>>(), vec![2019, 2021]);
        assert_eq!(history.len(), 2);
        assert_eq!(history.num_filings(), 4);
        let dates: Vec<_> = history
            .year(2021)
            .unwrap()
            .iter()
            .map(|r| r.filing_date)
            .collect();
        assert_eq!(
            dates,
            vec![date("2021-10-27"), date("2021-07-28"), date("2021-04-28")]
        );
        assert!(history.year(2020).is_none());
    }

    #[test]
    fn history_groups_by_year() {
        let history: FilingHistory = [
            FilingRecord::new(date("2018-05-01"), Some(1.0)),
            FilingRecord::new(date("2019-02-20"), None),
            FilingRecord::new(date("2018-11-01"), Some(-1.0)),
        ]
        .into_iter()
        .collect();

        assert!(history.contains_year(2018));
        assert!(history.contains_year(2019));
        assert_eq!(history.year(2018).unwrap()[0].filing_date, date("2018-11-01"));
        assert_eq!(history.year(2019).unwrap().len(), 1);
    }
}
