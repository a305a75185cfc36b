use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::clients::errors::Error;

/// Number of entries a Hot 100 chart page is expected to carry
pub const CHART_SIZE: usize = 100;

/// A calendar date identifying one weekly chart, written as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChartDate(NaiveDate);

impl ChartDate {
    /// Calendar year, used to label the playlist
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Build the date `{year}-{month_day}`, e.g. `2020` + `07-04`
    pub fn from_year(year: i32, month_day: &str) -> Result<Self, Error> {
        format!("{year:04}-{month_day}").parse()
    }
}

impl FromStr for ChartDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(ChartDate)
            .map_err(|_| Error::InvalidDate(s.to_string()))
    }
}

impl fmt::Display for ChartDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One row of a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartEntry {
    /// Position on the chart, starting at 1
    pub rank: usize,
    /// Song title, trimmed
    pub title: String,
    /// Artist credit as printed on the chart, trimmed
    pub artist: String,
}

impl ChartEntry {
    /// Free-text query used to look the entry up on a streaming service
    pub fn search_query(&self) -> String {
        format!("{} {}", self.title, self.artist)
    }
}

/// The ranked entries of one chart, in chart order
#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    /// Week the chart was requested for
    pub date: ChartDate,
    /// Entries ordered by rank
    pub entries: Vec<ChartEntry>,
}

impl ChartSnapshot {
    /// Snapshot of `entries` taken for `date`
    pub fn new(date: ChartDate, entries: Vec<ChartEntry>) -> Self {
        ChartSnapshot { date, entries }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the chart has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in rank order
    pub fn iter(&self) -> std::slice::Iter<'_, ChartEntry> {
        self.entries.iter()
    }
}

impl Serialize for ChartDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays_chart_dates() {
        let date: ChartDate = "2020-07-04".parse().unwrap();
        assert_eq!(date.year(), 2020);
        assert_eq!(date.to_string(), "2020-07-04");
    }

    #[test]
    fn rejects_malformed_dates() {
        for bad in ["2020-13-01", "2020-02-30", "2020/07/04", "July 4th", ""] {
            assert!(
                matches!(bad.parse::<ChartDate>(), Err(Error::InvalidDate(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn builds_date_from_year_and_month_day() {
        let date = ChartDate::from_year(1999, "07-04").unwrap();
        assert_eq!(date.to_string(), "1999-07-04");
        assert!(ChartDate::from_year(2021, "02-29").is_err());
    }

    #[test]
    fn search_query_joins_title_and_artist() {
        let entry = ChartEntry {
            rank: 1,
            title: "Rockstar".into(),
            artist: "DaBaby Featuring Roddy Ricch".into(),
        };
        assert_eq!(entry.search_query(), "Rockstar DaBaby Featuring Roddy Ricch");
    }

    #[test]
    fn snapshot_serializes_date_as_string() {
        let snapshot = ChartSnapshot::new(
            "2020-07-04".parse().unwrap(),
            vec![ChartEntry {
                rank: 1,
                title: "Rockstar".into(),
                artist: "DaBaby".into(),
            }],
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["date"], "2020-07-04");
        assert_eq!(json["entries"][0]["title"], "Rockstar");
    }
}
