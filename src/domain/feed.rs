use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Story categories exposed by the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Top,
    New,
    Best,
    Show,
    Ask,
    Job,
}

impl FeedKind {
    pub const ALL: [FeedKind; 6] = [
        FeedKind::Top,
        FeedKind::New,
        FeedKind::Best,
        FeedKind::Show,
        FeedKind::Ask,
        FeedKind::Job,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedKind::Top => "top",
            FeedKind::New => "new",
            FeedKind::Best => "best",
            FeedKind::Show => "show",
            FeedKind::Ask => "ask",
            FeedKind::Job => "job",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedKind::Top => "Top",
            FeedKind::New => "New",
            FeedKind::Best => "Best",
            FeedKind::Show => "Show HN",
            FeedKind::Ask => "Ask HN",
            FeedKind::Job => "Jobs",
        }
    }

    /// Path of the id list endpoint, relative to the API base.
    pub fn ids_path(self) -> String {
        format!("/{}stories.json", self.as_str())
    }

    /// Only the front page is filtered by calendar date.
    pub fn uses_date_filter(self) -> bool {
        self == FeedKind::Top
    }

    pub fn supports_sort(self) -> bool {
        matches!(self, FeedKind::Show | FeedKind::Ask | FeedKind::Job)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(FeedKind::Top),
            "new" => Ok(FeedKind::New),
            "best" => Ok(FeedKind::Best),
            "show" => Ok(FeedKind::Show),
            "ask" => Ok(FeedKind::Ask),
            "job" | "jobs" => Ok(FeedKind::Job),
            other => Err(format!("Unknown feed kind: {}", other)),
        }
    }
}

/// Relative age window for the range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1d")]
    Day,
    #[serde(rename = "1m")]
    Month,
    #[serde(rename = "1y")]
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Day => "1d",
            TimeRange::Month => "1m",
            TimeRange::Year => "1y",
        }
    }

    pub fn max_age_millis(self) -> i64 {
        match self {
            TimeRange::Day => DAY_MS,
            TimeRange::Month => 30 * DAY_MS,
            TimeRange::Year => 365 * DAY_MS,
        }
    }

    /// Cycles all -> 1d -> 1m -> 1y -> all.
    pub fn cycle(range: Option<TimeRange>) -> Option<TimeRange> {
        match range {
            None => Some(TimeRange::Day),
            Some(TimeRange::Day) => Some(TimeRange::Month),
            Some(TimeRange::Month) => Some(TimeRange::Year),
            Some(TimeRange::Year) => None,
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1d" => Ok(TimeRange::Day),
            "1m" => Ok(TimeRange::Month),
            "1y" => Ok(TimeRange::Year),
            other => Err(format!("Unknown time range: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Source ranking order.
    #[default]
    Latest,
    /// Ascending by submission time.
    Oldest,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            SortOrder::Latest => SortOrder::Oldest,
            SortOrder::Oldest => SortOrder::Latest,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Latest => "Latest",
            SortOrder::Oldest => "Oldest",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(SortOrder::Latest),
            "oldest" => Ok(SortOrder::Oldest),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_path_per_kind() {
        assert_eq!(FeedKind::Top.ids_path(), "/topstories.json");
        assert_eq!(FeedKind::Job.ids_path(), "/jobstories.json");
        assert_eq!(FeedKind::Show.ids_path(), "/showstories.json");
    }

    #[test]
    fn test_only_top_uses_date_filter() {
        for kind in FeedKind::ALL {
            assert_eq!(kind.uses_date_filter(), kind == FeedKind::Top);
        }
    }

    #[test]
    fn test_kind_cycles_wrap() {
        assert_eq!(FeedKind::Job.next(), FeedKind::Top);
        assert_eq!(FeedKind::Top.prev(), FeedKind::Job);
        assert_eq!(FeedKind::New.next().prev(), FeedKind::New);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!("TOP".parse::<FeedKind>().unwrap(), FeedKind::Top);
        assert_eq!("jobs".parse::<FeedKind>().unwrap(), FeedKind::Job);
        assert!("polls".parse::<FeedKind>().is_err());
    }

    #[test]
    fn test_range_cycle_returns_to_all() {
        let mut range = None;
        for _ in 0..4 {
            range = TimeRange::cycle(range);
        }
        assert_eq!(range, None);
    }

    #[test]
    fn test_range_parse_and_age() {
        assert_eq!("1m".parse::<TimeRange>().unwrap(), TimeRange::Month);
        assert_eq!(TimeRange::Year.max_age_millis(), 365 * DAY_MS);
        assert!("2w".parse::<TimeRange>().is_err());
    }
}
