use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::feed::{FeedRow, LoadedFeed, MatchResult, SideStats};

/// One physical match after merging. `date_raw` is what the feed said; `date` is the
/// parsed calendar day, `None` when the feed value could not be read.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub competition: String,
    pub season: String,
    pub division: String,
    pub date_raw: String,
    pub date: Option<NaiveDate>,
    pub kickoff: String,
    pub home_team: String,
    pub away_team: String,
    pub full_time_result: Option<MatchResult>,
    pub half_time_result: Option<MatchResult>,
    pub home: SideStats,
    pub away: SideStats,
}

impl RawMatch {
    pub fn from_feed_row(row: FeedRow) -> Self {
        Self {
            date: parse_match_date(&row.date),
            competition: row.competition,
            season: row.season,
            division: row.division,
            date_raw: row.date,
            kickoff: row.time,
            home_team: row.home_team,
            away_team: row.away_team,
            full_time_result: row.full_time_result,
            half_time_result: row.half_time_result,
            home: row.home,
            away: row.away,
        }
    }

    /// Identity over raw feed values, so a date that fails to parse never collapses
    /// two distinct matches together.
    pub fn identity(&self) -> (&str, &str, &str, &str) {
        (
            &self.date_raw,
            &self.kickoff,
            &self.home_team,
            &self.away_team,
        )
    }
}

/// Concatenates feeds in the order given and dedups. Pass feeds in catalog order for
/// reproducible retention.
pub fn merge_feeds(feeds: &[LoadedFeed]) -> Vec<RawMatch> {
    let matches: Vec<RawMatch> = feeds
        .iter()
        .flat_map(|feed| feed.rows.iter().cloned())
        .map(RawMatch::from_feed_row)
        .collect();
    let before = matches.len();
    let merged = dedup_matches(matches);
    debug!(
        rows = before,
        kept = merged.len(),
        dropped = before - merged.len(),
        "matches merged"
    );
    merged
}

/// First occurrence of each identity wins; relative order is preserved.
pub fn dedup_matches(matches: Vec<RawMatch>) -> Vec<RawMatch> {
    let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
    let mut out = Vec::with_capacity(matches.len());
    for m in matches {
        let (date, time, home, away) = m.identity();
        let key = (
            date.to_string(),
            time.to_string(),
            home.to_string(),
            away.to_string(),
        );
        if seen.insert(key) {
            out.push(m);
        }
    }
    out
}

/// Day-first: `dd/mm/yy`, `dd/mm/yyyy`, with ISO `yyyy-mm-dd` as a fallback.
/// Two-digit years land in 1970..=2069.
pub fn parse_match_date(raw: &str) -> Option<NaiveDate> {
    // `%y` takes exactly two digits, so it must run before `%Y`.
    const FORMATS: [&str; 3] = ["%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d"];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_match_date_is_day_first() {
        assert_eq!(
            parse_match_date("01/08/2024"),
            NaiveDate::from_ymd_opt(2024, 8, 1)
        );
        assert_eq!(
            parse_match_date("13/01/24"),
            NaiveDate::from_ymd_opt(2024, 1, 13)
        );
        assert_eq!(
            parse_match_date("2024-01-08"),
            NaiveDate::from_ymd_opt(2024, 1, 8)
        );
        assert_eq!(
            parse_match_date("05/05/99"),
            NaiveDate::from_ymd_opt(1999, 5, 5)
        );
        assert_eq!(
            parse_match_date(" 9/3/2025 "),
            NaiveDate::from_ymd_opt(2025, 3, 9)
        );
        assert_eq!(parse_match_date("31/02/2024"), None);
        assert_eq!(parse_match_date("tbd"), None);
        assert_eq!(parse_match_date(""), None);
        assert_eq!(parse_match_date("1/2/3/4"), None);
    }
}
