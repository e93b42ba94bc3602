use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::StatParam;
use crate::error::QueryError;
use crate::reshape::{Outcome, TeamMatchEvent, Venue};

/// One row of a team's match list, projected to a single statistic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchLine {
    pub date: Option<NaiveDate>,
    pub kickoff: String,
    pub opponent: String,
    pub venue: Venue,
    pub active: Option<f64>,
    pub passive: Option<f64>,
    pub result: Option<Outcome>,
}

/// Validates the statistic code, then delegates to [`team_matches`].
pub fn query_team(
    events: &[TeamMatchEvent],
    competition: &str,
    season: &str,
    team: &str,
    stat_code: &str,
) -> Result<Vec<MatchLine>, QueryError> {
    let param = StatParam::from_code(stat_code)?;
    Ok(team_matches(events, competition, season, team, param))
}

/// Newest first. No matches is an empty list, not an error.
pub fn team_matches(
    events: &[TeamMatchEvent],
    competition: &str,
    season: &str,
    team: &str,
    param: StatParam,
) -> Vec<MatchLine> {
    let mut lines: Vec<MatchLine> = events
        .iter()
        .filter(|e| e.competition == competition && e.season == season && e.team == team)
        .map(|e| {
            let (active, passive) = e.pair(param);
            MatchLine {
                date: e.date,
                kickoff: e.kickoff.clone(),
                opponent: e.opponent.clone(),
                venue: e.venue,
                active,
                passive,
                result: e.full_time,
            }
        })
        .collect();
    lines.sort_by(newest_first);
    lines
}

/// Oldest first, with undated rows after every dated row so a trailing window keeps them.
pub fn chronological(a: &MatchLine, b: &MatchLine) -> Ordering {
    undated_last(a.date, b.date, |x, y| x.cmp(&y)).then_with(|| a.kickoff.cmp(&b.kickoff))
}

fn newest_first(a: &MatchLine, b: &MatchLine) -> Ordering {
    undated_last(a.date, b.date, |x, y| y.cmp(&x)).then_with(|| b.kickoff.cmp(&a.kickoff))
}

fn undated_last(
    a: Option<NaiveDate>,
    b: Option<NaiveDate>,
    dated: impl Fn(NaiveDate, NaiveDate) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => dated(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn teams_in_scope(events: &[TeamMatchEvent], competition: &str, season: &str) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.competition == competition && e.season == season)
        .map(|e| e.team.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
