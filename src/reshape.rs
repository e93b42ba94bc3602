use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::catalog::StatParam;
use crate::feed::{MatchResult, SideStats};
use crate::merge::RawMatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Venue {
    Home,
    Away,
}

impl Venue {
    pub fn code(self) -> &'static str {
        match self {
            Venue::Home => "H",
            Venue::Away => "A",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Win => "W",
            Outcome::Draw => "D",
            Outcome::Loss => "L",
        }
    }

    fn for_venue(result: MatchResult, venue: Venue) -> Self {
        match (result, venue) {
            (MatchResult::Draw, _) => Outcome::Draw,
            (MatchResult::HomeWin, Venue::Home) | (MatchResult::AwayWin, Venue::Away) => {
                Outcome::Win
            }
            _ => Outcome::Loss,
        }
    }
}

/// A match seen from one participant. `active` holds this team's numbers, `passive`
/// the opponent's numbers from the same match.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamMatchEvent {
    pub competition: String,
    pub season: String,
    pub division: String,
    pub date: Option<NaiveDate>,
    pub kickoff: String,
    pub team: String,
    pub opponent: String,
    pub venue: Venue,
    pub full_time: Option<Outcome>,
    pub half_time: Option<Outcome>,
    pub active: SideStats,
    pub passive: SideStats,
}

impl TeamMatchEvent {
    pub fn pair(&self, param: StatParam) -> (Option<f64>, Option<f64>) {
        (self.active.get(param), self.passive.get(param))
    }
}

/// Two events per match, home rows first then away rows, then sorted for display.
pub fn reshape(matches: &[RawMatch]) -> Vec<TeamMatchEvent> {
    let mut events = Vec::with_capacity(matches.len() * 2);
    events.extend(matches.iter().map(|m| team_event(m, Venue::Home)));
    events.extend(matches.iter().map(|m| team_event(m, Venue::Away)));
    events.sort_by(display_order);
    events
}

fn team_event(m: &RawMatch, venue: Venue) -> TeamMatchEvent {
    let (team, opponent, active, passive) = match venue {
        Venue::Home => (&m.home_team, &m.away_team, m.home, m.away),
        Venue::Away => (&m.away_team, &m.home_team, m.away, m.home),
    };
    TeamMatchEvent {
        competition: m.competition.clone(),
        season: m.season.clone(),
        division: m.division.clone(),
        date: m.date,
        kickoff: m.kickoff.clone(),
        team: team.clone(),
        opponent: opponent.clone(),
        venue,
        full_time: m.full_time_result.map(|r| Outcome::for_venue(r, venue)),
        half_time: m.half_time_result.map(|r| Outcome::for_venue(r, venue)),
        active,
        passive,
    }
}

/// Newest first, undated rows last; then later kickoff first; then team name.
fn display_order(a: &TeamMatchEvent, b: &TeamMatchEvent) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date
        .then_with(|| b.kickoff.cmp(&a.kickoff))
        .then_with(|| a.team.cmp(&b.team))
}
