use serde::Serialize;

use crate::catalog::StatParam;
use crate::composite::{CompositeScore, composite_score};
use crate::error::QueryError;
use crate::query::{MatchLine, team_matches, teams_in_scope};
use crate::snapshot::Snapshot;
use crate::trailing::{TrailingAverage, trailing_average};

#[derive(Debug, Clone)]
pub struct HeadToHeadRequest {
    pub competition: String,
    pub season: String,
    pub team1: String,
    pub team2: String,
    pub stat_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub team: String,
    pub matches: Vec<MatchLine>,
    pub average: TrailingAverage,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHead {
    pub competition: String,
    pub season: String,
    pub parameter: StatParam,
    pub parameter_label: &'static str,
    pub team1: TeamReport,
    pub team2: TeamReport,
    pub composite: CompositeScore,
}

impl Snapshot {
    pub fn head_to_head(&self, req: &HeadToHeadRequest) -> Result<HeadToHead, QueryError> {
        let param = StatParam::from_code(&req.stat_code)?;
        let competition = self.catalog.competition_by_label(&req.competition)?.label.clone();
        let season = self.catalog.season_by_label(&req.season)?.label.clone();

        let team1 = self.team_report(&competition, &season, req.team1.trim(), param);
        let team2 = self.team_report(&competition, &season, req.team2.trim(), param);
        let composite = composite_score(&team1.average, &team2.average);

        Ok(HeadToHead {
            competition,
            season,
            parameter: param,
            parameter_label: param.label(),
            team1,
            team2,
            composite,
        })
    }

    /// Distinct team names in scope, sorted, for a team picker.
    pub fn teams(&self, competition: &str, season: &str) -> Result<Vec<String>, QueryError> {
        let competition = self.catalog.competition_by_label(competition)?;
        let season = self.catalog.season_by_label(season)?;
        Ok(teams_in_scope(&self.events, &competition.label, &season.label))
    }

    fn team_report(
        &self,
        competition: &str,
        season: &str,
        team: &str,
        param: StatParam,
    ) -> TeamReport {
        let matches = team_matches(&self.events, competition, season, team, param);
        let average = trailing_average(&matches);
        TeamReport {
            team: team.to_string(),
            matches,
            average,
        }
    }
}
