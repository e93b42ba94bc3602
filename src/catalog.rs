use serde::Serialize;

use crate::error::QueryError;

pub const DEFAULT_URL_TEMPLATE: &str =
    "https://www.football-data.co.uk/mmz4281/{season}/{competition}.csv";

const DEFAULT_SEASONS: &[(&str, &str)] = &[
    ("2223", "2022/2023"),
    ("2324", "2023/2024"),
    ("2425", "2024/2025"),
    ("2526", "2025/2026"),
    ("2627", "2026/2027"),
    ("2728", "2027/2028"),
    ("2829", "2028/2029"),
];

const DEFAULT_COMPETITIONS: &[(&str, &str)] = &[
    ("I1", "Serie A"),
    ("I2", "Serie B"),
    ("E0", "Premier League"),
    ("E1", "Championship"),
    ("E2", "League One"),
    ("E3", "League Two"),
];

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Season {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Competition {
    pub code: String,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub seasons: Vec<Season>,
    pub competitions: Vec<Competition>,
    pub url_template: String,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            seasons: DEFAULT_SEASONS
                .iter()
                .map(|(code, label)| Season {
                    code: (*code).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
            competitions: DEFAULT_COMPETITIONS
                .iter()
                .map(|(code, label)| Competition {
                    code: (*code).to_string(),
                    label: (*label).to_string(),
                })
                .collect(),
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

impl Catalog {
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Keeps only the listed codes. An empty list leaves that axis untouched.
    pub fn restricted(mut self, season_codes: &[String], competition_codes: &[String]) -> Self {
        if !season_codes.is_empty() {
            self.seasons
                .retain(|s| season_codes.iter().any(|c| c.eq_ignore_ascii_case(&s.code)));
        }
        if !competition_codes.is_empty() {
            self.competitions
                .retain(|c| competition_codes.iter().any(|x| x.eq_ignore_ascii_case(&c.code)));
        }
        self
    }

    pub fn feed_url(&self, season: &Season, competition: &Competition) -> String {
        self.url_template
            .replace("{season}", &season.code)
            .replace("{competition}", &competition.code)
    }

    /// Season-major, competition-minor. Merge order (and so dedup retention) follows this.
    pub fn feeds(&self) -> Vec<(&Season, &Competition)> {
        self.seasons
            .iter()
            .flat_map(|s| self.competitions.iter().map(move |c| (s, c)))
            .collect()
    }

    pub fn season_by_label(&self, label: &str) -> Result<&Season, QueryError> {
        let wanted = label.trim();
        self.seasons
            .iter()
            .find(|s| s.label == wanted || s.code == wanted)
            .ok_or_else(|| QueryError::UnknownSeason(label.to_string()))
    }

    pub fn competition_by_label(&self, label: &str) -> Result<&Competition, QueryError> {
        let wanted = label.trim();
        self.competitions
            .iter()
            .find(|c| c.label.eq_ignore_ascii_case(wanted) || c.code.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QueryError::UnknownCompetition(label.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatParam {
    Shots,
    ShotsOnTarget,
    Corners,
    Fouls,
    YellowCards,
    RedCards,
    FullTimeGoals,
    HalfTimeGoals,
}

impl StatParam {
    pub const ALL: [StatParam; 8] = [
        StatParam::Shots,
        StatParam::ShotsOnTarget,
        StatParam::Corners,
        StatParam::Fouls,
        StatParam::YellowCards,
        StatParam::RedCards,
        StatParam::FullTimeGoals,
        StatParam::HalfTimeGoals,
    ];

    pub fn from_code(code: &str) -> Result<Self, QueryError> {
        let wanted = code.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| QueryError::UnknownParameter(code.to_string()))
    }

    pub fn code(self) -> &'static str {
        match self {
            StatParam::Shots => "S",
            StatParam::ShotsOnTarget => "ST",
            StatParam::Corners => "C",
            StatParam::Fouls => "F",
            StatParam::YellowCards => "Y",
            StatParam::RedCards => "R",
            StatParam::FullTimeGoals => "FTG",
            StatParam::HalfTimeGoals => "HTG",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatParam::Shots => "Shots",
            StatParam::ShotsOnTarget => "Shots on Target",
            StatParam::Corners => "Corners",
            StatParam::Fouls => "Fouls",
            StatParam::YellowCards => "Yellow Cards",
            StatParam::RedCards => "Red Cards",
            StatParam::FullTimeGoals => "Full Time Goals",
            StatParam::HalfTimeGoals => "Half Time Goals",
        }
    }

    /// Home/away column names in the feed.
    pub fn feed_columns(self) -> (&'static str, &'static str) {
        match self {
            StatParam::Shots => ("HS", "AS"),
            StatParam::ShotsOnTarget => ("HST", "AST"),
            StatParam::Corners => ("HC", "AC"),
            StatParam::Fouls => ("HF", "AF"),
            StatParam::YellowCards => ("HY", "AY"),
            StatParam::RedCards => ("HR", "AR"),
            StatParam::FullTimeGoals => ("FTHG", "FTAG"),
            StatParam::HalfTimeGoals => ("HTHG", "HTAG"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_catalog_has_42_feeds_in_season_major_order() {
        let catalog = Catalog::default();
        let feeds = catalog.feeds();
        assert_eq!(feeds.len(), 42);
        assert_eq!(feeds[0].0.code, "2223");
        assert_eq!(feeds[0].1.code, "I1");
        assert_eq!(feeds[1].0.code, "2223");
        assert_eq!(feeds[1].1.code, "I2");
        assert_eq!(feeds[6].0.code, "2324");
    }

    #[test]
    fn feed_url_substitutes_both_tokens() {
        let catalog = Catalog::default();
        let season = catalog.season_by_label("2024/2025").unwrap();
        let comp = catalog.competition_by_label("Premier League").unwrap();
        assert_eq!(
            catalog.feed_url(season, comp),
            "https://www.football-data.co.uk/mmz4281/2425/E0.csv"
        );
    }

    #[test]
    fn restricted_keeps_listed_codes_only() {
        let catalog =
            Catalog::default().restricted(&["2425".to_string()], &["e0".to_string(), "I1".to_string()]);
        assert_eq!(catalog.seasons.len(), 1);
        assert_eq!(catalog.competitions.len(), 2);
        assert_eq!(catalog.feeds().len(), 2);
    }

    #[test]
    fn unknown_labels_are_validation_errors() {
        let catalog = Catalog::default();
        assert!(matches!(
            catalog.season_by_label("1999/2000"),
            Err(QueryError::UnknownSeason(s)) if s == "1999/2000"
        ));
        assert!(matches!(
            catalog.competition_by_label("Ligue 1"),
            Err(QueryError::UnknownCompetition(_))
        ));
    }

    #[test]
    fn stat_param_codes_resolve() {
        assert_eq!(StatParam::from_code("C").unwrap(), StatParam::Corners);
        assert_eq!(StatParam::from_code("st").unwrap(), StatParam::ShotsOnTarget);
        assert_eq!(StatParam::from_code("FTG").unwrap().feed_columns(), ("FTHG", "FTAG"));
        let err = StatParam::from_code("XG").unwrap_err();
        assert!(err.to_string().contains("XG"));
    }
}
