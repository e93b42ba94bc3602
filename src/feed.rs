use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Competition, Season, StatParam};
use crate::http_client::{fetch_bytes, http_client};

/// Where feed tables come from. Implementations are shared across fetch threads and
/// return the body undecoded.
pub trait FeedSource: Send + Sync {
    fn fetch(&self, season: &Season, competition: &Competition) -> Result<Vec<u8>>;
}

pub struct HttpFeedSource {
    catalog: Catalog,
}

impl HttpFeedSource {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self, season: &Season, competition: &Competition) -> Result<Vec<u8>> {
        let url = self.catalog.feed_url(season, competition);
        let client = http_client()?;
        fetch_bytes(client, &url).with_context(|| format!("GET {url}"))
    }
}

/// Reads files laid out by `feed_sync`.
pub struct DirFeedSource {
    dir: PathBuf,
}

impl DirFeedSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl FeedSource for DirFeedSource {
    fn fetch(&self, season: &Season, competition: &Competition) -> Result<Vec<u8>> {
        let path = self.dir.join(feed_file_name(season, competition));
        fs::read(&path).with_context(|| format!("read {}", path.display()))
    }
}

pub fn feed_file_name(season: &Season, competition: &Competition) -> String {
    format!("{}_{}.csv", season.code, competition.code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchResult {
    fn from_code(raw: &str) -> Option<Self> {
        match raw.trim() {
            "H" => Some(MatchResult::HomeWin),
            "D" => Some(MatchResult::Draw),
            "A" => Some(MatchResult::AwayWin),
            _ => None,
        }
    }

    pub fn from_goals(home: Option<f64>, away: Option<f64>) -> Option<Self> {
        let (home, away) = (home?, away?);
        Some(if home > away {
            MatchResult::HomeWin
        } else if home < away {
            MatchResult::AwayWin
        } else {
            MatchResult::Draw
        })
    }
}

/// One side's numbers for a single match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SideStats {
    pub shots: Option<f64>,
    pub shots_on_target: Option<f64>,
    pub corners: Option<f64>,
    pub fouls: Option<f64>,
    pub yellow_cards: Option<f64>,
    pub red_cards: Option<f64>,
    pub full_time_goals: Option<f64>,
    pub half_time_goals: Option<f64>,
}

impl SideStats {
    pub fn get(&self, param: StatParam) -> Option<f64> {
        match param {
            StatParam::Shots => self.shots,
            StatParam::ShotsOnTarget => self.shots_on_target,
            StatParam::Corners => self.corners,
            StatParam::Fouls => self.fouls,
            StatParam::YellowCards => self.yellow_cards,
            StatParam::RedCards => self.red_cards,
            StatParam::FullTimeGoals => self.full_time_goals,
            StatParam::HalfTimeGoals => self.half_time_goals,
        }
    }
}

/// A feed row stamped with its season and competition labels. Fields are raw strings
/// except the stats; date parsing happens at merge time.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedRow {
    pub season: String,
    pub competition: String,
    pub division: String,
    pub date: String,
    pub time: String,
    pub home_team: String,
    pub away_team: String,
    pub full_time_result: Option<MatchResult>,
    pub half_time_result: Option<MatchResult>,
    pub home: SideStats,
    pub away: SideStats,
}

#[derive(Debug, Clone)]
pub struct LoadedFeed {
    pub season: Season,
    pub competition: Competition,
    pub rows: Vec<FeedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedFailure {
    pub season: String,
    pub competition: String,
    pub cause: String,
}

impl std::fmt::Display for FeedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}: {}", self.season, self.competition, self.cause)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub feeds: Vec<LoadedFeed>,
    pub failures: Vec<FeedFailure>,
}

impl LoadReport {
    pub fn attempted(&self) -> usize {
        self.feeds.len() + self.failures.len()
    }

    pub fn row_count(&self) -> usize {
        self.feeds.iter().map(|f| f.rows.len()).sum()
    }
}

/// Fetches every catalog feed on a bounded pool. Individual failures are recorded,
/// never propagated; results keep catalog order.
pub fn load_feeds(catalog: &Catalog, source: &dyn FeedSource, parallelism: usize) -> LoadReport {
    let targets = catalog.feeds();
    let started = Instant::now();
    let outcomes: Vec<Result<LoadedFeed, FeedFailure>> = with_fetch_pool(parallelism, || {
        targets
            .par_iter()
            .map(|(season, competition)| load_one(source, season, competition))
            .collect()
    });

    let mut report = LoadReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(feed) => report.feeds.push(feed),
            Err(failure) => report.failures.push(failure),
        }
    }
    info!(
        loaded = report.feeds.len(),
        failed = report.failures.len(),
        rows = report.row_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "feed load finished"
    );
    report
}

fn load_one(
    source: &dyn FeedSource,
    season: &Season,
    competition: &Competition,
) -> Result<LoadedFeed, FeedFailure> {
    let outcome = source
        .fetch(season, competition)
        .and_then(|body| parse_feed(&decode_feed(&body), &season.label, &competition.label));
    match outcome {
        Ok(rows) => {
            debug!(
                season = %season.label,
                competition = %competition.label,
                rows = rows.len(),
                "feed loaded"
            );
            Ok(LoadedFeed {
                season: season.clone(),
                competition: competition.clone(),
                rows,
            })
        }
        Err(err) => {
            let failure = FeedFailure {
                season: season.label.clone(),
                competition: competition.label.clone(),
                cause: format!("{err:#}"),
            };
            warn!(
                season = %failure.season,
                competition = %failure.competition,
                cause = %failure.cause,
                "feed skipped"
            );
            Err(failure)
        }
    }
}

fn with_fetch_pool<T>(threads: usize, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    match rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
    {
        Ok(pool) => pool.install(action),
        Err(_) => action(),
    }
}

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(rename = "Div", default)]
    div: String,
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Time", default)]
    time: String,
    #[serde(rename = "HomeTeam", alias = "HT", default)]
    home_team: String,
    #[serde(rename = "AwayTeam", alias = "AT", default)]
    away_team: String,
    #[serde(rename = "FTR", alias = "Res", default)]
    ftr: String,
    #[serde(rename = "HTR", default)]
    htr: String,
    #[serde(rename = "FTHG", alias = "HG", default, deserialize_with = "csv::invalid_option")]
    fthg: Option<f64>,
    #[serde(rename = "FTAG", alias = "AG", default, deserialize_with = "csv::invalid_option")]
    ftag: Option<f64>,
    #[serde(rename = "HTHG", default, deserialize_with = "csv::invalid_option")]
    hthg: Option<f64>,
    #[serde(rename = "HTAG", default, deserialize_with = "csv::invalid_option")]
    htag: Option<f64>,
    #[serde(rename = "HS", default, deserialize_with = "csv::invalid_option")]
    hs: Option<f64>,
    #[serde(rename = "AS", default, deserialize_with = "csv::invalid_option")]
    as_: Option<f64>,
    #[serde(rename = "HST", default, deserialize_with = "csv::invalid_option")]
    hst: Option<f64>,
    #[serde(rename = "AST", default, deserialize_with = "csv::invalid_option")]
    ast: Option<f64>,
    #[serde(rename = "HF", default, deserialize_with = "csv::invalid_option")]
    hf: Option<f64>,
    #[serde(rename = "AF", default, deserialize_with = "csv::invalid_option")]
    af: Option<f64>,
    #[serde(rename = "HC", default, deserialize_with = "csv::invalid_option")]
    hc: Option<f64>,
    #[serde(rename = "AC", default, deserialize_with = "csv::invalid_option")]
    ac: Option<f64>,
    #[serde(rename = "HY", default, deserialize_with = "csv::invalid_option")]
    hy: Option<f64>,
    #[serde(rename = "AY", default, deserialize_with = "csv::invalid_option")]
    ay: Option<f64>,
    #[serde(rename = "HR", default, deserialize_with = "csv::invalid_option")]
    hr: Option<f64>,
    #[serde(rename = "AR", default, deserialize_with = "csv::invalid_option")]
    ar: Option<f64>,
}

/// UTF-8 when the bytes are valid UTF-8, otherwise Latin-1 (older feeds carry
/// Windows-1252 team names).
pub fn decode_feed(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect()),
    }
}

const REQUIRED_COLUMNS: &[&[&str]] = &[&["Date"], &["HomeTeam", "HT"], &["AwayTeam", "AT"]];

/// Decodes one feed body. A missing required column fails the whole feed; bad
/// numeric cells only blank that cell.
pub fn parse_feed(body: &str, season: &str, competition: &str) -> Result<Vec<FeedRow>> {
    let body = body.trim_start_matches('\u{feff}');
    if body.trim().is_empty() {
        return Err(anyhow!("empty feed body"));
    }
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let headers = reader.headers().context("read csv header")?.clone();
    for names in REQUIRED_COLUMNS {
        if !names.iter().any(|name| headers.iter().any(|h| h == *name)) {
            return Err(anyhow!("missing column {}", names[0]));
        }
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<CsvRecord>().enumerate() {
        // Header is line 1.
        let record = record.with_context(|| format!("malformed row at line {}", idx + 2))?;
        if record.home_team.is_empty() || record.away_team.is_empty() {
            continue;
        }
        rows.push(into_feed_row(record, season, competition));
    }
    Ok(rows)
}

fn into_feed_row(r: CsvRecord, season: &str, competition: &str) -> FeedRow {
    let home = SideStats {
        shots: r.hs,
        shots_on_target: r.hst,
        corners: r.hc,
        fouls: r.hf,
        yellow_cards: r.hy,
        red_cards: r.hr,
        full_time_goals: r.fthg,
        half_time_goals: r.hthg,
    };
    let away = SideStats {
        shots: r.as_,
        shots_on_target: r.ast,
        corners: r.ac,
        fouls: r.af,
        yellow_cards: r.ay,
        red_cards: r.ar,
        full_time_goals: r.ftag,
        half_time_goals: r.htag,
    };
    FeedRow {
        season: season.to_string(),
        competition: competition.to_string(),
        division: r.div,
        date: r.date,
        time: r.time,
        home_team: r.home_team,
        away_team: r.away_team,
        full_time_result: MatchResult::from_code(&r.ftr)
            .or_else(|| MatchResult::from_goals(home.full_time_goals, away.full_time_goals)),
        half_time_result: MatchResult::from_code(&r.htr)
            .or_else(|| MatchResult::from_goals(home.half_time_goals, away.half_time_goals)),
        home,
        away,
    }
}
