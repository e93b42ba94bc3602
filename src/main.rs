use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use h2h_terminal::catalog::StatParam;
use h2h_terminal::composite::CompositeScore;
use h2h_terminal::config::{self, AppConfig};
use h2h_terminal::feed::{DirFeedSource, FeedSource, HttpFeedSource};
use h2h_terminal::h2h::{HeadToHeadRequest, TeamReport};
use h2h_terminal::logging;
use h2h_terminal::snapshot::{Snapshot, SnapshotStore};

#[derive(Parser)]
#[command(name = "h2h_terminal")]
#[command(about = "Recent form and head-to-head stat comparison from match feeds", long_about = None)]
struct Cli {
    /// Read feeds from a directory written by feed_sync instead of the network
    #[arg(long, env = "FEED_DIR", global = true)]
    feed_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List statistic codes
    Params,
    /// List teams in a competition and season
    Teams {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        season: String,
    },
    /// Compare two teams on one statistic
    Compare {
        #[arg(long)]
        competition: String,
        #[arg(long)]
        season: String,
        #[arg(long)]
        team1: String,
        #[arg(long)]
        team2: String,
        #[arg(long, default_value = "S")]
        stat: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Params => {
            for param in StatParam::ALL {
                println!("{:<4} {}", param.code(), param.label());
            }
        }
        Commands::Teams {
            competition,
            season,
        } => {
            let snapshot = load_snapshot(cli.feed_dir)?;
            let teams = snapshot.teams(&competition, &season)?;
            if teams.is_empty() {
                println!("No teams for {competition} {season}");
            }
            for team in teams {
                println!("{team}");
            }
        }
        Commands::Compare {
            competition,
            season,
            team1,
            team2,
            stat,
            json,
        } => {
            let snapshot = load_snapshot(cli.feed_dir)?;
            let report = snapshot.head_to_head(&HeadToHeadRequest {
                competition,
                season,
                team1,
                team2,
                stat_code: stat,
            })?;
            if json {
                let out = serde_json::to_string_pretty(&report).context("serialize report")?;
                println!("{out}");
                return Ok(());
            }
            println!(
                "{} | {} | {}",
                report.competition, report.season, report.parameter_label
            );
            print_team(&report.team1, &report.season, &report.competition);
            print_team(&report.team2, &report.season, &report.competition);
            match report.composite {
                CompositeScore::Score(v) => println!("Composite: {v:.2}"),
                CompositeScore::InsufficientData => println!("Composite: insufficient data"),
                CompositeScore::NoSpread => {
                    println!("Composite: insufficient data (averages identical)")
                }
            }
        }
    }
    Ok(())
}

fn load_snapshot(feed_dir: Option<PathBuf>) -> Result<std::sync::Arc<Snapshot>> {
    let cfg = AppConfig::from_env();
    let catalog = cfg.catalog();
    let source: Box<dyn FeedSource> = match feed_dir.or(cfg.feed_dir.clone()) {
        Some(dir) => Box::new(DirFeedSource::new(dir)),
        None => Box::new(HttpFeedSource::new(catalog.clone())),
    };
    let store = SnapshotStore::new();
    let snapshot = store
        .refresh(&catalog, source.as_ref(), cfg.fetch_parallelism)
        .context("build match tables")?;
    if !snapshot.failures.is_empty() {
        eprintln!("{} feed(s) unavailable", snapshot.failures.len());
    }
    Ok(snapshot)
}

fn print_team(team: &TeamReport, season: &str, competition: &str) {
    println!();
    println!("Matches for {} in {season} ({competition})", team.team);
    if team.matches.is_empty() {
        println!("  no matches");
    }
    for line in &team.matches {
        println!(
            "  {:<10} {} {:<24} {:>6} {:>6} {}",
            line.date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string()),
            line.venue.code(),
            line.opponent,
            fmt_value(line.active),
            fmt_value(line.passive),
            line.result.map(|r| r.code()).unwrap_or("-"),
        );
    }
    println!(
        "  last {}: active {} passive {}",
        team.average.sample,
        fmt_avg(team.average.active),
        fmt_avg(team.average.passive)
    );
}

fn fmt_value(v: Option<f64>) -> String {
    v.map(|v| format!("{v}")).unwrap_or_else(|| "-".to_string())
}

fn fmt_avg(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "insufficient data".to_string())
}
