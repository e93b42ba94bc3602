use std::path::PathBuf;

use h2h_terminal::catalog::{Catalog, StatParam};
use h2h_terminal::composite::{CompositeScore, composite_from_means};
use h2h_terminal::error::QueryError;
use h2h_terminal::feed::DirFeedSource;
use h2h_terminal::h2h::HeadToHeadRequest;
use h2h_terminal::query::query_team;
use h2h_terminal::snapshot::{Snapshot, build_snapshot};

fn fixture_snapshot() -> Snapshot {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.push("tests");
    dir.push("fixtures");
    dir.push("feeds");
    let catalog =
        Catalog::default().restricted(&["2425".to_string()], &["E0".to_string(), "E1".to_string()]);
    build_snapshot(&catalog, &DirFeedSource::new(dir), 2).expect("fixture snapshot")
}

fn request(team1: &str, team2: &str, stat: &str) -> HeadToHeadRequest {
    HeadToHeadRequest {
        competition: "Premier League".to_string(),
        season: "2024/2025".to_string(),
        team1: team1.to_string(),
        team2: team2.to_string(),
        stat_code: stat.to_string(),
    }
}

#[test]
fn compare_reports_both_teams_and_composite() {
    let snapshot = fixture_snapshot();
    let report = snapshot
        .head_to_head(&request("Arsenal", "Chelsea", "S"))
        .expect("valid request");

    assert_eq!(report.parameter, StatParam::Shots);
    assert_eq!(report.parameter_label, "Shots");
    assert_eq!(report.team1.matches.len(), 9);
    assert_eq!(report.team2.matches.len(), 1);
    assert_eq!(report.team1.average.active, Some(85.0 / 7.0));
    assert_eq!(report.team2.average.active, Some(17.0));
    assert_eq!(report.team2.average.passive, Some(9.0));

    let expected = composite_from_means(85.0 / 7.0, 101.0 / 7.0, 17.0, 9.0);
    assert_eq!(report.composite, expected);
    assert!(report.composite.value().is_some());
}

#[test]
fn team_without_matches_has_undefined_average() {
    let snapshot = fixture_snapshot();
    let report = snapshot
        .head_to_head(&request("Arsenal", "Leeds", "C"))
        .expect("valid request");
    assert!(report.team2.matches.is_empty());
    assert_eq!(report.team2.average.active, None);
    assert_eq!(report.team2.average.passive, None);
    assert_eq!(report.team2.average.sample, 0);
    assert_eq!(report.composite, CompositeScore::InsufficientData);
}

#[test]
fn identical_averages_yield_no_composite() {
    let snapshot = fixture_snapshot();
    let report = snapshot
        .head_to_head(&request("Chelsea", "Chelsea", "F"))
        .expect("valid request");
    assert_eq!(report.composite, CompositeScore::NoSpread);
    assert_eq!(report.composite.value(), None);
}

#[test]
fn unknown_inputs_are_validation_errors() {
    let snapshot = fixture_snapshot();
    assert_eq!(
        snapshot
            .head_to_head(&request("Arsenal", "Chelsea", "XG"))
            .unwrap_err(),
        QueryError::UnknownParameter("XG".to_string())
    );

    let mut bad_comp = request("Arsenal", "Chelsea", "S");
    bad_comp.competition = "Bundesliga".to_string();
    let err = snapshot.head_to_head(&bad_comp).unwrap_err();
    assert_eq!(err.to_string(), "unknown competition 'Bundesliga'");

    let mut bad_season = request("Arsenal", "Chelsea", "S");
    bad_season.season = "1999/2000".to_string();
    assert!(matches!(
        snapshot.head_to_head(&bad_season),
        Err(QueryError::UnknownSeason(_))
    ));

    assert!(matches!(
        query_team(&snapshot.events, "Premier League", "2024/2025", "Arsenal", "nope"),
        Err(QueryError::UnknownParameter(code)) if code == "nope"
    ));
}

#[test]
fn team_lookup_is_sorted_and_distinct() {
    let snapshot = fixture_snapshot();
    let teams = snapshot
        .teams("Premier League", "2024/2025")
        .expect("known scope");
    assert_eq!(
        teams,
        vec![
            "Arsenal",
            "Aston Villa",
            "Bournemouth",
            "Brighton",
            "Chelsea",
            "Leicester",
            "Liverpool",
            "Man City",
            "Newcastle",
            "Southampton",
            "Tottenham",
            "Wolves",
        ]
    );
    assert!(snapshot.teams("Championship", "2023/2024").unwrap().is_empty());
}

#[test]
fn report_serializes_to_json() {
    let snapshot = fixture_snapshot();
    let report = snapshot
        .head_to_head(&request("Arsenal", "Leeds", "HTG"))
        .expect("valid request");
    let json = serde_json::to_value(&report).expect("serializable");
    assert_eq!(json["parameter_label"], "Half Time Goals");
    assert_eq!(json["team1"]["matches"][0]["date"], "2024-10-27");
    assert!(json["team2"]["average"]["active"].is_null());
    assert_eq!(json["composite"], "InsufficientData");
}
