//! Integration tests for netk-cli
//!
//! Commands run against real files in a temporary directory.

use clap::Parser;
use netk_analysis::AnalysisConfig;
use netk_cli::cli::{Cli, Command};
use netk_cli::commands;
use netk_cli::config::OutputFormat;
use netk_cli::Formatter;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const NETWORK_JSON: &str = r#"{
    "nodes": [
        {"id": 1, "x": 0.0, "y": 0.0},
        {"id": 2, "x": 5000.0, "y": 0.0},
        {"id": 3, "x": 5000.0, "y": 5000.0}
    ],
    "edges": [{"from": 1, "to": 2}, {"from": 2, "to": 3}]
}"#;

const POINTS_JSON: &str = r#"[
    {"x": 100.0, "y": 0.0},
    {"x": 200.0, "y": 5.0},
    {"x": 400.0, "y": 0.0},
    {"x": 5000.0, "y": 2500.0}
]"#;

fn write_inputs(dir: &Path) -> (String, String) {
    let network = dir.join("network.json");
    let points = dir.join("points.json");
    fs::write(&network, NETWORK_JSON).unwrap();
    fs::write(&points, POINTS_JSON).unwrap();
    (
        network.to_string_lossy().into_owned(),
        points.to_string_lossy().into_owned(),
    )
}

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Table, false)
}

#[tokio::test]
async fn test_analyze_writes_results_csv() {
    let dir = TempDir::new().unwrap();
    let (network, points) = write_inputs(dir.path());
    let output = dir.path().join("results.csv");

    let cli = Cli::parse_from([
        "netk",
        "analyze",
        "--network",
        network.as_str(),
        "--points",
        points.as_str(),
        "--increment",
        "150",
        "--bands",
        "3",
        "--output",
        output.to_str().unwrap(),
    ]);
    let Command::Analyze(args) = cli.command else {
        panic!("Expected Analyze command");
    };
    commands::execute_analyze(args, &AnalysisConfig::default(), &formatter())
        .await
        .unwrap();

    // Distances 100, 300, 200 among the first three; the fourth is far away
    let csv = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Distance_Band,Point_Count,K_Function");
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("0,0,"));
    assert!(lines[2].starts_with("150,1,"));
    assert!(lines[3].starts_with("300,3,"));
}

#[tokio::test]
async fn test_analyze_with_permutations_exports_distances() {
    let dir = TempDir::new().unwrap();
    let (network, points) = write_inputs(dir.path());
    let output = dir.path().join("results.csv");
    let odcm = dir.path().join("odcm.csv");

    let cli = Cli::parse_from([
        "netk",
        "analyze",
        "-n",
        network.as_str(),
        "-p",
        points.as_str(),
        "--increment",
        "500",
        "--permutations",
        "9",
        "--seed",
        "21",
        "--output",
        output.to_str().unwrap(),
        "--odcm-output",
        odcm.to_str().unwrap(),
    ]);
    let Command::Analyze(args) = cli.command else {
        panic!("Expected Analyze command");
    };
    commands::execute_analyze(args, &AnalysisConfig::default(), &formatter())
        .await
        .unwrap();

    let results = fs::read_to_string(&output).unwrap();
    assert!(results.starts_with("Distance_Band,Point_Count,K_Function,Lower_Bound,Upper_Bound\n"));

    let odcm = fs::read_to_string(&odcm).unwrap();
    let mut lines = odcm.lines();
    assert_eq!(
        lines.next(),
        Some("Iteration_Number,OriginID,DestinationID,Total_Length")
    );
    let iterations: std::collections::BTreeSet<&str> = lines
        .map(|line| line.split(',').next().unwrap())
        .collect();
    // Observed plus nine trials on a connected network
    assert_eq!(iterations.len(), 10);
    assert!(iterations.contains("0"));
    assert!(iterations.contains("9"));
}

#[tokio::test]
async fn test_analyze_rejects_unsnappable_points() {
    let dir = TempDir::new().unwrap();
    let (network, _) = write_inputs(dir.path());
    let points = dir.path().join("far.json");
    fs::write(&points, r#"[{"x": 100.0, "y": 0.0}, {"x": 2500.0, "y": 2500.0}]"#).unwrap();

    let cli = Cli::parse_from([
        "netk",
        "analyze",
        "-n",
        network.as_str(),
        "-p",
        points.to_str().unwrap(),
    ]);
    let Command::Analyze(args) = cli.command else {
        panic!("Expected Analyze command");
    };
    let result = commands::execute_analyze(args, &AnalysisConfig::default(), &formatter()).await;
    assert!(result.is_err());
}

#[test]
fn test_length_and_sample_commands() {
    let dir = TempDir::new().unwrap();
    let (network, _) = write_inputs(dir.path());

    let cli = Cli::parse_from(["netk", "length", "-n", network.as_str()]);
    let Command::Length(args) = cli.command else {
        panic!("Expected Length command");
    };
    commands::execute_length(args, &formatter()).unwrap();

    let cli = Cli::parse_from(["netk", "sample", "-n", network.as_str(), "--count", "4", "--seed", "9"]);
    let Command::Sample(args) = cli.command else {
        panic!("Expected Sample command");
    };
    commands::execute_sample(args, &Formatter::new(OutputFormat::Json, false)).unwrap();
}

#[test]
fn test_distances_command() {
    let dir = TempDir::new().unwrap();
    let (network, points) = write_inputs(dir.path());

    let cli = Cli::parse_from(["netk", "distances", "-n", network.as_str(), "-p", points.as_str(), "--snap", "10"]);
    let Command::Distances(args) = cli.command else {
        panic!("Expected Distances command");
    };
    commands::execute_distances(args, &AnalysisConfig::default(), &formatter()).unwrap();
}

#[tokio::test]
async fn test_analyze_snap_flag_widens_tolerance() {
    let dir = TempDir::new().unwrap();
    let (network, _) = write_inputs(dir.path());
    let points = dir.path().join("far.json");
    fs::write(&points, r#"[{"x": 100.0, "y": 0.0}, {"x": 2500.0, "y": 2500.0}]"#).unwrap();

    let cli = Cli::parse_from([
        "netk",
        "analyze",
        "-n",
        network.as_str(),
        "-p",
        points.to_str().unwrap(),
        "--snap",
        "3000",
    ]);
    let Command::Analyze(args) = cli.command else {
        panic!("Expected Analyze command");
    };
    commands::execute_analyze(args, &AnalysisConfig::default(), &formatter())
        .await
        .unwrap();
}

#[test]
fn test_distances_snap_flag_tightens_tolerance() {
    let dir = TempDir::new().unwrap();
    let (network, points) = write_inputs(dir.path());

    // The second point sits 5 units off the road
    let cli = Cli::parse_from(["netk", "distances", "-n", network.as_str(), "-p", points.as_str(), "--snap", "1"]);
    let Command::Distances(args) = cli.command else {
        panic!("Expected Distances command");
    };
    let result = commands::execute_distances(args, &AnalysisConfig::default(), &formatter());
    assert!(matches!(result, Err(netk_cli::CliError::Network(_))));
}
