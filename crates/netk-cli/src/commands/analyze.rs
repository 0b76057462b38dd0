//! Analyze command implementation.

use super::load_network;
use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use crate::output::{write_odcm_csv, write_results_csv, Formatter};
use netk_analysis::{
    AnalysisConfig, CancellationToken, EnvelopeSetting, NetworkKAnalysis, PermutationPreset,
};
use netk_network::load_points;

/// Execute the analyze command.
///
/// Ctrl+C stops new permutation trials from starting; trials already running
/// finish and the envelope is built from them if enough succeeded.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    defaults: &AnalysisConfig,
    formatter: &Formatter,
) -> Result<()> {
    let config = merge_config(&args, defaults);
    config.validate()?;

    let network = load_network(&args.network)?;
    let points = load_points(&args.points)?;
    tracing::info!("Loaded {} points from {}", points.len(), args.points.display());

    match PermutationPreset::from_count(config.permutations) {
        Some(preset) => tracing::info!("{}", preset),
        None => tracing::info!("{} Permutations", config.permutations),
    }

    let token = CancellationToken::new();
    let analysis = NetworkKAnalysis::new(config)?.with_cancellation(token.clone());
    let mut task = tokio::task::spawn_blocking(move || analysis.run(&network, &points));

    let joined = tokio::select! {
        joined = &mut task => joined,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!("Interrupt received, waiting for running trials to finish");
            token.cancel();
            task.await
        }
    };
    let report = joined.map_err(|e| CliError::Worker(e.to_string()))??;

    println!("{}", formatter.format_report(&report)?);

    if let Some(path) = &args.output {
        write_results_csv(path, &report)?;
        eprintln!("{}", formatter.success(&format!("Results written to {}", path.display())));
    }
    if let Some(path) = &args.odcm_output {
        write_odcm_csv(path, &report.distance_sets)?;
        eprintln!(
            "{}",
            formatter.success(&format!(
                "Distances for {} iterations written to {}",
                report.distance_sets.len(),
                path.display()
            ))
        );
    }

    Ok(())
}

/// Apply command-line overrides on top of the configured defaults.
fn merge_config(args: &AnalyzeArgs, defaults: &AnalysisConfig) -> AnalysisConfig {
    let mut config = defaults.clone();

    if let Some(begin) = args.begin {
        config.beginning_distance = begin;
    }
    if let Some(increment) = args.increment {
        config.distance_increment = increment;
    }
    if let Some(bands) = args.bands {
        config.band_count = Some(bands);
    }
    if let Some(snap) = args.snap {
        config.snap_distance = snap;
    }
    if let Some(permutations) = args.permutations {
        config.permutations = permutations;
    }
    if let Some(min_trials) = args.min_trials {
        config.min_successful_trials = min_trials;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(range) = args.percentile {
        config.envelope_mode = EnvelopeSetting::Percentile {
            lower: range.lower,
            upper: range.upper,
        };
    }
    if let Some(threads) = args.threads {
        config.threads = Some(threads);
    }
    if args.sequential {
        config.parallel = false;
    }
    if args.odcm_output.is_some() {
        config.keep_trial_distances = true;
    }

    config
}
