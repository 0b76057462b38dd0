//! Distances command implementation.

use super::load_network;
use crate::cli::DistancesArgs;
use crate::error::Result;
use crate::output::Formatter;
use netk_analysis::AnalysisConfig;
use netk_network::load_points;

/// Execute the distances command.
pub fn execute_distances(
    args: DistancesArgs,
    defaults: &AnalysisConfig,
    formatter: &Formatter,
) -> Result<()> {
    let network = load_network(&args.network)?;
    let points = load_points(&args.points)?;
    let snap_distance = args.snap.unwrap_or(defaults.snap_distance);
    let distances = network.pairwise_distances_within(&points, snap_distance)?;

    println!("{}", formatter.format_distances(&distances)?);

    Ok(())
}
