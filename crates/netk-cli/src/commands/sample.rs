//! Sample command implementation.

use crate::cli::SampleArgs;
use crate::error::Result;
use crate::output::Formatter;
use netk_network::RoadNetwork;

/// Execute the sample command.
///
/// The default JSON output can be passed straight back to `analyze --points`.
pub fn execute_sample(args: SampleArgs, formatter: &Formatter) -> Result<()> {
    let network = RoadNetwork::from_file(&args.network)?;
    let points = network.sample_points(args.count, args.seed)?;
    tracing::info!("Placed {} points (seed {})", points.len(), args.seed);

    println!("{}", formatter.format_points(&points)?);

    Ok(())
}
