//! Length command implementation.

use crate::cli::LengthArgs;
use crate::error::Result;
use crate::output::Formatter;
use netk_network::RoadNetwork;

/// Execute the length command.
pub fn execute_length(args: LengthArgs, formatter: &Formatter) -> Result<()> {
    let network = RoadNetwork::from_file(&args.network)?;
    let length = network.length()?;

    println!(
        "{}",
        formatter.format_length(length.value(), network.node_count(), network.edge_count())?
    );

    Ok(())
}
