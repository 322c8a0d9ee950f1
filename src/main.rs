//! Client entrypoint for the CSR build.

// Bin target reuses lib deps, silence noisy lint.
#![allow(unused_crate_dependencies)]

use force_chart::{ChartConfig, init_logging, mount_chart};
use log::error;

fn main() {
	init_logging();

	if let Err(e) = mount_chart(ChartConfig::default()) {
		error!("force-chart: {}", e);
	}
}
