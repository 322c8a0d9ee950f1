//! Chart configuration.
//!
//! Everything the chart needs to know that is not in the JSON document: where
//! to attach, where to load from, how big the surface is and how the layout
//! engine is tuned. Defaults reproduce the classic 300x300 chart.

use super::transition::FadeIn;

/// Layout engine tuning.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
	/// Pairwise charge; negative values repel.
	pub charge: f64,
	/// Rest length of every link in world units.
	pub link_distance: f64,
	/// Spring stiffness in `[0, 1]`.
	pub link_strength: f64,
	/// Velocity retained per tick (`1.0` = frictionless).
	pub friction: f64,
	/// Pull toward the center of the canvas.
	pub gravity: f64,
	/// Barnes-Hut opening criterion. `0.0` sums every pair exactly.
	pub theta: f64,
	/// Charge is ignored beyond this distance.
	pub charge_distance: f64,
	/// Alpha set by `start` and `resume`.
	pub initial_alpha: f64,
	/// Alpha is multiplied by this every tick.
	pub alpha_decay: f64,
	/// The layout ends once alpha falls below this.
	pub alpha_min: f64,
	/// Seed for the placement of nodes without a preset position.
	pub seed: u32,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			charge: -80.0,
			link_distance: 120.0,
			link_strength: 1.0,
			friction: 0.9,
			gravity: 0.1,
			theta: 0.8,
			charge_distance: f64::INFINITY,
			initial_alpha: 0.1,
			alpha_decay: 0.99,
			alpha_min: 0.005,
			seed: 12345,
		}
	}
}

/// What to do with nodes that carry no colour.
#[derive(Clone, Debug)]
pub struct FillFallback {
	/// CSS fill used instead.
	pub fill: String,
	/// Log a diagnostic naming the node.
	pub diagnose: bool,
}

impl Default for FillFallback {
	fn default() -> Self {
		Self {
			fill: "red".into(),
			diagnose: true,
		}
	}
}

/// Top-level chart configuration.
#[derive(Clone, Debug)]
pub struct ChartConfig {
	/// Id of the element the app is mounted into.
	pub container_id: String,
	/// URL of the JSON document.
	pub data_url: String,
	/// Surface width in SVG units.
	pub width: f64,
	/// Surface height in SVG units.
	pub height: f64,
	/// Surface fade-in.
	pub fade: FadeIn,
	/// Missing colour policy.
	pub fallback: FillFallback,
	/// Layout engine tuning.
	pub layout: LayoutConfig,
}

impl Default for ChartConfig {
	fn default() -> Self {
		Self {
			container_id: "chart".into(),
			data_url: "force.json".into(),
			width: 300.0,
			height: 300.0,
			fade: FadeIn::default(),
			fallback: FillFallback::default(),
			layout: LayoutConfig::default(),
		}
	}
}
