//! Shapes bound to the graph document.
//!
//! A [`ChartScene`] holds one line per link and one circle per node, with
//! every attribute already computed. It is built once when the layout starts
//! and its coordinates are refreshed from the layout after every tick. The
//! SVG surface only copies these values onto DOM elements.

use log::warn;

use super::config::FillFallback;
use super::simulation::ForceLayout;
use super::types::{GraphData, GraphNode};

/// Drawn form of a link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkShape {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// `sqrt(value)`; NaN when the link has no value.
	pub stroke_width: f64,
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
}

/// Drawn form of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeShape {
	/// Tooltip text.
	pub title: String,
	/// `log10(size) * 10`; NaN when the node has no size.
	pub radius: f64,
	/// CSS fill.
	pub fill: String,
	/// Center x.
	pub cx: f64,
	/// Center y.
	pub cy: f64,
}

/// All shapes of the chart, in document order.
#[derive(Clone, Debug, Default)]
pub struct ChartScene {
	links: Vec<LinkShape>,
	nodes: Vec<NodeShape>,
	fallbacks: Vec<usize>,
}

/// Circle radius for a node size.
pub fn node_radius(size: Option<f64>) -> f64 {
	size.map_or(f64::NAN, |s| s.log10() * 10.0)
}

/// Line width for a link weight.
pub fn stroke_width(value: Option<f64>) -> f64 {
	value.map_or(f64::NAN, f64::sqrt)
}

/// Fill for a node, and whether the fallback was used.
fn node_fill(node: &GraphNode, fallback: &FillFallback) -> (String, bool) {
	match node.colour {
		Some(rgb) => (rgb.to_css(), false),
		None => (fallback.fill.clone(), true),
	}
}

/// Message to log for a node drawn with the fallback fill, when enabled.
fn fallback_diagnostic(node: &GraphNode, fallback: &FillFallback) -> Option<String> {
	(node.colour.is_none() && fallback.diagnose).then(|| {
		format!(
			"node {} has no colour, using {}: {:?}",
			node.id, fallback.fill, node
		)
	})
}

impl ChartScene {
	/// Binds shapes to the document, taking coordinates from `layout`.
	pub fn bind(data: &GraphData, layout: &ForceLayout, fallback: &FillFallback) -> Self {
		let links = data
			.links
			.iter()
			.map(|link| LinkShape {
				source: link.source,
				target: link.target,
				stroke_width: stroke_width(link.value),
				x1: f64::NAN,
				y1: f64::NAN,
				x2: f64::NAN,
				y2: f64::NAN,
			})
			.collect();

		let mut fallbacks = Vec::new();
		let nodes = data
			.nodes
			.iter()
			.enumerate()
			.map(|(i, node)| {
				let (fill, fell_back) = node_fill(node, fallback);
				if fell_back {
					if let Some(message) = fallback_diagnostic(node, fallback) {
						warn!("force-chart: {}", message);
					}
					fallbacks.push(i);
				}
				NodeShape {
					title: node.id.to_string(),
					radius: node_radius(node.size),
					fill,
					cx: f64::NAN,
					cy: f64::NAN,
				}
			})
			.collect();

		let mut scene = Self {
			links,
			nodes,
			fallbacks,
		};
		scene.sync(layout);
		scene
	}

	/// Copies the layout's current positions onto every shape.
	pub fn sync(&mut self, layout: &ForceLayout) {
		let nodes = layout.nodes();
		for link in &mut self.links {
			if let (Some(s), Some(t)) = (nodes.get(link.source), nodes.get(link.target)) {
				(link.x1, link.y1, link.x2, link.y2) = (s.x, s.y, t.x, t.y);
			}
		}
		for (shape, node) in self.nodes.iter_mut().zip(nodes) {
			(shape.cx, shape.cy) = (node.x, node.y);
		}
	}

	/// Link shapes in document order.
	pub fn links(&self) -> &[LinkShape] {
		&self.links
	}

	/// Node shapes in document order.
	pub fn nodes(&self) -> &[NodeShape] {
		&self.nodes
	}

	/// Indices of nodes drawn with the fallback fill.
	pub fn fallbacks(&self) -> &[usize] {
		&self.fallbacks
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::config::LayoutConfig;
	use crate::components::force_graph::simulation::LayoutEvent;

	const EXAMPLE: &str = r#"{"nodes":[{"id":"A","size":10,"colour":[10,20,30]},{"id":"B","size":100}],
		"links":[{"source":0,"target":1,"value":4}]}"#;

	fn setup(json: &str) -> (GraphData, ForceLayout) {
		let data = GraphData::from_json(json).unwrap();
		let mut layout = ForceLayout::new(LayoutConfig::default(), 300.0, 300.0, &data).unwrap();
		layout.start();
		(data, layout)
	}

	fn assert_in_sync(scene: &ChartScene, layout: &ForceLayout) {
		let nodes = layout.nodes();
		for link in scene.links() {
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			assert_eq!((link.x1, link.y1, link.x2, link.y2), (s.x, s.y, t.x, t.y));
		}
		for (shape, node) in scene.nodes().iter().zip(nodes) {
			assert_eq!((shape.cx, shape.cy), (node.x, node.y));
		}
	}

	#[test]
	fn renders_example_document() {
		let (data, layout) = setup(EXAMPLE);
		let scene = ChartScene::bind(&data, &layout, &FillFallback::default());

		let a = &scene.nodes()[0];
		assert_eq!(a.title, "A");
		assert_eq!(a.radius, 10.0);
		assert_eq!(a.fill, "rgb(10,20,30)");

		let b = &scene.nodes()[1];
		assert_eq!(b.radius, 20.0);
		assert_eq!(b.fill, "red");
		assert_eq!(scene.fallbacks(), &[1]);

		assert_eq!(scene.links()[0].stroke_width, 2.0);
		assert_in_sync(&scene, &layout);
	}

	#[test]
	fn follows_the_layout_on_every_tick() {
		let (data, mut layout) = setup(EXAMPLE);
		let mut scene = ChartScene::bind(&data, &layout, &FillFallback::default());
		let start: Vec<(f64, f64)> = scene.nodes().iter().map(|n| (n.cx, n.cy)).collect();

		let mut ticks = 0;
		while let LayoutEvent::Tick { .. } = layout.tick() {
			scene.sync(&layout);
			assert_in_sync(&scene, &layout);
			ticks += 1;
		}
		assert!(ticks > 0);

		let end: Vec<(f64, f64)> = scene.nodes().iter().map(|n| (n.cx, n.cy)).collect();
		assert_ne!(start, end);
	}

	#[test]
	fn radius_and_stroke_follow_their_transforms() {
		let (data, layout) = setup(
			r#"{"nodes":[{"id":"a","size":2,"colour":[1,1,1]},{"id":"b","size":1000,"colour":[1,1,1]},
			{"id":"c","size":0.5,"colour":[1,1,1]}],
			"links":[{"source":0,"target":1,"value":9},{"source":1,"target":2,"value":0.25}]}"#,
		);
		let scene = ChartScene::bind(&data, &layout, &FillFallback::default());

		for (shape, node) in scene.nodes().iter().zip(&data.nodes) {
			assert_eq!(shape.radius, node.size.unwrap().log10() * 10.0);
		}
		assert_eq!(scene.links()[0].stroke_width, 3.0);
		assert_eq!(scene.links()[1].stroke_width, 0.5);
		assert!(scene.fallbacks().is_empty());
	}

	#[test]
	fn missing_size_and_value_are_not_numbers() {
		let (data, layout) = setup(
			r#"{"nodes":[{"id":0,"colour":[1,2,3]},{"id":1,"size":0,"colour":[1,2,3]}],
			"links":[{"source":0,"target":1}]}"#,
		);
		let scene = ChartScene::bind(&data, &layout, &FillFallback::default());

		assert!(scene.nodes()[0].radius.is_nan());
		assert_eq!(scene.nodes()[1].radius, f64::NEG_INFINITY);
		assert!(scene.links()[0].stroke_width.is_nan());
	}

	#[test]
	fn fallback_fill_is_configurable() {
		let (data, layout) = setup(EXAMPLE);
		let fallback = FillFallback {
			fill: "#888".into(),
			diagnose: false,
		};
		let scene = ChartScene::bind(&data, &layout, &fallback);
		assert_eq!(scene.nodes()[1].fill, "#888");
		assert_eq!(scene.fallbacks(), &[1]);
	}

	#[test]
	fn diagnoses_missing_colour_only_when_enabled() {
		let data = GraphData::from_json(EXAMPLE).unwrap();
		let (coloured, bare) = (&data.nodes[0], &data.nodes[1]);

		let loud = FillFallback::default();
		let message = fallback_diagnostic(bare, &loud).unwrap();
		assert!(message.contains("node B has no colour, using red"), "{message}");
		assert_eq!(fallback_diagnostic(coloured, &loud), None);

		let quiet = FillFallback {
			diagnose: false,
			..FillFallback::default()
		};
		assert_eq!(fallback_diagnostic(bare, &quiet), None);
	}
}
