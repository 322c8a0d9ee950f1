//! Graph document structures deserialized from the chart's JSON resource.

use std::fmt;

use serde::Deserialize;

use super::error::Result;

/// Node identifier. Producers write either strings or integers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
	/// A textual identifier.
	Name(String),
	/// A numeric identifier (usually the node's position in the list).
	Number(i64),
}

impl fmt::Display for NodeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			NodeId::Name(name) => f.write_str(name),
			NodeId::Number(n) => write!(f, "{n}"),
		}
	}
}

/// An RGB triple as written in the document, each component nominally 0-255.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Rgb(pub f64, pub f64, pub f64);

impl Rgb {
	/// Formats the triple as a CSS `rgb(r,g,b)` string with no spaces.
	pub fn to_css(self) -> String {
		format!("rgb({},{},{})", self.0, self.1, self.2)
	}
}

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Identifier shown as the node's tooltip.
	pub id: NodeId,
	/// Size metric; the circle radius is `log10(size) * 10`.
	pub size: Option<f64>,
	/// Optional fill colour. Nodes without one use the configured fallback.
	pub colour: Option<Rgb>,
	/// Optional preset x position.
	pub x: Option<f64>,
	/// Optional preset y position.
	pub y: Option<f64>,
	/// Pinned nodes are never moved by the layout.
	#[serde(default)]
	pub fixed: bool,
}

/// A link between two nodes, referenced by their index in [`GraphData::nodes`].
#[derive(Clone, Debug, Deserialize)]
pub struct GraphLink {
	/// Index of the source node.
	pub source: usize,
	/// Index of the target node.
	pub target: usize,
	/// Link weight; the stroke width is `sqrt(value)`.
	pub value: Option<f64>,
}

/// Complete graph document: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	/// Nodes in document order.
	pub nodes: Vec<GraphNode>,
	/// Links in document order.
	#[serde(default)]
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parses a document from JSON text.
	pub fn from_json(text: &str) -> Result<Self> {
		Ok(serde_json::from_str(text)?)
	}
}
