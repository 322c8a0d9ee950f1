//! Error types for loading and drawing the chart.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors that stop the chart from rendering.
#[derive(Debug, Error)]
pub enum ChartError {
	/// The request could not be issued or its body could not be read.
	#[error("fetch error: {0}")]
	Fetch(String),

	/// The server answered with a non-success status.
	#[error("GET {url} returned HTTP {status}")]
	Status {
		/// Requested URL.
		url: String,
		/// HTTP status code.
		status: u16,
	},

	/// The document is not valid JSON or does not have the expected shape.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// A link refers to a node index outside the node list.
	#[error("link {link} has {end} index {index} but there are only {node_count} nodes")]
	DanglingLink {
		/// Position of the link in the document.
		link: usize,
		/// `"source"` or `"target"`.
		end: &'static str,
		/// The out-of-range node index.
		index: usize,
		/// Number of nodes in the document.
		node_count: usize,
	},

	/// The container element the chart attaches to does not exist.
	#[error("container #{0} not found")]
	MissingContainer(String),

	/// A DOM call failed.
	#[error("DOM error: {0}")]
	Dom(String),
}

impl From<JsValue> for ChartError {
	fn from(val: JsValue) -> Self {
		let msg = js_sys::JSON::stringify(&val)
			.map(String::from)
			.unwrap_or_else(|_| format!("{:?}", val));
		ChartError::Dom(msg)
	}
}
