//! Fetches the graph document over HTTP.

use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::{ChartError, Result};
use super::types::GraphData;

/// Progress of the document load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
	/// Nothing requested yet.
	#[default]
	Idle,
	/// Request in flight.
	Fetching,
	/// Document parsed; the chart is being drawn.
	Loaded,
	/// The request or the parse failed. Nothing will be drawn.
	Failed,
}

impl LoadState {
	/// Lowercase name, as exposed in the host's `data-state` attribute.
	pub fn as_str(self) -> &'static str {
		match self {
			LoadState::Idle => "idle",
			LoadState::Fetching => "fetching",
			LoadState::Loaded => "loaded",
			LoadState::Failed => "failed",
		}
	}
}

/// Fetches `url` and parses it as a graph document.
pub async fn fetch_graph(url: &str) -> Result<GraphData> {
	let window = web_sys::window().ok_or_else(|| ChartError::Fetch("no window".into()))?;

	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| ChartError::Fetch(format!("{:?}", e)))?
		.dyn_into()
		.map_err(|_| ChartError::Fetch("fetch did not resolve to a Response".into()))?;

	if !response.ok() {
		return Err(ChartError::Status {
			url: url.to_string(),
			status: response.status(),
		});
	}

	let body = response
		.text()
		.map_err(|e| ChartError::Fetch(format!("{:?}", e)))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| ChartError::Fetch(format!("{:?}", e)))?
		.as_string()
		.ok_or_else(|| ChartError::Fetch("response body is not text".into()))?;

	let data = GraphData::from_json(&text)?;
	info!(
		"force-chart: loaded {} nodes, {} links from {}",
		data.nodes.len(),
		data.links.len(),
		url
	);
	Ok(data)
}

/// Runs `fetch_graph`, tracking its progress in `state`.
///
/// Failures are logged and swallowed: the continuation simply never sees a
/// document.
pub async fn load_graph(url: &str, state: impl Fn(LoadState)) -> Option<GraphData> {
	state(LoadState::Fetching);
	match fetch_graph(url).await {
		Ok(data) => {
			state(LoadState::Loaded);
			Some(data)
		}
		Err(e) => {
			warn!("force-chart: failed to load {}: {}", url, e);
			state(LoadState::Failed);
			None
		}
	}
}
