//! force-chart: force-directed graph chart rendered as SVG.
//!
//! This crate provides a WASM app that loads a JSON document of nodes and
//! links, lays it out with a force simulation and draws it into the page's
//! `#chart` element as draggable circles joined by lines.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};
use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

pub mod components;

pub use components::force_graph::{ChartConfig, ChartError, ForceChart, GraphData, GraphLink, GraphNode};

/// Default shape styling; fills are set per node.
const CHART_STYLE: &str = "\
line.link { stroke: #999; stroke-opacity: 0.6; }
circle.node { stroke: #fff; stroke-width: 1.5px; cursor: move; }
";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("force-chart: logging initialized");
}

/// Mounts the app into the element with id `config.container_id`.
pub fn mount_chart(config: ChartConfig) -> Result<(), ChartError> {
	let container: HtmlElement = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.get_element_by_id(&config.container_id))
		.and_then(|e| e.dyn_into().ok())
		.ok_or_else(|| ChartError::MissingContainer(config.container_id.clone()))?;

	leptos::mount::mount_to(container, move || view! { <App config=config /> }).forget();
	Ok(())
}

/// Main application component.
#[component]
pub fn App(config: ChartConfig) -> impl IntoView {
	provide_meta_context();

	view! {
		<Title text="Force-Directed Chart" />
		<Meta charset="UTF-8" />
		<Style>{CHART_STYLE}</Style>

		<ForceChart config=config />
	}
}
