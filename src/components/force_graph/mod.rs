//! Force-directed graph chart.
//!
//! Loads a JSON document of nodes and links and draws it as SVG:
//! - Force layout with link springs, gravity and Barnes-Hut charge repulsion
//! - One `line.link` per link and one `circle.node` per node, refreshed on
//!   every layout tick
//! - Node dragging and hover pinning
//! - Fade-in of the whole surface
//!
//! # Example
//!
//! ```ignore
//! use force_chart::{ChartConfig, ForceChart};
//!
//! let config = ChartConfig {
//!     data_url: "graphs/force.json".into(),
//!     ..ChartConfig::default()
//! };
//!
//! view! { <ForceChart config=config /> }
//! ```

mod component;
pub mod config;
mod error;
mod loader;
mod quadtree;
pub mod scene;
pub mod simulation;
pub mod svg;
mod transition;
mod types;

pub use component::ForceChart;
pub use config::{ChartConfig, FillFallback, LayoutConfig};
pub use error::{ChartError, Result};
pub use loader::{LoadState, fetch_graph};
pub use transition::FadeIn;
pub use types::{GraphData, GraphLink, GraphNode, NodeId, Rgb};
