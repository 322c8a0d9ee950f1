//! Force-directed layout engine.
//!
//! Nodes are charged particles and links are springs with a rest length. Each
//! tick applies link springs, gravity toward the canvas center and Barnes-Hut
//! charge repulsion, then integrates positions with Verlet integration and
//! friction. The simulation "temperature" `alpha` scales every force and
//! cools geometrically; the layout ends once alpha falls below a threshold.
//!
//! The engine does not schedule itself. A driver (the animation frame loop)
//! calls [`ForceLayout::tick`] while [`ForceLayout::is_running`] holds.

use log::info;

use super::config::LayoutConfig;
use super::error::{ChartError, Result};
use super::quadtree::ChargeTree;
use super::types::GraphData;

/// Pinned by the document.
const PINNED: u8 = 1;
/// Held by an active drag.
const DRAGGING: u8 = 2;
/// Held while the pointer is over the node.
const HOVERED: u8 = 4;

/// Linear congruential generator for node placement and jiggling.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Lcg {
	/// Creates a generator from a seed.
	pub fn new(seed: u32) -> Self {
		Self(seed)
	}

	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = self.0.wrapping_mul(1103515245).wrapping_add(12345);
		(self.0 >> 8) as f64 / (1u32 << 24) as f64
	}
}

/// Simulation state of one node.
#[derive(Clone, Debug)]
pub struct LayoutNode {
	/// Current x position.
	pub x: f64,
	/// Current y position.
	pub y: f64,
	/// Previous x position; `x - px` is the velocity.
	pub px: f64,
	/// Previous y position.
	pub py: f64,
	/// Number of links touching this node.
	pub weight: usize,
	fixed: u8,
}

impl Default for LayoutNode {
	fn default() -> Self {
		Self {
			x: f64::NAN,
			y: f64::NAN,
			px: f64::NAN,
			py: f64::NAN,
			weight: 0,
			fixed: 0,
		}
	}
}

impl LayoutNode {
	/// A free node at rest at `(x, y)`.
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			px: x,
			py: y,
			..Self::default()
		}
	}

	/// Whether anything currently holds this node in place.
	pub fn is_fixed(&self) -> bool {
		self.fixed != 0
	}
}

/// A link with both endpoints resolved to node indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutLink {
	/// Source node index.
	pub source: usize,
	/// Target node index.
	pub target: usize,
}

/// Lifecycle notifications produced by the layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
	/// The layout went from rest to running.
	Start {
		/// Alpha the layout was reheated to.
		alpha: f64,
	},
	/// One relaxation step finished.
	Tick {
		/// Alpha after cooling.
		alpha: f64,
	},
	/// Alpha cooled below the threshold; the layout is at rest.
	End,
}

/// Force-directed layout over a fixed set of nodes and links.
pub struct ForceLayout {
	config: LayoutConfig,
	width: f64,
	height: f64,
	nodes: Vec<LayoutNode>,
	links: Vec<LayoutLink>,
	alpha: f64,
	rng: Lcg,
}

impl ForceLayout {
	/// Builds a layout for `data` on a `width` x `height` canvas.
	///
	/// Preset positions and pins are taken from the document. Every link index
	/// is checked against the node list.
	pub fn new(config: LayoutConfig, width: f64, height: f64, data: &GraphData) -> Result<Self> {
		let node_count = data.nodes.len();
		let links = data
			.links
			.iter()
			.enumerate()
			.map(|(link, l)| {
				for (end, index) in [("source", l.source), ("target", l.target)] {
					if index >= node_count {
						return Err(ChartError::DanglingLink {
							link,
							end,
							index,
							node_count,
						});
					}
				}
				Ok(LayoutLink {
					source: l.source,
					target: l.target,
				})
			})
			.collect::<Result<Vec<_>>>()?;

		let nodes = data
			.nodes
			.iter()
			.map(|n| LayoutNode {
				x: n.x.unwrap_or(f64::NAN),
				y: n.y.unwrap_or(f64::NAN),
				fixed: if n.fixed { PINNED } else { 0 },
				..LayoutNode::default()
			})
			.collect();

		let rng = Lcg::new(config.seed);
		Ok(Self {
			config,
			width,
			height,
			nodes,
			links,
			alpha: 0.0,
			rng,
		})
	}

	/// Node states in document order.
	pub fn nodes(&self) -> &[LayoutNode] {
		&self.nodes
	}

	/// Node state at `index`.
	pub fn node(&self, index: usize) -> Option<&LayoutNode> {
		self.nodes.get(index)
	}

	/// Resolved links in document order.
	pub fn links(&self) -> &[LayoutLink] {
		&self.links
	}

	/// Current alpha. Zero when the layout is at rest.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// Whether ticks still move nodes.
	pub fn is_running(&self) -> bool {
		self.alpha > 0.0
	}

	/// Canvas size the layout centers on.
	pub fn size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Counts link weights, places nodes without a position and starts the
	/// simulation.
	pub fn start(&mut self) -> Option<LayoutEvent> {
		for node in &mut self.nodes {
			node.weight = 0;
		}
		let mut neighbors = vec![Vec::new(); self.nodes.len()];
		for link in &self.links {
			self.nodes[link.source].weight += 1;
			self.nodes[link.target].weight += 1;
			neighbors[link.source].push(link.target);
			neighbors[link.target].push(link.source);
		}

		// Nodes placed at a neighbor are offset by under half a unit so a hub's
		// leaves never stack on a single point.
		for i in 0..self.nodes.len() {
			if self.nodes[i].x.is_nan() {
				let near = neighbors[i]
					.iter()
					.map(|&j| self.nodes[j].x)
					.find(|x| !x.is_nan());
				self.nodes[i].x = match near {
					Some(x) => x + self.rng.next_f64() - 0.5,
					None => self.rng.next_f64() * self.width,
				};
			}
			if self.nodes[i].y.is_nan() {
				let near = neighbors[i]
					.iter()
					.map(|&j| self.nodes[j].y)
					.find(|y| !y.is_nan());
				self.nodes[i].y = match near {
					Some(y) => y + self.rng.next_f64() - 0.5,
					None => self.rng.next_f64() * self.height,
				};
			}
			let node = &mut self.nodes[i];
			if node.px.is_nan() {
				node.px = node.x;
			}
			if node.py.is_nan() {
				node.py = node.y;
			}
		}

		info!(
			"force-chart: layout started with {} nodes, {} links",
			self.nodes.len(),
			self.links.len()
		);
		self.resume()
	}

	/// Reheats the layout. Reports `Start` when it was at rest.
	pub fn resume(&mut self) -> Option<LayoutEvent> {
		let was_running = self.is_running();
		self.alpha = self.config.initial_alpha;
		(!was_running).then_some(LayoutEvent::Start { alpha: self.alpha })
	}

	/// Puts the layout at rest immediately.
	pub fn stop(&mut self) {
		self.alpha = 0.0;
	}

	/// Runs one relaxation step.
	///
	/// Ticking a layout at rest reports `End` again and moves nothing.
	pub fn tick(&mut self) -> LayoutEvent {
		if !self.is_running() {
			return LayoutEvent::End;
		}
		self.alpha *= self.config.alpha_decay;
		if self.alpha < self.config.alpha_min {
			self.alpha = 0.0;
			info!("force-chart: layout settled");
			return LayoutEvent::End;
		}

		self.apply_links();
		self.apply_gravity();
		self.apply_charge();
		self.integrate();

		LayoutEvent::Tick { alpha: self.alpha }
	}

	fn apply_links(&mut self) {
		let (distance, strength) = (self.config.link_distance, self.config.link_strength);
		for link in &self.links {
			let (s, t) = (&self.nodes[link.source], &self.nodes[link.target]);
			let (mut dx, mut dy) = (t.x - s.x, t.y - s.y);
			let l2 = dx * dx + dy * dy;
			if l2 == 0.0 || !l2.is_finite() {
				continue;
			}
			let l = l2.sqrt();
			let k = self.alpha * strength * (l - distance) / l;
			dx *= k;
			dy *= k;

			let share = s.weight as f64 / (t.weight + s.weight) as f64;
			let target = &mut self.nodes[link.target];
			target.x -= dx * share;
			target.y -= dy * share;
			let source = &mut self.nodes[link.source];
			source.x += dx * (1.0 - share);
			source.y += dy * (1.0 - share);
		}
	}

	fn apply_gravity(&mut self) {
		let k = self.alpha * self.config.gravity;
		if k == 0.0 {
			return;
		}
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for node in &mut self.nodes {
			node.x += (cx - node.x) * k;
			node.y += (cy - node.y) * k;
		}
	}

	fn apply_charge(&mut self) {
		if self.config.charge == 0.0 {
			return;
		}
		let tree = ChargeTree::build(
			&mut self.nodes,
			self.alpha * self.config.charge,
			&mut self.rng,
		);
		let max_distance_sq = self.config.charge_distance * self.config.charge_distance;
		for (i, node) in self.nodes.iter_mut().enumerate() {
			if !node.is_fixed() {
				tree.repulse(i, node, self.config.theta, max_distance_sq);
			}
		}
	}

	fn integrate(&mut self) {
		let friction = self.config.friction;
		for node in &mut self.nodes {
			if node.is_fixed() {
				node.x = node.px;
				node.y = node.py;
			} else {
				let (x, y) = (node.x, node.y);
				node.x -= (node.px - x) * friction;
				node.y -= (node.py - y) * friction;
				node.px = x;
				node.py = y;
			}
		}
	}

	/// Pins a node for the duration of a drag.
	pub fn drag_start(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.fixed |= DRAGGING;
		}
	}

	/// Moves a dragged node and reheats the layout.
	pub fn drag_to(&mut self, index: usize, x: f64, y: f64) -> Option<LayoutEvent> {
		let node = self.nodes.get_mut(index)?;
		node.px = x;
		node.py = y;
		self.resume()
	}

	/// Releases the drag and hover pins. Document pins stay.
	pub fn drag_end(&mut self, index: usize) {
		if let Some(node) = self.nodes.get_mut(index) {
			node.fixed &= !(DRAGGING | HOVERED);
		}
	}

	/// Holds a node still while the pointer is over it.
	pub fn hover(&mut self, index: usize, over: bool) {
		let Some(node) = self.nodes.get_mut(index) else {
			return;
		};
		if over {
			node.fixed |= HOVERED;
			node.px = node.x;
			node.py = node.y;
		} else {
			node.fixed &= !HOVERED;
		}
	}
}
