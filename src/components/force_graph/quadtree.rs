//! Barnes-Hut quadtree used to approximate pairwise charge repulsion.
//!
//! Each cell stores the total charge and the charge-weighted center of the
//! bodies below it. A body far enough from a cell (cell width / distance below
//! `theta`) is pushed by the cell as a whole instead of by every body in it.

use super::simulation::{Lcg, LayoutNode};

/// Bodies closer than this (Manhattan distance) share a leaf.
const COINCIDENT: f64 = 0.01;

/// A body stored in a leaf, at its position after jiggling.
#[derive(Clone, Copy, Debug)]
struct Body {
	index: usize,
	x: f64,
	y: f64,
}

#[derive(Clone, Debug)]
struct Quad {
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
	/// Coincident bodies held by a leaf. Empty for inner cells.
	bodies: Vec<Body>,
	children: [Option<usize>; 4],
	charge: f64,
	point_charge: f64,
	cx: f64,
	cy: f64,
}

impl Quad {
	fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
		Self {
			x1,
			y1,
			x2,
			y2,
			bodies: Vec::new(),
			children: [None; 4],
			charge: 0.0,
			point_charge: 0.0,
			cx: 0.0,
			cy: 0.0,
		}
	}

	fn is_leaf(&self) -> bool {
		self.children.iter().all(Option::is_none)
	}
}

/// Quadtree over the finite node positions of one tick.
///
/// Tree depth is bounded by the spread of the positions, not by the number of
/// bodies: bodies at the same spot are kept together in a single leaf.
pub struct ChargeTree {
	quads: Vec<Quad>,
}

impl ChargeTree {
	/// Builds the tree and accumulates `charge` per body.
	///
	/// Bodies with non-finite coordinates carry no charge and feel none from
	/// the tree. Coincident bodies are jiggled apart by up to half a unit.
	pub fn build(nodes: &mut [LayoutNode], charge: f64, rng: &mut Lcg) -> Self {
		let mut tree = Self { quads: Vec::new() };

		let finite: Vec<usize> = (0..nodes.len())
			.filter(|&i| nodes[i].x.is_finite() && nodes[i].y.is_finite())
			.collect();
		if finite.is_empty() {
			return tree;
		}

		let (mut x1, mut y1, mut x2, mut y2) = (
			f64::INFINITY,
			f64::INFINITY,
			f64::NEG_INFINITY,
			f64::NEG_INFINITY,
		);
		for &i in &finite {
			x1 = x1.min(nodes[i].x);
			y1 = y1.min(nodes[i].y);
			x2 = x2.max(nodes[i].x);
			y2 = y2.max(nodes[i].y);
		}
		let (dx, dy) = (x2 - x1, y2 - y1);
		if dx > dy {
			y2 = y1 + dx;
		} else {
			x2 = x1 + dy;
		}

		tree.quads.push(Quad::new(x1, y1, x2, y2));
		for &i in &finite {
			tree.insert(i, nodes);
		}
		tree.jiggle(nodes, rng);
		tree.accumulate(0, charge);
		tree
	}

	/// Total charge held by the tree.
	pub fn total_charge(&self) -> f64 {
		self.quads.first().map_or(0.0, |q| q.charge)
	}

	/// Charge-weighted center of the whole tree.
	pub fn center(&self) -> Option<(f64, f64)> {
		self.quads.first().map(|q| (q.cx, q.cy))
	}

	/// Deepest cell below the root; the root sits at depth 0.
	pub fn depth(&self) -> usize {
		fn walk(tree: &ChargeTree, q: usize) -> usize {
			tree.quads[q]
				.children
				.iter()
				.flatten()
				.map(|&c| 1 + walk(tree, c))
				.max()
				.unwrap_or(0)
		}
		if self.quads.is_empty() { 0 } else { walk(self, 0) }
	}

	fn insert(&mut self, i: usize, nodes: &[LayoutNode]) {
		let body = Body {
			index: i,
			x: nodes[i].x,
			y: nodes[i].y,
		};
		let mut q = 0;
		loop {
			if self.quads[q].is_leaf() {
				let Some(first) = self.quads[q].bodies.first().copied() else {
					self.quads[q].bodies.push(body);
					return;
				};
				if (first.x - body.x).abs() + (first.y - body.y).abs() < COINCIDENT {
					self.quads[q].bodies.push(body);
					return;
				}
				// Split: the resident bodies move down together.
				let resident = std::mem::take(&mut self.quads[q].bodies);
				let child = self.child_for(q, first.x, first.y);
				self.quads[child].bodies = resident;
			}
			q = self.child_for(q, body.x, body.y);
		}
	}

	/// Child cell of `q` containing `(x, y)`, created on demand.
	fn child_for(&mut self, q: usize, x: f64, y: f64) -> usize {
		let Quad { x1, y1, x2, y2, .. } = self.quads[q];
		let (sx, sy) = ((x1 + x2) * 0.5, (y1 + y2) * 0.5);
		let (right, below) = (x >= sx, y >= sy);
		let slot = ((below as usize) << 1) | right as usize;

		if let Some(child) = self.quads[q].children[slot] {
			return child;
		}
		let (cx1, cx2) = if right { (sx, x2) } else { (x1, sx) };
		let (cy1, cy2) = if below { (sy, y2) } else { (y1, sy) };
		self.quads.push(Quad::new(cx1, cy1, cx2, cy2));
		let child = self.quads.len() - 1;
		self.quads[q].children[slot] = Some(child);
		child
	}

	fn jiggle(&mut self, nodes: &mut [LayoutNode], rng: &mut Lcg) {
		for quad in &mut self.quads {
			// The first body of a leaf stays put, the rest are duplicates.
			for body in quad.bodies.iter_mut().skip(1) {
				let node = &mut nodes[body.index];
				node.x += rng.next_f64() - 0.5;
				node.y += rng.next_f64() - 0.5;
				(body.x, body.y) = (node.x, node.y);
			}
		}
	}

	fn accumulate(&mut self, q: usize, charge: f64) {
		let (mut total, mut cx, mut cy) = (0.0, 0.0, 0.0);

		for slot in 0..4 {
			let Some(child) = self.quads[q].children[slot] else {
				continue;
			};
			self.accumulate(child, charge);
			let c = &self.quads[child];
			total += c.charge;
			cx += c.charge * c.cx;
			cy += c.charge * c.cy;
		}

		let quad = &mut self.quads[q];
		if !quad.bodies.is_empty() {
			quad.point_charge = charge;
			for body in &quad.bodies {
				total += charge;
				cx += charge * body.x;
				cy += charge * body.y;
			}
		}
		quad.charge = total;
		quad.cx = cx / total;
		quad.cy = cy / total;
	}

	/// Applies the tree's repulsion to body `i` by shifting its previous
	/// position, so the push turns into velocity on the next integration.
	pub fn repulse(&self, i: usize, node: &mut LayoutNode, theta: f64, max_distance_sq: f64) {
		if !self.quads.is_empty() && node.x.is_finite() && node.y.is_finite() {
			self.visit(0, i, node, theta, max_distance_sq);
		}
	}

	fn visit(&self, q: usize, i: usize, node: &mut LayoutNode, theta: f64, max_distance_sq: f64) {
		let quad = &self.quads[q];
		let holds_self = quad.bodies.iter().any(|b| b.index == i);

		if !holds_self {
			let (dx, dy) = (quad.cx - node.x, quad.cy - node.y);
			let d2 = dx * dx + dy * dy;
			if (quad.x2 - quad.x1) / d2.sqrt() < theta {
				if d2 < max_distance_sq {
					let k = quad.charge / d2;
					node.px -= dx * k;
					node.py -= dy * k;
				}
				return;
			}
		}

		for body in quad.bodies.iter().filter(|b| b.index != i) {
			let (dx, dy) = (body.x - node.x, body.y - node.y);
			let d2 = dx * dx + dy * dy;
			if d2 > 0.0 && d2 < max_distance_sq {
				let k = quad.point_charge / d2;
				node.px -= dx * k;
				node.py -= dy * k;
			}
		}

		if quad.charge == 0.0 {
			return;
		}
		for child in quad.children.iter().flatten() {
			self.visit(*child, i, node, theta, max_distance_sq);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn body(x: f64, y: f64) -> LayoutNode {
		LayoutNode::at(x, y)
	}

	#[test]
	fn accumulates_total_charge_and_center() {
		let mut nodes = vec![body(0.0, 0.0), body(100.0, 0.0), body(50.0, 90.0)];
		let tree = ChargeTree::build(&mut nodes, -2.0, &mut Lcg::new(1));

		assert!((tree.total_charge() - -6.0).abs() < 1e-12);
		let (cx, cy) = tree.center().unwrap();
		assert!((cx - 50.0).abs() < 1e-9);
		assert!((cy - 30.0).abs() < 1e-9);
	}

	#[test]
	fn exact_when_theta_is_zero() {
		let mut nodes = vec![body(0.0, 0.0), body(30.0, 40.0), body(-60.0, 80.0)];
		let charge = -8.0;
		let tree = ChargeTree::build(&mut nodes, charge, &mut Lcg::new(1));

		let mut expected = nodes.clone();
		for i in 0..3 {
			for j in 0..3 {
				if i == j {
					continue;
				}
				let (dx, dy) = (nodes[j].x - nodes[i].x, nodes[j].y - nodes[i].y);
				let k = charge / (dx * dx + dy * dy);
				expected[i].px -= dx * k;
				expected[i].py -= dy * k;
			}
		}

		for i in 0..3 {
			let mut node = nodes[i].clone();
			tree.repulse(i, &mut node, 0.0, f64::INFINITY);
			assert!((node.px - expected[i].px).abs() < 1e-9, "px of {i}");
			assert!((node.py - expected[i].py).abs() < 1e-9, "py of {i}");
		}
	}

	#[test]
	fn negative_charge_pushes_apart() {
		let mut nodes = vec![body(0.0, 0.0), body(10.0, 0.0)];
		let tree = ChargeTree::build(&mut nodes, -1.0, &mut Lcg::new(1));

		let mut left = nodes[0].clone();
		tree.repulse(0, &mut left, 0.8, f64::INFINITY);
		// A previous position further right means a velocity to the left.
		assert!(left.px > 0.0);
		assert_eq!(left.py, 0.0);
	}

	#[test]
	fn coincident_bodies_are_separated() {
		let mut nodes = vec![body(5.0, 5.0), body(5.0, 5.0)];
		ChargeTree::build(&mut nodes, -1.0, &mut Lcg::new(7));
		assert!(nodes[0].x != nodes[1].x || nodes[0].y != nodes[1].y);
	}

	#[test]
	fn coincident_bodies_share_a_leaf() {
		let mut nodes: Vec<LayoutNode> = (0..100_000).map(|_| body(150.0, 150.0)).collect();
		nodes.push(body(0.0, 0.0));
		let tree = ChargeTree::build(&mut nodes, -1.0, &mut Lcg::new(3));

		assert!(tree.depth() <= 2, "depth {}", tree.depth());
		assert!((tree.total_charge() - -100_001.0).abs() < 1e-6);

		let mut stray = nodes[100_000].clone();
		tree.repulse(100_000, &mut stray, 0.8, f64::INFINITY);
		assert!(stray.px.is_finite() && stray.py.is_finite());
	}

	#[test]
	fn ignores_non_finite_bodies() {
		let mut nodes = vec![body(f64::NAN, 0.0), body(1.0, 1.0)];
		let tree = ChargeTree::build(&mut nodes, -1.0, &mut Lcg::new(1));
		assert!((tree.total_charge() - -1.0).abs() < 1e-12);

		let mut stray = nodes[0].clone();
		tree.repulse(0, &mut stray, 0.8, f64::INFINITY);
		assert!(stray.px.is_nan());
	}
}
