//! SVG surface the chart is drawn on.
//!
//! Shapes are created once with `document.createElementNS` and then only have
//! their coordinate attributes rewritten, so the DOM keeps the same elements
//! for the lifetime of the page.

use log::debug;
use web_sys::{Document, Element};

use super::error::{ChartError, Result};
use super::scene::ChartScene;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Writes a numeric attribute. Non-finite values are skipped so the element
/// keeps its previous (or default) value.
fn set_number(element: &Element, name: &str, value: f64) -> Result<()> {
	if value.is_finite() {
		element.set_attribute(name, &value.to_string())?;
	} else {
		debug!("force-chart: skipping non-finite {}={}", name, value);
	}
	Ok(())
}

/// An `<svg>` element with one `line.link` per link and one `circle.node`
/// per node.
pub struct SvgSurface {
	document: Document,
	root: Element,
	lines: Vec<Element>,
	circles: Vec<Element>,
}

impl SvgSurface {
	/// Appends a `width` x `height` `<svg>` to `container`.
	pub fn attach(container: &Element, width: f64, height: f64) -> Result<Self> {
		let document = container
			.owner_document()
			.ok_or_else(|| ChartError::Dom("container has no owner document".into()))?;
		let root = document.create_element_ns(Some(SVG_NS), "svg")?;
		set_number(&root, "width", width)?;
		set_number(&root, "height", height)?;
		container.append_child(&root)?;

		Ok(Self {
			document,
			root,
			lines: Vec::new(),
			circles: Vec::new(),
		})
	}

	/// The `<svg>` element.
	pub fn root(&self) -> &Element {
		&self.root
	}

	/// Circle elements in node order.
	pub fn circles(&self) -> &[Element] {
		&self.circles
	}

	/// Line elements in link order.
	pub fn lines(&self) -> &[Element] {
		&self.lines
	}

	/// Creates the shapes for `scene`. Lines go first so circles paint on top.
	pub fn bind(&mut self, scene: &ChartScene) -> Result<()> {
		for link in scene.links() {
			let line = self.document.create_element_ns(Some(SVG_NS), "line")?;
			line.set_attribute("class", "link")?;
			if link.stroke_width.is_finite() {
				line.set_attribute("style", &format!("stroke-width: {}", link.stroke_width))?;
			}
			self.root.append_child(&line)?;
			self.lines.push(line);
		}

		for node in scene.nodes() {
			let circle = self.document.create_element_ns(Some(SVG_NS), "circle")?;
			circle.set_attribute("class", "node")?;
			set_number(&circle, "r", node.radius)?;
			circle.set_attribute("style", &format!("fill: {}", node.fill))?;

			let title = self.document.create_element_ns(Some(SVG_NS), "title")?;
			title.set_text_content(Some(&node.title));
			circle.append_child(&title)?;

			self.root.append_child(&circle)?;
			self.circles.push(circle);
		}

		self.update(scene)
	}

	/// Rewrites every shape's coordinates from `scene`.
	pub fn update(&self, scene: &ChartScene) -> Result<()> {
		for (line, link) in self.lines.iter().zip(scene.links()) {
			set_number(line, "x1", link.x1)?;
			set_number(line, "y1", link.y1)?;
			set_number(line, "x2", link.x2)?;
			set_number(line, "y2", link.y2)?;
		}
		for (circle, node) in self.circles.iter().zip(scene.nodes()) {
			set_number(circle, "cx", node.cx)?;
			set_number(circle, "cy", node.cy)?;
		}
		Ok(())
	}

	/// Sets the opacity of the whole surface.
	pub fn set_opacity(&self, opacity: f64) -> Result<()> {
		self.root
			.set_attribute("style", &format!("opacity: {}", opacity))?;
		Ok(())
	}

	/// Converts viewport coordinates to surface coordinates.
	pub fn to_local(&self, client_x: f64, client_y: f64) -> (f64, f64) {
		let rect = self.root.get_bounding_client_rect();
		(client_x - rect.left(), client_y - rect.top())
	}
}
