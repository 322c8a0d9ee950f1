//! Browser tests for the SVG surface. Run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]
#![allow(unused_crate_dependencies)]

use force_chart::components::force_graph::scene::ChartScene;
use force_chart::components::force_graph::simulation::ForceLayout;
use force_chart::components::force_graph::svg::SvgSurface;
use force_chart::components::force_graph::{FillFallback, GraphData, LayoutConfig};
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

const EXAMPLE: &str = r#"{"nodes":[{"id":"A","size":10,"colour":[10,20,30]},{"id":"B","size":100}],
	"links":[{"source":0,"target":1,"value":4}]}"#;

fn container() -> Element {
	let document = web_sys::window().unwrap().document().unwrap();
	let div = document.create_element("div").unwrap();
	document.body().unwrap().append_child(&div).unwrap();
	div
}

fn number(element: &Element, name: &str) -> f64 {
	element.get_attribute(name).unwrap().parse().unwrap()
}

#[wasm_bindgen_test]
fn attaches_fixed_size_svg() {
	let host = container();
	let surface = SvgSurface::attach(&host, 300.0, 300.0).unwrap();

	assert_eq!(surface.root().tag_name(), "svg");
	assert_eq!(surface.root().get_attribute("width").as_deref(), Some("300"));
	assert_eq!(surface.root().get_attribute("height").as_deref(), Some("300"));
	assert_eq!(host.child_element_count(), 1);
}

#[wasm_bindgen_test]
fn binds_and_updates_shapes() {
	let data = GraphData::from_json(EXAMPLE).unwrap();
	let mut layout = ForceLayout::new(LayoutConfig::default(), 300.0, 300.0, &data).unwrap();
	layout.start();
	let mut scene = ChartScene::bind(&data, &layout, &FillFallback::default());

	let host = container();
	let mut surface = SvgSurface::attach(&host, 300.0, 300.0).unwrap();
	surface.bind(&scene).unwrap();

	assert_eq!(surface.root().child_element_count(), 3);
	assert_eq!(surface.lines().len(), 1);
	assert_eq!(surface.circles().len(), 2);

	let line = &surface.lines()[0];
	assert_eq!(line.get_attribute("class").as_deref(), Some("link"));
	assert_eq!(surface.circles()[0].get_attribute("class").as_deref(), Some("node"));
	assert_eq!(line.get_attribute("style").as_deref(), Some("stroke-width: 2"));

	let (a, b) = (&surface.circles()[0], &surface.circles()[1]);
	assert_eq!(number(a, "r"), 10.0);
	assert_eq!(number(b, "r"), 20.0);
	assert_eq!(a.get_attribute("style").as_deref(), Some("fill: rgb(10,20,30)"));
	assert_eq!(b.get_attribute("style").as_deref(), Some("fill: red"));
	assert_eq!(a.text_content().as_deref(), Some("A"));

	for _ in 0..5 {
		layout.tick();
		scene.sync(&layout);
		surface.update(&scene).unwrap();

		let nodes = layout.nodes();
		assert_eq!(number(a, "cx"), nodes[0].x);
		assert_eq!(number(b, "cy"), nodes[1].y);
		assert_eq!(number(line, "x2"), nodes[1].x);
	}
}

#[wasm_bindgen_test]
fn sets_surface_opacity() {
	let surface = SvgSurface::attach(&container(), 300.0, 300.0).unwrap();
	surface.set_opacity(0.5).unwrap();
	assert_eq!(surface.root().get_attribute("style").as_deref(), Some("opacity: 0.5"));
}
