//! Leptos component that loads the document and drives the chart.
//!
//! On mount the component appends the SVG surface to its host element, fetches
//! the document and, once it arrives, starts the layout, binds the shapes and
//! begins an animation loop via `requestAnimationFrame`. Each frame advances
//! the fade-in and, while the layout is running, ticks it and copies the new
//! positions onto the shapes. Mouse handlers on the circles and the window
//! implement dragging.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};

use super::config::ChartConfig;
use super::error::{ChartError, Result};
use super::loader::{LoadState, load_graph};
use super::scene::ChartScene;
use super::simulation::{ForceLayout, LayoutEvent};
use super::svg::SvgSurface;
use super::transition::FadeIn;
use super::types::GraphData;

type Shared<T> = Rc<RefCell<Option<T>>>;
type MouseHandlers = Rc<RefCell<Vec<Closure<dyn FnMut(MouseEvent)>>>>;

/// Pointer events a circle reacts to.
#[derive(Clone, Copy, Debug)]
enum NodeAction {
	Grab,
	Enter,
	Leave,
}

/// Everything that lives once the document is loaded.
struct ChartRuntime {
	layout: ForceLayout,
	scene: ChartScene,
	surface: SvgSurface,
	fade: FadeIn,
	fade_started: f64,
	fade_done: bool,
	dragging: Option<usize>,
}

impl ChartRuntime {
	/// Starts the layout and draws the shapes at their initial positions.
	fn start(config: &ChartConfig, data: &GraphData, mut surface: SvgSurface) -> Result<Self> {
		let mut layout = ForceLayout::new(config.layout.clone(), config.width, config.height, data)?;
		layout.start();

		let scene = ChartScene::bind(data, &layout, &config.fallback);
		surface.bind(&scene)?;
		surface.set_opacity(config.fade.from)?;

		Ok(Self {
			layout,
			scene,
			surface,
			fade: config.fade.clone(),
			fade_started: js_sys::Date::now(),
			fade_done: false,
			dragging: None,
		})
	}

	/// One animation frame at time `now` (ms).
	fn frame(&mut self, now: f64) -> Result<()> {
		if !self.fade_done {
			let elapsed = now - self.fade_started;
			self.surface.set_opacity(self.fade.opacity_at(elapsed))?;
			self.fade_done = self.fade.is_done(elapsed);
		}

		if self.layout.is_running() {
			if let LayoutEvent::Tick { .. } = self.layout.tick() {
				self.scene.sync(&self.layout);
				self.surface.update(&self.scene)?;
			}
		}
		Ok(())
	}

	fn node_event(&mut self, index: usize, action: NodeAction, ev: &MouseEvent) {
		match action {
			NodeAction::Grab => {
				ev.prevent_default();
				self.dragging = Some(index);
				self.layout.drag_start(index);
			}
			NodeAction::Enter => self.layout.hover(index, true),
			NodeAction::Leave => self.layout.hover(index, false),
		}
	}

	fn pointer_moved(&mut self, ev: &MouseEvent) {
		let Some(index) = self.dragging else {
			return;
		};
		let (x, y) = self
			.surface
			.to_local(ev.client_x() as f64, ev.client_y() as f64);
		if let Some(LayoutEvent::Start { alpha }) = self.layout.drag_to(index, x, y) {
			debug!("force-chart: drag reheated layout to alpha {}", alpha);
		}
	}

	fn pointer_released(&mut self) {
		if let Some(index) = self.dragging.take() {
			self.layout.drag_end(index);
		}
	}
}

/// Registers `handler` for `event` on `target` and keeps the closure alive.
fn listen(
	target: &web_sys::EventTarget,
	event: &str,
	handler: impl FnMut(MouseEvent) + 'static,
	handlers: &MouseHandlers,
) -> Result<()> {
	let cb = Closure::<dyn FnMut(MouseEvent)>::new(handler);
	target.add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
	handlers.borrow_mut().push(cb);
	Ok(())
}

/// Attaches drag and hover handling to every circle, and move/release
/// tracking to the window so a drag survives leaving the circle.
fn install_drag(runtime: &Shared<ChartRuntime>, handlers: &MouseHandlers) -> Result<()> {
	let window = web_sys::window().ok_or_else(|| ChartError::Dom("no window".into()))?;
	let circles: Vec<Element> = match *runtime.borrow() {
		Some(ref rt) => rt.surface.circles().to_vec(),
		None => return Ok(()),
	};

	for (index, circle) in circles.iter().enumerate() {
		for (event, action) in [
			("mousedown", NodeAction::Grab),
			("mouseover", NodeAction::Enter),
			("mouseout", NodeAction::Leave),
		] {
			let rt = runtime.clone();
			listen(
				circle,
				event,
				move |ev| {
					if let Some(ref mut r) = *rt.borrow_mut() {
						r.node_event(index, action, &ev);
					}
				},
				handlers,
			)?;
		}
	}

	let rt_move = runtime.clone();
	listen(
		&window,
		"mousemove",
		move |ev| {
			if let Some(ref mut r) = *rt_move.borrow_mut() {
				r.pointer_moved(&ev);
			}
		},
		handlers,
	)?;

	let rt_up = runtime.clone();
	listen(
		&window,
		"mouseup",
		move |_| {
			if let Some(ref mut r) = *rt_up.borrow_mut() {
				r.pointer_released();
			}
		},
		handlers,
	)
}

/// Starts the animation frame loop. It runs for the lifetime of the page.
fn run_frames(runtime: &Shared<ChartRuntime>, animate: &Shared<Closure<dyn FnMut()>>) {
	let (runtime_anim, animate_inner) = (runtime.clone(), animate.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		if let Some(ref mut rt) = *runtime_anim.borrow_mut() {
			if let Err(e) = rt.frame(js_sys::Date::now()) {
				warn!("force-chart: frame failed: {}", e);
			}
		}
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	}));
	if let (Some(window), Some(cb)) = (web_sys::window(), animate.borrow().as_ref()) {
		let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
	}
}

/// Renders the force-directed chart described by `config`.
///
/// The host `<div>` exposes the loader's progress in `data-state`
/// (`idle`, `fetching`, `loaded` or `failed`). A failed load leaves the
/// surface empty.
#[component]
pub fn ForceChart(config: ChartConfig) -> impl IntoView {
	let host_ref = NodeRef::<leptos::html::Div>::new();
	let load_state = RwSignal::new(LoadState::Idle);
	let runtime: Shared<ChartRuntime> = Rc::new(RefCell::new(None));
	let animate: Shared<Closure<dyn FnMut()>> = Rc::new(RefCell::new(None));
	let handlers: MouseHandlers = Rc::new(RefCell::new(Vec::new()));

	Effect::new(move |_| {
		let Some(host) = host_ref.get() else {
			return;
		};
		if load_state.get_untracked() != LoadState::Idle {
			return;
		}
		let host: &Element = host.as_ref();

		let surface = match SvgSurface::attach(host, config.width, config.height) {
			Ok(surface) => surface,
			Err(e) => {
				error!("force-chart: cannot create surface: {}", e);
				return;
			}
		};

		let (config, runtime, animate, handlers) = (
			config.clone(),
			runtime.clone(),
			animate.clone(),
			handlers.clone(),
		);
		spawn_local(async move {
			let Some(data) = load_graph(&config.data_url, move |s| load_state.set(s)).await else {
				return;
			};

			match ChartRuntime::start(&config, &data, surface) {
				Ok(rt) => *runtime.borrow_mut() = Some(rt),
				Err(e) => {
					warn!("force-chart: cannot draw {}: {}", config.data_url, e);
					load_state.set(LoadState::Failed);
					return;
				}
			}
			if let Err(e) = install_drag(&runtime, &handlers) {
				warn!("force-chart: dragging unavailable: {}", e);
			}
			run_frames(&runtime, &animate);
		});
	});

	view! { <div node_ref=host_ref class="force-chart" data-state=move || load_state.get().as_str() /> }
}
