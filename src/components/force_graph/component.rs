//! Leptos component wiring the topology engine to the canvas renderer.
//!
//! The component owns one [`TopologyGraph`] and [`InteractionController`] per
//! mount. Mouse events become [`InteractionEvent`]s; whenever an event changes
//! visibility the pruned view is recomputed and pushed into the simulation.
//! An animation loop runs via `requestAnimationFrame`, stepping the physics
//! until the cooldown budget is spent and redrawing every frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::scale::ScaleConfig;
use super::state::ForceGraphState;
use super::theme::Theme;
use crate::config::ViewerConfig;
use crate::topology::{
	InteractionController, InteractionEvent, PrunedView, RawGraph, RenderTuning, TopologyGraph,
	recompute,
};

/// Counts shown in the control bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct ViewSummary {
	visible_nodes: usize,
	visible_links: usize,
	total_nodes: usize,
	show_all: bool,
}

/// Bundles engine state with the simulation and visual configuration.
struct GraphContext {
	graph: TopologyGraph,
	controller: InteractionController,
	view: PrunedView,
	tuning: RenderTuning,
	state: ForceGraphState,
	scale: ScaleConfig,
	theme: Theme,
}

impl GraphContext {
	fn new(config: &ViewerConfig, width: f64, height: f64) -> Self {
		let tuning = RenderTuning::for_node_count(0);
		Self {
			graph: TopologyGraph::default(),
			controller: InteractionController::new(config.default_threshold),
			view: PrunedView::default(),
			tuning,
			state: ForceGraphState::new(width, height, tuning),
			scale: ScaleConfig::default(),
			theme: Theme::by_name(&config.theme),
		}
	}

	/// Rebuild everything from `raw`. Rejected input keeps the previous graph.
	fn load(&mut self, raw: &RawGraph) {
		match self.controller.load(&mut self.graph, raw) {
			Ok(view) => self.view = view,
			Err(e) => {
				warn!("topology-graph: keeping previous graph: {}", e);
				return;
			}
		}
		let tuning = RenderTuning::for_node_count(self.graph.node_count());
		if tuning != self.tuning {
			info!(
				"topology-graph: render tuning cooldown={} resolution={}",
				tuning.cooldown_ticks, tuning.node_resolution
			);
			self.tuning = tuning;
		}
		self.state.sync(&self.view, self.tuning);
	}

	fn dispatch(&mut self, event: InteractionEvent) {
		match self.controller.apply(&mut self.graph, event) {
			Ok(outcome) if outcome.needs_recompute() => {
				self.view = recompute(&self.graph);
				self.state.sync(&self.view, self.tuning);
			}
			Ok(_) => {}
			Err(e) => warn!("topology-graph: ignored interaction: {}", e),
		}
	}

	fn summary(&self) -> ViewSummary {
		ViewSummary {
			visible_nodes: self.view.nodes.len(),
			visible_links: self.view.edges.len(),
			total_nodes: self.graph.node_count(),
			show_all: self.controller.threshold().shows_all(),
		}
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn canvas_point(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = canvas?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

type SharedClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Renders a degree-filtered topology graph on a canvas element.
///
/// Pass raw graph data via the reactive `data` signal; every change triggers a
/// full rebuild of the graph and its adjacency index. The component sizes
/// itself to its parent container by default; set `fullscreen = true` to fill
/// the viewport and follow window resizes. Explicit `width`/`height` override
/// automatic sizing.
///
/// Click a node with more than one link to reveal its neighbors; click a leaf
/// to hide it. Dragging a node pins it in place.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<RawGraph>,
	#[prop(optional)] config: ViewerConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: SharedClosure = Rc::new(RefCell::new(None));
	let resize_cb: SharedClosure = Rc::new(RefCell::new(None));
	let frame_handle = Rc::new(Cell::new(None::<i32>));
	let summary = RwSignal::new(ViewSummary::default());

	let (context_init, animate_init, resize_cb_init, frame_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		frame_handle.clone(),
	);
	Effect::new(move |_| {
		let raw = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		if let Some(ref mut c) = *context_init.borrow_mut() {
			c.load(&raw);
			summary.set(c.summary());
			return;
		}

		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			warn!("topology-graph: canvas 2d context unavailable");
			return;
		};

		let mut graph_context = GraphContext::new(&config, w, h);
		graph_context.load(&raw);
		summary.set(graph_context.summary());
		*context_init.borrow_mut() = Some(graph_context);

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, frame_inner) =
			(context_init.clone(), animate_init.clone(), frame_init.clone());
		let last_frame = Cell::new(js_sys::Date::now());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let now = js_sys::Date::now();
			let dt = ((now - last_frame.replace(now)) / 1000.0).clamp(0.001, 0.05);
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.state.tick(dt as f32);
				render::render(&c.state, &ctx, &c.scale, &c.theme);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				frame_inner.set(
					web_sys::window()
						.and_then(|w| w.request_animation_frame(cb.as_ref().unchecked_ref()).ok()),
				);
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame_init.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let teardown = SendWrapper::new((resize_cb, animate, frame_handle));
	on_cleanup(move || {
		let (resize_cb, animate, frame_handle) = teardown.take();
		let window = web_sys::window();
		if let (Some(window), Some(handle)) = (window.as_ref(), frame_handle.take()) {
			let _ = window.cancel_animation_frame(handle);
		}
		if let (Some(window), Some(cb)) = (window.as_ref(), resize_cb.borrow_mut().take()) {
			let _ =
				window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		animate.borrow_mut().take();
	});

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_md.borrow_mut() {
			if let Some(idx) = c.state.node_at_position(x, y, &c.scale) {
				c.state.drag.active = true;
				c.state.drag.moved = false;
				c.state.drag.node_idx = Some(idx);
				c.state.drag.start_x = x;
				c.state.drag.start_y = y;
				c.state.graph.visit_nodes(|node| {
					if node.index() == idx {
						c.state.drag.node_start_x = node.x();
						c.state.drag.node_start_y = node.y();
					}
				});
			} else {
				c.state.pan.active = true;
				c.state.pan.start_x = x;
				c.state.pan.start_y = y;
				c.state.pan.transform_start_x = c.state.transform.x;
				c.state.pan.transform_start_y = c.state.transform.y;
			}
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active {
				c.state.drag_to(x, y);
			} else if c.state.pan.active {
				c.state.transform.x = c.state.pan.transform_start_x + (x - c.state.pan.start_x);
				c.state.transform.y = c.state.pan.transform_start_y + (y - c.state.pan.start_y);
			} else {
				let hovered = c.state.node_at_position(x, y, &c.scale);
				if hovered != c.state.hovered {
					c.state.hovered = hovered;
					let id = hovered.and_then(|idx| c.state.node_id(idx)).map(str::to_owned);
					c.dispatch(InteractionEvent::Hover(id));
				}
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			if c.state.drag.active
				&& let Some(idx) = c.state.drag.node_idx
			{
				if c.state.drag.moved {
					c.state.pin(idx);
				} else if let Some(id) = c.state.node_id(idx).map(str::to_owned) {
					c.dispatch(InteractionEvent::Click(id));
					summary.set(c.summary());
				}
			}
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.drag.active = false;
			c.state.drag.node_idx = None;
			c.state.pan.active = false;
			c.state.hovered = None;
			c.dispatch(InteractionEvent::Hover(None));
		}
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref.get().map(Into::into), &ev) else {
			return;
		};

		if let Some(ref mut c) = *context_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (c.state.transform.k * factor).clamp(0.05, 10.0);
			let ratio = new_k / c.state.transform.k;
			c.state.transform.x = x - (x - c.state.transform.x) * ratio;
			c.state.transform.y = y - (y - c.state.transform.y) * ratio;
			c.state.transform.k = new_k;
		}
	};

	let context_toggle = context.clone();
	let on_toggle = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_toggle.borrow_mut() {
			c.dispatch(InteractionEvent::ToggleThreshold);
			summary.set(c.summary());
		}
	};

	let context_reset = context;
	let on_reset = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_reset.borrow_mut() {
			c.state.reset_view();
		}
	};

	view! {
		<div class="topology-graph" style="position: relative;">
			<canvas
				node_ref=canvas_ref
				class="force-graph-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
			<div class="graph-controls">
				<button on:click=on_toggle>
					{move || if summary.get().show_all { "Filter by degree" } else { "Show all" }}
				</button>
				<button on:click=on_reset>"Reset view"</button>
				<span class="graph-stats">
					{move || {
						let s = summary.get();
						format!(
							"{} of {} nodes, {} links",
							s.visible_nodes, s.total_nodes, s.visible_links
						)
					}}
				</span>
			</div>
		</div>
	}
}
