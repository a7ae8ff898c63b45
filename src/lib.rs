//! topology-graph: Interactive, degree-filtered visualization of large network
//! topologies.
//!
//! The [`topology`] module is the reduction engine: it normalizes raw node/link
//! data, indexes node degrees, and decides which nodes and links are visible
//! under a density threshold and the user's expand/collapse clicks. The
//! [`ForceGraphCanvas`] component draws whatever the engine leaves visible.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod topology;

pub use components::force_graph::ForceGraphCanvas;
pub use config::ViewerConfig;
pub use topology::{RawGraph, RawLink, RawNode};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("topology-graph: logging initialized");
}

/// Text content of the `<script>` element with the given id.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<RawGraph> {
	let json_text = script_text("graph-data")?;

	match serde_json::from_str::<RawGraph>(&json_text) {
		Ok(data) => {
			info!(
				"topology-graph: read {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("topology-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load viewer settings from a script element with id="viewer-config".
fn load_config() -> ViewerConfig {
	let Some(json_text) = script_text("viewer-config") else {
		return ViewerConfig::default();
	};

	ViewerConfig::from_json(&json_text).unwrap_or_else(|e| {
		warn!("topology-graph: invalid viewer config, using defaults: {}", e);
		ViewerConfig::default()
	})
}

/// Main application component.
/// Loads graph data and settings from the DOM and renders the filtered view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	let config = load_config();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Network Topology" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<ForceGraphCanvas data=graph_signal config=config fullscreen=true />
			<div class="graph-overlay">
				<h1>"Network Topology"</h1>
				<p class="subtitle">
					"Click a node to expand its links, or a leaf to hide it. Drag to pin. Scroll to zoom."
				</p>
			</div>
		</div>
	}
}
