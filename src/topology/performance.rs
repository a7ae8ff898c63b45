//! Renderer tuning derived from graph size.

use serde::Serialize;

/// Parameters handed to the renderer to keep large graphs responsive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RenderTuning {
	/// Simulation ticks to run after each view change before freezing layout.
	pub cooldown_ticks: u32,
	/// Segments used to approximate each node disc.
	pub node_resolution: u32,
}

impl RenderTuning {
	/// Tuning for a graph with `node_count` nodes.
	pub fn for_node_count(node_count: usize) -> Self {
		let (cooldown_ticks, node_resolution) = match node_count {
			n if n > 2500 => (0, 4),
			n if n > 1000 => (5, 6),
			_ => (20, 8),
		};
		Self {
			cooldown_ticks,
			node_resolution,
		}
	}
}
