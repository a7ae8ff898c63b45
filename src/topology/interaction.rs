//! Click/hover/threshold state machine layered over degree visibility.
//!
//! The controller never owns the graph. Callers hand it the graph for each
//! event, then call [`recompute`] when the returned [`Outcome`] asks for it:
//!
//! ```ignore
//! let outcome = controller.apply(&mut graph, InteractionEvent::Click(id))?;
//! if outcome.needs_recompute() {
//!     view = recompute(&graph);
//! }
//! ```

use log::{debug, info};

use super::error::{Result, TopologyError};
use super::normalize::TopologyGraph;
use super::types::RawGraph;
use super::visibility::{PrunedView, Threshold, recompute};

/// A discrete user interaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InteractionEvent {
	/// A node was clicked.
	Click(String),
	/// The pointer entered a node, or left all nodes (`None`).
	Hover(Option<String>),
	/// Flip between "show all" and the configured default threshold.
	ToggleThreshold,
	/// Set an explicit threshold. Negative values mean "show all".
	SetThreshold(i64),
}

/// What an event did to node visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
	/// The clicked node was a leaf or isolated and is now hidden.
	Collapsed,
	/// The clicked node and all of its neighbors are now visible.
	Expanded,
	/// Visibility was recomputed for a new threshold.
	ThresholdChanged(Threshold),
	/// Visibility is untouched.
	Unchanged,
}

impl Outcome {
	/// Whether the caller must derive a new pruned view.
	pub fn needs_recompute(self) -> bool {
		!matches!(self, Self::Unchanged)
	}
}

/// Per-session interaction state: current threshold and hovered node.
#[derive(Clone, Debug)]
pub struct InteractionController {
	threshold: Threshold,
	default_threshold: Threshold,
	hovered: Option<String>,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self::new(Threshold::DEFAULT)
	}
}

impl InteractionController {
	/// Start a session filtering at `default_threshold`.
	pub fn new(default_threshold: Threshold) -> Self {
		Self {
			threshold: default_threshold,
			default_threshold,
			hovered: None,
		}
	}

	/// The threshold currently in effect.
	pub fn threshold(&self) -> Threshold {
		self.threshold
	}

	/// The threshold restored by [`InteractionEvent::ToggleThreshold`].
	pub fn default_threshold(&self) -> Threshold {
		self.default_threshold
	}

	/// Id of the node under the pointer, if any.
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// Rebuild `graph` from `raw`, apply the current threshold, and return the
	/// initial view. The hover is cleared since it may name a node that no
	/// longer exists. On error `graph` keeps its previous contents.
	pub fn load(&mut self, graph: &mut TopologyGraph, raw: &RawGraph) -> Result<PrunedView> {
		graph.reload(raw)?;
		self.hovered = None;
		graph.apply_threshold(self.threshold);
		let view = recompute(graph);
		info!(
			"topology-graph: loaded {} nodes, {} links; {} visible at threshold {}",
			graph.node_count(),
			graph.edge_count(),
			view.nodes.len(),
			self.threshold
		);
		Ok(view)
	}

	/// Apply `event` to `graph`.
	///
	/// Only node visibility is mutated. Fails only for clicks on ids that are
	/// not in the graph, in which case nothing changes.
	pub fn apply(&mut self, graph: &mut TopologyGraph, event: InteractionEvent) -> Result<Outcome> {
		match event {
			InteractionEvent::Click(id) => self.click(graph, &id),
			InteractionEvent::Hover(id) => {
				self.hovered = id.filter(|id| graph.index().slot(id).is_some());
				Ok(Outcome::Unchanged)
			}
			InteractionEvent::ToggleThreshold => {
				let next = if self.threshold.shows_all() {
					self.default_threshold
				} else {
					Threshold::SHOW_ALL
				};
				info!("topology-graph: threshold toggled to {}", next);
				Ok(self.set_threshold(graph, next))
			}
			InteractionEvent::SetThreshold(value) => {
				Ok(self.set_threshold(graph, Threshold::from_signed(value)))
			}
		}
	}

	fn set_threshold(&mut self, graph: &mut TopologyGraph, threshold: Threshold) -> Outcome {
		self.threshold = threshold;
		graph.apply_threshold(threshold);
		Outcome::ThresholdChanged(threshold)
	}

	fn click(&mut self, graph: &mut TopologyGraph, id: &str) -> Result<Outcome> {
		let index = graph.index();
		let slot = index
			.slot(id)
			.ok_or_else(|| TopologyError::UnknownNode(id.to_string()))?;

		if index.degree(slot) <= 1 {
			graph.nodes[slot].visible = false;
			debug!("topology-graph: collapsed {}", id);
			return Ok(Outcome::Collapsed);
		}

		let mut reveal = Vec::with_capacity(index.degree(slot) + 1);
		for &edge_idx in index.incident(slot) {
			let edge = &graph.edges[edge_idx];
			for endpoint in [&edge.endpoint_a, &edge.endpoint_b] {
				if let Some(neighbor) = index.slot(endpoint) {
					reveal.push(neighbor);
				}
			}
		}
		for neighbor in reveal {
			graph.nodes[neighbor].visible = true;
		}
		debug!("topology-graph: expanded {}", id);
		Ok(Outcome::Expanded)
	}
}
