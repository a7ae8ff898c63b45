//! Degree-threshold visibility and pruned-view derivation.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::adjacency::AdjacencyIndex;
use super::normalize::TopologyGraph;
use super::types::{Edge, Node};

/// Minimum degree a node needs to be visible under density filtering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u32")]
pub struct Threshold(u32);

impl Threshold {
	/// Default density cut-off.
	pub const DEFAULT: Self = Self(30);
	/// Threshold that shows every node.
	pub const SHOW_ALL: Self = Self(0);

	/// Create a threshold of `value`.
	pub const fn new(value: u32) -> Self {
		Self(value)
	}

	/// Create a threshold from a possibly negative value. Negative values mean
	/// "show all".
	pub fn from_signed(value: i64) -> Self {
		Self(value.clamp(0, i64::from(u32::MAX)) as u32)
	}

	/// The minimum degree.
	pub const fn get(self) -> u32 {
		self.0
	}

	/// Whether this threshold lets every node through.
	pub const fn shows_all(self) -> bool {
		self.0 == 0
	}

	/// Whether a node of `degree` passes this threshold.
	pub fn admits(self, degree: usize) -> bool {
		degree >= self.0 as usize
	}
}

impl Default for Threshold {
	fn default() -> Self {
		Self::DEFAULT
	}
}

impl From<i64> for Threshold {
	fn from(value: i64) -> Self {
		Self::from_signed(value)
	}
}

impl From<Threshold> for u32 {
	fn from(value: Threshold) -> Self {
		value.0
	}
}

impl fmt::Display for Threshold {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// The subset of the graph currently eligible for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrunedView {
	/// Visible nodes, in graph order.
	pub nodes: Vec<Node>,
	/// Edges whose endpoints are both visible, in graph order.
	#[serde(rename = "links")]
	pub edges: Vec<Edge>,
}

impl PrunedView {
	/// Whether nothing is visible.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Whether a node with `id` is in the view.
	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.iter().any(|n| n.id == id)
	}
}

/// Set every node's visibility to `degree >= threshold`.
///
/// `nodes` must be the slice the index was built over. Nothing from the
/// previous visibility state survives.
pub fn compute_visibility(nodes: &mut [Node], index: &AdjacencyIndex, threshold: Threshold) {
	for (slot, node) in nodes.iter_mut().enumerate() {
		node.visible = threshold.admits(index.degree(slot));
	}
}

/// Select visible nodes and the edges between them.
pub fn derive_pruned_view(nodes: &[Node], edges: &[Edge], index: &AdjacencyIndex) -> PrunedView {
	let is_visible = |id: &str| {
		index
			.slot(id)
			.and_then(|slot| nodes.get(slot))
			.is_some_and(|n| n.visible)
	};

	PrunedView {
		nodes: nodes.iter().filter(|n| n.visible).cloned().collect(),
		edges: edges
			.iter()
			.filter(|e| is_visible(&e.endpoint_a) && is_visible(&e.endpoint_b))
			.cloned()
			.collect(),
	}
}

/// Derive a fresh pruned view of `graph` from its current node visibility.
pub fn recompute(graph: &TopologyGraph) -> PrunedView {
	let view = derive_pruned_view(&graph.nodes, &graph.edges, graph.index());
	debug!(
		"topology-graph: view has {}/{} nodes, {}/{} links",
		view.nodes.len(),
		graph.node_count(),
		view.edges.len(),
		graph.edge_count()
	);
	view
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::topology::fixtures::{raw, star_and_path};

	fn graph(nodes: &[&str], links: &[(&str, &str, &str)]) -> TopologyGraph {
		TopologyGraph::from_raw(&raw(nodes, links)).unwrap()
	}

	#[test]
	fn negative_threshold_means_show_all() {
		assert_eq!(Threshold::from_signed(-5), Threshold::SHOW_ALL);
		assert_eq!(Threshold::from_signed(12).get(), 12);
		assert!(Threshold::SHOW_ALL.admits(0));
		assert_eq!(Threshold::default(), Threshold::DEFAULT);

		let parsed: Threshold = serde_json::from_str("-3").unwrap();
		assert!(parsed.shows_all());
	}

	#[test]
	fn default_threshold_hides_sparse_graph() {
		let mut g = graph(&["a", "b", "c"], &[("ab", "a", "b"), ("bc", "b", "c")]);
		g.apply_threshold(Threshold::DEFAULT);

		assert!(recompute(&g).is_empty());
		assert!(recompute(&g).edges.is_empty());
	}

	#[test]
	fn zero_threshold_view_is_full_graph() {
		let mut g = star_and_path();
		g.apply_threshold(Threshold::SHOW_ALL);
		let view = recompute(&g);

		assert_eq!(view.nodes, g.nodes);
		assert_eq!(view.edges, g.edges);
	}

	#[test]
	fn edges_need_both_endpoints_visible() {
		let mut g = graph(&["a", "b", "c"], &[("ab", "a", "b"), ("bc", "b", "c")]);
		g.apply_threshold(Threshold::new(2));
		let view = recompute(&g);

		assert_eq!(view.nodes.len(), 1);
		assert!(view.contains_node("b"));
		assert!(view.edges.is_empty());
	}

	#[test]
	fn self_loop_shows_with_its_node() {
		let mut g = graph(&["a", "b"], &[("aa", "a", "a")]);
		g.apply_threshold(Threshold::new(1));
		let view = recompute(&g);

		assert!(view.contains_node("a"));
		assert!(!view.contains_node("b"));
		assert_eq!(view.edges.len(), 1);
	}

	#[test]
	fn recompute_is_not_incremental() {
		let mut g = star_and_path();
		let index = g.index().clone();
		compute_visibility(&mut g.nodes, &index, Threshold::SHOW_ALL);
		compute_visibility(&mut g.nodes, &index, Threshold::new(3));

		let visible = g
			.nodes
			.iter()
			.filter(|n| n.visible)
			.map(|n| n.id.as_str())
			.collect::<Vec<_>>();
		assert_eq!(visible, vec!["hub"]);
	}

	proptest! {
		#[test]
		fn visibility_matches_degree(t in 0u32..6) {
			let mut g = star_and_path();
			g.apply_threshold(Threshold::new(t));
			for node in &g.nodes {
				let degree = g.degree_of(&node.id).unwrap();
				prop_assert_eq!(node.visible, degree >= t as usize);
			}

			let view = recompute(&g);
			for edge in &g.edges {
				let both = view.contains_node(&edge.endpoint_a) && view.contains_node(&edge.endpoint_b);
				prop_assert_eq!(view.edges.contains(edge), both);
			}
		}
	}
}
