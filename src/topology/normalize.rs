//! Conversion of raw loader output into the canonical indexed graph.

use log::{debug, warn};

use super::adjacency::AdjacencyIndex;
use super::error::Result;
use super::types::{Edge, Node, RawGraph, RawLink, RawNode};
use super::visibility::{Threshold, compute_visibility};

/// Color given to nodes that arrive without one.
pub const NEUTRAL_GRAY: &str = "#808080";

/// Raw color value meaning "no color".
pub const NO_COLOR_SENTINEL: &str = "#000000";

/// Fixed palette for link colors.
pub const LINK_PALETTE: [&str; 4] = ["#e8a33d", "#5fa8d3", "#8bc34a", "#c77dba"];

/// Picks a palette entry for a link id.
///
/// FNV-1a over the id bytes, so the same link gets the same color on every
/// load and in every build.
pub fn link_color(id: &str) -> &'static str {
	const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
	const PRIME: u64 = 0x0000_0100_0000_01b3;

	let hash = id
		.bytes()
		.fold(OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(PRIME));
	LINK_PALETTE[(hash % LINK_PALETTE.len() as u64) as usize]
}

fn canonical_node(raw: &RawNode) -> Node {
	let display_name = raw
		.name
		.as_deref()
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.unwrap_or(&raw.id)
		.to_string();
	let color = raw
		.color
		.as_deref()
		.map(str::trim)
		.filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(NO_COLOR_SENTINEL))
		.unwrap_or(NEUTRAL_GRAY)
		.to_string();

	Node {
		id: raw.id.clone(),
		display_name,
		color,
		visible: false,
	}
}

fn canonical_edge(raw: &RawLink) -> Edge {
	Edge {
		id: raw.id.clone(),
		endpoint_a: raw.source.clone(),
		endpoint_b: raw.target.clone(),
		capacity: raw.capacity,
		color: link_color(&raw.id).to_string(),
	}
}

/// The canonical in-memory graph for one raw-data load.
#[derive(Clone, Debug, Default)]
pub struct TopologyGraph {
	/// Nodes in input order.
	pub nodes: Vec<Node>,
	/// Edges in input order.
	pub edges: Vec<Edge>,
	index: AdjacencyIndex,
}

impl TopologyGraph {
	/// Normalize `raw` with a fresh normalizer.
	pub fn from_raw(raw: &RawGraph) -> Result<Self> {
		GraphNormalizer::default().normalize(raw)
	}

	/// Replace this graph with a normalization of `raw`.
	///
	/// The existing index is reset before rebuilding. On error `self` is left
	/// unchanged.
	pub fn reload(&mut self, raw: &RawGraph) -> Result<()> {
		let mut normalizer = GraphNormalizer {
			index: std::mem::take(&mut self.index),
		};
		match normalizer.normalize(raw) {
			Ok(graph) => {
				*self = graph;
				Ok(())
			}
			Err(e) => {
				self.index = AdjacencyIndex::build(
					self.nodes.iter().map(|n| n.id.as_str()),
					&self.edges,
				)?;
				Err(e)
			}
		}
	}

	/// The adjacency index built for this graph.
	pub fn index(&self) -> &AdjacencyIndex {
		&self.index
	}

	/// Degree of the node with the given id.
	pub fn degree_of(&self, id: &str) -> Result<usize> {
		self.index.degree_of(id)
	}

	/// Reset every node's visibility to `degree >= threshold`.
	pub fn apply_threshold(&mut self, threshold: Threshold) {
		let Self { nodes, index, .. } = self;
		compute_visibility(nodes, index, threshold);
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}
}

/// Builds [`TopologyGraph`]s from raw input.
///
/// Holds an index buffer that is reused across passes and cleared at the start
/// of each one, so normalizing the same input repeatedly always yields the same
/// degrees.
#[derive(Debug, Default)]
pub struct GraphNormalizer {
	index: AdjacencyIndex,
}

impl GraphNormalizer {
	/// Normalize `raw` into a canonical graph with a freshly built index.
	///
	/// Fails without producing a graph if any link references an unknown node
	/// or if a node id repeats.
	pub fn normalize(&mut self, raw: &RawGraph) -> Result<TopologyGraph> {
		self.index.clear();

		let nodes = raw.nodes.iter().map(canonical_node).collect::<Vec<_>>();
		let edges = raw.links.iter().map(canonical_edge).collect::<Vec<_>>();

		if let Err(e) = self
			.index
			.rebuild(nodes.iter().map(|n| n.id.as_str()), &edges)
		{
			warn!("topology-graph: rejected input graph: {}", e);
			return Err(e);
		}

		debug!(
			"topology-graph: normalized {} nodes, {} links",
			nodes.len(),
			edges.len()
		);

		Ok(TopologyGraph {
			nodes,
			edges,
			index: std::mem::take(&mut self.index),
		})
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::topology::error::TopologyError;
	use crate::topology::fixtures::raw;

	fn degrees(graph: &TopologyGraph) -> Vec<usize> {
		graph
			.nodes
			.iter()
			.map(|n| graph.degree_of(&n.id).unwrap())
			.collect()
	}

	#[test]
	fn applies_name_and_color_defaults() {
		let input = RawGraph {
			nodes: vec![
				RawNode {
					id: "a".into(),
					name: Some("Alpha".into()),
					color: Some("#3399ff".into()),
				},
				RawNode {
					id: "b".into(),
					name: Some("  ".into()),
					color: Some(NO_COLOR_SENTINEL.into()),
				},
				RawNode {
					id: "c".into(),
					..Default::default()
				},
			],
			links: Vec::new(),
		};
		let graph = TopologyGraph::from_raw(&input).unwrap();

		assert_eq!(graph.nodes[0].display_name, "Alpha");
		assert_eq!(graph.nodes[0].color, "#3399ff");
		assert_eq!(graph.nodes[1].display_name, "b");
		assert_eq!(graph.nodes[1].color, NEUTRAL_GRAY);
		assert_eq!(graph.nodes[2].color, NEUTRAL_GRAY);
	}

	#[test]
	fn link_colors_are_deterministic_palette_entries() {
		let graph = TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b")])).unwrap();
		let again = TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b")])).unwrap();

		assert!(LINK_PALETTE.contains(&graph.edges[0].color.as_str()));
		assert_eq!(graph.edges[0].color, again.edges[0].color);
		assert_eq!(link_color("ab"), link_color("ab"));
	}

	#[test]
	fn normalizing_twice_keeps_degrees() {
		let input = raw(&["a", "b", "c"], &[("ab", "a", "b"), ("bc", "b", "c")]);
		let mut normalizer = GraphNormalizer::default();
		let first = normalizer.normalize(&input).unwrap();
		let second = normalizer.normalize(&input).unwrap();

		assert_eq!(degrees(&first), vec![1, 2, 1]);
		assert_eq!(degrees(&first), degrees(&second));
	}

	#[test]
	fn reload_rebuilds_instead_of_patching() {
		let mut graph = TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b")])).unwrap();
		graph
			.reload(&raw(&["a", "b"], &[("ab", "a", "b")]))
			.unwrap();
		assert_eq!(degrees(&graph), vec![1, 1]);

		graph
			.reload(&raw(&["x", "y", "z"], &[("xy", "x", "y"), ("xz", "x", "z")]))
			.unwrap();
		assert_eq!(degrees(&graph), vec![2, 1, 1]);
		assert!(graph.degree_of("a").is_err());
	}

	#[test]
	fn failed_reload_keeps_previous_graph() {
		let mut graph = TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b")])).unwrap();
		let err = graph
			.reload(&raw(&["a"], &[("ab", "a", "missing")]))
			.unwrap_err();

		assert!(matches!(err, TopologyError::UnknownEndpoint { .. }));
		assert_eq!(graph.node_count(), 2);
		assert_eq!(degrees(&graph), vec![1, 1]);
	}

	#[test]
	fn unknown_endpoint_is_fatal() {
		let err = TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b"), ("bq", "b", "q")]))
			.unwrap_err();
		assert_eq!(
			err,
			TopologyError::UnknownEndpoint {
				edge: "bq".into(),
				endpoint: "q".into()
			}
		);
	}

	#[test]
	fn self_loop_counts_once_and_keeps_the_graph() {
		let graph =
			TopologyGraph::from_raw(&raw(&["a", "b"], &[("ab", "a", "b"), ("aa", "a", "a")])).unwrap();

		assert_eq!(graph.edge_count(), 2);
		assert_eq!(degrees(&graph), vec![2, 1]);
		assert_eq!(graph.index().total_degree(), 3);
	}

	fn arb_graph() -> impl Strategy<Value = RawGraph> {
		(1usize..24).prop_flat_map(|n| {
			proptest::collection::vec((0..n, 0..n), 0..60).prop_map(move |pairs| {
				let ids = (0..n).map(|i| format!("n{i}")).collect::<Vec<_>>();
				let links = pairs
					.into_iter()
					.filter(|(a, b)| a != b)
					.enumerate()
					.map(|(i, (a, b))| RawLink {
						id: format!("l{i}"),
						capacity: i as u64,
						source: ids[a].clone(),
						target: ids[b].clone(),
					})
					.collect();
				RawGraph {
					nodes: ids
						.iter()
						.map(|id| RawNode {
							id: id.clone(),
							..Default::default()
						})
						.collect(),
					links,
				}
			})
		})
	}

	proptest! {
		#[test]
		fn degree_sum_is_twice_edge_count(input in arb_graph()) {
			let graph = TopologyGraph::from_raw(&input).unwrap();
			let sum: usize = degrees(&graph).iter().sum();
			prop_assert_eq!(sum, 2 * graph.edge_count());
			prop_assert_eq!(graph.index().total_degree(), sum);
		}

		#[test]
		fn renormalizing_is_idempotent(input in arb_graph()) {
			let mut normalizer = GraphNormalizer::default();
			let first = normalizer.normalize(&input).unwrap();
			let second = normalizer.normalize(&input).unwrap();
			prop_assert_eq!(degrees(&first), degrees(&second));
		}
	}
}
