//! Graph reduction and interactive visibility engine.
//!
//! Turns a raw topology (participants and capacity-weighted links) into an
//! indexed graph and decides which part of it is shown:
//! - [`GraphNormalizer`] builds a [`TopologyGraph`] with its [`AdjacencyIndex`]
//! - [`compute_visibility`] applies a degree [`Threshold`] to every node
//! - [`derive_pruned_view`] / [`recompute`] select what the renderer draws
//! - [`InteractionController`] expands and collapses nodes on click
//! - [`RenderTuning`] scales renderer effort with graph size
//!
//! Nothing here touches the DOM, so the whole engine is testable natively.

mod adjacency;
mod error;
mod interaction;
mod normalize;
mod performance;
mod types;
mod visibility;

pub use adjacency::AdjacencyIndex;
pub use error::{Result, TopologyError};
pub use interaction::{InteractionController, InteractionEvent, Outcome};
pub use normalize::{
	GraphNormalizer, LINK_PALETTE, NEUTRAL_GRAY, NO_COLOR_SENTINEL, TopologyGraph, link_color,
};
pub use performance::RenderTuning;
pub use types::{
	Edge, EdgeIdx, LINK_SOURCE_ACCESSOR, LINK_TARGET_ACCESSOR, NODE_ID_ACCESSOR, Node, NodeIdx,
	RawGraph, RawLink, RawNode,
};
pub use visibility::{PrunedView, Threshold, compute_visibility, derive_pruned_view, recompute};

#[cfg(test)]
pub(crate) mod fixtures {
	use super::*;

	/// Raw graph with default names/colors and capacity 100 on every link.
	pub fn raw(nodes: &[&str], links: &[(&str, &str, &str)]) -> RawGraph {
		RawGraph {
			nodes: nodes
				.iter()
				.map(|id| RawNode {
					id: id.to_string(),
					..Default::default()
				})
				.collect(),
			links: links
				.iter()
				.map(|(id, a, b)| RawLink {
					id: id.to_string(),
					capacity: 100,
					source: a.to_string(),
					target: b.to_string(),
				})
				.collect(),
		}
	}

	/// `hub` joined to `s1..s3`, plus a tail `s1 - p1 - p2`.
	///
	/// Degrees: hub 3, s1 2, s2 1, s3 1, p1 2, p2 1.
	pub fn star_and_path() -> TopologyGraph {
		TopologyGraph::from_raw(&raw(
			&["hub", "s1", "s2", "s3", "p1", "p2"],
			&[
				("hub-s1", "hub", "s1"),
				("hub-s2", "hub", "s2"),
				("hub-s3", "hub", "s3"),
				("s1-p1", "s1", "p1"),
				("p1-p2", "p1", "p2"),
			],
		))
		.unwrap()
	}
}
