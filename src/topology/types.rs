//! Raw input records and the canonical node/edge records built from them.

use serde::{Deserialize, Serialize};

/// Field naming a node's unique identifier in serialized views.
pub const NODE_ID_ACCESSOR: &str = "id";
/// Field naming the first endpoint of a serialized edge.
pub const LINK_SOURCE_ACCESSOR: &str = "source";
/// Field naming the second endpoint of a serialized edge.
pub const LINK_TARGET_ACCESSOR: &str = "target";

/// Position of a node in [`TopologyGraph::nodes`](super::TopologyGraph::nodes).
pub type NodeIdx = usize;
/// Position of an edge in [`TopologyGraph::edges`](super::TopologyGraph::edges).
pub type EdgeIdx = usize;

/// A participant as delivered by the data loader.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawNode {
	/// Unique identifier. Links reference nodes by this value.
	pub id: String,
	/// Optional human-readable name.
	#[serde(default, alias = "alias", alias = "label")]
	pub name: Option<String>,
	/// Optional CSS color. `#000000` means "no color".
	#[serde(default)]
	pub color: Option<String>,
}

/// A weighted link between two participants.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawLink {
	/// Unique link identifier.
	#[serde(alias = "channel_id")]
	pub id: String,
	/// Link capacity in the network's base unit.
	#[serde(default)]
	pub capacity: u64,
	/// First endpoint id.
	#[serde(alias = "node1_pub")]
	pub source: String,
	/// Second endpoint id.
	#[serde(alias = "node2_pub")]
	pub target: String,
}

/// Complete raw graph: nodes and links.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RawGraph {
	/// Node records.
	#[serde(default)]
	pub nodes: Vec<RawNode>,
	/// Link records. Also accepted under the key `edges`.
	#[serde(default, alias = "edges")]
	pub links: Vec<RawLink>,
}

/// Canonical node record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
	/// Unique identifier.
	pub id: String,
	/// Label shown to the user; falls back to `id`.
	#[serde(rename = "name")]
	pub display_name: String,
	/// CSS color used to paint the node.
	pub color: String,
	/// Whether the node is part of the current pruned view. This is the only
	/// field that changes after normalization.
	pub visible: bool,
}

/// Canonical undirected edge record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Edge {
	/// Unique identifier.
	pub id: String,
	/// First endpoint id.
	#[serde(rename = "source")]
	pub endpoint_a: String,
	/// Second endpoint id.
	#[serde(rename = "target")]
	pub endpoint_b: String,
	/// Link capacity.
	pub capacity: u64,
	/// CSS color assigned from the link palette.
	pub color: String,
}

impl Edge {
	/// Both endpoint ids, in declaration order.
	pub fn endpoints(&self) -> (&str, &str) {
		(&self.endpoint_a, &self.endpoint_b)
	}

	/// Whether `id` is one of this edge's endpoints.
	pub fn touches(&self, id: &str) -> bool {
		self.endpoint_a == id || self.endpoint_b == id
	}
}
