//! Node → incident-edge index; the source of truth for degree queries.

use std::collections::HashMap;

use super::error::{Result, TopologyError};
use super::types::{Edge, EdgeIdx, NodeIdx};

/// Maps every node to the edges incident to it.
///
/// Slots are parallel to the owning graph's node vector, so lookups by
/// [`NodeIdx`] are O(1) and infallible. Lookups by id go through a hash map and
/// fail with [`TopologyError::UnknownNode`] when the id was never registered.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	slots: HashMap<String, NodeIdx>,
	incident: Vec<Vec<EdgeIdx>>,
	edge_count: usize,
}

impl AdjacencyIndex {
	/// Build a fresh index over `node_ids` and `edges`.
	pub fn build<'a, I>(node_ids: I, edges: &[Edge]) -> Result<Self>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let mut index = Self::default();
		index.rebuild(node_ids, edges)?;
		Ok(index)
	}

	/// Drop all registered nodes and edges.
	pub fn clear(&mut self) {
		self.slots.clear();
		self.incident.clear();
		self.edge_count = 0;
	}

	/// Clear, then register every node and every edge exactly once per
	/// distinct endpoint. On error the index is left cleared.
	pub fn rebuild<'a, I>(&mut self, node_ids: I, edges: &[Edge]) -> Result<()>
	where
		I: IntoIterator<Item = &'a str>,
	{
		self.clear();

		for id in node_ids {
			let slot = self.incident.len();
			if self.slots.insert(id.to_string(), slot).is_some() {
				self.clear();
				return Err(TopologyError::DuplicateNode(id.to_string()));
			}
			self.incident.push(Vec::new());
		}

		for (edge_idx, edge) in edges.iter().enumerate() {
			if let Err(e) = self.register(edge_idx, edge) {
				self.clear();
				return Err(e);
			}
		}

		Ok(())
	}

	fn register(&mut self, edge_idx: EdgeIdx, edge: &Edge) -> Result<()> {
		let resolve = |endpoint: &str| {
			self.slots
				.get(endpoint)
				.copied()
				.ok_or_else(|| TopologyError::UnknownEndpoint {
					edge: edge.id.clone(),
					endpoint: endpoint.to_string(),
				})
		};
		let a = resolve(&edge.endpoint_a)?;
		let b = resolve(&edge.endpoint_b)?;

		// A self-loop touches one distinct node, so it is listed once.
		self.incident[a].push(edge_idx);
		if b != a {
			self.incident[b].push(edge_idx);
		}
		self.edge_count += 1;
		Ok(())
	}

	/// Slot of the node with the given id, if registered.
	pub fn slot(&self, id: &str) -> Option<NodeIdx> {
		self.slots.get(id).copied()
	}

	/// Incident edges of the node in `slot`. Out-of-range slots have none.
	pub fn incident(&self, slot: NodeIdx) -> &[EdgeIdx] {
		self.incident.get(slot).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Number of edges incident to the node in `slot`.
	pub fn degree(&self, slot: NodeIdx) -> usize {
		self.incident(slot).len()
	}

	/// Incident edges of the node with the given id.
	pub fn incident_by_id(&self, id: &str) -> Result<&[EdgeIdx]> {
		self.slot(id)
			.map(|slot| self.incident(slot))
			.ok_or_else(|| TopologyError::UnknownNode(id.to_string()))
	}

	/// Degree of the node with the given id.
	pub fn degree_of(&self, id: &str) -> Result<usize> {
		self.incident_by_id(id).map(<[EdgeIdx]>::len)
	}

	/// Number of registered nodes.
	pub fn node_count(&self) -> usize {
		self.incident.len()
	}

	/// Number of registered edges.
	pub fn edge_count(&self) -> usize {
		self.edge_count
	}

	/// Sum of all node degrees: `2 * edge_count()` less one per self-loop.
	pub fn total_degree(&self) -> usize {
		self.incident.iter().map(Vec::len).sum()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn edge(id: &str, a: &str, b: &str) -> Edge {
		Edge {
			id: id.into(),
			endpoint_a: a.into(),
			endpoint_b: b.into(),
			capacity: 1,
			color: String::new(),
		}
	}

	#[test]
	fn registers_each_edge_under_both_endpoints() {
		let edges = vec![edge("ab", "a", "b"), edge("bc", "b", "c")];
		let index = AdjacencyIndex::build(["a", "b", "c"], &edges).unwrap();

		assert_eq!(index.degree_of("a").unwrap(), 1);
		assert_eq!(index.degree_of("b").unwrap(), 2);
		assert_eq!(index.incident_by_id("b").unwrap(), &[0, 1]);
		assert_eq!(index.total_degree(), 2 * index.edge_count());
	}

	#[test]
	fn rebuild_does_not_accumulate() {
		let edges = vec![edge("ab", "a", "b")];
		let mut index = AdjacencyIndex::build(["a", "b"], &edges).unwrap();
		index.rebuild(["a", "b"], &edges).unwrap();
		index.rebuild(["a", "b"], &edges).unwrap();

		assert_eq!(index.degree_of("a").unwrap(), 1);
		assert_eq!(index.edge_count(), 1);
	}

	#[test]
	fn unknown_endpoint_aborts_and_clears() {
		let edges = vec![edge("ab", "a", "b"), edge("ax", "a", "x")];
		let mut index = AdjacencyIndex::default();
		let err = index.rebuild(["a", "b"], &edges).unwrap_err();

		assert_eq!(
			err,
			TopologyError::UnknownEndpoint {
				edge: "ax".into(),
				endpoint: "x".into()
			}
		);
		assert_eq!(index.node_count(), 0);
		assert_eq!(index.edge_count(), 0);
	}

	#[test]
	fn unknown_node_query_is_an_error() {
		let index = AdjacencyIndex::build(["a"], &[]).unwrap();
		assert_eq!(index.degree_of("a").unwrap(), 0);
		assert_eq!(
			index.degree_of("zz").unwrap_err(),
			TopologyError::UnknownNode("zz".into())
		);
	}

	#[test]
	fn rejects_duplicate_node_ids() {
		assert_eq!(
			AdjacencyIndex::build(["a", "a"], &[]).unwrap_err(),
			TopologyError::DuplicateNode("a".into())
		);
	}

	#[test]
	fn self_loop_is_listed_once() {
		let edges = vec![edge("ab", "a", "b"), edge("aa", "a", "a")];
		let index = AdjacencyIndex::build(["a", "b"], &edges).unwrap();

		assert_eq!(index.incident_by_id("a").unwrap(), &[0, 1]);
		assert_eq!(index.degree_of("a").unwrap(), 2);
		assert_eq!(index.degree_of("b").unwrap(), 1);
		assert_eq!(index.edge_count(), 2);
		assert_eq!(index.total_degree(), 2 * index.edge_count() - 1);
	}
}
