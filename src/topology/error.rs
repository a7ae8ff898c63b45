//! Errors raised while building or querying a topology graph.

/// Integrity failures in the input graph or in a query against it.
///
/// Every variant is a caller/data error surfaced synchronously; nothing here is
/// retried or recovered internally.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
	/// A link references a node id that is not in the node set.
	#[error("link `{edge}` references unknown node `{endpoint}`")]
	UnknownEndpoint {
		/// Id of the offending link.
		edge: String,
		/// The endpoint id that could not be resolved.
		endpoint: String,
	},
	/// A query named a node id that is not in the adjacency index.
	#[error("unknown node `{0}`")]
	UnknownNode(String),
	/// Two node records share the same id.
	#[error("duplicate node id `{0}`")]
	DuplicateNode(String),
}

/// Shorthand result type for topology operations.
pub type Result<T, E = TopologyError> = std::result::Result<T, E>;
