//! Graph state: node/edge types, the store and the JSON exchange format.

mod document;
mod store;
mod types;

use thiserror::Error;

pub use document::{DocumentError, EXPORT_FILE_NAME, export_json, import_json};
pub use store::GraphStore;
pub use types::{EdgeColor, EdgeDraft, EdgeId, GraphNode, GraphSnapshot, NodeColor, NodeFont, NodeId};

/// Integrity violations rejected by the store.
#[derive(Debug, Error)]
pub enum GraphError {
	#[error("duplicate node id '{0}'")]
	DuplicateNode(NodeId),

	#[error("duplicate edge id '{0}'")]
	DuplicateEdge(EdgeId),

	#[error("edge references unknown node '{0}'")]
	UnknownEndpoint(NodeId),

	#[error("edge '{edge}' references unknown node '{node}'")]
	DanglingEdge { edge: EdgeId, node: NodeId },
}
