//! The `graph.json` exchange format.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use super::GraphError;
use super::store::GraphStore;
use super::types::{GraphEdge, GraphNode};

/// File name offered when exporting.
pub const EXPORT_FILE_NAME: &str = "graph.json";

/// Errors raised while importing a graph file.
#[derive(Debug, Error)]
pub enum DocumentError {
	#[error("Invalid JSON: {0}")]
	InvalidJson(#[from] serde_json::Error),

	#[error("Invalid graph: {0}")]
	InvalidGraph(#[from] GraphError),
}

/// Missing or `null` containers read as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
	#[serde(default, deserialize_with = "or_empty")]
	pub nodes: Vec<GraphNode>,
	#[serde(default, deserialize_with = "or_empty")]
	pub edges: Vec<GraphEdge>,
}

fn or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de>,
{
	Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphDocument {
	pub fn from_store(store: &GraphStore) -> Self {
		let (nodes, edges) = store.get_all();
		Self {
			nodes: nodes.to_vec(),
			edges: edges.to_vec(),
		}
	}

	pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
		serde_json::to_string_pretty(self)
	}

	pub fn parse(text: &str) -> Result<Self, DocumentError> {
		Ok(serde_json::from_str(text)?)
	}
}

/// Serializes the store as a pretty-printed document.
pub fn export_json(store: &GraphStore) -> Result<String, serde_json::Error> {
	GraphDocument::from_store(store).to_pretty_json()
}

/// Parses `text` and replaces the whole graph with it. Nothing changes
/// unless the document parses and validates.
pub fn import_json(store: &mut GraphStore, text: &str) -> Result<(), DocumentError> {
	let doc = GraphDocument::parse(text)?;
	store.replace_all(doc.nodes, doc.edges)?;
	Ok(())
}
