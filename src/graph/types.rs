use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Wraps a raw identifier.
			pub fn new(raw: impl Into<String>) -> Self {
				Self(raw.into())
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(raw: &str) -> Self {
				Self(raw.to_owned())
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				RawId::deserialize(deserializer).map(|raw| Self(raw.into_string()))
			}
		}
	};
}

/// Ids arrive as strings from our own exports but as numbers from some
/// backends and older exports.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Int(i64),
	UInt(u64),
	Float(f64),
}

impl RawId {
	fn into_string(self) -> String {
		match self {
			RawId::Text(s) => s,
			RawId::Int(n) => n.to_string(),
			RawId::UInt(n) => n.to_string(),
			RawId::Float(n) => n.to_string(),
		}
	}
}

string_id!(
	/// Identifier of a node in the graph.
	NodeId
);
string_id!(
	/// Identifier of an edge in the graph.
	EdgeId
);

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeColor {
	pub background: String,
	pub border: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeFont {
	pub color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeColor {
	pub color: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub highlight: Option<String>,
}

/// A node as stored, exported and rendered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: NodeId,
	#[serde(default)]
	pub label: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<NodeColor>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub font: Option<NodeFont>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub title: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub shape: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub size: Option<f64>,
}

impl GraphNode {
	/// A plain node with no styling.
	pub fn labelled(id: NodeId, label: impl Into<String>) -> Self {
		Self {
			id,
			label: label.into(),
			color: None,
			font: None,
			title: None,
			shape: None,
			size: None,
		}
	}
}

/// A directed edge between two nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
	pub id: EdgeId,
	pub from: NodeId,
	pub to: NodeId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub arrows: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<EdgeColor>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub width: Option<f64>,
}

/// Everything an edge needs except its id, which the store assigns.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeDraft {
	pub from: NodeId,
	pub to: NodeId,
	pub label: Option<String>,
	pub arrows: Option<String>,
	pub color: Option<EdgeColor>,
	pub width: Option<f64>,
}

impl EdgeDraft {
	/// An unstyled edge.
	pub fn plain(from: NodeId, to: NodeId) -> Self {
		Self {
			from,
			to,
			label: None,
			arrows: None,
			color: None,
			width: None,
		}
	}

	pub(crate) fn into_edge(self, id: EdgeId) -> GraphEdge {
		GraphEdge {
			id,
			from: self.from,
			to: self.to,
			label: self.label,
			arrows: self.arrows,
			color: self.color,
			width: self.width,
		}
	}
}

/// Owned copy of the graph handed to the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub revision: u64,
	pub nodes: Vec<GraphNode>,
	pub edges: Vec<GraphEdge>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_ids_are_read_as_text() {
		let node: GraphNode = serde_json::from_str(r#"{"id": 1718000000123, "label": "X"}"#).unwrap();
		assert_eq!(node.id.to_string(), "1718000000123");

		let edge: GraphEdge =
			serde_json::from_str(r#"{"id": "e1-2", "from": 1, "to": "2"}"#).unwrap();
		assert_eq!(edge.from, NodeId::from("1"));
		assert_eq!(edge.to, NodeId::from("2"));
	}

	#[test]
	fn ids_beyond_i64_keep_every_digit() {
		let node: GraphNode = serde_json::from_str(r#"{"id": 18446744073709551615, "label": "Max"}"#).unwrap();
		assert_eq!(node.id, NodeId::from("18446744073709551615"));

		let node: GraphNode = serde_json::from_str(r#"{"id": -7, "label": "Neg"}"#).unwrap();
		assert_eq!(node.id, NodeId::from("-7"));
	}

	#[test]
	fn absent_styling_is_not_serialized() {
		let node = GraphNode::labelled(NodeId::from("n1"), "Central");
		let json = serde_json::to_value(&node).unwrap();
		assert_eq!(json, serde_json::json!({"id": "n1", "label": "Central"}));
	}
}
