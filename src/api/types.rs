use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::graph::NodeId;

/// Body of `/api/search_graph/` and `/api/graph/`.
///
/// Missing or `null` containers decode as empty, entries that are not
/// usable objects are skipped, and extra fields such as `matches` or
/// `traversal` are ignored.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphResponse {
	#[serde(default, deserialize_with = "lenient_list")]
	pub nodes: Vec<EntityNode>,
	#[serde(default, deserialize_with = "lenient_list")]
	pub relations: Vec<Relation>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct EntityNode {
	pub id: NodeId,
	#[serde(default, deserialize_with = "lenient_text")]
	pub label: Option<String>,
	#[serde(default, rename = "type", deserialize_with = "lenient_text")]
	pub kind: Option<String>,
	#[serde(default, deserialize_with = "truthy")]
	pub highlight: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Relation {
	#[serde(default, deserialize_with = "lenient_id")]
	pub source: Option<NodeId>,
	#[serde(default, deserialize_with = "lenient_id")]
	pub target: Option<NodeId>,
	#[serde(default, deserialize_with = "lenient_text")]
	pub relation: Option<String>,
}

/// Ontology values pass through the backend untouched, so one odd entry
/// must not sink the whole response.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
	D: Deserializer<'de>,
	T: DeserializeOwned,
{
	let Value::Array(items) = Value::deserialize(deserializer)? else {
		return Ok(Vec::new());
	};
	Ok(items
		.into_iter()
		.filter_map(|item| match serde_json::from_value(item) {
			Ok(parsed) => Some(parsed),
			Err(err) => {
				log::warn!("skipping malformed entry: {err}");
				None
			}
		})
		.collect())
}

/// Strings as-is, numbers and booleans printed, lists joined with ", ".
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
	Ok(display_text(Value::deserialize(deserializer)?))
}

fn display_text(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Array(items) => {
			let parts: Vec<String> = items.into_iter().filter_map(display_text).collect();
			(!parts.is_empty()).then(|| parts.join(", "))
		}
		Value::Null | Value::Object(_) => None,
	}
}

/// An endpoint that is not a string or number counts as missing.
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NodeId>, D::Error> {
	let value = Value::deserialize(deserializer)?;
	Ok(serde_json::from_value(value).ok())
}

/// The backend sends `highlight` as a boolean, but anything truthy counts.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
	let value = Value::deserialize(deserializer)?;
	Ok(match value {
		Value::Null => false,
		Value::Bool(b) => b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	})
}

#[derive(Clone, Debug, Serialize)]
pub struct ChatRequest<'a> {
	pub query: &'a str,
}

/// Reply of `/api/query/`. Shown as `answer` when present, raw JSON
/// otherwise.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatReply(pub Value);

impl ChatReply {
	pub fn display_text(&self) -> String {
		match self.0.get("answer") {
			Some(Value::String(answer)) if !answer.is_empty() => answer.clone(),
			_ => self.0.to_string(),
		}
	}
}

/// Reply of `/api/upload/`. Any JSON shape is accepted.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadReply(pub Value);

impl UploadReply {
	pub const FALLBACK: &'static str = "Uploaded";

	pub fn message(&self) -> &str {
		match self.0.get("message") {
			Some(Value::String(message)) if !message.is_empty() => message,
			_ => Self::FALLBACK,
		}
	}
}

/// A local file staged for `/api/upload/`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
	pub name: String,
	pub bytes: Vec<u8>,
}
