//! Turning backend search results into canvas nodes and edges.

use std::fmt;

use crate::api::{EntityNode, GraphResponse, Relation};
use crate::graph::{EdgeColor, EdgeDraft, GraphNode, GraphStore, NodeColor, NodeFont, NodeId};

const NODE_BACKGROUND: &str = "#7c3aed";
const NODE_BORDER: &str = "#6c2aed";
const HIGHLIGHT_BACKGROUND: &str = "#ff7675";
const HIGHLIGHT_BORDER: &str = "#ff5f5f";
const NODE_FONT: &str = "#ffffff";
const NODE_SIZE: f64 = 15.0;
const HIGHLIGHT_SIZE: f64 = 20.0;
const EDGE_COLOR: &str = "#6c2aed";
const EDGE_WIDTH: f64 = 2.0;
const DEFAULT_RELATION: &str = "related_to";
const DEFAULT_KIND: &str = "Entity";

/// Status line under the query box.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SearchStatus {
	#[default]
	Idle,
	Searching,
	Success,
	NoMatches,
	/// A chat answer arrived; the canvas was left alone.
	Answered,
	Failed(String),
}

impl SearchStatus {
	pub fn is_searching(&self) -> bool {
		matches!(self, SearchStatus::Searching)
	}
}

impl fmt::Display for SearchStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SearchStatus::Idle => Ok(()),
			SearchStatus::Searching => f.write_str("Searching..."),
			SearchStatus::Success => f.write_str("Search successful"),
			SearchStatus::NoMatches => f.write_str("No matches found"),
			SearchStatus::Answered => f.write_str("Answer received"),
			SearchStatus::Failed(detail) => write!(f, "Search error: {detail}"),
		}
	}
}

/// Handed out on submit; only the newest ticket's response is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchState {
	status: SearchStatus,
	latest: u64,
}

impl SearchState {
	pub fn status(&self) -> &SearchStatus {
		&self.status
	}

	pub fn begin(&mut self) -> Ticket {
		self.latest += 1;
		self.status = SearchStatus::Searching;
		Ticket(self.latest)
	}

	pub fn is_current(&self, ticket: Ticket) -> bool {
		ticket.0 == self.latest
	}

	pub fn resolve(&mut self, status: SearchStatus) {
		self.status = status;
	}
}

/// What a rendered response put on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderSummary {
	pub nodes: usize,
	pub edges: usize,
	pub highlighted: Option<NodeId>,
}

pub fn entity_node(entity: &EntityNode) -> GraphNode {
	let (background, border, size) = if entity.highlight {
		(HIGHLIGHT_BACKGROUND, HIGHLIGHT_BORDER, HIGHLIGHT_SIZE)
	} else {
		(NODE_BACKGROUND, NODE_BORDER, NODE_SIZE)
	};
	let label = match entity.label.as_deref() {
		Some(label) if !label.is_empty() => label.to_string(),
		_ => entity.id.to_string(),
	};
	GraphNode {
		id: entity.id.clone(),
		label,
		color: Some(NodeColor {
			background: background.into(),
			border: border.into(),
		}),
		font: Some(NodeFont {
			color: NODE_FONT.into(),
		}),
		title: Some(format!("Type: {}", entity.kind.as_deref().unwrap_or(DEFAULT_KIND))),
		shape: Some("dot".into()),
		size: Some(size),
	}
}

/// `None` when either endpoint is missing.
pub fn relation_edge(relation: &Relation) -> Option<EdgeDraft> {
	let (from, to) = (relation.source.clone()?, relation.target.clone()?);
	let label = match relation.relation.as_deref() {
		Some(rel) if !rel.is_empty() => rel.to_string(),
		_ => DEFAULT_RELATION.to_string(),
	};
	Some(EdgeDraft {
		from,
		to,
		label: Some(label),
		arrows: Some("to".into()),
		color: Some(EdgeColor {
			color: EDGE_COLOR.into(),
			highlight: Some(HIGHLIGHT_BORDER.into()),
		}),
		width: Some(EDGE_WIDTH),
	})
}

/// Clears `store` and fills it from `response`. Duplicate node ids keep the
/// first occurrence; relations pointing at absent nodes are dropped.
pub fn render_response(store: &mut GraphStore, response: &GraphResponse) -> RenderSummary {
	store.clear();

	let mut highlighted = None;
	for entity in &response.nodes {
		match store.insert_node(entity_node(entity)) {
			Ok(()) if entity.highlight && highlighted.is_none() => highlighted = Some(entity.id.clone()),
			Ok(()) => {}
			Err(err) => log::warn!("skipping search node: {err}"),
		}
	}

	let mut edges = 0;
	for relation in &response.relations {
		let Some(draft) = relation_edge(relation) else {
			log::warn!("skipping relation without both endpoints: {relation:?}");
			continue;
		};
		match store.insert_edge(draft) {
			Ok(_) => edges += 1,
			Err(err) => log::warn!("skipping relation: {err}"),
		}
	}

	RenderSummary {
		nodes: store.nodes().len(),
		edges,
		highlighted,
	}
}
