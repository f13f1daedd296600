//! All mutable application state behind one value.
//!
//! UI callbacks never touch the graph or the transcript directly; they call
//! the commands below. Asynchronous flows are split into a `begin_*` and a
//! `finish_*` half so that no borrow is held while a request is in flight.

use crate::api::{ApiError, ChatReply, GraphResponse, UploadReply};
use crate::config::{Config, QueryMode};
use crate::controller::{
	DocumentList, EdgeGesture, FIT_DURATION_MS, FOCUS_SCALE, GestureOutcome, RenderSummary, SearchState, SearchStatus,
	Ticket, UploadError, UploadStatus, ViewCommand, ViewQueue, render_response,
};
use crate::graph::{DocumentError, GraphSnapshot, GraphStore, NodeId, export_json, import_json};
use crate::transcript::Transcript;

pub const DEFAULT_NODE_LABEL: &str = "New Node";
pub const UPLOAD_FAILED: &str = "Upload failed";
pub const NO_MATCHES: &str = "No matching entities found";

/// What a submitted query should do once it reaches the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTicket {
	pub ticket: Ticket,
	pub query: String,
	pub mode: QueryMode,
}

/// Backend answer for a [`QueryTicket`].
#[derive(Clone, Debug)]
pub enum QueryReply {
	Graph(GraphResponse),
	Chat(ChatReply),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
	pub graph: GraphStore,
	pub transcript: Transcript,
	pub gesture: EdgeGesture,
	pub search: SearchState,
	pub documents: DocumentList,
	pub view: ViewQueue,
	query_mode: QueryMode,
}

impl Session {
	pub fn new(config: &Config) -> Self {
		let mut session = Self {
			query_mode: config.query_mode,
			..Self::default()
		};
		if config.seed_demo {
			session.seed_demo();
		}
		session
	}

	pub fn query_mode(&self) -> QueryMode {
		self.query_mode
	}

	fn seed_demo(&mut self) {
		let central = self.graph.add_node("Central");
		let a = self.graph.add_node("Node A");
		let b = self.graph.add_node("Node B");
		for leaf in [a, b] {
			if let Err(err) = self.graph.add_edge(central.clone(), leaf) {
				log::warn!("demo edge: {err}");
			}
		}
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		self.graph.snapshot()
	}

	/// Adds a node; a missing or blank label becomes "New Node".
	pub fn add_node(&mut self, label: Option<&str>) -> NodeId {
		let label = label.map(str::trim).filter(|l| !l.is_empty()).unwrap_or(DEFAULT_NODE_LABEL);
		self.graph.add_node(label)
	}

	pub fn export_json(&self) -> Result<String, serde_json::Error> {
		export_json(&self.graph)
	}

	/// Replaces the graph with an imported document. State is unchanged on
	/// error.
	pub fn import_json(&mut self, text: &str) -> Result<(), DocumentError> {
		import_json(&mut self.graph, text)?;
		self.gesture.reset();
		self.view.push(ViewCommand::Select(Vec::new()));
		self.view.push(ViewCommand::Fit {
			duration_ms: FIT_DURATION_MS,
		});
		log::info!("imported graph with {} nodes", self.graph.nodes().len());
		Ok(())
	}

	pub fn clear_transcript(&mut self) {
		self.transcript.clear();
	}

	/// Double-click on the canvas; `None` means empty space.
	pub fn double_click(&mut self, node: Option<NodeId>) -> GestureOutcome {
		let outcome = self.gesture.double_click(node);
		match &outcome {
			GestureOutcome::Ignored => {}
			GestureOutcome::Selected(id) => {
				self.transcript
					.bot(format!("Selected node {id} (double-click again on a node to connect)"));
			}
			GestureOutcome::Cleared => self.transcript.bot("Cleared selection"),
			GestureOutcome::Connect { from, to } => match self.graph.add_edge(from.clone(), to.clone()) {
				Ok(_) => self.transcript.bot("Connected nodes"),
				Err(err) => {
					// The first endpoint vanished (graph replaced meanwhile); start over from here.
					log::debug!("cannot connect: {err}");
					return self.double_click(Some(to.clone()));
				}
			},
		}
		outcome
	}

	/// Adds the picked files to the document list.
	pub fn stage_uploads(&mut self, names: Vec<String>) -> Result<Vec<u64>, UploadError> {
		self.documents.stage(names)
	}

	/// Marks a document as uploading and returns its name.
	pub fn begin_upload(&mut self, id: u64) -> Result<String, UploadError> {
		let name = self.documents.set_status(id, UploadStatus::Uploading)?.name.clone();
		self.transcript.user(format!("Uploading {name}..."));
		Ok(name)
	}

	pub fn finish_upload(&mut self, id: u64, result: Result<UploadReply, UploadError>) {
		let status = match result {
			Ok(reply) => {
				self.transcript.bot(reply.message());
				UploadStatus::Indexed
			}
			Err(err) => {
				log::warn!("upload of document #{id} failed: {err}");
				self.transcript.bot(UPLOAD_FAILED);
				UploadStatus::Failed
			}
		};
		if let Err(err) = self.documents.set_status(id, status) {
			log::warn!("{err}");
		}
	}

	/// Starts a query. Blank input is ignored.
	pub fn begin_query(&mut self, input: &str) -> Option<QueryTicket> {
		let query = input.trim();
		if query.is_empty() {
			return None;
		}
		self.transcript.user(query);
		let ticket = self.search.begin();
		Some(QueryTicket {
			ticket,
			query: query.to_string(),
			mode: self.query_mode,
		})
	}

	/// Applies a query result unless a newer query was submitted meanwhile.
	/// Returns whether the result was applied.
	pub fn finish_query(&mut self, ticket: &QueryTicket, result: Result<QueryReply, ApiError>) -> bool {
		if !self.search.is_current(ticket.ticket) {
			log::debug!("discarding stale response for {:?}", ticket.query);
			return false;
		}
		match result {
			Ok(QueryReply::Graph(response)) => self.show_search_results(&response),
			Ok(QueryReply::Chat(reply)) => {
				self.transcript.bot(reply.display_text());
				self.search.resolve(SearchStatus::Answered);
			}
			Err(err) => {
				log::error!("query {:?} failed: {err}", ticket.query);
				let detail = err.to_string();
				match ticket.mode {
					QueryMode::Search => self
						.transcript
						.bot(format!("Error searching the knowledge graph: {detail}")),
					QueryMode::Chat => self.transcript.bot(format!("No backend found: {detail}")),
				}
				self.search.resolve(SearchStatus::Failed(detail));
			}
		}
		true
	}

	fn show_search_results(&mut self, response: &GraphResponse) {
		if response.nodes.is_empty() {
			self.transcript.bot(NO_MATCHES);
			self.search.resolve(SearchStatus::NoMatches);
			return;
		}
		let summary = self.render(response);
		self.transcript.bot(format!(
			"Found {} matching entities with {} relationships",
			summary.nodes, summary.edges
		));
		self.search.resolve(SearchStatus::Success);
	}

	/// Starts loading the aggregated graph; reuses the search ticket so a
	/// later query still wins.
	pub fn begin_load_graph(&mut self) -> Ticket {
		self.search.begin()
	}

	pub fn finish_load_graph(&mut self, ticket: Ticket, result: Result<GraphResponse, ApiError>) -> bool {
		if !self.search.is_current(ticket) {
			log::debug!("discarding stale graph load");
			return false;
		}
		match result {
			Ok(response) if response.nodes.is_empty() => {
				self.transcript.bot("The knowledge graph is empty");
				self.search.resolve(SearchStatus::NoMatches);
			}
			Ok(response) => {
				let summary = self.render(&response);
				self.transcript.bot(format!(
					"Loaded {} entities with {} relationships",
					summary.nodes, summary.edges
				));
				self.search.resolve(SearchStatus::Success);
			}
			Err(err) => {
				log::error!("graph load failed: {err}");
				self.transcript.bot(format!("Error loading the knowledge graph: {err}"));
				self.search.resolve(SearchStatus::Failed(err.to_string()));
			}
		}
		true
	}

	fn render(&mut self, response: &GraphResponse) -> RenderSummary {
		let summary = render_response(&mut self.graph, response);
		self.gesture.reset();
		self.view.push(ViewCommand::Stabilize);
		self.view.push(ViewCommand::Fit {
			duration_ms: FIT_DURATION_MS,
		});
		match &summary.highlighted {
			Some(node) => {
				self.view.push(ViewCommand::Select(vec![node.clone()]));
				self.view.push(ViewCommand::Focus {
					node: node.clone(),
					scale: FOCUS_SCALE,
				});
			}
			None => self.view.push(ViewCommand::Select(Vec::new())),
		}
		summary
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::transcript::Role;

	fn blank() -> Session {
		Session::new(&Config {
			seed_demo: false,
			..Config::default()
		})
	}

	fn graph_reply(value: serde_json::Value) -> Result<QueryReply, ApiError> {
		Ok(QueryReply::Graph(serde_json::from_value(value).unwrap()))
	}

	#[test]
	fn demo_seed_connects_central_to_both_leaves() {
		let session = Session::new(&Config::default());
		let (nodes, edges) = session.graph.get_all();
		let labels: Vec<_> = nodes.iter().map(|n| n.label.as_str()).collect();
		assert_eq!(labels, ["Central", "Node A", "Node B"]);
		assert_eq!(edges.len(), 2);
		assert!(edges.iter().all(|e| e.from == nodes[0].id));
	}

	#[test]
	fn blank_label_falls_back() {
		let mut session = blank();
		session.add_node(None);
		session.add_node(Some("   "));
		session.add_node(Some("Kept"));
		let labels: Vec<_> = session.graph.nodes().iter().map(|n| n.label.as_str()).collect();
		assert_eq!(labels, ["New Node", "New Node", "Kept"]);
	}

	#[test]
	fn double_click_scenario() {
		let mut session = blank();
		let a = session.graph.add_node("A");
		let b = session.graph.add_node("B");

		session.double_click(Some(a.clone()));
		assert_eq!(session.gesture.pending(), Some(&a));

		session.double_click(Some(a.clone()));
		assert_eq!(session.gesture.pending(), None);
		assert!(session.graph.edges().is_empty());

		session.double_click(Some(a.clone()));
		session.double_click(Some(b.clone()));
		assert_eq!(session.gesture.pending(), None);
		let edges = session.graph.edges();
		assert_eq!(edges.len(), 1);
		assert_eq!((&edges[0].from, &edges[0].to), (&a, &b));

		let texts: Vec<_> = session.transcript.messages().iter().map(|m| m.text.as_str()).collect();
		assert_eq!(
			texts,
			[
				"Selected node n1 (double-click again on a node to connect)",
				"Cleared selection",
				"Selected node n1 (double-click again on a node to connect)",
				"Connected nodes",
			]
		);
	}

	#[test]
	fn double_click_on_empty_canvas_does_nothing() {
		let mut session = blank();
		assert_eq!(session.double_click(None), GestureOutcome::Ignored);
		assert!(session.transcript.is_empty());
	}

	#[test]
	fn vanished_pending_node_restarts_the_gesture() {
		let mut session = blank();
		session.double_click(Some(NodeId::from("gone")));
		let b = session.graph.add_node("B");
		assert_eq!(session.double_click(Some(b.clone())), GestureOutcome::Selected(b.clone()));
		assert_eq!(session.gesture.pending(), Some(&b));
		assert!(session.graph.edges().is_empty());
	}

	#[test]
	fn search_scenario() {
		let mut session = blank();
		session.graph.add_node("previous");
		let ticket = session.begin_query("  x ").unwrap();
		assert_eq!(ticket.query, "x");
		assert!(session.search.status().is_searching());

		assert!(session.finish_query(&ticket, graph_reply(json!({"nodes": [{"id": 1, "label": "X"}], "relations": []}))));

		let (nodes, edges) = session.graph.get_all();
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].label, "X");
		assert!(edges.is_empty());
		let bot: Vec<_> = session
			.transcript
			.messages()
			.iter()
			.filter(|m| m.role == Role::Bot)
			.map(|m| m.text.as_str())
			.collect();
		assert_eq!(bot, ["Found 1 matching entities with 0 relationships"]);
		assert_eq!(session.search.status(), &SearchStatus::Success);
	}

	#[test]
	fn loosely_typed_results_still_render() {
		let mut session = Session::new(&Config::default());
		let ticket = session.begin_query("a").unwrap();
		let body: GraphResponse = serde_json::from_str(
			r#"{"nodes":[{"id":"a","label":42,"type":["Person"],"highlight":true},{"label":"no id"}],"relations":null}"#,
		)
		.unwrap();
		session.finish_query(&ticket, Ok(QueryReply::Graph(body)));

		let nodes = session.graph.nodes();
		assert_eq!(nodes.len(), 1);
		assert_eq!(nodes[0].label, "42");
		assert_eq!(nodes[0].title.as_deref(), Some("Type: Person"));
		assert_eq!(
			session.transcript.messages().last().unwrap().text,
			"Found 1 matching entities with 0 relationships"
		);
	}

	#[test]
	fn highlighted_result_is_selected_and_focused_after_fit() {
		let mut session = blank();
		let ticket = session.begin_query("bee").unwrap();
		session.finish_query(
			&ticket,
			graph_reply(json!({"nodes": [{"id": "a"}, {"id": "b", "highlight": true}]})),
		);
		let commands: Vec<_> = session.view.since(0).map(|(_, c)| c.clone()).collect();
		assert_eq!(
			commands,
			vec![
				ViewCommand::Stabilize,
				ViewCommand::Fit { duration_ms: FIT_DURATION_MS },
				ViewCommand::Select(vec![NodeId::from("b")]),
				ViewCommand::Focus { node: NodeId::from("b"), scale: FOCUS_SCALE },
			]
		);
	}

	#[test]
	fn empty_result_keeps_the_graph() {
		let mut session = Session::new(&Config::default());
		let before = session.snapshot();
		let ticket = session.begin_query("nothing").unwrap();
		session.finish_query(&ticket, graph_reply(json!({"nodes": [], "relations": []})));
		assert_eq!(session.snapshot(), before);
		assert_eq!(session.transcript.messages().last().unwrap().text, NO_MATCHES);
		assert_eq!(session.search.status().to_string(), "No matches found");
	}

	#[test]
	fn blank_query_is_ignored() {
		let mut session = blank();
		assert_eq!(session.begin_query(" \t "), None);
		assert!(session.transcript.is_empty());
		assert_eq!(session.search.status(), &SearchStatus::Idle);
	}

	#[test]
	fn failed_search_reports_once_and_keeps_graph() {
		let mut session = Session::new(&Config::default());
		let before = session.snapshot();
		let ticket = session.begin_query("x").unwrap();
		session.finish_query(&ticket, Err(ApiError::Timeout));

		assert_eq!(session.snapshot(), before);
		assert_eq!(session.transcript.messages().len(), 2);
		assert_eq!(
			session.transcript.messages().last().unwrap().text,
			"Error searching the knowledge graph: request timed out"
		);
		assert!(!session.search.status().is_searching());
	}

	#[test]
	fn stale_results_are_discarded() {
		let mut session = blank();
		let old = session.begin_query("old").unwrap();
		let new = session.begin_query("new").unwrap();

		assert!(session.finish_query(&new, graph_reply(json!({"nodes": [{"id": "new"}]}))));
		assert!(!session.finish_query(&old, graph_reply(json!({"nodes": [{"id": "old"}]}))));

		assert_eq!(session.graph.nodes()[0].id.to_string(), "new");
		assert_eq!(session.search.status(), &SearchStatus::Success);
	}

	#[test]
	fn chat_mode_prints_the_answer() {
		let mut session = Session::new(&Config {
			query_mode: QueryMode::Chat,
			..Config::default()
		});
		let before = session.snapshot();
		let ticket = session.begin_query("why?").unwrap();
		assert_eq!(ticket.mode, QueryMode::Chat);
		session.finish_query(&ticket, Ok(QueryReply::Chat(ChatReply(json!({"answer": "because"})))));
		assert_eq!(session.transcript.messages().last().unwrap().text, "because");
		assert_eq!(session.snapshot(), before);
		assert_eq!(session.search.status(), &SearchStatus::Answered);
		assert_eq!(session.search.status().to_string(), "Answer received");
	}

	#[test]
	fn upload_messages() {
		let mut session = blank();
		let ids = session.stage_uploads(vec!["a.pdf".into(), "b.pdf".into()]).unwrap();

		assert_eq!(session.begin_upload(ids[0]).unwrap(), "a.pdf");
		session.finish_upload(ids[0], Ok(UploadReply(json!({"message": "Saved ontology 7"}))));
		session.begin_upload(ids[1]).unwrap();
		session.finish_upload(ids[1], Err(ApiError::Network("offline".into()).into()));

		let texts: Vec<_> = session.transcript.messages().iter().map(|m| (m.role, m.text.as_str())).collect();
		assert_eq!(
			texts,
			[
				(Role::User, "Uploading a.pdf..."),
				(Role::Bot, "Saved ontology 7"),
				(Role::User, "Uploading b.pdf..."),
				(Role::Bot, UPLOAD_FAILED),
			]
		);
		let statuses: Vec<_> = session.documents.entries().iter().map(|e| (e.id, e.status)).collect();
		assert_eq!(statuses, [(ids[0], UploadStatus::Indexed), (ids[1], UploadStatus::Failed)]);
	}

	#[test]
	fn import_failure_leaves_everything_alone() {
		let mut session = Session::new(&Config::default());
		let before = session.clone();
		assert!(session.import_json("[1, 2").is_err());
		assert_eq!(session, before);
	}

	#[test]
	fn export_import_round_trip_through_sessions() {
		let mut source = Session::new(&Config::default());
		let extra = source.add_node(Some("Extra"));
		let central = source.graph.nodes()[0].id.clone();
		source.graph.add_edge(extra, central).unwrap();
		let text = source.export_json().unwrap();

		let mut target = blank();
		target.import_json(&text).unwrap();
		assert_eq!(target.graph.get_all(), source.graph.get_all());
	}
}
