//! Async flows shared by the UI and the tests.
//!
//! Each flow mutates the session through a [`SessionHandle`], awaits the
//! backend with no borrow held, then mutates again.

use std::cell::RefCell;
use std::fmt;

use crate::api::{Backend, FileUpload};
use crate::config::QueryMode;
use crate::controller::UploadError;
use crate::session::{QueryReply, Session};

/// Shared access to the session: a `RefCell` in tests, a signal in the UI.
pub trait SessionHandle {
	/// Runs `f` on the session. `None` when the session is gone (the owning
	/// view was disposed).
	fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R>;
}

impl SessionHandle for RefCell<Session> {
	fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
		Some(f(&mut self.borrow_mut()))
	}
}

/// Submits the query box. Returns `false` if nothing was sent.
pub async fn submit_query<H, B>(handle: &H, backend: &B, input: &str) -> bool
where
	H: SessionHandle,
	B: Backend,
{
	let Some(Some(ticket)) = handle.with_session(|s| s.begin_query(input)) else {
		return false;
	};
	log::info!("query {:?} ({:?})", ticket.query, ticket.mode);
	let result = match ticket.mode {
		QueryMode::Search => backend.search_graph(&ticket.query).await.map(QueryReply::Graph),
		QueryMode::Chat => backend.ask(&ticket.query).await.map(QueryReply::Chat),
	};
	handle.with_session(|s| s.finish_query(&ticket, result));
	true
}

/// Replaces the canvas with the backend's aggregated graph.
pub async fn load_full_graph<H, B>(handle: &H, backend: &B)
where
	H: SessionHandle,
	B: Backend,
{
	let Some(ticket) = handle.with_session(|s| s.begin_load_graph()) else {
		return;
	};
	let result = backend.load_graph().await;
	handle.with_session(|s| s.finish_load_graph(ticket, result));
}

/// Uploads one staged document once `content` has read the file. A read
/// failure is reported like a failed upload.
pub async fn index_document<H, B, F, E>(handle: &H, backend: &B, id: u64, content: F)
where
	H: SessionHandle,
	B: Backend,
	F: Future<Output = Result<Vec<u8>, E>>,
	E: fmt::Display,
{
	let name = match handle.with_session(|s| s.begin_upload(id)) {
		Some(Ok(name)) => name,
		Some(Err(err)) => {
			log::warn!("cannot index: {err}");
			return;
		}
		None => return,
	};
	let result = match content.await {
		Ok(bytes) => backend.upload(FileUpload { name, bytes }).await.map_err(UploadError::from),
		Err(err) => Err(UploadError::Unreadable {
			name,
			detail: err.to_string(),
		}),
	};
	handle.with_session(|s| s.finish_upload(id, result));
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::convert::Infallible;
	use std::future::ready;

	use pretty_assertions::assert_eq;
	use serde_json::json;

	use super::*;
	use crate::api::{ApiError, ChatReply, GraphResponse, UploadReply};
	use crate::config::Config;
	use crate::controller::UploadStatus;
	use crate::transcript::Role;

	#[derive(Default)]
	struct MockBackend {
		search: RefCell<Option<Result<GraphResponse, ApiError>>>,
		calls: Cell<usize>,
		uploaded: RefCell<Vec<FileUpload>>,
	}

	impl MockBackend {
		fn answering(value: serde_json::Value) -> Self {
			let backend = Self::default();
			*backend.search.borrow_mut() = Some(Ok(serde_json::from_value(value).unwrap()));
			backend
		}

		fn failing(err: ApiError) -> Self {
			let backend = Self::default();
			*backend.search.borrow_mut() = Some(Err(err));
			backend
		}

		fn next_search(&self) -> Result<GraphResponse, ApiError> {
			self.calls.set(self.calls.get() + 1);
			self.search
				.borrow()
				.clone()
				.unwrap_or_else(|| Err(ApiError::Network("no canned response".into())))
		}
	}

	impl Backend for MockBackend {
		async fn search_graph(&self, _query: &str) -> Result<GraphResponse, ApiError> {
			self.next_search()
		}

		async fn load_graph(&self) -> Result<GraphResponse, ApiError> {
			self.next_search()
		}

		async fn ask(&self, query: &str) -> Result<ChatReply, ApiError> {
			self.calls.set(self.calls.get() + 1);
			Ok(ChatReply(json!({"answer": format!("echo: {query}")})))
		}

		async fn upload(&self, file: FileUpload) -> Result<UploadReply, ApiError> {
			self.calls.set(self.calls.get() + 1);
			self.uploaded.borrow_mut().push(file);
			Ok(UploadReply(json!({"message": "Ontology saved"})))
		}
	}

	fn session(config: Config) -> RefCell<Session> {
		RefCell::new(Session::new(&config))
	}

	fn bot_messages(handle: &RefCell<Session>) -> Vec<String> {
		handle
			.borrow()
			.transcript
			.messages()
			.iter()
			.filter(|m| m.role == Role::Bot)
			.map(|m| m.text.clone())
			.collect()
	}

	#[tokio::test]
	async fn search_renders_the_response() {
		let handle = session(Config::default());
		let backend = MockBackend::answering(json!({"nodes": [{"id": 1, "label": "X"}], "relations": []}));

		assert!(submit_query(&handle, &backend, "x").await);

		let s = handle.borrow();
		assert_eq!(s.graph.nodes().len(), 1);
		assert_eq!(s.graph.nodes()[0].label, "X");
		assert!(s.graph.edges().is_empty());
		drop(s);
		assert_eq!(bot_messages(&handle), ["Found 1 matching entities with 0 relationships"]);
	}

	#[tokio::test]
	async fn empty_query_sends_nothing() {
		let handle = session(Config::default());
		let backend = MockBackend::answering(json!({"nodes": []}));

		assert!(!submit_query(&handle, &backend, "   ").await);
		assert_eq!(backend.calls.get(), 0);
		assert!(handle.borrow().transcript.is_empty());
	}

	#[tokio::test]
	async fn failed_search_keeps_the_graph() {
		let handle = session(Config::default());
		let before = handle.borrow().snapshot();
		let backend = MockBackend::failing(ApiError::Status { status: 500 });

		submit_query(&handle, &backend, "x").await;

		assert_eq!(handle.borrow().snapshot(), before);
		assert_eq!(
			bot_messages(&handle),
			["Error searching the knowledge graph: server returned 500"]
		);
		assert_eq!(handle.borrow().search.status().to_string(), "Search error: server returned 500");
	}

	#[tokio::test]
	async fn chat_mode_uses_the_query_endpoint() {
		let handle = session(Config {
			query_mode: QueryMode::Chat,
			..Config::default()
		});
		let backend = MockBackend::default();

		submit_query(&handle, &backend, "hello").await;
		assert_eq!(bot_messages(&handle), ["echo: hello"]);
	}

	#[tokio::test]
	async fn full_graph_load_reports_counts() {
		let handle = session(Config::default());
		let backend = MockBackend::answering(json!({
			"nodes": [{"id": "a"}, {"id": "b"}],
			"relations": [{"source": "a", "target": "b", "relation": "part_of"}]
		}));

		load_full_graph(&handle, &backend).await;
		assert_eq!(bot_messages(&handle), ["Loaded 2 entities with 1 relationships"]);
		assert_eq!(handle.borrow().graph.edges().len(), 1);
	}

	#[tokio::test]
	async fn indexing_uploads_the_file() {
		let handle = session(Config::default());
		let backend = MockBackend::default();
		let ids = handle
			.borrow_mut()
			.stage_uploads(vec!["notes.txt".into()])
			.unwrap();

		index_document(&handle, &backend, ids[0], ready(Ok::<_, Infallible>(b"hello".to_vec()))).await;

		assert_eq!(
			backend.uploaded.borrow().as_slice(),
			[FileUpload {
				name: "notes.txt".into(),
				bytes: b"hello".to_vec(),
			}]
		);
		assert_eq!(bot_messages(&handle), ["Ontology saved"]);
	}

	#[tokio::test]
	async fn unreadable_file_is_reported_as_a_failed_upload() {
		let handle = session(Config {
			seed_demo: false,
			..Config::default()
		});
		let backend = MockBackend::default();
		let ids = handle
			.borrow_mut()
			.stage_uploads(vec!["scan.pdf".into()])
			.unwrap();

		index_document(&handle, &backend, ids[0], ready(Err::<Vec<u8>, _>("permission denied"))).await;

		assert_eq!(backend.calls.get(), 0);
		let s = handle.borrow();
		let texts: Vec<_> = s.transcript.messages().iter().map(|m| (m.role, m.text.as_str())).collect();
		assert_eq!(
			texts,
			[(Role::User, "Uploading scan.pdf..."), (Role::Bot, "Upload failed")]
		);
		assert_eq!(s.documents.entries()[0].status, UploadStatus::Failed);
	}

	#[tokio::test]
	async fn indexing_an_unknown_document_does_nothing() {
		let handle = session(Config::default());
		let backend = MockBackend::default();
		index_document(&handle, &backend, 42, ready(Ok::<_, Infallible>(Vec::new()))).await;
		assert_eq!(backend.calls.get(), 0);
		assert!(handle.borrow().transcript.is_empty());
	}
}
