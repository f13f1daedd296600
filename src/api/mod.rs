//! Client side of the knowledge-graph backend.

mod client;
mod error;
mod types;

pub use client::HttpBackend;
pub use error::ApiError;
pub use types::{ChatReply, ChatRequest, EntityNode, FileUpload, GraphResponse, Relation, UploadReply};

/// The remote collaborator: search, aggregated graph, chat and upload.
///
/// Futures are not `Send`; everything runs on the browser's event loop.
#[allow(async_fn_in_trait)]
pub trait Backend {
	/// `GET /api/search_graph/?q=...`
	async fn search_graph(&self, query: &str) -> Result<GraphResponse, ApiError>;

	/// `GET /api/graph/`
	async fn load_graph(&self) -> Result<GraphResponse, ApiError>;

	/// `POST /api/query/`
	async fn ask(&self, query: &str) -> Result<ChatReply, ApiError>;

	/// `POST /api/upload/` as multipart field `file`.
	async fn upload(&self, file: FileUpload) -> Result<UploadReply, ApiError>;
}
