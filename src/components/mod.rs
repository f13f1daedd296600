pub mod chat;
pub mod documents;
pub mod force_graph;
pub mod toolbar;

use std::collections::HashMap;

use leptos::prelude::*;
use web_sys::File;

use crate::api::HttpBackend;
use crate::controller::SessionHandle;
use crate::session::Session;

/// The backend client, kept off the reactive graph.
pub type BackendStore = StoredValue<HttpBackend, LocalStorage>;

/// Picked files by document id, waiting for their "Index" action.
pub type FileShelf = StoredValue<HashMap<u64, File>, LocalStorage>;

impl SessionHandle for RwSignal<Session> {
	fn with_session<R>(&self, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
		self.try_update(f)
	}
}
