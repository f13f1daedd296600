use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{BackendStore, FileShelf};
use crate::browser;
use crate::controller::{UploadStatus, index_document};
use crate::session::Session;

/// Uploaded files with their "Index" action.
#[component]
pub fn DocumentList(session: RwSignal<Session>, backend: BackendStore, shelf: FileShelf) -> impl IntoView {
	let entries = Memo::new(move |_| session.with(|s| s.documents.entries().to_vec()));

	let index = move |id: u64| {
		let Some(file) = shelf.with_value(|files| files.get(&id).cloned()) else {
			log::warn!("no file kept for document #{id}");
			return;
		};
		let backend = backend.get_value();
		spawn_local(async move {
			index_document(&session, &backend, id, browser::read_bytes(&file)).await;
		});
	};

	view! {
		<ul class="doc-list">
			{move || {
				entries
					.get()
					.into_iter()
					.map(|entry| {
						let id = entry.id;
						let busy = entry.status == UploadStatus::Uploading;
						view! {
							<li>
								<span class="doc-name">{entry.name}</span>
								<button class="secondary" disabled=busy on:click=move |_| index(id)>
									"Index"
								</button>
								<span class="doc-status">{entry.status.to_string()}</span>
							</li>
						}
					})
					.collect_view()
			}}
		</ul>
	}
}
