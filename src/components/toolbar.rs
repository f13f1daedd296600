use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{BackendStore, FileShelf};
use crate::browser;
use crate::controller::load_full_graph;
use crate::graph::EXPORT_FILE_NAME;
use crate::session::Session;

/// Add node, export, import, load graph and file upload.
#[component]
pub fn Toolbar(session: RwSignal<Session>, backend: BackendStore, shelf: FileShelf) -> impl IntoView {
	let import_ref = NodeRef::<leptos::html::Input>::new();
	let upload_ref = NodeRef::<leptos::html::Input>::new();

	let on_add = move |_| {
		let label = browser::prompt("Node label");
		session.update(|s| {
			s.add_node(label.as_deref());
		});
	};

	let on_export = move |_| {
		let text = match session.with(|s| s.export_json()) {
			Ok(text) => text,
			Err(err) => {
				log::error!("export failed: {err}");
				return;
			}
		};
		if let Err(err) = browser::download_text(EXPORT_FILE_NAME, &text, "application/json") {
			log::error!("download failed: {err}");
		}
	};

	let on_import_click = move |_| {
		if let Some(input) = import_ref.get() {
			input.click();
		}
	};

	let on_import_change = move |_| {
		let Some(input) = import_ref.get() else {
			return;
		};
		let Some(file) = browser::selected_files(&input).into_iter().next() else {
			return;
		};
		input.set_value("");
		spawn_local(async move {
			let text = match browser::read_text(&file).await {
				Ok(text) => text,
				Err(err) => {
					browser::alert(&format!("Could not read {}: {err}", file.name()));
					return;
				}
			};
			if let Some(Err(err)) = session.try_update(|s| s.import_json(&text)) {
				log::warn!("import of {} rejected: {err}", file.name());
				browser::alert(&err.to_string());
			}
		});
	};

	let on_load = move |_| {
		let backend = backend.get_value();
		spawn_local(async move {
			load_full_graph(&session, &backend).await;
		});
	};

	let on_upload = move |_| {
		let Some(input) = upload_ref.get() else {
			return;
		};
		let picked = browser::selected_files(&input);
		let names = picked.iter().map(|f| f.name()).collect();
		match session.try_update(|s| s.stage_uploads(names)) {
			Some(Ok(ids)) => {
				shelf.update_value(|files| files.extend(ids.into_iter().zip(picked)));
				input.set_value("");
			}
			Some(Err(err)) => browser::alert(&err.to_string()),
			None => {}
		}
	};

	view! {
		<div class="toolbar">
			<button on:click=on_add>"Add node"</button>
			<button on:click=on_export>"Export"</button>
			<button on:click=on_import_click>"Import"</button>
			<input
				node_ref=import_ref
				type="file"
				accept="application/json,.json"
				style="display: none;"
				on:change=on_import_change
			/>
			<button class="secondary" on:click=on_load>"Load graph"</button>
			<span class="upload">
				<input node_ref=upload_ref type="file" multiple=true />
				<button on:click=on_upload>"Upload"</button>
			</span>
		</div>
	}
}
