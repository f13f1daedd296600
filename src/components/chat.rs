use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::KeyboardEvent;

use super::BackendStore;
use crate::config::QueryMode;
use crate::controller::submit_query;
use crate::session::Session;

/// Transcript, status line and query box.
#[component]
pub fn ChatPanel(session: RwSignal<Session>, backend: BackendStore) -> impl IntoView {
	let (query, set_query) = signal(String::new());
	let log_ref = NodeRef::<leptos::html::Div>::new();

	let messages = Memo::new(move |_| session.with(|s| s.transcript.messages().to_vec()));
	let status = Memo::new(move |_| session.with(|s| s.search.status().to_string()));
	let searching = Memo::new(move |_| session.with(|s| s.search.status().is_searching()));
	let empty = Memo::new(move |_| session.with(|s| s.transcript.is_empty()));
	let placeholder = session.with_untracked(|s| match s.query_mode() {
		QueryMode::Search => "Search the knowledge graph...",
		QueryMode::Chat => "Ask the knowledge graph...",
	});

	Effect::new(move |_| {
		messages.track();
		if let Some(el) = log_ref.get() {
			el.set_scroll_top(el.scroll_height());
		}
	});

	let send = move || {
		let input = query.get_untracked();
		if !input.trim().is_empty() {
			set_query.set(String::new());
		}
		let backend = backend.get_value();
		spawn_local(async move {
			submit_query(&session, &backend, &input).await;
		});
	};

	let on_keydown = move |ev: KeyboardEvent| {
		if ev.key() == "Enter" {
			ev.prevent_default();
			send();
		}
	};

	view! {
		<aside class="chat-panel">
			<div class="chat-log" node_ref=log_ref>
				{move || {
					messages
						.get()
						.into_iter()
						.map(|msg| view! { <div class=msg.role.class()>{msg.text}</div> })
						.collect_view()
				}}
			</div>
			<div class="status" class:busy=move || searching.get()>
				{move || status.get()}
			</div>
			<div class="query">
				<input
					type="text"
					placeholder=placeholder
					prop:value=move || query.get()
					on:input=move |ev| set_query.set(event_target_value(&ev))
					on:keydown=on_keydown
				/>
				<button on:click=move |_| send()>"Send"</button>
				<button
					class="secondary"
					disabled=move || empty.get()
					on:click=move |_| session.update(|s| s.clear_transcript())
				>
					"Clear"
				</button>
			</div>
		</aside>
	}
}
