use std::collections::HashMap;

use leptos::prelude::*;

use crate::api::HttpBackend;
use crate::browser;
use crate::components::chat::ChatPanel;
use crate::components::documents::DocumentList;
use crate::components::force_graph::ForceGraphCanvas;
use crate::components::toolbar::Toolbar;
use crate::graph::NodeId;
use crate::session::Session;

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let config = browser::load_config();
	let session = RwSignal::new(Session::new(&config));
	let backend = StoredValue::new_local(HttpBackend::new(config));
	let shelf = StoredValue::new_local(HashMap::new());

	// Cheap to recompute; the snapshot is only cloned when the graph changed.
	let revision = Memo::new(move |_| session.with(|s| s.graph.revision()));
	let graph = Memo::new(move |_| {
		revision.track();
		session.with_untracked(|s| s.snapshot())
	});
	let pending = Memo::new(move |_| session.with(|s| s.gesture.pending().cloned()));
	let commands = Memo::new(move |_| session.with(|s| s.view.since(0).cloned().collect::<Vec<_>>()));

	let on_double_click = Callback::new(move |node: Option<NodeId>| {
		session.update(|s| {
			s.double_click(node);
		});
	});

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<ForceGraphCanvas
					graph=graph
					pending=pending
					commands=commands
					on_node_double_click=on_double_click
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Ontology Graph"</h1>
					<p class="subtitle">
						"Double-click two nodes to connect them. Drag to move, scroll to zoom."
					</p>
					<Toolbar session=session backend=backend shelf=shelf />
					<DocumentList session=session backend=backend shelf=shelf />
				</div>
				<ChatPanel session=session backend=backend />
			</div>
		</ErrorBoundary>
	}
}
