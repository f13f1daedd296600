use leptos::prelude::*;
use ontology_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
