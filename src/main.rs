//! Browser entry point: mounts the explorer app.

use leptos::prelude::*;
use pkg_graph_explorer::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
