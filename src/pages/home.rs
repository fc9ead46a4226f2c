use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use log::{error, info};

use crate::canvas::{CanvasHandle, PackageCanvas};
use crate::client::{Applied, GraphClient, InsertReport};
use crate::components::graph_canvas::{GraphCanvas, NodeActivation};
use crate::components::toolbar::Toolbar;
use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::service::HttpNodeService;

#[derive(Clone, Debug, Default, PartialEq)]
enum Status {
	#[default]
	Idle,
	Info(String),
	Error(String),
}

fn summary(subject: &str, report: &InsertReport) -> String {
	format!(
		"{subject}: {} new, {} updated, {} edges",
		report.nodes_added, report.nodes_restyled, report.edges_added
	)
}

fn report(status: RwSignal<Status>, subject: &str, outcome: Result<Applied, ExplorerError>) {
	match outcome {
		Ok(Applied::Inserted(r)) => status.set(Status::Info(summary(subject, &r))),
		Ok(Applied::Stale) => status.set(Status::Info(format!("{subject}: canvas was reset, response dropped"))),
		Err(e) => {
			error!("{subject}: {e}");
			status.set(Status::Error(format!("{subject}: {e}")));
		}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let status = RwSignal::new(Status::Idle);

	let query = use_query_map();
	let config = query.with_untracked(|q| ExplorerConfig::from_lookup(|k| q.get(k)));
	let config = config.unwrap_or_else(|e| {
		error!("{e}");
		status.set(Status::Error(format!("{e}; using defaults")));
		ExplorerConfig::default()
	});
	info!("data service at {}", config.service_url);

	let canvas: CanvasHandle = PackageCanvas::new(800.0, 600.0, config.physics).into_handle();
	let client = Rc::new(GraphClient::new(HttpNodeService::new(&config.service_url), &config));

	let on_activate: Rc<dyn Fn(NodeActivation)> = {
		let (canvas, client) = (canvas.clone(), client.clone());
		Rc::new(move |activation: NodeActivation| {
			let (canvas, client) = (canvas.clone(), client.clone());
			spawn_local(async move {
				let outcome = client
					.handle_node_activation(&canvas, &activation.node_id, activation.position)
					.await;
				report(status, &activation.node_id, outcome);
			});
		})
	};

	let on_spawn: Rc<dyn Fn(String)> = {
		let (canvas, client) = (canvas.clone(), client.clone());
		Rc::new(move |identifier: String| {
			let (canvas, client) = (canvas.clone(), client.clone());
			spawn_local(async move {
				let outcome = client.spawn_manual_node(&canvas, &identifier).await;
				report(status, identifier.trim(), outcome);
			});
		})
	};

	let on_reset: Rc<dyn Fn()> = {
		let canvas = canvas.clone();
		Rc::new(move || {
			canvas.borrow_mut().clear();
			status.set(Status::Idle);
		})
	};

	if let Some(seed) = config.seed.clone() {
		on_spawn(seed);
	}

	view! {
		<div class="fullscreen-graph">
			<GraphCanvas canvas=canvas on_activate=on_activate />
			<div class="graph-overlay">
				<h1>"Package Dependency Explorer"</h1>
				<p class="subtitle">
					"Double-click a package to load its dependencies. Drag to move, scroll to zoom."
				</p>
				<Toolbar on_spawn=on_spawn on_reset=on_reset />
				{move || {
					let (class, text) = match status.get() {
						Status::Idle => return None,
						Status::Info(text) => ("status", text),
						Status::Error(text) => ("status error", text),
					};
					Some(view! { <p class=class>{text}</p> })
				}}
			</div>
		</div>
	}
}
