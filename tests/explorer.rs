use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures::executor::block_on;
use pkg_graph_explorer::canvas::{CanvasHandle, PackageCanvas, Point};
use pkg_graph_explorer::client::{Applied, GraphClient, InsertReport, NeighborService};
use pkg_graph_explorer::config::{ExplorerConfig, SpawnLayout};
use pkg_graph_explorer::error::{ExplorerError, Result};
use pkg_graph_explorer::model::{BLACK, BLUE, GRAY, GREEN, LineStyle, PackageState, QueryResult};

/// Serves canned responses and counts the queries it answers.
#[derive(Default)]
struct MemoryService {
	neighbors: HashMap<String, String>,
	tags: HashMap<String, String>,
	queries: Cell<usize>,
	/// Cleared while a query is "in flight".
	reset_during_query: RefCell<Option<CanvasHandle>>,
}

impl MemoryService {
	fn with_neighbors(mut self, package: &str, body: &str) -> Self {
		self.neighbors.insert(package.to_owned(), body.to_owned());
		self
	}

	fn with_tag(mut self, package: &str, tag: &str) -> Self {
		self.tags.insert(package.to_owned(), tag.to_owned());
		self
	}
}

impl NeighborService for MemoryService {
	async fn neighbors(&self, package: &str) -> Result<QueryResult> {
		self.queries.set(self.queries.get() + 1);
		if let Some(canvas) = self.reset_during_query.borrow().as_ref() {
			canvas.borrow_mut().clear();
		}
		match self.neighbors.get(package) {
			Some(body) => QueryResult::from_json(body),
			None => Err(ExplorerError::Status {
				status: 404,
				path: "/nodes".to_owned(),
			}),
		}
	}

	async fn classify(&self, package: &str) -> Result<PackageState> {
		self.queries.set(self.queries.get() + 1);
		if let Some(canvas) = self.reset_during_query.borrow().as_ref() {
			canvas.borrow_mut().clear();
		}
		Ok(PackageState::from_tag(self.tags.get(package).map(String::as_str)))
	}
}

const ROOT_NEIGHBORS: &str = r#"[["pkgA","Build","Renamed"],["pkgB","Test","Obsoleted"]]"#;

fn explorer(service: MemoryService, config: ExplorerConfig) -> (GraphClient<MemoryService>, CanvasHandle) {
	let canvas = PackageCanvas::new(800.0, 600.0, config.physics).into_handle();
	(GraphClient::new(service, &config), canvas)
}

fn without_classification() -> ExplorerConfig {
	ExplorerConfig {
		classify_spawned: false,
		..ExplorerConfig::default()
	}
}

fn inserted(applied: Applied) -> InsertReport {
	match applied {
		Applied::Inserted(report) => report,
		Applied::Stale => panic!("unexpected stale response"),
	}
}

#[test]
fn activation_adds_styled_neighbors_and_edges() {
	let service = MemoryService::default().with_neighbors("root", ROOT_NEIGHBORS);
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let report = inserted(block_on(client.handle_node_activation(&canvas, "root", Point::new(10.0, 20.0))).unwrap());
	assert_eq!(report.nodes_added, 2);
	assert_eq!(report.edges_added, 2);

	let c = canvas.borrow();
	assert_eq!(c.node_by_id("pkgA").unwrap().color, BLUE);
	assert_eq!(c.node_by_id("pkgB").unwrap().color, BLACK);

	let to_a = c.edge("root", "pkgA").unwrap();
	assert_eq!(to_a.id, "rootpkgA");
	assert_eq!((to_a.style.color, to_a.style.line), (BLUE, LineStyle::Solid));
	let to_b = c.edge("root", "pkgB").unwrap();
	assert_eq!((to_b.style.color, to_b.style.line), (GRAY, LineStyle::Solid));
}

#[test]
fn neighbors_fan_out_around_the_click() {
	let body = r#"[["a","Runtime","None"],["b","Runtime","None"],["c","Runtime","None"],["d","Runtime","None"]]"#;
	let service = MemoryService::default().with_neighbors("root", body);
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let click = Point::new(-150.0, 75.0);
	block_on(client.handle_node_activation(&canvas, "root", click)).unwrap();

	let c = canvas.borrow();
	let distances: Vec<f64> = ["a", "b", "c", "d"]
		.iter()
		.map(|id| c.node_position(c.node_index(id).unwrap()).unwrap().distance(click))
		.collect();
	for d in &distances {
		assert!((d - distances[0]).abs() < 1e-3);
	}
	let first = c.node_position(c.node_index("a").unwrap()).unwrap();
	assert!(first.y < click.y);
}

#[test]
fn repeated_activation_is_idempotent() {
	let service = MemoryService::default().with_neighbors("root", ROOT_NEIGHBORS);
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let first = inserted(block_on(client.handle_node_activation(&canvas, "root", Point::default())).unwrap());
	let positions = canvas.borrow().positions();

	for _ in 0..3 {
		let again = inserted(block_on(client.handle_node_activation(&canvas, "root", Point::new(300.0, 300.0))).unwrap());
		assert_eq!(
			again,
			InsertReport {
				nodes_added: 0,
				nodes_restyled: 2,
				edges_added: 0,
				edges_duplicate: 2,
				edges_skipped: 0,
			}
		);
	}
	assert_eq!(first.edges_added, 2);

	let c = canvas.borrow();
	assert_eq!((c.node_count(), c.edge_count()), (3, 2));
	assert_eq!(c.positions(), positions);
}

#[test]
fn activation_failure_is_returned_and_leaves_canvas_alone() {
	let (client, canvas) = explorer(MemoryService::default(), without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let err = block_on(client.handle_node_activation(&canvas, "root", Point::default())).unwrap_err();
	assert!(matches!(err, ExplorerError::Status { status: 404, .. }));
	assert_eq!(canvas.borrow().node_count(), 1);
}

#[test]
fn malformed_response_is_an_error() {
	let service = MemoryService::default().with_neighbors("root", r#"{"nodes": []}"#);
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let err = block_on(client.handle_node_activation(&canvas, "root", Point::default())).unwrap_err();
	assert!(matches!(err, ExplorerError::Malformed(_)));
}

#[test]
fn empty_response_changes_nothing() {
	let service = MemoryService::default().with_neighbors("root", "[]");
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	let report = inserted(block_on(client.handle_node_activation(&canvas, "root", Point::default())).unwrap());
	assert_eq!(report, InsertReport::default());
	assert_eq!((canvas.borrow().node_count(), canvas.borrow().edge_count()), (1, 0));
}

#[test]
fn reset_while_in_flight_discards_the_response() {
	let service = MemoryService::default().with_neighbors("root", ROOT_NEIGHBORS);
	let (client, canvas) = explorer(service, without_classification());
	block_on(client.spawn_manual_node(&canvas, "root")).unwrap();

	*client.service().reset_during_query.borrow_mut() = Some(canvas.clone());
	let applied = block_on(client.handle_node_activation(&canvas, "root", Point::default())).unwrap();
	assert_eq!(applied, Applied::Stale);
	assert_eq!(canvas.borrow().node_count(), 0);
}

#[test]
fn reset_while_classifying_discards_the_spawn() {
	let (client, canvas) = explorer(MemoryService::default(), ExplorerConfig::default());
	block_on(client.spawn_manual_node(&canvas, "a")).unwrap();

	*client.service().reset_during_query.borrow_mut() = Some(canvas.clone());
	let applied = block_on(client.spawn_manual_node(&canvas, "b")).unwrap();
	assert_eq!(applied, Applied::Stale);
	assert_eq!(client.service().queries.get(), 2);
	let c = canvas.borrow();
	assert_eq!(c.node_count(), 0);
	assert!(!c.contains("b"));
}

#[test]
fn manual_spawn_without_classification_is_green() {
	let (client, canvas) = explorer(MemoryService::default(), without_classification());
	let report = inserted(block_on(client.spawn_manual_node(&canvas, "foo")).unwrap());

	assert_eq!(report.nodes_added, 1);
	assert_eq!(client.service().queries.get(), 0);
	let c = canvas.borrow();
	assert_eq!(c.node_count(), 1);
	assert_eq!(c.node_by_id("foo").unwrap().color, GREEN);
}

#[test]
fn manual_spawn_asks_for_classification() {
	let service = MemoryService::default().with_tag("old/pkg", "Renamed");
	let (client, canvas) = explorer(service, ExplorerConfig::default());
	block_on(client.spawn_manual_node(&canvas, "old/pkg")).unwrap();

	assert_eq!(client.service().queries.get(), 1);
	assert_eq!(canvas.borrow().node_by_id("old/pkg").unwrap().color, BLUE);
}

#[test]
fn empty_spawn_is_rejected() {
	let (client, canvas) = explorer(MemoryService::default(), ExplorerConfig::default());
	for input in ["", "   "] {
		let err = block_on(client.spawn_manual_node(&canvas, input)).unwrap_err();
		assert!(matches!(err, ExplorerError::EmptyIdentifier));
	}
	assert_eq!(canvas.borrow().node_count(), 0);
	assert_eq!(client.service().queries.get(), 0);
}

#[test]
fn duplicate_spawn_keeps_one_node() {
	let (client, canvas) = explorer(MemoryService::default(), without_classification());
	block_on(client.spawn_manual_node(&canvas, "foo")).unwrap();
	let report = inserted(block_on(client.spawn_manual_node(&canvas, "foo")).unwrap());
	assert_eq!((report.nodes_added, report.nodes_restyled), (0, 1));
	assert_eq!(canvas.borrow().node_count(), 1);
}

#[test]
fn spawn_layout_scope_follows_config() {
	for (scope, moved) in [(SpawnLayout::All, true), (SpawnLayout::Spawned, false)] {
		let config = ExplorerConfig {
			spawn_layout: scope,
			..without_classification()
		};
		let (client, canvas) = explorer(MemoryService::default(), config);
		block_on(client.spawn_manual_node(&canvas, "first")).unwrap();

		let first = canvas.borrow().node_index("first").unwrap();
		canvas.borrow_mut().move_node(first, Point::new(333.0, 333.0));
		block_on(client.spawn_manual_node(&canvas, "second")).unwrap();

		let now = canvas.borrow().node_position(first).unwrap();
		assert_eq!(now != Point::new(333.0, 333.0), moved, "{scope:?}");
	}
}
