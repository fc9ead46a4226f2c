//! The graph client: turns user actions into service queries and canvas updates.

use log::{debug, info};

use crate::canvas::{CanvasHandle, CircleLayout, Point};
use crate::config::{ExplorerConfig, SpawnLayout};
use crate::error::{ExplorerError, Result};
use crate::model::{PackageState, QueryResult};
use crate::translate::{NodeDescriptor, translate_to_edges, translate_to_nodes};

/// Source of neighbor and classification data.
#[allow(async_fn_in_trait)]
pub trait NeighborService {
	/// Direct neighbors of `package`.
	async fn neighbors(&self, package: &str) -> Result<QueryResult>;

	/// Classification of `package` alone.
	async fn classify(&self, package: &str) -> Result<PackageState>;
}

/// What an operation did to the canvas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertReport {
	/// Nodes new to the canvas.
	pub nodes_added: usize,
	/// Nodes already present that took a new color.
	pub nodes_restyled: usize,
	/// Edges inserted.
	pub edges_added: usize,
	/// Edges whose ordered pair was already present.
	pub edges_duplicate: usize,
	/// Self-loops and edges with a missing endpoint.
	pub edges_skipped: usize,
}

/// Result of an operation that completed without error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Applied {
	/// The canvas was updated.
	Inserted(InsertReport),
	/// The canvas was reset while the query was in flight; nothing changed.
	Stale,
}

/// Bridges canvas activations, the data service and the canvas.
pub struct GraphClient<S> {
	service: S,
	classify_spawned: bool,
	spawn_layout: SpawnLayout,
}

impl<S: NeighborService> GraphClient<S> {
	/// A client querying `service`, with spawn behavior taken from `config`.
	pub fn new(service: S, config: &ExplorerConfig) -> Self {
		Self {
			service,
			classify_spawned: config.classify_spawned,
			spawn_layout: config.spawn_layout,
		}
	}

	/// The underlying data service.
	pub fn service(&self) -> &S {
		&self.service
	}

	/// Fetches the neighbors of `node_id` and fans them out around `click`.
	///
	/// `click` is in graph space. Neighbors already on the canvas are
	/// re-styled but keep their position.
	pub async fn handle_node_activation(
		&self,
		canvas: &CanvasHandle,
		node_id: &str,
		click: Point,
	) -> Result<Applied> {
		let generation = canvas.borrow().generation();
		debug!("querying neighbors of {node_id}");
		let result = self.service.neighbors(node_id).await?;

		let mut canvas = canvas.borrow_mut();
		if canvas.generation() != generation {
			info!("discarding stale neighbors of {node_id}");
			return Ok(Applied::Stale);
		}

		let nodes = translate_to_nodes(&result);
		let edges = translate_to_edges(node_id, &result);

		let node_batch = canvas.add_nodes(&nodes);
		canvas.run_layout(&CircleLayout::anchored(click), &node_batch.added);
		let edge_batch = canvas.add_edges(&edges);

		let report = InsertReport {
			nodes_added: node_batch.added.len(),
			nodes_restyled: node_batch.restyled,
			edges_added: edge_batch.added,
			edges_duplicate: edge_batch.duplicates,
			edges_skipped: edge_batch.skipped,
		};
		debug!("{node_id}: {report:?}");
		Ok(Applied::Inserted(report))
	}

	/// Adds a package typed in by the user and re-lays the canvas out.
	pub async fn spawn_manual_node(&self, canvas: &CanvasHandle, identifier: &str) -> Result<Applied> {
		let identifier = identifier.trim();
		if identifier.is_empty() {
			return Err(ExplorerError::EmptyIdentifier);
		}

		let generation = canvas.borrow().generation();
		let state = if self.classify_spawned {
			self.service.classify(identifier).await?
		} else {
			PackageState::Active
		};

		let mut canvas = canvas.borrow_mut();
		if canvas.generation() != generation {
			info!("discarding stale spawn of {identifier}");
			return Ok(Applied::Stale);
		}

		let batch = canvas.add_nodes(&[NodeDescriptor::new(identifier, state)]);
		let layout = canvas.fit_layout();
		match self.spawn_layout {
			SpawnLayout::All => canvas.run_layout_all(&layout),
			SpawnLayout::Spawned => canvas.run_layout(&layout, &batch.added),
		}

		Ok(Applied::Inserted(InsertReport {
			nodes_added: batch.added.len(),
			nodes_restyled: batch.restyled,
			..InsertReport::default()
		}))
	}
}
