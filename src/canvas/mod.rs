//! The package canvas: the live set of nodes and edges and their placement.
//!
//! Insertion policy, applied to every batch:
//! - a node whose identifier is already present keeps its position and takes
//!   the new color (upsert);
//! - an edge whose ordered pair is already present is ignored;
//! - self-loops and edges with a missing endpoint are skipped.
//!
//! [`PackageCanvas::clear`] bumps the generation so responses issued before
//! the reset can be recognised as stale.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};
use log::{debug, warn};

use crate::model::{EdgeStyle, PackageState};
use crate::translate::{EdgeDescriptor, NodeDescriptor};

mod layout;
mod viewport;

pub use layout::{BoundingBox, CircleLayout, Point, START_ANGLE};
pub use viewport::{ViewTransform, Viewport};

/// Drawn radius of a node, in graph units.
pub const NODE_RADIUS: f64 = 5.0;
/// Pointer distance that still counts as a hit on a node.
pub const HIT_RADIUS: f64 = 12.0;

/// Shared handle to the one canvas of a page.
pub type CanvasHandle = Rc<RefCell<PackageCanvas>>;

/// Display data carried by every node.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	/// Package identifier.
	pub id: String,
	/// Text drawn next to the node.
	pub label: String,
	/// Last classification seen for the package.
	pub state: PackageState,
	/// Fill color derived from `state`.
	pub color: &'static str,
}

/// An edge as stored on the canvas.
#[derive(Clone, Debug)]
pub struct EdgeRecord {
	/// `source` identifier followed by `target` identifier.
	pub id: String,
	/// Node the edge starts at.
	pub source: DefaultNodeIdx,
	/// Node the edge points to.
	pub target: DefaultNodeIdx,
	/// Stroke color and pattern.
	pub style: EdgeStyle,
}

/// Outcome of a node batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeBatch {
	/// Nodes that were not on the canvas before, in batch order.
	pub added: Vec<DefaultNodeIdx>,
	/// Nodes that were already present and got re-styled.
	pub restyled: usize,
}

/// Outcome of an edge batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeBatch {
	/// Edges inserted.
	pub added: usize,
	/// Ordered pair already on the canvas.
	pub duplicates: usize,
	/// Self-loops and edges with an endpoint that is not on the canvas.
	pub skipped: usize,
}

/// Nodes, edges and viewport of one explorer page.
pub struct PackageCanvas {
	graph: ForceGraph<NodeInfo, ()>,
	ids: HashMap<String, DefaultNodeIdx>,
	edges: Vec<EdgeRecord>,
	pairs: HashSet<(DefaultNodeIdx, DefaultNodeIdx)>,
	generation: u64,
	physics: bool,
	/// Pan and zoom applied when drawing and hit testing.
	pub viewport: Viewport,
}

fn simulation() -> ForceGraph<NodeInfo, ()> {
	ForceGraph::new(SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	})
}

impl PackageCanvas {
	/// An empty canvas of the given screen size.
	pub fn new(width: f64, height: f64, physics: bool) -> Self {
		Self {
			graph: simulation(),
			ids: HashMap::new(),
			edges: Vec::new(),
			pairs: HashSet::new(),
			generation: 0,
			physics,
			viewport: Viewport::new(width, height),
		}
	}

	/// Wraps the canvas in a [`CanvasHandle`].
	pub fn into_handle(self) -> CanvasHandle {
		Rc::new(RefCell::new(self))
	}

	/// Bumped by every [`clear`](Self::clear).
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Removes every element. The viewport is left alone.
	pub fn clear(&mut self) {
		self.graph = simulation();
		self.ids.clear();
		self.edges.clear();
		self.pairs.clear();
		self.generation += 1;
		debug!("canvas cleared, generation {}", self.generation);
	}

	/// Number of nodes.
	pub fn node_count(&self) -> usize {
		self.ids.len()
	}

	/// Number of edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	/// True when a node with this identifier exists.
	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains_key(id)
	}

	/// Index of the node with this identifier.
	pub fn node_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.ids.get(id).copied()
	}

	/// Looks a node up by index.
	pub fn node(&self, idx: DefaultNodeIdx) -> Option<NodeInfo> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.clone());
			}
		});
		found
	}

	/// Looks a node up by identifier.
	pub fn node_by_id(&self, id: &str) -> Option<NodeInfo> {
		self.node_index(id).and_then(|idx| self.node(idx))
	}

	/// Every edge, in insertion order.
	pub fn edges(&self) -> &[EdgeRecord] {
		&self.edges
	}

	/// Finds the edge `source -> target`.
	pub fn edge(&self, source: &str, target: &str) -> Option<&EdgeRecord> {
		let (src, tgt) = (self.node_index(source)?, self.node_index(target)?);
		self.edges.iter().find(|e| e.source == src && e.target == tgt)
	}

	/// Inserts a batch of nodes. New nodes start at the visible center.
	pub fn add_nodes(&mut self, nodes: &[NodeDescriptor]) -> NodeBatch {
		let mut batch = NodeBatch::default();
		let center = self.viewport.visible_box().center();

		for desc in nodes {
			if let Some(&idx) = self.ids.get(&desc.id) {
				self.graph.visit_nodes_mut(|node| {
					if node.index() == idx {
						node.data.user_data.state = desc.state;
						node.data.user_data.color = desc.background_color;
					}
				});
				batch.restyled += 1;
				continue;
			}

			let idx = self.graph.add_node(NodeData {
				x: center.x as f32,
				y: center.y as f32,
				mass: 10.0,
				is_anchor: false,
				user_data: NodeInfo {
					id: desc.id.clone(),
					label: desc.display_name.clone(),
					state: desc.state,
					color: desc.background_color,
				},
			});
			self.ids.insert(desc.id.clone(), idx);
			batch.added.push(idx);
		}
		batch
	}

	/// Inserts a batch of edges between nodes already on the canvas.
	pub fn add_edges(&mut self, edges: &[EdgeDescriptor]) -> EdgeBatch {
		let mut batch = EdgeBatch::default();

		for desc in edges {
			let (Some(&src), Some(&tgt)) = (self.ids.get(&desc.source), self.ids.get(&desc.target))
			else {
				warn!("skipping edge {}: endpoint not on canvas", desc.id);
				batch.skipped += 1;
				continue;
			};
			if src == tgt {
				debug!("skipping self-loop on {}", desc.source);
				batch.skipped += 1;
				continue;
			}
			if !self.pairs.insert((src, tgt)) {
				batch.duplicates += 1;
				continue;
			}

			self.graph.add_edge(src, tgt, EdgeData::default());
			self.edges.push(EdgeRecord {
				id: desc.id.clone(),
				source: src,
				target: tgt,
				style: desc.style,
			});
			batch.added += 1;
		}
		batch
	}

	/// Places `nodes` according to `layout`, in the given order.
	pub fn run_layout(&mut self, layout: &CircleLayout, nodes: &[DefaultNodeIdx]) {
		let positions: HashMap<_, _> = nodes
			.iter()
			.copied()
			.zip(layout.positions(nodes.len(), 2.0 * NODE_RADIUS))
			.collect();

		self.graph.visit_nodes_mut(|node| {
			if let Some(p) = positions.get(&node.index()) {
				node.data.x = p.x as f32;
				node.data.y = p.y as f32;
			}
		});
	}

	/// Places every node according to `layout`, in insertion order.
	pub fn run_layout_all(&mut self, layout: &CircleLayout) {
		let mut all = Vec::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| all.push(node.index()));
		all.sort();
		self.run_layout(layout, &all);
	}

	/// A circle layout filling the visible area.
	pub fn fit_layout(&self) -> CircleLayout {
		CircleLayout::fit(self.viewport.visible_box())
	}

	/// Position of a node in graph space.
	pub fn node_position(&self, idx: DefaultNodeIdx) -> Option<Point> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(Point::new(node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	/// Current position of every node.
	pub fn positions(&self) -> HashMap<DefaultNodeIdx, Point> {
		let mut positions = HashMap::with_capacity(self.ids.len());
		self.graph.visit_nodes(|node| {
			positions.insert(node.index(), Point::new(node.x() as f64, node.y() as f64));
		});
		positions
	}

	/// Moves a node and pins it against the simulation.
	pub fn move_node(&mut self, idx: DefaultNodeIdx, to: Point) {
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx {
				node.data.x = to.x as f32;
				node.data.y = to.y as f32;
				node.data.is_anchor = true;
			}
		});
	}

	/// Visits every node with its display data and position.
	pub fn visit_nodes(&self, mut f: impl FnMut(DefaultNodeIdx, &NodeInfo, Point)) {
		self.graph.visit_nodes(|node| {
			f(
				node.index(),
				&node.data.user_data,
				Point::new(node.x() as f64, node.y() as f64),
			)
		});
	}

	/// The node under the screen point `(sx, sy)`, if any.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let g = self.viewport.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - g.x, node.y() as f64 - g.y);
			// HIT_RADIUS is in world-space, scales with zoom like nodes
			if (dx * dx + dy * dy).sqrt() < HIT_RADIUS {
				found = Some(node.index());
			}
		});
		found
	}

	/// Nodes sharing an edge with `idx`, in either direction.
	pub fn neighbors(&self, idx: DefaultNodeIdx) -> HashSet<DefaultNodeIdx> {
		self.edges
			.iter()
			.filter_map(|e| {
				if e.source == idx {
					Some(e.target)
				} else if e.target == idx {
					Some(e.source)
				} else {
					None
				}
			})
			.collect()
	}

	/// Whether the force simulation runs.
	pub fn physics(&self) -> bool {
		self.physics
	}

	/// Advances the force simulation when physics is on.
	pub fn tick(&mut self, dt: f32) {
		if self.physics {
			self.graph.update(dt);
		}
	}
}
