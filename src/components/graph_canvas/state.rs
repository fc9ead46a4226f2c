use std::collections::HashSet;

use force_graph::DefaultNodeIdx;

use crate::canvas::{PackageCanvas, Point};

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Point,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Pointer state of one canvas element.
#[derive(Clone, Debug, Default)]
pub struct InteractionState {
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub flow_time: f64,
	generation: u64,
}

impl InteractionState {
	pub fn begin_drag(&mut self, canvas: &PackageCanvas, idx: DefaultNodeIdx, x: f64, y: f64) {
		self.drag = DragState {
			active: true,
			node_idx: Some(idx),
			start_x: x,
			start_y: y,
			node_start: canvas.node_position(idx).unwrap_or_default(),
		};
	}

	pub fn begin_pan(&mut self, canvas: &PackageCanvas, x: f64, y: f64) {
		self.pan = PanState {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: canvas.viewport.transform.x,
			transform_start_y: canvas.viewport.transform.y,
		};
	}

	/// Applies a pointer move to whichever gesture is running.
	pub fn pointer_moved(&mut self, canvas: &mut PackageCanvas, x: f64, y: f64) {
		if !self.drag.active {
			let hovered = canvas.node_at_position(x, y);
			self.set_hover(canvas, hovered);
		}

		if self.drag.active {
			if let Some(idx) = self.drag.node_idx {
				let k = canvas.viewport.transform.k;
				let to = Point::new(
					self.drag.node_start.x + (x - self.drag.start_x) / k,
					self.drag.node_start.y + (y - self.drag.start_y) / k,
				);
				canvas.move_node(idx, to);
			}
		} else if self.pan.active {
			let t = &mut canvas.viewport.transform;
			t.x = self.pan.transform_start_x + (x - self.pan.start_x);
			t.y = self.pan.transform_start_y + (y - self.pan.start_y);
		}
	}

	pub fn release(&mut self) {
		self.drag = DragState::default();
		self.pan.active = false;
	}

	pub fn set_hover(&mut self, canvas: &PackageCanvas, node: Option<DefaultNodeIdx>) {
		if self.hover.node == node {
			return;
		}
		let was_hovering = self.hover.node.is_some();

		// Save previous state for fade-out
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			self.hover.neighbors = canvas.neighbors(idx);
		}
	}

	/// Drops gesture and hover state that points at nodes from before a reset.
	pub fn sync_generation(&mut self, generation: u64) {
		if self.generation != generation {
			*self = Self {
				flow_time: self.flow_time,
				generation,
				..Self::default()
			};
		}
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Advances the highlight fade and the dash flow.
	pub fn tick(&mut self, dt: f32) {
		self.flow_time += dt as f64;

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{DependencyKind, PackageState};
	use crate::translate::{EdgeDescriptor, NodeDescriptor};

	fn two_nodes() -> PackageCanvas {
		let mut canvas = PackageCanvas::new(800.0, 600.0, false);
		canvas.add_nodes(&[
			NodeDescriptor::new("a", PackageState::Active),
			NodeDescriptor::new("b", PackageState::Active),
		]);
		canvas.add_edges(&[EdgeDescriptor::new("a", "b", DependencyKind::Runtime.style())]);
		canvas
	}

	#[test]
	fn dragging_moves_the_node_in_graph_space() {
		let mut canvas = two_nodes();
		canvas.viewport.transform.k = 2.0;
		let a = canvas.node_index("a").unwrap();
		canvas.move_node(a, Point::new(0.0, 0.0));

		let mut ui = InteractionState::default();
		ui.begin_drag(&canvas, a, 400.0, 300.0);
		ui.pointer_moved(&mut canvas, 420.0, 310.0);
		ui.release();

		assert_eq!(canvas.node_position(a), Some(Point::new(10.0, 5.0)));
		assert!(!ui.drag.active);
	}

	#[test]
	fn panning_shifts_the_transform() {
		let mut canvas = two_nodes();
		let mut ui = InteractionState::default();
		ui.begin_pan(&canvas, 10.0, 10.0);
		ui.pointer_moved(&mut canvas, 30.0, 0.0);
		assert_eq!(canvas.viewport.transform.x, 420.0);
		assert_eq!(canvas.viewport.transform.y, 290.0);
	}

	#[test]
	fn hover_highlights_neighbors_then_fades() {
		let canvas = two_nodes();
		let (a, b) = (canvas.node_index("a").unwrap(), canvas.node_index("b").unwrap());
		let mut ui = InteractionState::default();

		ui.set_hover(&canvas, Some(a));
		assert!(ui.is_hovered(a));
		assert!(ui.is_highlighted(b));

		ui.set_hover(&canvas, None);
		assert!(ui.has_active_highlight());
		for _ in 0..1000 {
			ui.tick(0.016);
		}
		assert!(!ui.has_active_highlight());
	}

	#[test]
	fn reset_forgets_hovered_nodes() {
		let mut canvas = two_nodes();
		let a = canvas.node_index("a").unwrap();
		let mut ui = InteractionState::default();
		ui.sync_generation(canvas.generation());
		ui.set_hover(&canvas, Some(a));
		ui.begin_drag(&canvas, a, 0.0, 0.0);

		canvas.clear();
		ui.sync_generation(canvas.generation());
		assert!(!ui.has_active_highlight());
		assert!(ui.drag.node_idx.is_none());
	}
}
