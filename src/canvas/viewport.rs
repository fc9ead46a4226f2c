use super::layout::{BoundingBox, Point};

/// Screen-space translation and zoom factor applied to graph space.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal screen offset of the graph origin.
	pub x: f64,
	/// Vertical screen offset of the graph origin.
	pub y: f64,
	/// Zoom factor.
	pub k: f64,
}

/// Visible area of the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct Viewport {
	/// Current pan and zoom.
	pub transform: ViewTransform,
	/// Screen width in pixels.
	pub width: f64,
	/// Screen height in pixels.
	pub height: f64,
}

impl Viewport {
	/// A viewport with the graph origin at the center of the screen.
	pub fn new(width: f64, height: f64) -> Self {
		Self {
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			width,
			height,
		}
	}

	/// Converts a screen point into graph space.
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> Point {
		Point::new(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// The part of graph space currently on screen.
	pub fn visible_box(&self) -> BoundingBox {
		let top_left = self.screen_to_graph(0.0, 0.0);
		let bottom_right = self.screen_to_graph(self.width, self.height);
		BoundingBox {
			x1: top_left.x,
			y1: top_left.y,
			x2: bottom_right.x,
			y2: bottom_right.y,
		}
	}

	/// Zooms by `factor` keeping the screen point `(sx, sy)` fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(0.1, 10.0);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Keeps the graph point at the old screen center in the new center.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.transform.x += (width - self.width) / 2.0;
		self.transform.y += (height - self.height) / 2.0;
		self.width = width;
		self.height = height;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn origin_starts_at_screen_center() {
		let vp = Viewport::new(800.0, 600.0);
		assert_eq!(vp.screen_to_graph(400.0, 300.0), Point::new(0.0, 0.0));
		assert_eq!(vp.visible_box().center(), Point::new(0.0, 0.0));
	}

	#[test]
	fn zoom_keeps_the_cursor_point_fixed() {
		let mut vp = Viewport::new(800.0, 600.0);
		let before = vp.screen_to_graph(100.0, 50.0);
		vp.zoom_at(100.0, 50.0, 1.1);
		let after = vp.screen_to_graph(100.0, 50.0);
		assert!(before.distance(after) < 1e-9);
		assert!((vp.transform.k - 1.1).abs() < 1e-12);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut vp = Viewport::new(100.0, 100.0);
		for _ in 0..100 {
			vp.zoom_at(0.0, 0.0, 0.5);
		}
		assert_eq!(vp.transform.k, 0.1);
	}

	#[test]
	fn resize_keeps_center() {
		let mut vp = Viewport::new(800.0, 600.0);
		vp.resize(1000.0, 400.0);
		assert_eq!(vp.screen_to_graph(500.0, 200.0), Point::new(0.0, 0.0));
	}
}
