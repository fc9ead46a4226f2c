use std::f64::consts::PI;

/// A position in graph space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Builds a point.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(self.x - other.x).hypot(self.y - other.y)
	}
}

/// Axis-aligned region a layout must fit into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
	/// Left edge.
	pub x1: f64,
	/// Top edge.
	pub y1: f64,
	/// Right edge.
	pub x2: f64,
	/// Bottom edge.
	pub y2: f64,
}

impl BoundingBox {
	/// A box collapsed to a single point.
	pub fn point(p: Point) -> Self {
		Self {
			x1: p.x,
			y1: p.y,
			x2: p.x,
			y2: p.y,
		}
	}

	/// Width of the box.
	pub fn width(&self) -> f64 {
		(self.x2 - self.x1).abs()
	}

	/// Height of the box.
	pub fn height(&self) -> f64 {
		(self.y2 - self.y1).abs()
	}

	/// Center of the box.
	pub fn center(&self) -> Point {
		Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
	}
}

/// Start angle shared by every circle layout: the first node sits on top.
pub const START_ANGLE: f64 = 3.0 / 2.0 * PI;

/// Places nodes evenly on a circle inside a bounding box.
///
/// Positions are applied at once; there is no animated transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleLayout {
	/// Region the circle is centered in.
	pub bounding_box: BoundingBox,
	/// Extra gap between neighboring nodes on the circle.
	pub spacing: f64,
	/// Widen the circle when nodes would otherwise overlap.
	pub avoid_overlap: bool,
	/// Angle of the first node, in radians.
	pub start_angle: f64,
}

impl CircleLayout {
	/// Fan-out around a single point, used after a node activation.
	pub fn anchored(at: Point) -> Self {
		Self {
			bounding_box: BoundingBox::point(at),
			spacing: 1.0,
			avoid_overlap: true,
			start_angle: START_ANGLE,
		}
	}

	/// A circle filling `bounding_box`, used after a manual spawn.
	pub fn fit(bounding_box: BoundingBox) -> Self {
		Self {
			bounding_box,
			spacing: 5.0,
			avoid_overlap: true,
			start_angle: START_ANGLE,
		}
	}

	/// Computes the positions of `n` nodes of the given diameter.
	pub fn positions(&self, n: usize, node_diameter: f64) -> Vec<Point> {
		let center = self.bounding_box.center();
		if n == 0 {
			return Vec::new();
		}
		if n == 1 {
			return vec![center];
		}

		let step = 2.0 * PI / n as f64;
		let min_distance = node_diameter + self.spacing;
		let bb = &self.bounding_box;
		let mut radius = (bb.width().min(bb.height()) / 2.0 - min_distance).max(0.0);

		if self.avoid_overlap {
			let (dcos, dsin) = (step.cos() - 1.0, step.sin());
			let min_radius = ((min_distance * 1.75).powi(2) / (dcos * dcos + dsin * dsin)).sqrt();
			radius = radius.max(min_radius);
		}

		(0..n)
			.map(|i| {
				let theta = self.start_angle + i as f64 * step;
				Point::new(center.x + radius * theta.cos(), center.y + radius * theta.sin())
			})
			.collect()
	}
}
