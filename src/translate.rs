//! Translation of query results into canvas element descriptors.
//!
//! Both translations read the same [`QueryResult`] and do not depend on each
//! other, so callers may run them in either order.

use crate::model::{EdgeStyle, PackageState, QueryResult};

/// A node to be inserted into the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeDescriptor {
	/// Unique identifier within the canvas.
	pub id: String,
	/// Label drawn next to the node.
	pub display_name: String,
	/// Classification the color is derived from.
	pub state: PackageState,
	/// Fill color.
	pub background_color: &'static str,
}

impl NodeDescriptor {
	/// Builds the descriptor of a package in the given state.
	pub fn new(id: impl Into<String>, state: PackageState) -> Self {
		let id = id.into();
		Self {
			display_name: id.clone(),
			id,
			state,
			background_color: state.color(),
		}
	}
}

/// An edge to be inserted into the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeDescriptor {
	/// `source` followed by `target`.
	pub id: String,
	/// Identifier of the queried package.
	pub source: String,
	/// Identifier of the neighbor.
	pub target: String,
	/// Stroke color and pattern.
	pub style: EdgeStyle,
}

impl EdgeDescriptor {
	/// Builds the descriptor of the edge `source -> target`.
	pub fn new(source: &str, target: &str, style: EdgeStyle) -> Self {
		Self {
			id: format!("{source}{target}"),
			source: source.to_owned(),
			target: target.to_owned(),
			style,
		}
	}
}

/// One node per neighbor, in response order.
pub fn translate_to_nodes(result: &QueryResult) -> Vec<NodeDescriptor> {
	result
		.iter()
		.map(|n| NodeDescriptor::new(n.id.clone(), n.state))
		.collect()
}

/// One edge from `source` to every neighbor, in response order.
pub fn translate_to_edges(source: &str, result: &QueryResult) -> Vec<EdgeDescriptor> {
	result
		.iter()
		.map(|n| EdgeDescriptor::new(source, &n.id, n.kind.style()))
		.collect()
}
