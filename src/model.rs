//! Package and dependency vocabulary shared by the client and the canvas.
//!
//! The data service speaks in plain strings. They are folded into closed
//! enums here, once, so every later color or style decision is an
//! exhaustive match instead of a string comparison.

use serde::Deserialize;

use crate::error::ExplorerError;

/// Color used for active packages and runtime dependencies.
pub const GREEN: &str = "#008b02";
/// Color used for obsoleted packages.
pub const BLACK: &str = "#000000";
/// Color used for partly obsoleted packages.
pub const YELLOW: &str = "#fccb00";
/// Color used for renamed packages and build dependencies.
pub const BLUE: &str = "#004dcf";
/// Color used for test dependencies.
pub const GRAY: &str = "#abb8c3";

/// Lifecycle status of a package, as reported by the data service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PackageState {
	/// Any tag outside the known set, including the service's `"None"` and `"Normal"`.
	#[default]
	Active,
	/// Every version of the package is obsolete.
	Obsoleted,
	/// Only the newest version is still alive.
	PartlyObsoleted,
	/// The package was renamed.
	Renamed,
}

impl PackageState {
	/// Parses a classification tag. Matching is exact and case-sensitive.
	pub fn from_tag(tag: Option<&str>) -> Self {
		match tag {
			Some("Obsoleted") => Self::Obsoleted,
			Some("PartlyObsoleted") => Self::PartlyObsoleted,
			Some("Renamed") => Self::Renamed,
			_ => Self::Active,
		}
	}

	/// Node fill color for this state.
	pub fn color(self) -> &'static str {
		match self {
			Self::Active => GREEN,
			Self::Obsoleted => BLACK,
			Self::PartlyObsoleted => YELLOW,
			Self::Renamed => BLUE,
		}
	}
}

/// How one package depends on another.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DependencyKind {
	/// Runtime dependency, and the fallback for unknown kinds.
	#[default]
	Runtime,
	/// Build-time dependency of the component.
	Build,
	/// Test-time dependency of the component.
	Test,
	/// Transitive build dependency pulled in by the system.
	SystemBuild,
	/// Transitive test dependency pulled in by the system.
	SystemTest,
}

impl DependencyKind {
	/// Parses a relationship kind. Matching is exact and case-sensitive.
	pub fn from_kind(kind: Option<&str>) -> Self {
		match kind {
			Some("Build") => Self::Build,
			Some("Test") => Self::Test,
			Some("SystemBuild") => Self::SystemBuild,
			Some("SystemTest") => Self::SystemTest,
			_ => Self::Runtime,
		}
	}

	/// Edge color and line style for this kind.
	pub fn style(self) -> EdgeStyle {
		let (color, line) = match self {
			Self::Runtime => (GREEN, LineStyle::Solid),
			Self::Build => (BLUE, LineStyle::Solid),
			Self::Test => (GRAY, LineStyle::Solid),
			Self::SystemBuild => (BLUE, LineStyle::Dashed),
			Self::SystemTest => (GRAY, LineStyle::Dashed),
		};
		EdgeStyle { color, line }
	}
}

/// Stroke pattern of an edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineStyle {
	/// Continuous line.
	#[default]
	Solid,
	/// Dash pattern.
	Dashed,
}

/// Presentation attributes of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EdgeStyle {
	/// Stroke color as a hex string.
	pub color: &'static str,
	/// Stroke pattern.
	pub line: LineStyle,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		DependencyKind::default().style()
	}
}

/// One neighbor of a queried package.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String, String)")]
pub struct Neighbor {
	/// Package identifier of the neighbor.
	pub id: String,
	/// How the queried package relates to it.
	pub kind: DependencyKind,
	/// Lifecycle status of the neighbor.
	pub state: PackageState,
}

impl From<(String, String, String)> for Neighbor {
	fn from((id, kind, tag): (String, String, String)) -> Self {
		Self {
			kind: DependencyKind::from_kind(Some(&kind)),
			state: PackageState::from_tag(Some(&tag)),
			id,
		}
	}
}

/// The neighbors returned for one query, in service order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryResult(pub Vec<Neighbor>);

impl QueryResult {
	/// Parses a `/nodes` response body. `null` reads as an empty result.
	pub fn from_json(body: &str) -> Result<Self, ExplorerError> {
		let neighbors: Option<Vec<Neighbor>> = serde_json::from_str(body)?;
		Ok(Self(neighbors.unwrap_or_default()))
	}

	/// Number of neighbors.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True when the service returned no neighbors.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates the neighbors in service order.
	pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
		self.0.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn known_tags_map_to_their_colors() {
		assert_eq!(PackageState::from_tag(Some("Obsoleted")).color(), "#000000");
		assert_eq!(PackageState::from_tag(Some("PartlyObsoleted")).color(), "#fccb00");
		assert_eq!(PackageState::from_tag(Some("Renamed")).color(), "#004dcf");
	}

	#[test]
	fn unknown_or_missing_tags_are_green() {
		for tag in [None, Some(""), Some("None"), Some("Normal"), Some("obsoleted"), Some("renamed ")] {
			assert_eq!(PackageState::from_tag(tag), PackageState::Active);
			assert_eq!(PackageState::from_tag(tag).color(), GREEN);
		}
	}

	#[test]
	fn kinds_map_to_color_and_line() {
		let cases = [
			("Build", BLUE, LineStyle::Solid),
			("Test", GRAY, LineStyle::Solid),
			("SystemBuild", BLUE, LineStyle::Dashed),
			("SystemTest", GRAY, LineStyle::Dashed),
			("Runtime", GREEN, LineStyle::Solid),
			("build", GREEN, LineStyle::Solid),
			("", GREEN, LineStyle::Solid),
		];
		for (kind, color, line) in cases {
			let style = DependencyKind::from_kind(Some(kind)).style();
			assert_eq!(style, EdgeStyle { color, line }, "kind {kind:?}");
		}
		assert_eq!(DependencyKind::from_kind(None).style(), EdgeStyle::default());
	}

	#[test]
	fn parses_triples_in_order() {
		let body = r#"[["pkgA","Build","Renamed"],["pkgB","Test","Obsoleted"]]"#;
		let result = QueryResult::from_json(body).unwrap();
		assert_eq!(result.len(), 2);
		assert_eq!(result.0[0].id, "pkgA");
		assert_eq!(result.0[0].kind, DependencyKind::Build);
		assert_eq!(result.0[0].state, PackageState::Renamed);
		assert_eq!(result.0[1].id, "pkgB");
		assert_eq!(result.0[1].state, PackageState::Obsoleted);
	}

	#[test]
	fn null_and_empty_bodies_are_empty_results() {
		assert!(QueryResult::from_json("null").unwrap().is_empty());
		assert!(QueryResult::from_json("[]").unwrap().is_empty());
	}

	#[test]
	fn malformed_bodies_are_errors() {
		for body in ["", "{}", r#"[["only-two","Build"]]"#, r#"[[1,2,3]]"#, "<html>"] {
			assert!(
				matches!(QueryResult::from_json(body), Err(ExplorerError::Malformed(_))),
				"body {body:?}"
			);
		}
	}
}
