//! Explorer configuration, read from the page's query parameters.

use crate::error::{ExplorerError, Result};

/// Where the data service listens unless `?service=` says otherwise.
pub const DEFAULT_SERVICE_URL: &str = "http://127.0.0.1:2310";

/// Which nodes a manual spawn re-lays out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpawnLayout {
	/// Every node on the canvas.
	#[default]
	All,
	/// Only the spawned node.
	Spawned,
}

/// Settings of one explorer page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExplorerConfig {
	/// Base address of the node-data service.
	pub service_url: String,
	/// Ask `/package_type` for the color of manually spawned nodes.
	pub classify_spawned: bool,
	/// Run the force simulation between layouts.
	pub physics: bool,
	/// Layout scope of a manual spawn.
	pub spawn_layout: SpawnLayout,
	/// Package spawned when the page loads.
	pub seed: Option<String>,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			service_url: DEFAULT_SERVICE_URL.to_owned(),
			classify_spawned: true,
			physics: false,
			spawn_layout: SpawnLayout::All,
			seed: None,
		}
	}
}

fn parse_bool(key: &'static str, value: String) -> Result<bool> {
	match value.as_str() {
		"true" => Ok(true),
		"false" => Ok(false),
		_ => Err(ExplorerError::Config { key, value }),
	}
}

impl ExplorerConfig {
	/// Builds a config from a parameter lookup, e.g. the page query map.
	///
	/// Missing parameters keep their default. The first unusable value is
	/// reported as an error.
	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
		let mut config = Self::default();

		if let Some(url) = lookup("service") {
			let url = url.trim().trim_end_matches('/').to_owned();
			if !(url.starts_with("http://") || url.starts_with("https://")) {
				return Err(ExplorerError::Config {
					key: "service",
					value: url,
				});
			}
			config.service_url = url;
		}
		if let Some(v) = lookup("classify") {
			config.classify_spawned = parse_bool("classify", v)?;
		}
		if let Some(v) = lookup("physics") {
			config.physics = parse_bool("physics", v)?;
		}
		if let Some(v) = lookup("relayout") {
			config.spawn_layout = match v.as_str() {
				"all" => SpawnLayout::All,
				"spawned" => SpawnLayout::Spawned,
				_ => {
					return Err(ExplorerError::Config {
						key: "relayout",
						value: v,
					});
				}
			};
		}
		config.seed = lookup("seed")
			.map(|s| s.trim().to_owned())
			.filter(|s| !s.is_empty());

		Ok(config)
	}
}
