//! HTTP client for the node-data service, built on the browser `fetch` API.

use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::client::NeighborService;
use crate::error::{ExplorerError, Result};
use crate::model::{PackageState, QueryResult};

/// Neighbor query endpoint.
pub const NODES_PATH: &str = "/nodes";
/// Classification query endpoint.
pub const PACKAGE_TYPE_PATH: &str = "/package_type";

/// [`NeighborService`] talking to the data service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpNodeService {
	base_url: String,
}

impl HttpNodeService {
	/// A client for the service at `base_url`; trailing slashes are dropped.
	pub fn new(base_url: &str) -> Self {
		Self {
			base_url: base_url.trim_end_matches('/').to_owned(),
		}
	}

	/// Base address requests are sent to.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// POSTs `package` as a JSON string and returns the body as text.
	async fn post(&self, path: &str, package: &str) -> Result<String> {
		let url = format!("{}{}", self.base_url, path);
		let js_err = |e: JsValue| format!("{e:?}");

		let opts = RequestInit::new();
		opts.set_method("POST");
		opts.set_mode(RequestMode::Cors);
		opts.set_body(&JsValue::from_str(&serde_json::to_string(package)?));

		let request = Request::new_with_str_and_init(&url, &opts).map_err(|e| ExplorerError::Request {
			path: path.to_owned(),
			reason: js_err(e),
		})?;
		request
			.headers()
			.set("Content-Type", "application/json")
			.map_err(|e| ExplorerError::Request {
				path: path.to_owned(),
				reason: js_err(e),
			})?;

		let window = web_sys::window().ok_or(ExplorerError::NoWindow)?;
		let network = |e: JsValue| ExplorerError::Network {
			path: path.to_owned(),
			reason: js_err(e),
		};
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(network)?
			.dyn_into()
			.map_err(network)?;

		if !resp.ok() {
			return Err(ExplorerError::Status {
				status: resp.status(),
				path: path.to_owned(),
			});
		}

		JsFuture::from(resp.text().map_err(network)?)
			.await
			.map_err(network)?
			.as_string()
			.ok_or_else(|| ExplorerError::NotText(path.to_owned()))
	}
}

impl NeighborService for HttpNodeService {
	async fn neighbors(&self, package: &str) -> Result<QueryResult> {
		let body = self.post(NODES_PATH, package).await?;
		QueryResult::from_json(&body)
	}

	async fn classify(&self, package: &str) -> Result<PackageState> {
		let body = self.post(PACKAGE_TYPE_PATH, package).await?;
		Ok(PackageState::from_tag(Some(body.trim())))
	}
}
