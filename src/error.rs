//! Error type for explorer operations.

use thiserror::Error;

/// Everything that can go wrong between a user action and the canvas.
#[derive(Debug, Error)]
pub enum ExplorerError {
	/// The browser refused to build the request.
	#[error("could not build request to {path}: {reason}")]
	Request {
		/// Service path the request targeted.
		path: String,
		/// JS-side description of the failure.
		reason: String,
	},

	/// The request never got a response.
	#[error("data service unreachable at {path}: {reason}")]
	Network {
		/// Service path the request targeted.
		path: String,
		/// JS-side description of the failure.
		reason: String,
	},

	/// The service answered with a non-success status.
	#[error("data service answered {status} for {path}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Service path the request targeted.
		path: String,
	},

	/// The body was not the expected JSON shape.
	#[error("malformed response: {0}")]
	Malformed(#[from] serde_json::Error),

	/// The body could not be read as text.
	#[error("response body from {0} is not text")]
	NotText(String),

	/// A manual spawn was requested without an identifier.
	#[error("package identifier is empty")]
	EmptyIdentifier,

	/// Not running inside a browser window.
	#[error("no browser window available")]
	NoWindow,

	/// A configuration value could not be used.
	#[error("invalid configuration value for `{key}`: {value:?}")]
	Config {
		/// Query parameter name.
		key: &'static str,
		/// The rejected value.
		value: String,
	},
}

/// A specialized Result type for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;
