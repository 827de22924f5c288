//! Router settings.
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! not_found = "fallback"
//! history_limit = 50
//! include_registered = true
//! discover_files = true
//! route_file_extension = "rs"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the router does when a navigation target matches no route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotFoundPolicy {
	/// Render nothing and skip the navigation callback.
	#[default]
	Ignore,
	/// Render the handler installed with
	/// [`Router::set_not_found`](crate::Router::set_not_found).
	Fallback,
}

/// Router configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	pub not_found: NotFoundPolicy,

	/// Maximum number of history entries. Unbounded when absent.
	pub history_limit: Option<usize>,

	/// Collect routes submitted with the registration macros at initialize.
	#[serde(default = "default_true")]
	pub include_registered: bool,

	/// Scan the route source root at initialize and report route files
	/// without a handler.
	#[serde(default = "default_true")]
	pub discover_files: bool,

	/// Extension of route source files.
	#[serde(default = "default_route_file_extension")]
	pub route_file_extension: String,
}

fn default_true() -> bool {
	true
}

fn default_route_file_extension() -> String {
	"rs".to_string()
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			not_found: NotFoundPolicy::default(),
			history_limit: None,
			include_registered: default_true(),
			discover_files: default_true(),
			route_file_extension: default_route_file_extension(),
		}
	}
}

impl RouterSettings {
	/// Load settings from a TOML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
			path: path.as_ref().to_path_buf(),
			source: e,
		})?;

		Self::from_toml(&content)
	}

	/// Parse settings from a TOML string.
	pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(content)?)
	}

	pub fn with_not_found(mut self, policy: NotFoundPolicy) -> Self {
		self.not_found = policy;
		self
	}

	pub fn with_history_limit(mut self, limit: usize) -> Self {
		self.history_limit = Some(limit);
		self
	}

	/// Enable or disable collection of macro-registered routes.
	pub fn with_registered(mut self, include: bool) -> Self {
		self.include_registered = include;
		self
	}

	/// Enable or disable the route file scan.
	pub fn with_discovery(mut self, discover: bool) -> Self {
		self.discover_files = discover;
		self
	}

	pub fn with_route_file_extension(mut self, extension: impl Into<String>) -> Self {
		self.route_file_extension = extension.into();
		self
	}
}
