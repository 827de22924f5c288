//! Error types for the router.
//!
//! Each failure family has its own enum so callers can tell a fatal startup
//! problem (construction, initialization) apart from a per-pass failure
//! (composition) that leaves the previously attached content in place.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for route table construction.
pub type ConstructionResult<T> = Result<T, ConstructionError>;

/// Result type for router initialization.
pub type InitializationResult<T> = Result<T, InitializationError>;

/// Syntax errors in a single route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
	/// A catch-all segment appeared before the last segment.
	#[error("catch-all segment '*{name}' must be the final segment")]
	CatchAllNotFinal {
		/// Name of the misplaced catch-all.
		name: String,
	},

	/// `:` or `*` without a name.
	#[error("segment {index} declares a parameter without a name")]
	EmptyParamName {
		/// Zero-based segment index.
		index: usize,
	},

	/// The same parameter name appears twice in one pattern.
	#[error("parameter '{name}' is declared more than once")]
	DuplicateParamName {
		/// Repeated parameter name.
		name: String,
	},

	/// A parameter name contains characters outside `[A-Za-z0-9_-]`.
	#[error("invalid parameter name '{name}'")]
	InvalidParamName {
		/// Offending name.
		name: String,
	},

	/// The pattern does not start with `/`.
	#[error("pattern must start with '/'")]
	NotAbsolute,

	/// The pattern has more segments than the table accepts.
	#[error("pattern has {count} segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Number of segments found.
		count: usize,
		/// Maximum accepted.
		max: usize,
	},
}

/// Errors raised while building the route table.
///
/// These are fatal: the table is never produced in a partially built state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstructionError {
	/// A pattern failed to parse.
	#[error("invalid route pattern '{pattern}': {source}")]
	InvalidPattern {
		/// Pattern as registered.
		pattern: String,
		/// Underlying syntax error.
		#[source]
		source: PatternError,
	},

	/// Two dynamic siblings at the same depth use different names.
	#[error(
		"ambiguous dynamic segment in '{pattern}': ':{conflicting}' conflicts with existing ':{existing}'"
	)]
	AmbiguousParameter {
		/// Pattern that introduced the conflict.
		pattern: String,
		/// Name already present in the table.
		existing: String,
		/// Name the new pattern tried to use.
		conflicting: String,
	},

	/// Two catch-all siblings at the same depth use different names.
	#[error(
		"ambiguous catch-all segment in '{pattern}': '*{conflicting}' conflicts with existing '*{existing}'"
	)]
	AmbiguousCatchAll {
		/// Pattern that introduced the conflict.
		pattern: String,
		/// Name already present in the table.
		existing: String,
		/// Name the new pattern tried to use.
		conflicting: String,
	},

	/// A leaf route was registered twice for the same pattern.
	#[error("route '{0}' is registered more than once")]
	DuplicateRoute(String),

	/// A layout was registered twice for the same pattern.
	#[error("layout '{0}' is registered more than once")]
	DuplicateLayout(String),
}

/// Errors surfaced by [`Router::initialize`](crate::Router::initialize).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InitializationError {
	/// Nothing was registered before initialization.
	#[error("no routes were registered before initialization")]
	NoRoutes,

	/// The route source root does not exist or is not a directory.
	#[error("route source root '{path}' is unusable: {reason}")]
	RootUnusable {
		/// Root as given by the caller.
		path: PathBuf,
		/// Human readable cause.
		reason: String,
	},

	/// `initialize` was already called, or a registration arrived after it.
	#[error("router is already initialized")]
	AlreadyInitialized,

	/// The route table could not be built.
	#[error(transparent)]
	Construction(#[from] ConstructionError),
}

/// Errors that abort a single render pass.
///
/// The previously attached content stays in place when one of these occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum CompositionError {
	/// A layout returned without calling its `render_child` continuation.
	#[error("layout '{layout}' returned without rendering its child")]
	ContinuationNotInvoked {
		/// Pattern of the offending layout.
		layout: String,
	},

	/// A content slot was dropped before the pass could attach into it.
	#[error("content slot set by '{owner}' was released before commit")]
	SlotReleased {
		/// Pattern of the layout that provided the slot.
		owner: String,
	},

	/// Neither a screen nor a window is attached to the router.
	#[error("no screen or window is attached to the router")]
	NoAttachmentTarget,

	/// Navigation happened before `initialize`.
	#[error("router is not initialized")]
	NotInitialized,
}

/// Errors raised while loading [`RouterSettings`](crate::RouterSettings).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
	/// The settings file could not be read.
	#[error("failed to read settings file '{path}': {source}")]
	Io {
		/// File that failed to load.
		path: PathBuf,
		/// Underlying I/O error.
		#[source]
		source: std::io::Error,
	},

	/// The settings file is not valid TOML for [`RouterSettings`](crate::RouterSettings).
	#[error("failed to parse router settings: {0}")]
	Parse(#[from] toml::de::Error),
}
