//! Route pattern parsing.
//!
//! Patterns are written as slash separated segments:
//!
//! - `/users/active` - literal segments, matched verbatim
//! - `/users/:id` - `:name` captures exactly one segment
//! - `/blog/*rest` - `*name` captures every remaining segment jointly
//! - `/` - the root
//!
//! Empty segments are ignored, so `/users/` and `/users` are the same pattern.
//!
//! Route source files follow the same shape through
//! [`RoutePattern::from_route_file`]: `blog/[slug].rs` becomes
//! `/blog/:slug`, `docs/[...path].rs` becomes `/docs/*path`, `index.rs`
//! names its directory and `_layout.rs` declares the directory's layout.

use crate::error::PatternError;
use std::collections::HashSet;
use std::fmt;
use std::path::{Component, Path};

/// Maximum number of segments accepted in one pattern.
const MAX_PATTERN_SEGMENTS: usize = 32;

/// File stem that maps a route file to its directory.
const INDEX_STEM: &str = "index";

/// File stem that declares a layout for its directory.
const LAYOUT_STEM: &str = "_layout";

/// One segment of a [`RoutePattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
	/// Matched verbatim.
	Literal(String),
	/// Captures one path segment under the given name.
	Param(String),
	/// Captures all remaining segments under the given name.
	CatchAll(String),
}

impl fmt::Display for Segment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(text) => f.write_str(text),
			Self::Param(name) => write!(f, ":{}", name),
			Self::CatchAll(name) => write!(f, "*{}", name),
		}
	}
}

/// Whether a registration renders a leaf or wraps its descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
	/// Leaf handler producing the page content.
	Route,
	/// Wrapping handler supplying a content slot.
	Layout,
}

impl fmt::Display for RouteKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Route => f.write_str("route"),
			Self::Layout => f.write_str("layout"),
		}
	}
}

/// A parsed route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutePattern {
	/// Canonical textual form, always starting with `/`.
	canonical: String,
	segments: Vec<Segment>,
}

impl RoutePattern {
	/// Parses a pattern string.
	///
	/// # Errors
	///
	/// Returns [`PatternError`] if the pattern is not absolute, declares an
	/// unnamed or repeated parameter, or places a catch-all before the end.
	pub fn parse(pattern: &str) -> Result<Self, PatternError> {
		if !pattern.starts_with('/') {
			return Err(PatternError::NotAbsolute);
		}

		let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
		if raw.len() > MAX_PATTERN_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: raw.len(),
				max: MAX_PATTERN_SEGMENTS,
			});
		}

		let mut segments = Vec::with_capacity(raw.len());
		let mut seen = HashSet::new();

		for (index, text) in raw.iter().enumerate() {
			let segment = if let Some(name) = text.strip_prefix(':') {
				validate_param_name(name, index)?;
				Segment::Param(name.to_string())
			} else if let Some(name) = text.strip_prefix('*') {
				validate_param_name(name, index)?;
				if index + 1 != raw.len() {
					return Err(PatternError::CatchAllNotFinal {
						name: name.to_string(),
					});
				}
				Segment::CatchAll(name.to_string())
			} else {
				Segment::Literal((*text).to_string())
			};

			if let Segment::Param(name) | Segment::CatchAll(name) = &segment
				&& !seen.insert(name.clone())
			{
				return Err(PatternError::DuplicateParamName { name: name.clone() });
			}

			segments.push(segment);
		}

		Ok(Self::from_segments(segments))
	}

	/// The root pattern `/`.
	pub fn root() -> Self {
		Self::from_segments(Vec::new())
	}

	fn from_segments(segments: Vec<Segment>) -> Self {
		let mut canonical = String::from("/");
		let joined: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
		canonical.push_str(&joined.join("/"));
		Self {
			canonical,
			segments,
		}
	}

	/// Maps a route source file, relative to the source root, to a pattern.
	///
	/// Returns `Ok(None)` for files that are not routes: other extensions and
	/// private files whose stem starts with `_` (other than `_layout`).
	///
	/// # Errors
	///
	/// Returns [`PatternError`] when a bracketed file or directory name does
	/// not form a valid parameter.
	pub fn from_route_file(
		relative: &Path,
		extension: &str,
	) -> Result<Option<(Self, RouteKind)>, PatternError> {
		if relative.extension().and_then(|e| e.to_str()) != Some(extension) {
			return Ok(None);
		}
		let Some(stem) = relative.file_stem().and_then(|s| s.to_str()) else {
			return Ok(None);
		};

		let mut parts = Vec::new();
		if let Some(parent) = relative.parent() {
			for component in parent.components() {
				if let Component::Normal(dir) = component {
					match dir.to_str() {
						Some(dir) => parts.push(file_segment(dir)),
						None => return Ok(None),
					}
				}
			}
		}

		let kind = match stem {
			LAYOUT_STEM => RouteKind::Layout,
			INDEX_STEM => RouteKind::Route,
			private if private.starts_with('_') => return Ok(None),
			other => {
				parts.push(file_segment(other));
				RouteKind::Route
			}
		};

		let pattern = format!("/{}", parts.join("/"));
		Self::parse(&pattern).map(|p| Some((p, kind)))
	}

	/// Returns the canonical pattern string.
	pub fn as_str(&self) -> &str {
		&self.canonical
	}

	/// Returns the parsed segments.
	pub fn segments(&self) -> &[Segment] {
		&self.segments
	}

	/// Returns the parameter names in declaration order.
	pub fn param_names(&self) -> Vec<&str> {
		self.segments
			.iter()
			.filter_map(|s| match s {
				Segment::Param(name) | Segment::CatchAll(name) => Some(name.as_str()),
				Segment::Literal(_) => None,
			})
			.collect()
	}

	/// Returns whether the pattern is `/`.
	pub fn is_root(&self) -> bool {
		self.segments.is_empty()
	}

	/// Returns whether the pattern only contains literal segments.
	pub fn is_static(&self) -> bool {
		self.segments
			.iter()
			.all(|s| matches!(s, Segment::Literal(_)))
	}
}

impl fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.canonical)
	}
}

impl std::str::FromStr for RoutePattern {
	type Err = PatternError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

fn validate_param_name(name: &str, index: usize) -> Result<(), PatternError> {
	if name.is_empty() {
		return Err(PatternError::EmptyParamName { index });
	}
	if !name
		.chars()
		.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
	{
		return Err(PatternError::InvalidParamName {
			name: name.to_string(),
		});
	}
	Ok(())
}

/// Translates a bracketed file or directory name into pattern syntax.
fn file_segment(name: &str) -> String {
	match name.strip_prefix('[').and_then(|n| n.strip_suffix(']')) {
		Some(inner) => match inner.strip_prefix("...") {
			Some(rest) => format!("*{}", rest),
			None => format!(":{}", inner),
		},
		None => name.to_string(),
	}
}
