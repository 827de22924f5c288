//! Route source discovery.
//!
//! Scans a route source root for files following the naming conventions of
//! [`RoutePattern::from_route_file`]. Discovery never registers anything:
//! handlers still come from the registration macros or the router's
//! registry. The scan is used at initialize to report route files that
//! have no handler.

use crate::pattern::{RouteKind, RoutePattern};
use crate::registry::Registration;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A route file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredRoute {
	/// Path relative to the source root.
	pub file: PathBuf,
	pub pattern: RoutePattern,
	pub kind: RouteKind,
}

/// Walks `root` and maps every route file with `extension` to a pattern.
///
/// Results are ordered by path. Files whose names do not form a valid
/// pattern, and entries that cannot be read, are logged and skipped.
pub fn discover_route_files(root: impl AsRef<Path>, extension: &str) -> Vec<DiscoveredRoute> {
	let root = root.as_ref();
	let mut discovered = Vec::new();

	for entry in WalkDir::new(root).sort_by_file_name() {
		let entry = match entry {
			Ok(entry) => entry,
			Err(e) => {
				tracing::warn!(
					root = %root.display(),
					error = %e,
					"skipping unreadable route source entry"
				);
				continue;
			}
		};
		if !entry.file_type().is_file() {
			continue;
		}

		let Ok(relative) = entry.path().strip_prefix(root) else {
			continue;
		};
		match RoutePattern::from_route_file(relative, extension) {
			Ok(Some((pattern, kind))) => {
				tracing::debug!(file = %relative.display(), %pattern, %kind, "discovered route file");
				discovered.push(DiscoveredRoute {
					file: relative.to_path_buf(),
					pattern,
					kind,
				});
			}
			Ok(None) => {}
			Err(e) => {
				tracing::warn!("Skipping route file {}: {}", relative.display(), e);
			}
		}
	}

	discovered
}

/// Returns the discovered routes that no registration provides a handler for.
pub fn unregistered<'a>(
	discovered: &'a [DiscoveredRoute],
	registrations: &[Registration],
) -> Vec<&'a DiscoveredRoute> {
	let registered: HashSet<(RoutePattern, RouteKind)> = registrations
		.iter()
		.filter_map(|r| {
			RoutePattern::parse(r.pattern())
				.ok()
				.map(|pattern| (pattern, r.kind()))
		})
		.collect();

	discovered
		.iter()
		.filter(|d| !registered.contains(&(d.pattern.clone(), d.kind)))
		.collect()
}
