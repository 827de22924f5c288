//! Path and query string splitting.
//!
//! Query parsing is deliberately simple: the part after the first `?` is
//! split on `&`, and each pair on its first `=`. Values are **not**
//! percent-decoded; `?q=a%20b` yields `"a%20b"`. Decoding belongs to the
//! caller if it needs it.

use std::collections::HashMap;

/// Parsed query parameters. Later duplicates overwrite earlier ones.
pub type QueryParams = HashMap<String, String>;

/// Splits a navigation target into its path and query parts.
///
/// A `#fragment` suffix is dropped before splitting.
///
/// ```
/// use obsidian_router::query::split_target;
///
/// assert_eq!(split_target("/search?q=rust#top"), ("/search", "q=rust"));
/// assert_eq!(split_target("/about"), ("/about", ""));
/// ```
pub fn split_target(target: &str) -> (&str, &str) {
	let without_fragment = target.split_once('#').map_or(target, |(head, _)| head);
	without_fragment
		.split_once('?')
		.unwrap_or((without_fragment, ""))
}

/// Returns the non-empty path segments of `path`.
pub fn path_segments(path: &str) -> Vec<&str> {
	path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Parses the query part of a navigation target.
///
/// Accepts either a full target (`/a?x=1`) or a bare query (`x=1`). Keys
/// without `=` map to an empty value; empty pairs are skipped.
pub fn parse_query(target: &str) -> QueryParams {
	let query = if target.starts_with('/') || target.contains('?') {
		split_target(target).1
	} else {
		target.split_once('#').map_or(target, |(head, _)| head)
	};
	parse_query_string(query)
}

/// Parses a bare query string with no leading `?`.
pub fn parse_query_string(query: &str) -> QueryParams {
	query
		.split('&')
		.filter(|pair| !pair.is_empty())
		.map(|pair| match pair.split_once('=') {
			Some((key, value)) => (key.to_string(), value.to_string()),
			None => (pair.to_string(), String::new()),
		})
		.collect()
}
