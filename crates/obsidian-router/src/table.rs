//! Route table and path matching.
//!
//! The table is a segment trie built once from every registration. Each
//! node may hold a leaf route and a layout, and has three kinds of children:
//! literal children keyed by segment text, at most one dynamic child and at
//! most one catch-all child.
//!
//! Matching walks the trie with a fixed precedence of
//! **literal > dynamic > catch-all**. When a branch dead-ends the walk backs
//! up and tries the next kind, so the result only depends on the table and
//! the path. Layouts found along the winning branch are collected outer to
//! inner, each with the parameters captured up to its own depth.

use crate::error::{ConstructionError, ConstructionResult};
use crate::handler::{LayoutFn, LeafFn, RouteHandler};
use crate::pattern::{RoutePattern, Segment};
use crate::query::{QueryParams, parse_query_string, path_segments, split_target};
use crate::registry::Registration;
use std::collections::HashMap;
use std::fmt;

/// Path parameters captured by a match, keyed by parameter name.
pub type PathParams = HashMap<String, String>;

struct Endpoint<H> {
	pattern: RoutePattern,
	handler: H,
}

#[derive(Default)]
struct RouteNode {
	/// Parameter name for dynamic and catch-all nodes.
	param: Option<String>,
	literals: HashMap<String, RouteNode>,
	dynamic: Option<Box<RouteNode>>,
	catch_all: Option<Box<RouteNode>>,
	route: Option<Endpoint<LeafFn>>,
	layout: Option<Endpoint<LayoutFn>>,
}

impl RouteNode {
	fn with_param(name: &str) -> Self {
		Self {
			param: Some(name.to_string()),
			..Self::default()
		}
	}
}

/// A layout on the matched branch.
#[derive(Clone)]
pub struct MatchedLayout {
	/// Pattern the layout was registered under.
	pub pattern: RoutePattern,
	/// Parameters captured up to the layout's own depth.
	pub params: PathParams,
	pub(crate) handler: LayoutFn,
}

impl fmt::Debug for MatchedLayout {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MatchedLayout")
			.field("pattern", &self.pattern)
			.field("params", &self.params)
			.finish_non_exhaustive()
	}
}

/// Result of a successful match.
#[derive(Clone)]
pub struct RouteMatch {
	/// Pattern of the leaf route.
	pub pattern: RoutePattern,
	/// Every parameter captured along the branch.
	pub params: PathParams,
	/// Query parameters of the navigation target.
	pub query: QueryParams,
	/// Ancestor layouts, outermost first.
	pub layouts: Vec<MatchedLayout>,
	pub(crate) leaf: LeafFn,
}

impl RouteMatch {
	/// Returns the layout patterns, outermost first.
	pub fn layout_patterns(&self) -> Vec<&str> {
		self.layouts.iter().map(|l| l.pattern.as_str()).collect()
	}
}

impl fmt::Debug for RouteMatch {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteMatch")
			.field("pattern", &self.pattern)
			.field("params", &self.params)
			.field("query", &self.query)
			.field("layouts", &self.layouts)
			.finish_non_exhaustive()
	}
}

/// Immutable route trie.
#[derive(Default)]
pub struct RouteTable {
	root: RouteNode,
	route_count: usize,
	layout_count: usize,
}

impl fmt::Debug for RouteTable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteTable")
			.field("route_count", &self.route_count)
			.field("layout_count", &self.layout_count)
			.finish()
	}
}

impl RouteTable {
	/// Builds a table from registrations.
	///
	/// # Errors
	///
	/// Returns [`ConstructionError`] if a pattern is malformed, two dynamic
	/// (or catch-all) siblings use different names, or the same pattern is
	/// registered twice for the same handler kind.
	pub fn build<I>(registrations: I) -> ConstructionResult<Self>
	where
		I: IntoIterator<Item = Registration>,
	{
		let mut table = Self::default();
		for registration in registrations {
			let pattern = RoutePattern::parse(registration.pattern()).map_err(|source| {
				ConstructionError::InvalidPattern {
					pattern: registration.pattern().to_string(),
					source,
				}
			})?;
			table.insert(pattern, registration.into_handler())?;
		}
		Ok(table)
	}

	fn insert(&mut self, pattern: RoutePattern, handler: RouteHandler) -> ConstructionResult<()> {
		let mut node = &mut self.root;

		for segment in pattern.segments() {
			node = match segment {
				Segment::Literal(text) => node.literals.entry(text.clone()).or_default(),
				Segment::Param(name) => {
					let child = node
						.dynamic
						.get_or_insert_with(|| Box::new(RouteNode::with_param(name)));
					if let Some(existing) = child.param.as_deref()
						&& existing != name
					{
						return Err(ConstructionError::AmbiguousParameter {
							pattern: pattern.to_string(),
							existing: existing.to_string(),
							conflicting: name.clone(),
						});
					}
					child.as_mut()
				}
				Segment::CatchAll(name) => {
					let child = node
						.catch_all
						.get_or_insert_with(|| Box::new(RouteNode::with_param(name)));
					if let Some(existing) = child.param.as_deref()
						&& existing != name
					{
						return Err(ConstructionError::AmbiguousCatchAll {
							pattern: pattern.to_string(),
							existing: existing.to_string(),
							conflicting: name.clone(),
						});
					}
					child.as_mut()
				}
			};
		}

		match handler {
			RouteHandler::Route(handler) => {
				if node.route.is_some() {
					return Err(ConstructionError::DuplicateRoute(pattern.to_string()));
				}
				node.route = Some(Endpoint { pattern, handler });
				self.route_count += 1;
			}
			RouteHandler::Layout(handler) => {
				if node.layout.is_some() {
					return Err(ConstructionError::DuplicateLayout(pattern.to_string()));
				}
				node.layout = Some(Endpoint { pattern, handler });
				self.layout_count += 1;
			}
		}
		Ok(())
	}

	/// Returns the number of leaf routes.
	pub fn route_count(&self) -> usize {
		self.route_count
	}

	/// Returns the number of layouts.
	pub fn layout_count(&self) -> usize {
		self.layout_count
	}

	/// Returns whether no route or layout is registered.
	pub fn is_empty(&self) -> bool {
		self.route_count == 0 && self.layout_count == 0
	}

	/// Returns the leaf route patterns in a stable order.
	pub fn route_patterns(&self) -> Vec<String> {
		let mut patterns = Vec::with_capacity(self.route_count);
		collect_patterns(&self.root, &mut patterns);
		patterns.sort();
		patterns
	}

	/// Returns whether a leaf route is registered under `pattern`.
	pub fn has_route(&self, pattern: &str) -> bool {
		RoutePattern::parse(pattern)
			.is_ok_and(|p| self.route_patterns().iter().any(|r| r == p.as_str()))
	}

	/// Resolves a navigation target.
	///
	/// The query string and fragment are ignored for matching; the query is
	/// parsed into [`RouteMatch::query`]. Returns `None` when no leaf route
	/// exists at the end of any branch, even if layouts matched on the way.
	pub fn match_path(&self, target: &str) -> Option<RouteMatch> {
		let (path, query) = split_target(target);
		let segments = path_segments(path);

		let mut walk = Walk {
			segments: &segments,
			captures: Vec::new(),
			layouts: Vec::new(),
		};
		let leaf = walk.descend(&self.root, 0)?;

		let layouts = walk
			.layouts
			.iter()
			.map(|(endpoint, depth)| MatchedLayout {
				pattern: endpoint.pattern.clone(),
				params: walk.captures[..*depth].iter().cloned().collect(),
				handler: endpoint.handler.clone(),
			})
			.collect();

		Some(RouteMatch {
			pattern: leaf.pattern.clone(),
			params: walk.captures.into_iter().collect(),
			query: parse_query_string(query),
			layouts,
			leaf: leaf.handler.clone(),
		})
	}
}

fn collect_patterns(node: &RouteNode, out: &mut Vec<String>) {
	if let Some(route) = &node.route {
		out.push(route.pattern.to_string());
	}
	for child in node.literals.values() {
		collect_patterns(child, out);
	}
	if let Some(child) = &node.dynamic {
		collect_patterns(child, out);
	}
	if let Some(child) = &node.catch_all {
		collect_patterns(child, out);
	}
}

/// Backtracking trie walk state.
struct Walk<'t, 'p> {
	segments: &'p [&'p str],
	captures: Vec<(String, String)>,
	/// Layout endpoints on the current branch with the capture depth at
	/// which each was reached.
	layouts: Vec<(&'t Endpoint<LayoutFn>, usize)>,
}

impl<'t> Walk<'t, '_> {
	fn descend(&mut self, node: &'t RouteNode, index: usize) -> Option<&'t Endpoint<LeafFn>> {
		let pushed_layout = match &node.layout {
			Some(layout) => {
				self.layouts.push((layout, self.captures.len()));
				true
			}
			None => false,
		};

		let found = self.descend_children(node, index);
		if found.is_none() && pushed_layout {
			self.layouts.pop();
		}
		found
	}

	fn descend_children(
		&mut self,
		node: &'t RouteNode,
		index: usize,
	) -> Option<&'t Endpoint<LeafFn>> {
		let segments = self.segments;
		let Some(segment) = segments.get(index) else {
			return node.route.as_ref();
		};

		if let Some(child) = node.literals.get(*segment)
			&& let Some(found) = self.descend(child, index + 1)
		{
			return Some(found);
		}

		if let Some(child) = &node.dynamic {
			let name = child.param.clone().unwrap_or_default();
			self.captures.push((name, (*segment).to_string()));
			if let Some(found) = self.descend(child, index + 1) {
				return Some(found);
			}
			self.captures.pop();
		}

		if let Some(child) = &node.catch_all {
			let name = child.param.clone().unwrap_or_default();
			self.captures.push((name, segments[index..].join("/")));
			if let Some(found) = self.descend(child, segments.len()) {
				return Some(found);
			}
			self.captures.pop();
		}

		None
	}
}
