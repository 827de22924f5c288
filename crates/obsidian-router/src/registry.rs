//! Route registration.
//!
//! Routes reach the table through two doors, both consumed exactly once by
//! [`Router::initialize`](crate::Router::initialize):
//!
//! 1. [`register_route!`](crate::register_route) and
//!    [`register_layout!`](crate::register_layout), which submit a
//!    [`StaticRegistration`] through `inventory` from anywhere in the program.
//! 2. [`Router::register_route`](crate::Router::register_route) and
//!    [`Router::register_layout`](crate::Router::register_layout), which
//!    append closures to the router's own [`RouteRegistry`].
//!
//! ## Example
//!
//! ```ignore
//! use obsidian_router::{RenderChild, RouteContext, ViewHandle, register_layout, register_route};
//!
//! fn blog_layout(ctx: &mut RouteContext, child: RenderChild<'_>) {
//!     // build the layout view, then:
//!     child.render();
//! }
//!
//! fn blog_post(ctx: &mut RouteContext) {
//!     let slug = ctx.param("slug").unwrap_or_default().to_string();
//!     ctx.set_content(ViewHandle::new(slug));
//! }
//!
//! register_layout!("/blog", blog_layout);
//! register_route!("/blog/:slug", blog_post);
//! ```

use crate::context::RouteContext;
use crate::handler::{RenderChild, RouteHandler};
use crate::pattern::RouteKind;

/// A pattern paired with its handler, waiting to be built into the table.
#[derive(Debug, Clone)]
pub struct Registration {
	pattern: String,
	handler: RouteHandler,
}

impl Registration {
	pub fn new(pattern: impl Into<String>, handler: RouteHandler) -> Self {
		Self {
			pattern: pattern.into(),
			handler,
		}
	}

	/// Returns the pattern as registered.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	pub fn handler(&self) -> &RouteHandler {
		&self.handler
	}

	pub fn kind(&self) -> RouteKind {
		self.handler.kind()
	}

	pub fn into_handler(self) -> RouteHandler {
		self.handler
	}
}

/// Deferred list of registrations.
///
/// Write-only until it is drained into a route table.
#[derive(Debug, Default, Clone)]
pub struct RouteRegistry {
	registrations: Vec<Registration>,
}

impl RouteRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a leaf route.
	pub fn route<F>(&mut self, pattern: impl Into<String>, handler: F) -> &mut Self
	where
		F: Fn(&mut RouteContext) + 'static,
	{
		self.push(Registration::new(pattern, RouteHandler::route(handler)))
	}

	/// Adds a layout.
	pub fn layout<F>(&mut self, pattern: impl Into<String>, handler: F) -> &mut Self
	where
		F: for<'a> Fn(&mut RouteContext, RenderChild<'a>) + 'static,
	{
		self.push(Registration::new(pattern, RouteHandler::layout(handler)))
	}

	pub fn push(&mut self, registration: Registration) -> &mut Self {
		self.registrations.push(registration);
		self
	}

	pub fn len(&self) -> usize {
		self.registrations.len()
	}

	pub fn is_empty(&self) -> bool {
		self.registrations.is_empty()
	}

	pub fn registrations(&self) -> &[Registration] {
		&self.registrations
	}

	/// Takes every registration, leaving the registry empty.
	pub fn drain(&mut self) -> Vec<Registration> {
		std::mem::take(&mut self.registrations)
	}
}

/// Function-pointer handler usable in a `static` registration.
#[derive(Clone, Copy)]
pub enum StaticHandler {
	Route(fn(&mut RouteContext)),
	Layout(for<'a> fn(&mut RouteContext, RenderChild<'a>)),
}

impl StaticHandler {
	fn to_handler(self) -> RouteHandler {
		match self {
			Self::Route(f) => RouteHandler::route(f),
			Self::Layout(f) => RouteHandler::layout(f),
		}
	}
}

/// Registration submitted at link time by the registration macros.
pub struct StaticRegistration {
	/// Route pattern, e.g. `"/blog/:slug"`.
	pub pattern: &'static str,
	pub handler: StaticHandler,
}

impl StaticRegistration {
	pub const fn route(pattern: &'static str, handler: fn(&mut RouteContext)) -> Self {
		Self {
			pattern,
			handler: StaticHandler::Route(handler),
		}
	}

	pub const fn layout(
		pattern: &'static str,
		handler: for<'a> fn(&mut RouteContext, RenderChild<'a>),
	) -> Self {
		Self {
			pattern,
			handler: StaticHandler::Layout(handler),
		}
	}

	fn to_registration(&self) -> Registration {
		Registration::new(self.pattern, self.handler.to_handler())
	}
}

inventory::collect!(StaticRegistration);

/// Returns every registration submitted with the registration macros.
pub fn static_registrations() -> Vec<Registration> {
	inventory::iter::<StaticRegistration>
		.into_iter()
		.map(StaticRegistration::to_registration)
		.collect()
}

/// Registers a leaf route for every router initialized in this program.
///
/// ```rust,ignore
/// fn about(ctx: &mut RouteContext) { /* ... */ }
///
/// obsidian_router::register_route!("/about", about);
/// ```
#[macro_export]
macro_rules! register_route {
	($pattern:expr, $handler:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::registry::StaticRegistration::route($pattern, $handler)
		}
	};
}

/// Registers a layout for every router initialized in this program.
///
/// ```rust,ignore
/// fn root_layout(ctx: &mut RouteContext, child: RenderChild<'_>) { /* ... */ }
///
/// obsidian_router::register_layout!("/", root_layout);
/// ```
#[macro_export]
macro_rules! register_layout {
	($pattern:expr, $handler:expr $(,)?) => {
		$crate::inventory::submit! {
			$crate::registry::StaticRegistration::layout($pattern, $handler)
		}
	};
}
