//! Per-pass render context.

use crate::composer::{CompositionPlan, StagedHost};
use crate::pattern::RoutePattern;
use crate::query::QueryParams;
use crate::router::Router;
use crate::table::PathParams;
use crate::view::{ContentHost, ContentSlot, ScreenHandle, ViewHandle, WindowHandle};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Handle passed to every route and layout handler during a render pass.
///
/// A context only lives for the handler call it was built for. Layouts see
/// the parameters captured up to their own pattern; the leaf route sees
/// every parameter on the matched branch. All handlers see the query.
///
/// # Example
///
/// ```
/// use obsidian_router::{RouteContext, ViewHandle};
///
/// fn user_page(ctx: &mut RouteContext) {
///     let id = ctx.param("id").unwrap_or("unknown").to_string();
///     ctx.set_content(ViewHandle::new(format!("User {id}")));
/// }
/// # let _ = user_page;
/// ```
pub struct RouteContext {
	params: PathParams,
	query: QueryParams,
	path: String,
	pattern: Option<RoutePattern>,
	router: Router,
	screen: Option<ScreenHandle>,
	window: Option<WindowHandle>,
	plan: Rc<RefCell<CompositionPlan>>,
	frame: usize,
}

impl RouteContext {
	#[allow(clippy::too_many_arguments)]
	pub(crate) fn new(
		params: PathParams,
		query: QueryParams,
		path: String,
		pattern: Option<RoutePattern>,
		router: Router,
		screen: Option<ScreenHandle>,
		window: Option<WindowHandle>,
		plan: Rc<RefCell<CompositionPlan>>,
		frame: usize,
	) -> Self {
		Self {
			params,
			query,
			path,
			pattern,
			router,
			screen,
			window,
			plan,
			frame,
		}
	}

	/// Returns the path parameters visible to this handler.
	pub fn params(&self) -> &PathParams {
		&self.params
	}

	/// Returns a single path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Returns the query parameters of the navigation target.
	pub fn query(&self) -> &QueryParams {
		&self.query
	}

	/// Returns a single query parameter.
	pub fn query_param(&self, name: &str) -> Option<&str> {
		self.query.get(name).map(String::as_str)
	}

	/// Returns the navigation target being rendered.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the pattern of the handler being run.
	///
	/// This is `None` for the not-found fallback handler.
	pub fn pattern(&self) -> Option<&RoutePattern> {
		self.pattern.as_ref()
	}

	/// Returns the router that started this pass.
	///
	/// Navigation requested through it while the pass is running is
	/// deferred until the pass completes.
	pub fn router(&self) -> &Router {
		&self.router
	}

	/// Returns the attached screen, if any.
	///
	/// Views attached to it directly are staged with the rest of the pass:
	/// the screen is cleared once and receives them when the pass commits,
	/// and a failed pass attaches nothing.
	pub fn screen(&self) -> Option<ScreenHandle> {
		self.screen.as_ref().map(|host| self.staged(host))
	}

	/// Returns the router's window, staged like [`screen`](Self::screen).
	pub fn window(&self) -> Option<WindowHandle> {
		self.window.as_ref().map(|host| self.staged(host))
	}

	fn staged(&self, host: &Rc<dyn ContentHost>) -> Rc<dyn ContentHost> {
		Rc::new(StagedHost::new(
			Rc::clone(host),
			Rc::downgrade(&self.plan),
			self.frame,
		))
	}

	/// Stages `view` as this handler's content.
	///
	/// A layout's content goes to the enclosing slot (or the root target);
	/// a leaf's content goes to the innermost slot. Calling this again
	/// replaces the staged view.
	pub fn set_content(&mut self, view: ViewHandle) {
		self.plan.borrow_mut().stage_content(self.frame, view);
	}

	/// Sets the slot that content rendered inside this layout is placed into.
	///
	/// Only meaningful for layouts, before calling
	/// [`RenderChild::render`](crate::RenderChild::render).
	pub fn set_content_slot(&mut self, slot: ContentSlot) {
		self.plan.borrow_mut().set_slot(self.frame, slot);
	}

	/// Returns the slot this handler's children would render into.
	pub fn content_slot(&self) -> Option<ContentSlot> {
		self.plan.borrow().slot(self.frame)
	}

	/// Returns whether the router has an entry behind the current one.
	pub fn can_go_back(&self) -> bool {
		self.router.can_go_back()
	}

	/// Returns whether the router has an entry ahead of the current one.
	pub fn can_go_forward(&self) -> bool {
		self.router.can_go_forward()
	}
}

impl fmt::Debug for RouteContext {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouteContext")
			.field("path", &self.path)
			.field("pattern", &self.pattern)
			.field("params", &self.params)
			.field("query", &self.query)
			.finish_non_exhaustive()
	}
}
