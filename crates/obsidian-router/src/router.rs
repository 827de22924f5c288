//! Router orchestration.
//!
//! [`Router`] owns the route table, the navigation history and the root
//! attachment targets, and drives the resolve and render cycle:
//!
//! ```text
//! Idle -> Resolving -> Composing -> Rendered -> Idle
//!            |
//!            +-> Idle (no match)
//! ```
//!
//! Requests that arrive while a pass is in flight (from a handler or from the
//! navigation callback) are not interleaved. Only the most recent one is
//! kept and it runs as soon as the current pass finishes.

use crate::composer::{Composer, LeafPass};
use crate::config::{NotFoundPolicy, RouterSettings};
use crate::context::RouteContext;
use crate::discovery::{discover_route_files, unregistered};
use crate::error::{CompositionError, InitializationError, InitializationResult};
use crate::handler::{LeafFn, RenderChild};
use crate::history::NavigationHistory;
use crate::query::{QueryParams, parse_query_string, split_target};
use crate::registry::{RouteRegistry, static_registrations};
use crate::table::{MatchedLayout, PathParams, RouteMatch, RouteTable};
use crate::view::{ContentHost, ScreenHandle, WindowHandle};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::path::Path;
use std::rc::{Rc, Weak};
use tracing::{debug, error, info, warn};

/// Callback invoked with the path after every successful render.
pub type NavigationCallback = Rc<dyn Fn(&str)>;

/// Where the router is in its resolve and render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterPhase {
	#[default]
	Idle,
	/// Matching the target against the route table.
	Resolving,
	/// Running layout and route handlers.
	Composing,
	/// Content is attached; the navigation callback is running.
	Rendered,
}

/// Result of a navigation request.
///
/// Informational only. Not-found targets and failed passes are already
/// handled (and logged) by the router when this is returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
	/// The matched route was rendered.
	Rendered,
	/// No route matched; nothing was rendered.
	NotFound,
	/// No route matched; the not-found handler was rendered.
	FallbackRendered,
	/// A pass was in flight; the request runs once it finishes.
	Deferred,
	/// The request did not change history, so nothing was rendered.
	Unchanged,
	/// The pass failed and the previous content was kept.
	Failed(CompositionError),
}

impl NavigationOutcome {
	/// Returns whether something was attached.
	pub fn is_rendered(&self) -> bool {
		matches!(self, Self::Rendered | Self::FallbackRendered)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NavigationRequest {
	Navigate(String),
	Replace(String),
	Back,
	Forward,
	Refresh,
}

struct RouterInner {
	settings: RouterSettings,
	registry: RefCell<RouteRegistry>,
	table: RefCell<Option<Rc<RouteTable>>>,
	history: RefCell<NavigationHistory>,
	window: RefCell<Option<WindowHandle>>,
	screen: RefCell<Option<ScreenHandle>>,
	on_navigation: RefCell<Option<NavigationCallback>>,
	not_found: RefCell<Option<LeafFn>>,
	phase: Cell<RouterPhase>,
	pending: RefCell<Option<NavigationRequest>>,
}

/// File-based router.
///
/// `Router` is a cheap handle; clones share the same state. Views that need
/// to navigate later should hold a [`WeakRouter`] instead of a clone.
///
/// # Example
///
/// ```
/// use obsidian_router::{HeadlessHost, NavigationOutcome, Router, ViewHandle};
/// use std::rc::Rc;
///
/// let router = Router::new();
/// router
///     .register_route("/users/:id", |ctx| {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         ctx.set_content(ViewHandle::new(id));
///     })
///     .unwrap();
///
/// let root = tempfile::tempdir().unwrap();
/// router.initialize(root.path()).unwrap();
///
/// let window = Rc::new(HeadlessHost::new("window"));
/// router.attach_to_window(window.clone());
///
/// assert_eq!(router.navigate("/users/42"), NavigationOutcome::Rendered);
/// assert_eq!(window.only::<String>().as_deref(), Some("42"));
/// ```
#[derive(Clone)]
pub struct Router {
	inner: Rc<RouterInner>,
}

/// Non-owning router handle.
#[derive(Clone)]
pub struct WeakRouter {
	inner: Weak<RouterInner>,
}

impl WeakRouter {
	/// Returns the router if it is still alive.
	pub fn upgrade(&self) -> Option<Router> {
		self.inner.upgrade().map(|inner| Router { inner })
	}
}

impl fmt::Debug for WeakRouter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("WeakRouter")
			.field("alive", &(self.inner.strong_count() > 0))
			.finish()
	}
}

impl Default for Router {
	fn default() -> Self {
		Self::new()
	}
}

impl Router {
	/// Creates a router with default settings.
	pub fn new() -> Self {
		Self::with_settings(RouterSettings::default())
	}

	/// Creates a router with `settings`.
	pub fn with_settings(settings: RouterSettings) -> Self {
		let history = match settings.history_limit {
			Some(limit) => NavigationHistory::with_limit(limit),
			None => NavigationHistory::new(),
		};
		Self {
			inner: Rc::new(RouterInner {
				settings,
				registry: RefCell::new(RouteRegistry::new()),
				table: RefCell::new(None),
				history: RefCell::new(history),
				window: RefCell::new(None),
				screen: RefCell::new(None),
				on_navigation: RefCell::new(None),
				not_found: RefCell::new(None),
				phase: Cell::new(RouterPhase::Idle),
				pending: RefCell::new(None),
			}),
		}
	}

	/// Returns the settings the router was created with.
	pub fn settings(&self) -> &RouterSettings {
		&self.inner.settings
	}

	/// Returns a non-owning handle, for callbacks stored in views.
	pub fn downgrade(&self) -> WeakRouter {
		WeakRouter {
			inner: Rc::downgrade(&self.inner),
		}
	}

	// ===== Registration =====

	/// Registers a leaf route for this router.
	///
	/// # Errors
	///
	/// Returns [`InitializationError::AlreadyInitialized`] after
	/// [`initialize`](Self::initialize).
	pub fn register_route<F>(
		&self,
		pattern: impl Into<String>,
		handler: F,
	) -> InitializationResult<()>
	where
		F: Fn(&mut RouteContext) + 'static,
	{
		let pattern = pattern.into();
		self.ensure_registering(&pattern)?;
		self.inner.registry.borrow_mut().route(pattern, handler);
		Ok(())
	}

	/// Registers a layout for this router.
	///
	/// # Errors
	///
	/// Returns [`InitializationError::AlreadyInitialized`] after
	/// [`initialize`](Self::initialize).
	pub fn register_layout<F>(
		&self,
		pattern: impl Into<String>,
		handler: F,
	) -> InitializationResult<()>
	where
		F: for<'a> Fn(&mut RouteContext, RenderChild<'a>) + 'static,
	{
		let pattern = pattern.into();
		self.ensure_registering(&pattern)?;
		self.inner.registry.borrow_mut().layout(pattern, handler);
		Ok(())
	}

	fn ensure_registering(&self, pattern: &str) -> InitializationResult<()> {
		if self.is_initialized() {
			warn!(pattern, "registration after initialize is ignored");
			return Err(InitializationError::AlreadyInitialized);
		}
		Ok(())
	}

	/// Builds the route table.
	///
	/// Collects the router's own registrations and, unless disabled in the
	/// settings, those submitted with the registration macros. When file
	/// discovery is enabled, route files under `root` without a handler are
	/// reported at `warn` level.
	///
	/// # Errors
	///
	/// Fails if `root` is not an existing directory, nothing was registered,
	/// the table cannot be built, or the router is already initialized. The
	/// router stays uninitialized on failure.
	pub fn initialize(&self, root: impl AsRef<Path>) -> InitializationResult<()> {
		let root = root.as_ref();
		if self.is_initialized() {
			return Err(InitializationError::AlreadyInitialized);
		}

		match std::fs::metadata(root) {
			Ok(metadata) if metadata.is_dir() => {}
			Ok(_) => {
				return Err(InitializationError::RootUnusable {
					path: root.to_path_buf(),
					reason: "not a directory".to_string(),
				});
			}
			Err(e) => {
				return Err(InitializationError::RootUnusable {
					path: root.to_path_buf(),
					reason: e.to_string(),
				});
			}
		}

		let settings = &self.inner.settings;
		let mut registrations = self.inner.registry.borrow().registrations().to_vec();
		if settings.include_registered {
			registrations.extend(static_registrations());
		}
		if registrations.is_empty() {
			return Err(InitializationError::NoRoutes);
		}

		if settings.discover_files {
			let discovered = discover_route_files(root, &settings.route_file_extension);
			for missing in unregistered(&discovered, &registrations) {
				warn!(
					file = %missing.file.display(),
					pattern = %missing.pattern,
					kind = %missing.kind,
					"route file has no registered handler"
				);
			}
		}

		let table = RouteTable::build(registrations)?;
		if table.route_count() == 0 {
			return Err(InitializationError::NoRoutes);
		}

		info!(
			routes = table.route_count(),
			layouts = table.layout_count(),
			root = %root.display(),
			"router initialized"
		);
		*self.inner.table.borrow_mut() = Some(Rc::new(table));
		self.inner.registry.borrow_mut().drain();
		Ok(())
	}

	/// Returns whether [`initialize`](Self::initialize) has succeeded.
	pub fn is_initialized(&self) -> bool {
		self.inner.table.borrow().is_some()
	}

	/// Returns the route table built by [`initialize`](Self::initialize).
	pub fn table(&self) -> Option<Rc<RouteTable>> {
		self.inner.table.borrow().clone()
	}

	// ===== Attachment targets =====

	/// Sets the window handed to handlers and used as the root target when
	/// no screen is attached.
	pub fn set_window(&self, window: WindowHandle) {
		*self.inner.window.borrow_mut() = Some(window);
	}

	/// Sets the window and re-renders the current entry into it, if any.
	pub fn attach_to_window(&self, window: WindowHandle) {
		self.set_window(window);
		if self.is_initialized() && self.current_path().is_some() {
			self.refresh();
		}
	}

	/// Sets the screen container. It takes precedence over the window as
	/// the root target.
	pub fn attach_to_screen(&self, screen: ScreenHandle) {
		*self.inner.screen.borrow_mut() = Some(screen);
	}

	/// Removes the screen so the window becomes the root target again.
	pub fn detach_screen(&self) -> Option<ScreenHandle> {
		self.inner.screen.borrow_mut().take()
	}

	/// Returns the window set with [`set_window`](Self::set_window).
	pub fn window(&self) -> Option<WindowHandle> {
		self.inner.window.borrow().clone()
	}

	/// Returns the attached screen, if any.
	pub fn screen(&self) -> Option<ScreenHandle> {
		self.inner.screen.borrow().clone()
	}

	// ===== Callbacks =====

	/// Sets the callback fired after every successful render. Replaces any
	/// previous callback.
	pub fn set_on_navigation<F>(&self, callback: F)
	where
		F: Fn(&str) + 'static,
	{
		*self.inner.on_navigation.borrow_mut() = Some(Rc::new(callback));
	}

	/// Sets the handler rendered for unmatched targets under
	/// [`NotFoundPolicy::Fallback`].
	pub fn set_not_found<F>(&self, handler: F)
	where
		F: Fn(&mut RouteContext) + 'static,
	{
		*self.inner.not_found.borrow_mut() = Some(Rc::new(handler));
	}

	// ===== Navigation =====

	/// Appends `path` to the history and renders it.
	pub fn navigate(&self, path: impl Into<String>) -> NavigationOutcome {
		self.request(NavigationRequest::Navigate(path.into()))
	}

	/// Same as [`navigate`](Self::navigate).
	pub fn push(&self, path: impl Into<String>) -> NavigationOutcome {
		self.navigate(path)
	}

	/// Replaces the current history entry with `path` and renders it.
	///
	/// Replacing an entry with the same path is a no-op.
	pub fn replace(&self, path: impl Into<String>) -> NavigationOutcome {
		self.request(NavigationRequest::Replace(path.into()))
	}

	/// Renders the current history entry again.
	pub fn refresh(&self) -> NavigationOutcome {
		self.request(NavigationRequest::Refresh)
	}

	/// Moves one entry back and renders it.
	///
	/// Returns `false` at the oldest entry. During a pass the move is
	/// deferred and `true` means it was accepted.
	pub fn go_back(&self) -> bool {
		if !self.can_go_back() {
			return false;
		}
		self.request(NavigationRequest::Back);
		true
	}

	/// Moves one entry forward and renders it.
	///
	/// Returns `false` at the newest entry. During a pass the move is
	/// deferred and `true` means it was accepted.
	pub fn go_forward(&self) -> bool {
		if !self.can_go_forward() {
			return false;
		}
		self.request(NavigationRequest::Forward);
		true
	}

	/// Returns whether there is an entry behind the current one.
	pub fn can_go_back(&self) -> bool {
		self.inner.history.borrow().can_go_back()
	}

	/// Returns whether there is an entry ahead of the current one.
	pub fn can_go_forward(&self) -> bool {
		self.inner.history.borrow().can_go_forward()
	}

	// ===== Inspection =====

	/// Returns where the router is in the current pass.
	pub fn phase(&self) -> RouterPhase {
		self.inner.phase.get()
	}

	/// Matches `path` without navigating.
	pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
		self.table()?.match_path(path)
	}

	/// Returns the path of the current history entry.
	pub fn current_path(&self) -> Option<String> {
		self.inner.history.borrow().current_path().map(str::to_string)
	}

	/// Returns a snapshot of the history.
	pub fn history(&self) -> NavigationHistory {
		self.inner.history.borrow().clone()
	}

	// ===== Internals =====

	fn request(&self, request: NavigationRequest) -> NavigationOutcome {
		if self.inner.phase.get() != RouterPhase::Idle {
			debug!(?request, phase = ?self.inner.phase.get(), "deferring navigation");
			*self.inner.pending.borrow_mut() = Some(request);
			return NavigationOutcome::Deferred;
		}

		let mut outcome = self.process(request);
		loop {
			let next = self.inner.pending.borrow_mut().take();
			let Some(next) = next else {
				break;
			};
			outcome = self.process(next);
		}
		outcome
	}

	fn process(&self, request: NavigationRequest) -> NavigationOutcome {
		let Some(table) = self.table() else {
			warn!(?request, "navigation before initialize");
			return NavigationOutcome::Failed(CompositionError::NotInitialized);
		};
		let Some(path) = self.apply_to_history(request) else {
			return NavigationOutcome::Unchanged;
		};

		let _reset = PhaseReset(&self.inner.phase);
		self.inner.phase.set(RouterPhase::Resolving);

		match table.match_path(&path) {
			Some(matched) => {
				debug!(
					path,
					pattern = %matched.pattern,
					layouts = matched.layouts.len(),
					"route matched"
				);
				let leaf = LeafPass {
					handler: &matched.leaf,
					pattern: Some(&matched.pattern),
					params: &matched.params,
				};
				match self.compose(&path, &matched.query, &matched.layouts, leaf) {
					Ok(()) => NavigationOutcome::Rendered,
					Err(err) => NavigationOutcome::Failed(err),
				}
			}
			None => self.not_found(&path),
		}
	}

	/// Applies `request` to the history and returns the path to render.
	fn apply_to_history(&self, request: NavigationRequest) -> Option<String> {
		let mut history = self.inner.history.borrow_mut();
		match request {
			NavigationRequest::Navigate(path) => {
				history.navigate(path.clone());
				Some(path)
			}
			NavigationRequest::Replace(path) => {
				if history.current_path() == Some(path.as_str()) {
					return None;
				}
				history.replace(path.clone());
				Some(path)
			}
			NavigationRequest::Back => {
				if !history.back() {
					return None;
				}
				history.current_path().map(str::to_string)
			}
			NavigationRequest::Forward => {
				if !history.forward() {
					return None;
				}
				history.current_path().map(str::to_string)
			}
			NavigationRequest::Refresh => history.current_path().map(str::to_string),
		}
	}

	fn not_found(&self, path: &str) -> NavigationOutcome {
		if self.inner.settings.not_found == NotFoundPolicy::Ignore {
			warn!(path, "no route matches");
			return NavigationOutcome::NotFound;
		}

		let handler = self.inner.not_found.borrow().clone();
		let Some(handler) = handler else {
			warn!(path, "no route matches and no not-found handler is set");
			return NavigationOutcome::NotFound;
		};

		let query = parse_query_string(split_target(path).1);
		let params = PathParams::new();
		let leaf = LeafPass {
			handler: &handler,
			pattern: None,
			params: &params,
		};
		match self.compose(path, &query, &[], leaf) {
			Ok(()) => NavigationOutcome::FallbackRendered,
			Err(err) => NavigationOutcome::Failed(err),
		}
	}

	fn compose(
		&self,
		path: &str,
		query: &QueryParams,
		layouts: &[MatchedLayout],
		leaf: LeafPass<'_>,
	) -> Result<(), CompositionError> {
		let screen = self.screen();
		let window = self.window();
		let root: Option<Rc<dyn ContentHost>> = screen.clone().or_else(|| window.clone());
		let Some(root) = root else {
			error!(path, "{}", CompositionError::NoAttachmentTarget);
			return Err(CompositionError::NoAttachmentTarget);
		};

		self.inner.phase.set(RouterPhase::Composing);
		let composer = Composer::new(self, screen, window, path, query);
		let attached = composer
			.compose(layouts, leaf)
			.and_then(|plan| plan.commit(&root))
			.inspect_err(|err| error!(path, error = %err, "render pass failed"))?;

		self.inner.phase.set(RouterPhase::Rendered);
		debug!(path, attached, "render pass committed");

		let callback = self.inner.on_navigation.borrow().clone();
		if let Some(callback) = callback {
			callback(path);
		}
		Ok(())
	}
}

impl fmt::Debug for Router {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("phase", &self.phase())
			.field("initialized", &self.is_initialized())
			.field("current_path", &self.current_path())
			.finish_non_exhaustive()
	}
}

/// Returns the router to `Idle` when a pass ends, including by unwinding.
struct PhaseReset<'a>(&'a Cell<RouterPhase>);

impl Drop for PhaseReset<'_> {
	fn drop(&mut self) {
		self.0.set(RouterPhase::Idle);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::headless::HeadlessHost;
	use crate::view::ViewHandle;
	use rstest::{fixture, rstest};
	use tempfile::TempDir;

	struct Harness {
		router: Router,
		window: Rc<HeadlessHost>,
		_root: TempDir,
	}

	#[fixture]
	fn harness() -> Harness {
		let router = Router::with_settings(RouterSettings::default().with_registered(false));
		router
			.register_route("/", |ctx| ctx.set_content(ViewHandle::new("home")))
			.unwrap();
		router
			.register_route("/about", |ctx| ctx.set_content(ViewHandle::new("about")))
			.unwrap();
		let root = TempDir::new().unwrap();
		router.initialize(root.path()).unwrap();

		let window = Rc::new(HeadlessHost::new("window"));
		router.attach_to_window(window.clone());
		Harness {
			router,
			window,
			_root: root,
		}
	}

	#[rstest]
	fn test_navigate_renders_and_records(harness: Harness) {
		assert_eq!(harness.router.navigate("/about"), NavigationOutcome::Rendered);
		assert_eq!(harness.window.only::<&str>(), Some("about"));
		assert_eq!(harness.router.current_path().as_deref(), Some("/about"));
		assert_eq!(harness.router.phase(), RouterPhase::Idle);
	}

	#[rstest]
	fn test_not_found_is_silent(harness: Harness) {
		harness.router.navigate("/");
		let fired = Rc::new(Cell::new(false));
		let flag = fired.clone();
		harness.router.set_on_navigation(move |_| flag.set(true));

		assert_eq!(harness.router.navigate("/missing"), NavigationOutcome::NotFound);
		assert!(!fired.get());
		assert_eq!(harness.window.only::<&str>(), Some("home"));
	}

	#[rstest]
	fn test_replace_same_path_is_unchanged(harness: Harness) {
		harness.router.navigate("/about");
		assert_eq!(harness.router.replace("/about"), NavigationOutcome::Unchanged);
		assert_eq!(harness.window.attach_count(), 1);
	}

	#[rstest]
	fn test_register_after_initialize_fails(harness: Harness) {
		let err = harness.router.register_route("/late", |_ctx| {}).unwrap_err();
		assert!(matches!(err, InitializationError::AlreadyInitialized));
		assert!(harness.router.resolve("/late").is_none());
	}

	#[rstest]
	fn test_initialize_twice_fails(harness: Harness) {
		let root = TempDir::new().unwrap();
		assert!(matches!(
			harness.router.initialize(root.path()),
			Err(InitializationError::AlreadyInitialized)
		));
	}

	#[rstest]
	fn test_navigate_before_initialize() {
		let router = Router::new();
		assert_eq!(
			router.navigate("/"),
			NavigationOutcome::Failed(CompositionError::NotInitialized)
		);
		assert!(router.history().is_empty());
	}

	#[rstest]
	fn test_no_attachment_target() {
		let router = Router::with_settings(RouterSettings::default().with_registered(false));
		router.register_route("/", |_ctx| {}).unwrap();
		let root = TempDir::new().unwrap();
		router.initialize(root.path()).unwrap();

		assert_eq!(
			router.navigate("/"),
			NavigationOutcome::Failed(CompositionError::NoAttachmentTarget)
		);
	}

	#[rstest]
	fn test_weak_router_does_not_keep_router_alive() {
		let router = Router::new();
		let weak = router.downgrade();
		assert!(weak.upgrade().is_some());
		drop(router);
		assert!(weak.upgrade().is_none());
	}
}
