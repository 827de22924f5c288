//! Layout composition integration tests
//!
//! Drives full render passes through a `Router` attached to headless hosts.

use obsidian_router::{
	CompositionError, ContentHost, ContentSlot, HeadlessHost, NavigationOutcome, NotFoundPolicy,
	QueryParams, Router, RouterPhase, RouterSettings, ViewHandle,
};
use rstest::*;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tempfile::TempDir;

/// A rendered view: which handler produced it and what it saw.
#[derive(Debug, Clone, PartialEq)]
struct Rendered {
	by: &'static str,
	params: HashMap<String, String>,
}

type Log = Rc<RefCell<Vec<Rendered>>>;

fn settings() -> RouterSettings {
	RouterSettings::default().with_registered(false).with_discovery(false)
}

fn register_slot_layout(router: &Router, pattern: &'static str, log: &Log) {
	let log = log.clone();
	router
		.register_layout(pattern, move |ctx, child| {
			log.borrow_mut().push(Rendered {
				by: pattern,
				params: ctx.params().clone(),
			});
			let slot = Rc::new(HeadlessHost::new(pattern));
			ctx.set_content(ViewHandle::from_rc(slot.clone()));
			ctx.set_content_slot(ContentSlot::new(&slot));
			child.render();
		})
		.unwrap();
}

fn register_page(router: &Router, pattern: &'static str, log: &Log) {
	let log = log.clone();
	router
		.register_route(pattern, move |ctx| {
			let rendered = Rendered {
				by: pattern,
				params: ctx.params().clone(),
			};
			log.borrow_mut().push(rendered.clone());
			ctx.set_content(ViewHandle::new(rendered));
		})
		.unwrap();
}

struct Blog {
	router: Router,
	window: Rc<HeadlessHost>,
	log: Log,
	_root: TempDir,
}

impl Blog {
	fn order(&self) -> Vec<&'static str> {
		self.log.borrow().iter().map(|r| r.by).collect()
	}

	/// Follows single-view hosts from the window down to the page view.
	fn leaf(&self) -> Option<Rendered> {
		innermost(&self.window)
	}
}

fn innermost(host: &HeadlessHost) -> Option<Rendered> {
	let content = host.content();
	let [view] = content.as_slice() else {
		return None;
	};
	if let Some(rendered) = view.downcast_ref::<Rendered>() {
		return Some(rendered.clone());
	}
	innermost(view.downcast_ref::<HeadlessHost>()?)
}

#[fixture]
fn blog() -> Blog {
	let router = Router::with_settings(settings());
	let log = Log::default();
	register_slot_layout(&router, "/", &log);
	register_slot_layout(&router, "/blog", &log);
	register_page(&router, "/", &log);
	register_page(&router, "/blog", &log);
	register_page(&router, "/blog/:slug", &log);

	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	Blog {
		router,
		window,
		log,
		_root: root,
	}
}

#[rstest]
fn test_layouts_render_outer_to_inner(blog: Blog) {
	assert_eq!(blog.router.navigate("/blog/post-1"), NavigationOutcome::Rendered);
	assert_eq!(blog.order(), vec!["/", "/blog", "/blog/:slug"]);

	let log = blog.log.borrow();
	assert!(log[0].params.is_empty());
	assert!(log[1].params.is_empty());
	assert_eq!(log[2].params.get("slug").map(String::as_str), Some("post-1"));
}

#[rstest]
fn test_leaf_lands_in_innermost_slot(blog: Blog) {
	blog.router.navigate("/blog/post-1");

	let content = blog.window.content();
	assert_eq!(content.len(), 1);
	let root_layout = content[0].downcast_ref::<HeadlessHost>().unwrap();
	assert_eq!(root_layout.name(), "/");
	let blog_layout = root_layout.content();
	let blog_layout = blog_layout[0].downcast_ref::<HeadlessHost>().unwrap();
	assert_eq!(blog_layout.name(), "/blog");

	let page = blog_layout.only::<Rendered>().unwrap();
	assert_eq!(page.by, "/blog/:slug");
	assert_eq!(blog.leaf(), Some(page));
}

#[rstest]
fn test_window_content_is_replaced_not_accumulated(blog: Blog) {
	blog.router.navigate("/");
	blog.router.navigate("/blog");
	blog.router.navigate("/blog/post-2");

	assert_eq!(blog.window.content().len(), 1);
	assert_eq!(blog.window.clear_count(), 3);
	assert_eq!(blog.leaf().map(|r| r.by), Some("/blog/:slug"));
}

#[rstest]
fn test_same_path_renders_again(blog: Blog) {
	blog.router.navigate("/blog/post-1");
	blog.router.navigate("/blog/post-1");

	assert_eq!(blog.order().len(), 6);
	assert_eq!(blog.router.history().len(), 2);
	assert_eq!(blog.window.attach_count(), 2);
}

#[rstest]
fn test_navigation_callback_fires_after_render(blog: Blog) {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	let window = blog.window.clone();
	blog.router.set_on_navigation(move |path| {
		sink.borrow_mut().push((path.to_string(), window.attach_count()));
	});

	blog.router.navigate("/blog?page=2");
	blog.router.navigate("/nowhere");

	assert_eq!(*seen.borrow(), vec![("/blog?page=2".to_string(), 1)]);
}

#[rstest]
fn test_last_callback_wins(blog: Blog) {
	let hits = Rc::new(RefCell::new(Vec::new()));
	let first = hits.clone();
	blog.router.set_on_navigation(move |_| first.borrow_mut().push("first"));
	let second = hits.clone();
	blog.router.set_on_navigation(move |_| second.borrow_mut().push("second"));

	blog.router.navigate("/");
	assert_eq!(*hits.borrow(), vec!["second"]);
}

#[rstest]
fn test_screen_takes_precedence_over_window(blog: Blog) {
	let screen = Rc::new(HeadlessHost::new("screen"));
	blog.router.attach_to_screen(screen.clone());
	blog.router.navigate("/");

	assert_eq!(screen.attach_count(), 1);
	assert_eq!(blog.window.attach_count(), 0);

	blog.router.detach_screen();
	blog.router.navigate("/blog");
	assert_eq!(blog.window.attach_count(), 1);
}

#[rstest]
fn test_attach_to_window_renders_current_entry(blog: Blog) {
	blog.router.navigate("/blog");
	let second = Rc::new(HeadlessHost::new("second"));
	blog.router.attach_to_window(second.clone());

	assert_eq!(second.attach_count(), 1);
	assert_eq!(blog.router.history().len(), 1);
}

// ============================================================================
// Layouts attaching to the window directly
// ============================================================================

/// A root layout that puts its chrome straight into the window instead of
/// calling `set_content`.
fn window_chrome_router() -> (Router, Rc<HeadlessHost>, TempDir) {
	let router = Router::with_settings(settings());
	router
		.register_layout("/", |ctx, child| {
			let slot = Rc::new(HeadlessHost::new("chrome"));
			if let Some(window) = ctx.window() {
				window.attach_content(ViewHandle::from_rc(slot.clone()));
			}
			ctx.set_content_slot(ContentSlot::new(&slot));
			child.render();
		})
		.unwrap();
	router
		.register_layout("/broken", |_ctx, _child| {})
		.unwrap();
	router
		.register_route("/", |ctx| ctx.set_content(ViewHandle::new("home")))
		.unwrap();
	router
		.register_route("/about", |ctx| ctx.set_content(ViewHandle::new("about")))
		.unwrap();
	router
		.register_route("/broken/page", |ctx| ctx.set_content(ViewHandle::new("page")))
		.unwrap();

	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());
	(router, window, root)
}

fn chrome_page(window: &HeadlessHost) -> Option<&'static str> {
	let content = window.content();
	let [chrome] = content.as_slice() else {
		return None;
	};
	chrome.downcast_ref::<HeadlessHost>()?.only::<&str>()
}

#[rstest]
fn test_direct_window_attach_is_replaced_per_pass() {
	let (router, window, _root) = window_chrome_router();

	router.navigate("/");
	router.navigate("/about");
	router.navigate("/");

	assert_eq!(window.content().len(), 1);
	assert_eq!(window.clear_count(), 3);
	assert_eq!(chrome_page(&window), Some("home"));
}

#[rstest]
fn test_direct_window_attach_waits_for_commit() {
	let (router, window, _root) = window_chrome_router();
	router.navigate("/about");

	let outcome = router.navigate("/broken/page");

	assert!(matches!(
		outcome,
		NavigationOutcome::Failed(CompositionError::ContinuationNotInvoked { .. })
	));
	assert_eq!(window.attach_count(), 1);
	assert_eq!(chrome_page(&window), Some("about"));
}

// ============================================================================
// Failed passes
// ============================================================================

#[rstest]
fn test_layout_skipping_child_keeps_previous_content() {
	let router = Router::with_settings(settings());
	router
		.register_layout("/broken", |ctx, _child| {
			ctx.set_content(ViewHandle::new("broken layout"));
		})
		.unwrap();
	router
		.register_route("/", |ctx| ctx.set_content(ViewHandle::new("home")))
		.unwrap();
	router
		.register_route("/broken/page", |ctx| ctx.set_content(ViewHandle::new("page")))
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	router.navigate("/");
	let outcome = router.navigate("/broken/page");

	assert_eq!(
		outcome,
		NavigationOutcome::Failed(CompositionError::ContinuationNotInvoked {
			layout: "/broken".to_string()
		})
	);
	assert_eq!(window.only::<&str>(), Some("home"));
	assert_eq!(window.attach_count(), 1);
	assert_eq!(router.phase(), RouterPhase::Idle);
	assert_eq!(router.current_path().as_deref(), Some("/broken/page"));
}

#[rstest]
fn test_released_slot_fails_pass() {
	let router = Router::with_settings(settings());
	router
		.register_layout("/", |ctx, child| {
			let slot = Rc::new(HeadlessHost::new("dropped"));
			ctx.set_content_slot(ContentSlot::new(&slot));
			child.render();
		})
		.unwrap();
	router
		.register_route("/", |ctx| ctx.set_content(ViewHandle::new("home")))
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	assert_eq!(
		router.navigate("/"),
		NavigationOutcome::Failed(CompositionError::SlotReleased {
			owner: "/".to_string()
		})
	);
	assert!(window.content().is_empty());
}

// ============================================================================
// Not found
// ============================================================================

#[rstest]
fn test_not_found_fallback_policy() {
	let router = Router::with_settings(settings().with_not_found(NotFoundPolicy::Fallback));
	router.register_route("/", |_ctx| {}).unwrap();
	router.set_not_found(|ctx| {
		let missing = ctx.path().to_string();
		ctx.set_content(ViewHandle::new(missing));
	});
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	assert_eq!(router.navigate("/nope"), NavigationOutcome::FallbackRendered);
	assert_eq!(window.only::<String>().as_deref(), Some("/nope"));
}

#[rstest]
fn test_fallback_query_comes_from_target() {
	let router = Router::with_settings(settings().with_not_found(NotFoundPolicy::Fallback));
	router.register_route("/", |_ctx| {}).unwrap();
	let queries: Rc<RefCell<Vec<QueryParams>>> = Rc::default();
	let sink = queries.clone();
	router.set_not_found(move |ctx| sink.borrow_mut().push(ctx.query().clone()));
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	router.attach_to_window(Rc::new(HeadlessHost::new("window")));

	router.navigate("missing");
	router.navigate("/nope?x=1");

	let queries = queries.borrow();
	assert_eq!(queries.len(), 2);
	assert!(queries[0].is_empty());
	assert_eq!(queries[1].get("x").map(String::as_str), Some("1"));
}

#[rstest]
fn test_fallback_policy_without_handler_is_silent() {
	let router = Router::with_settings(settings().with_not_found(NotFoundPolicy::Fallback));
	router.register_route("/", |_ctx| {}).unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	assert_eq!(router.navigate("/nope"), NavigationOutcome::NotFound);
	assert_eq!(window.attach_count(), 0);
}

// ============================================================================
// Re-entrant navigation
// ============================================================================

#[rstest]
fn test_navigation_during_pass_is_deferred() {
	let router = Router::with_settings(settings());
	let outcomes = Rc::new(RefCell::new(Vec::new()));
	router
		.register_route("/a", |ctx| {
			ctx.set_content(ViewHandle::new("a"));
			// Only the latest of these survives.
			ctx.router().navigate("/b");
			ctx.router().navigate("/c");
		})
		.unwrap();
	router
		.register_route("/b", |ctx| ctx.set_content(ViewHandle::new("b")))
		.unwrap();
	router
		.register_route("/c", |ctx| ctx.set_content(ViewHandle::new("c")))
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	let sink = outcomes.clone();
	router.set_on_navigation(move |path| sink.borrow_mut().push(path.to_string()));

	assert_eq!(router.navigate("/a"), NavigationOutcome::Rendered);
	assert_eq!(*outcomes.borrow(), vec!["/a", "/c"]);
	assert_eq!(window.only::<&str>(), Some("c"));

	let history = router.history();
	let paths: Vec<_> = history.entries().iter().map(|e| e.path()).collect();
	assert_eq!(paths, vec!["/a", "/c"]);
}

#[rstest]
fn test_navigation_from_callback_is_deferred() {
	let router = Router::with_settings(settings());
	router
		.register_route("/:page", |ctx| {
			let page = ctx.param("page").unwrap_or_default().to_string();
			ctx.set_content(ViewHandle::new(page));
		})
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	let weak = router.downgrade();
	router.set_on_navigation(move |path| {
		if path == "/login" {
			let router = weak.upgrade().unwrap();
			assert_eq!(router.phase(), RouterPhase::Rendered);
			assert_eq!(router.replace("/home"), NavigationOutcome::Deferred);
		}
	});

	router.navigate("/login");
	assert_eq!(window.only::<String>().as_deref(), Some("home"));
	assert_eq!(router.history().len(), 1);
	assert_eq!(router.current_path().as_deref(), Some("/home"));
}

#[rstest]
fn test_go_back_during_pass_renders_previous_entry() {
	let router = Router::with_settings(settings());
	let accepted = Rc::new(Cell::new(None));
	let sink = accepted.clone();
	router
		.register_route("/list", |ctx| ctx.set_content(ViewHandle::new("list")))
		.unwrap();
	router
		.register_route("/detail", move |ctx| {
			ctx.set_content(ViewHandle::new("detail"));
			sink.set(Some(ctx.router().go_back()));
		})
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	let window = Rc::new(HeadlessHost::new("window"));
	router.attach_to_window(window.clone());

	let paths = Rc::new(RefCell::new(Vec::new()));
	let seen = paths.clone();
	router.set_on_navigation(move |path| seen.borrow_mut().push(path.to_string()));

	router.navigate("/list");
	assert_eq!(router.navigate("/detail"), NavigationOutcome::Rendered);

	assert_eq!(accepted.get(), Some(true));
	assert_eq!(*paths.borrow(), vec!["/list", "/detail", "/list"]);
	assert_eq!(window.only::<&str>(), Some("list"));
	assert_eq!(router.current_path().as_deref(), Some("/list"));
	assert!(router.can_go_forward());
	assert_eq!(router.phase(), RouterPhase::Idle);
}

#[rstest]
fn test_context_exposes_navigation_state() {
	let router = Router::with_settings(settings());
	let seen = Rc::new(RefCell::new(Vec::new()));
	let sink = seen.clone();
	router
		.register_route("/:page", move |ctx| {
			let query = ctx.query_param("q").map(str::to_string);
			sink.borrow_mut()
				.push((ctx.can_go_back(), ctx.can_go_forward(), query));
		})
		.unwrap();
	let root = TempDir::new().unwrap();
	router.initialize(root.path()).unwrap();
	router.attach_to_window(Rc::new(HeadlessHost::new("window")));

	router.navigate("/a");
	router.navigate("/b?q=rust");
	router.go_back();

	assert_eq!(
		*seen.borrow(),
		vec![
			(false, false, None),
			(true, false, Some("rust".to_string())),
			(false, true, None),
		]
	);
}
