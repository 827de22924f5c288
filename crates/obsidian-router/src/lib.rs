//! # Obsidian Router
//!
//! File-based routing for native Obsidian applications:
//!
//! - **Route trie**: static segments, `:param` segments and a trailing
//!   `*catch_all`, matched with a fixed `literal > dynamic > catch-all`
//!   precedence
//! - **Nested layouts**: layouts wrap every route below them and expose a
//!   content slot for the nested content
//! - **Navigation history**: browser-like navigate, push, replace, back and
//!   forward
//! - **File conventions**: `index`, `_layout`, `[param]` and `[...rest]`
//!   route files under a route source root
//!
//! # Examples
//!
//! ## Layouts and routes
//!
//! ```
//! use obsidian_router::{ContentSlot, HeadlessHost, Router, RouterSettings, ViewHandle};
//! use std::rc::Rc;
//!
//! let router = Router::with_settings(RouterSettings::default().with_discovery(false));
//! router
//!     .register_layout("/blog", |ctx, child| {
//!         let slot = Rc::new(HeadlessHost::new("blog-content"));
//!         ctx.set_content(ViewHandle::from_rc(slot.clone()));
//!         ctx.set_content_slot(ContentSlot::new(&slot));
//!         child.render();
//!     })
//!     .unwrap();
//! router
//!     .register_route("/blog/:slug", |ctx| {
//!         let slug = ctx.param("slug").unwrap_or_default().to_string();
//!         ctx.set_content(ViewHandle::new(slug));
//!     })
//!     .unwrap();
//! router.initialize(std::env::temp_dir()).unwrap();
//!
//! let window = Rc::new(HeadlessHost::new("window"));
//! router.attach_to_window(window.clone());
//! router.navigate("/blog/post-1");
//!
//! let content = window.content();
//! let layout = content[0].downcast_ref::<HeadlessHost>().unwrap();
//! assert_eq!(layout.only::<String>().as_deref(), Some("post-1"));
//! ```
//!
//! ## Matching
//!
//! ```
//! use obsidian_router::{RouteHandler, RouteTable, registry::Registration};
//!
//! let table = RouteTable::build([
//!     Registration::new("/users/:id", RouteHandler::route(|_ctx| {})),
//!     Registration::new("/users/active", RouteHandler::route(|_ctx| {})),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.match_path("/users/active").unwrap().pattern.as_str(), "/users/active");
//! assert_eq!(table.match_path("/users/7").unwrap().params["id"], "7");
//! ```

mod composer;
pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod headless;
pub mod history;
pub mod link;
pub mod pattern;
pub mod query;
pub mod registry;
pub mod router;
pub mod table;
pub mod view;

#[doc(hidden)]
pub use inventory;

pub use config::{NotFoundPolicy, RouterSettings};
pub use context::RouteContext;
pub use discovery::{DiscoveredRoute, discover_route_files};
pub use error::{
	CompositionError, ConfigError, ConstructionError, ConstructionResult, InitializationError,
	InitializationResult, PatternError,
};
pub use handler::{RenderChild, RouteHandler};
pub use headless::{HeadlessHost, HostEvent};
pub use history::{HistoryEntry, NavigationHistory};
pub use link::Link;
pub use pattern::{RouteKind, RoutePattern, Segment};
pub use query::QueryParams;
pub use registry::{Registration, RouteRegistry};
pub use router::{NavigationCallback, NavigationOutcome, Router, RouterPhase, WeakRouter};
pub use table::{MatchedLayout, PathParams, RouteMatch, RouteTable};
pub use view::{ContentHost, ContentSlot, ScreenHandle, ViewHandle, WindowHandle};
