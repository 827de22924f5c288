//! # Obsidian
//!
//! A toolkit for native desktop applications.
//!
//! The widget wrappers (buttons, text views, stacks, split views, sidebars)
//! live with the platform layer. This crate bundles the pieces with real
//! logic behind them, starting with the file-based router.
//!
//! ## Feature Flags
//!
//! - `router` (default) - File-based routing with nested layouts and
//!   navigation history
//!
//! ## Quick Example
//!
//! ```
//! use obsidian::prelude::*;
//! use std::rc::Rc;
//!
//! let router = Router::with_settings(RouterSettings::default().with_discovery(false));
//! router
//!     .register_route("/", |ctx| ctx.set_content(ViewHandle::new("home")))
//!     .unwrap();
//! router.initialize(std::env::temp_dir()).unwrap();
//!
//! let window = Rc::new(HeadlessHost::new("main"));
//! router.attach_to_window(window.clone());
//! router.navigate("/");
//!
//! assert_eq!(window.only::<&str>(), Some("home"));
//! ```

#[cfg(feature = "router")]
pub mod router;

/// Re-export commonly used types
pub mod prelude {
	#[cfg(feature = "router")]
	pub use crate::router::{
		ContentHost, ContentSlot, HeadlessHost, Link, NavigationOutcome, NotFoundPolicy,
		RenderChild, RouteContext, Router, RouterSettings, ScreenHandle, ViewHandle, WeakRouter,
		WindowHandle, register_layout, register_route,
	};
}
