//! File-based routing
//!
//! This module provides access to obsidian-router: a route trie with
//! `literal > dynamic > catch-all` precedence, nested layouts composed
//! through content slots, and browser-like navigation history.
//!
//! ## Route files
//!
//! ```text
//! app/
//! ├── _layout.rs        -> layout at /
//! ├── index.rs          -> /
//! └── blog/
//!     ├── _layout.rs    -> layout at /blog
//!     ├── index.rs      -> /blog
//!     └── [slug].rs     -> /blog/:slug
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use obsidian::router::{RenderChild, RouteContext, ViewHandle, register_route};
//!
//! fn blog_post(ctx: &mut RouteContext) {
//!     let slug = ctx.param("slug").unwrap_or_default().to_string();
//!     ctx.set_content(ViewHandle::new(slug));
//! }
//!
//! register_route!("/blog/:slug", blog_post);
//! ```

// Re-export all obsidian-router functionality
pub use obsidian_router::*;
