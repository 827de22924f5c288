//! Navigation links.

use crate::router::{NavigationOutcome, Router};

/// A navigation target that a button or any other clickable view can
/// trigger.
///
/// # Example
///
/// ```ignore
/// use obsidian_router::Link;
///
/// let on_click = Link::new("/blog/post-1").on_activate(ctx.router());
/// button.set_on_click(on_click);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	/// The destination path.
	to: String,
	/// Whether to replace the current history entry.
	replace: bool,
}

impl Link {
	/// Creates a link that pushes `to`.
	pub fn new(to: impl Into<String>) -> Self {
		Self {
			to: to.into(),
			replace: false,
		}
	}

	/// Sets whether to replace the current history entry.
	pub fn replace(mut self, replace: bool) -> Self {
		self.replace = replace;
		self
	}

	/// Returns the destination path.
	pub fn to(&self) -> &str {
		&self.to
	}

	pub fn is_replace(&self) -> bool {
		self.replace
	}

	/// Navigates `router` to the destination now.
	pub fn activate(&self, router: &Router) -> NavigationOutcome {
		if self.replace {
			router.replace(self.to.clone())
		} else {
			router.push(self.to.clone())
		}
	}

	/// Returns a click callback for the destination.
	///
	/// The callback holds only a weak reference, so a view storing it does
	/// not keep the router alive. Once the router is dropped the callback
	/// does nothing.
	pub fn on_activate(&self, router: &Router) -> impl Fn() + 'static {
		let router = router.downgrade();
		let link = self.clone();
		move || {
			if let Some(router) = router.upgrade() {
				link.activate(&router);
			}
		}
	}
}
