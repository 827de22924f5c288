//! Render handler abstractions.
//!
//! Leaf routes and layouts have different shapes: a leaf only receives its
//! [`RouteContext`], while a layout also receives a [`RenderChild`]
//! continuation that renders everything nested inside it. [`RouteHandler`]
//! carries either shape so both can live in the same route table.

use crate::context::RouteContext;
use crate::pattern::RouteKind;
use std::fmt;
use std::rc::Rc;

/// Leaf render function.
pub type LeafFn = Rc<dyn Fn(&mut RouteContext)>;

/// Layout render function.
pub type LayoutFn = Rc<dyn for<'a> Fn(&mut RouteContext, RenderChild<'a>)>;

/// A registered render handler.
#[derive(Clone)]
pub enum RouteHandler {
	/// Produces the page content for an exact path.
	Route(LeafFn),
	/// Wraps nested routes and supplies a content slot.
	Layout(LayoutFn),
}

impl RouteHandler {
	/// Wraps a leaf render function.
	pub fn route<F>(handler: F) -> Self
	where
		F: Fn(&mut RouteContext) + 'static,
	{
		Self::Route(Rc::new(handler))
	}

	/// Wraps a layout render function.
	pub fn layout<F>(handler: F) -> Self
	where
		F: for<'a> Fn(&mut RouteContext, RenderChild<'a>) + 'static,
	{
		Self::Layout(Rc::new(handler))
	}

	/// Returns which shape this handler has.
	pub fn kind(&self) -> RouteKind {
		match self {
			Self::Route(_) => RouteKind::Route,
			Self::Layout(_) => RouteKind::Layout,
		}
	}
}

impl fmt::Debug for RouteHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("RouteHandler").field(&self.kind()).finish()
	}
}

/// Continuation handed to a layout.
///
/// Calling [`render`](Self::render) renders the next layout inward, or the
/// leaf route when this is the innermost layout. It consumes `self`, so a
/// layout can render its child at most once. A layout that drops it
/// without calling `render` fails the pass with
/// [`CompositionError::ContinuationNotInvoked`](crate::CompositionError::ContinuationNotInvoked).
pub struct RenderChild<'a> {
	next: &'a mut dyn FnMut(),
}

impl<'a> RenderChild<'a> {
	pub(crate) fn new(next: &'a mut dyn FnMut()) -> Self {
		Self { next }
	}

	/// Renders the nested content.
	///
	/// Call [`RouteContext::set_content_slot`] first so the nested content
	/// has somewhere to go.
	pub fn render(self) {
		(self.next)()
	}
}

impl fmt::Debug for RenderChild<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RenderChild").finish_non_exhaustive()
	}
}
