//! Attachment surface shared with the native view layer.
//!
//! The router never creates or lays out views. It only needs three things
//! from the widget toolkit:
//!
//! - a [`ContentHost`]: something content can be cleared from and attached
//!   into (a window, a screen container, a layout's content slot),
//! - a [`ViewHandle`]: an opaque reference to a rendered view,
//! - a [`ContentSlot`]: a non-owning pointer to a layout's inner host.

use std::any::Any;
use std::fmt;
use std::rc::{Rc, Weak};

/// A view container the router can place rendered content into.
pub trait ContentHost {
	/// Removes whatever content is currently attached.
	fn clear_content(&self);

	/// Attaches `view` as this host's content.
	fn attach_content(&self, view: ViewHandle);
}

/// Shared handle to a window-level host.
pub type WindowHandle = Rc<dyn ContentHost>;

/// Shared handle to a screen container host.
pub type ScreenHandle = Rc<dyn ContentHost>;

/// Opaque, cheaply cloneable reference to a rendered view.
#[derive(Clone)]
pub struct ViewHandle {
	inner: Rc<dyn Any>,
}

impl ViewHandle {
	/// Wraps a freshly built view.
	pub fn new<V: 'static>(view: V) -> Self {
		Self {
			inner: Rc::new(view),
		}
	}

	/// Wraps a view that is already shared.
	pub fn from_rc<V: 'static>(view: Rc<V>) -> Self {
		Self { inner: view }
	}

	/// Returns the view as `V` if it has that type.
	pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
		self.inner.downcast_ref::<V>()
	}

	/// Returns whether both handles point at the same view.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for ViewHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ViewHandle")
			.field("ptr", &Rc::as_ptr(&self.inner).cast::<()>())
			.finish()
	}
}

/// Non-owning reference to the host a layout exposes for its descendants.
///
/// The layout that created the host owns it (usually by making it a child
/// of the layout's own view). The router only redirects content into it and
/// reports [`CompositionError::SlotReleased`](crate::CompositionError::SlotReleased)
/// if the host is gone by the time the pass commits.
#[derive(Clone)]
pub struct ContentSlot {
	host: Weak<dyn ContentHost>,
}

impl ContentSlot {
	/// Creates a slot pointing at `host`.
	pub fn new<H: ContentHost + 'static>(host: &Rc<H>) -> Self {
		let host: Rc<dyn ContentHost> = host.clone();
		Self {
			host: Rc::downgrade(&host),
		}
	}

	/// Creates a slot from an already type-erased host.
	pub fn from_dyn(host: &Rc<dyn ContentHost>) -> Self {
		Self {
			host: Rc::downgrade(host),
		}
	}

	/// Returns the host if it is still alive.
	pub fn upgrade(&self) -> Option<Rc<dyn ContentHost>> {
		self.host.upgrade()
	}

	/// Returns whether the host has been dropped.
	pub fn is_released(&self) -> bool {
		self.host.strong_count() == 0
	}

	/// Returns whether both slots point at the same host.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		Weak::ptr_eq(&self.host, &other.host)
	}
}

impl fmt::Debug for ContentSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContentSlot")
			.field("released", &self.is_released())
			.finish()
	}
}
