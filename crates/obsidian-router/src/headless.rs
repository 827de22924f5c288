//! In-memory [`ContentHost`] for headless use.
//!
//! `HeadlessHost` keeps attached views in a list and records every clear and
//! attach call. It stands in for a window or slot container when routes are
//! rendered without a native toolkit, which is how the crate's own tests
//! drive the composer.

use crate::view::{ContentHost, ViewHandle};
use std::cell::RefCell;

/// A call observed by a [`HeadlessHost`].
#[derive(Debug, Clone)]
pub enum HostEvent {
	/// `clear_content` was called.
	Cleared,
	/// `attach_content` was called with this view.
	Attached(ViewHandle),
}

/// Content host that stores views in memory.
#[derive(Debug, Default)]
pub struct HeadlessHost {
	name: String,
	content: RefCell<Vec<ViewHandle>>,
	events: RefCell<Vec<HostEvent>>,
}

impl HeadlessHost {
	/// Creates an empty host with a diagnostic name.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	/// Returns the diagnostic name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the currently attached views.
	pub fn content(&self) -> Vec<ViewHandle> {
		self.content.borrow().clone()
	}

	/// Returns the single attached view downcast to `V`, cloned.
	///
	/// Returns `None` unless exactly one view of type `V` is attached.
	pub fn only<V: Clone + 'static>(&self) -> Option<V> {
		let content = self.content.borrow();
		match content.as_slice() {
			[view] => view.downcast_ref::<V>().cloned(),
			_ => None,
		}
	}

	/// Returns every recorded call in order.
	pub fn events(&self) -> Vec<HostEvent> {
		self.events.borrow().clone()
	}

	/// Returns how many times content was attached.
	pub fn attach_count(&self) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|e| matches!(e, HostEvent::Attached(_)))
			.count()
	}

	/// Returns how many times content was cleared.
	pub fn clear_count(&self) -> usize {
		self.events
			.borrow()
			.iter()
			.filter(|e| matches!(e, HostEvent::Cleared))
			.count()
	}
}

impl ContentHost for HeadlessHost {
	fn clear_content(&self) {
		self.content.borrow_mut().clear();
		self.events.borrow_mut().push(HostEvent::Cleared);
	}

	fn attach_content(&self, view: ViewHandle) {
		self.content.borrow_mut().push(view.clone());
		self.events.borrow_mut().push(HostEvent::Attached(view));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_headless_host_records_calls() {
		let host = HeadlessHost::new("window");
		host.attach_content(ViewHandle::new("a"));
		host.clear_content();
		host.attach_content(ViewHandle::new("b"));

		assert_eq!(host.attach_count(), 2);
		assert_eq!(host.clear_count(), 1);
		assert_eq!(host.only::<&str>(), Some("b"));
		assert_eq!(host.name(), "window");
	}

	#[rstest]
	fn test_only_requires_single_view() {
		let host = HeadlessHost::new("window");
		host.attach_content(ViewHandle::new("a"));
		host.attach_content(ViewHandle::new("b"));
		assert_eq!(host.only::<&str>(), None);
	}
}
