//! Layout composition.
//!
//! A render pass walks the matched layouts outer to inner and finally runs
//! the leaf route. Nothing touches a host while handlers run: every
//! `set_content` call, and every attach a handler makes on the screen or
//! window it got from its context, is staged in a [`CompositionPlan`]. The
//! plan is committed only once the whole chain has returned successfully.
//! A failed pass therefore leaves whatever was attached before untouched.

use crate::context::RouteContext;
use crate::error::CompositionError;
use crate::handler::{LeafFn, RenderChild};
use crate::pattern::RoutePattern;
use crate::query::QueryParams;
use crate::router::Router;
use crate::table::{MatchedLayout, PathParams};
use crate::view::{ContentHost, ContentSlot, ScreenHandle, ViewHandle, WindowHandle};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::debug;

/// Where a frame's content goes.
#[derive(Debug, Clone)]
pub(crate) enum AttachTarget {
	/// The router's screen, or its window when no screen is attached.
	Root,
	/// A slot provided by an enclosing layout.
	Slot { slot: ContentSlot, owner: String },
}

/// One handler invocation within a pass.
#[derive(Debug)]
struct Frame {
	target: AttachTarget,
	content: Option<ViewHandle>,
	slot: Option<ContentSlot>,
}

/// A view a handler attached straight to the screen or window.
struct DirectAttach {
	frame: usize,
	host: Rc<dyn ContentHost>,
	view: ViewHandle,
}

impl fmt::Debug for DirectAttach {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DirectAttach")
			.field("frame", &self.frame)
			.field("view", &self.view)
			.finish_non_exhaustive()
	}
}

/// Attachments staged by a single render pass.
#[derive(Default)]
pub(crate) struct CompositionPlan {
	frames: Vec<Frame>,
	direct: Vec<DirectAttach>,
	cleared: Vec<Rc<dyn ContentHost>>,
}

impl fmt::Debug for CompositionPlan {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompositionPlan")
			.field("frames", &self.frames)
			.field("direct", &self.direct)
			.field("cleared", &self.cleared.len())
			.finish()
	}
}

impl CompositionPlan {
	fn open_frame(&mut self, target: AttachTarget) -> usize {
		self.frames.push(Frame {
			target,
			content: None,
			slot: None,
		});
		self.frames.len() - 1
	}

	/// Stages `view` for the frame, replacing anything staged before.
	pub(crate) fn stage_content(&mut self, frame: usize, view: ViewHandle) {
		if let Some(frame) = self.frames.get_mut(frame) {
			frame.content = Some(view);
		}
	}

	/// Stages `view` for a screen or window attached to directly.
	pub(crate) fn stage_direct(
		&mut self,
		frame: usize,
		host: Rc<dyn ContentHost>,
		view: ViewHandle,
	) {
		self.direct.push(DirectAttach { frame, host, view });
	}

	/// Drops the views staged directly for `host` and marks it to be
	/// cleared at commit.
	pub(crate) fn stage_clear(&mut self, host: Rc<dyn ContentHost>) {
		self.direct.retain(|d| !Rc::ptr_eq(&d.host, &host));
		if !self.cleared.iter().any(|h| Rc::ptr_eq(h, &host)) {
			self.cleared.push(host);
		}
	}

	pub(crate) fn set_slot(&mut self, frame: usize, slot: ContentSlot) {
		if let Some(frame) = self.frames.get_mut(frame) {
			frame.slot = Some(slot);
		}
	}

	/// Returns the slot content inside `frame` is placed into: the slot the
	/// frame itself set, or the slot it inherited.
	pub(crate) fn slot(&self, frame: usize) -> Option<ContentSlot> {
		let frame = self.frames.get(frame)?;
		frame.slot.clone().or_else(|| match &frame.target {
			AttachTarget::Slot { slot, .. } => Some(slot.clone()),
			AttachTarget::Root => None,
		})
	}

	fn child_target(&self, frame: usize, owner: &RoutePattern) -> Option<AttachTarget> {
		let frame = self.frames.get(frame)?;
		Some(match &frame.slot {
			Some(slot) => AttachTarget::Slot {
				slot: slot.clone(),
				owner: owner.to_string(),
			},
			None => frame.target.clone(),
		})
	}

	/// Returns how many views are staged.
	pub(crate) fn staged_count(&self) -> usize {
		self.frames.iter().filter(|f| f.content.is_some()).count() + self.direct.len()
	}

	/// Applies the staged attachments.
	///
	/// Every target is resolved before any host is touched. Each host that
	/// receives content, or was cleared through a staged screen or window,
	/// is cleared once and then gets its views in frame order. Within a
	/// frame, direct attachments come before the frame's own content.
	/// Returns the number of views attached.
	///
	/// # Errors
	///
	/// Returns [`CompositionError::SlotReleased`] if a slot host was dropped
	/// during the pass. Nothing is attached in that case.
	pub(crate) fn commit(self, root: &Rc<dyn ContentHost>) -> Result<usize, CompositionError> {
		let Self {
			frames,
			mut direct,
			cleared,
		} = self;
		let mut groups: Vec<(Rc<dyn ContentHost>, Vec<ViewHandle>)> =
			cleared.into_iter().map(|host| (host, Vec::new())).collect();
		direct.sort_by_key(|d| d.frame);
		let mut direct = direct.into_iter().peekable();

		for (index, frame) in frames.into_iter().enumerate() {
			while let Some(attach) = direct.next_if(|d| d.frame == index) {
				group_view(&mut groups, attach.host, attach.view);
			}
			let Some(view) = frame.content else {
				continue;
			};
			let host = match &frame.target {
				AttachTarget::Root => Rc::clone(root),
				AttachTarget::Slot { slot, owner } => {
					slot.upgrade().ok_or_else(|| CompositionError::SlotReleased {
						owner: owner.clone(),
					})?
				}
			};
			group_view(&mut groups, host, view);
		}
		for attach in direct {
			group_view(&mut groups, attach.host, attach.view);
		}

		let mut attached = 0;
		for (host, views) in groups {
			host.clear_content();
			for view in views {
				host.attach_content(view);
				attached += 1;
			}
		}
		Ok(attached)
	}
}

fn group_view(
	groups: &mut Vec<(Rc<dyn ContentHost>, Vec<ViewHandle>)>,
	host: Rc<dyn ContentHost>,
	view: ViewHandle,
) {
	match groups.iter_mut().find(|(h, _)| Rc::ptr_eq(h, &host)) {
		Some((_, views)) => views.push(view),
		None => groups.push((host, vec![view])),
	}
}

/// Screen or window handed to a handler through its [`RouteContext`].
///
/// While the pass runs, clears and attaches are recorded in the plan and
/// applied at commit together with the rest of the pass. Once the pass is
/// over the calls go straight to the host.
pub(crate) struct StagedHost {
	host: Rc<dyn ContentHost>,
	plan: Weak<RefCell<CompositionPlan>>,
	frame: usize,
}

impl StagedHost {
	pub(crate) fn new(
		host: Rc<dyn ContentHost>,
		plan: Weak<RefCell<CompositionPlan>>,
		frame: usize,
	) -> Self {
		Self { host, plan, frame }
	}
}

impl ContentHost for StagedHost {
	fn clear_content(&self) {
		match self.plan.upgrade() {
			Some(plan) => plan.borrow_mut().stage_clear(Rc::clone(&self.host)),
			None => self.host.clear_content(),
		}
	}

	fn attach_content(&self, view: ViewHandle) {
		match self.plan.upgrade() {
			Some(plan) => plan
				.borrow_mut()
				.stage_direct(self.frame, Rc::clone(&self.host), view),
			None => self.host.attach_content(view),
		}
	}
}

/// The leaf invocation at the end of a pass.
pub(crate) struct LeafPass<'a> {
	pub(crate) handler: &'a LeafFn,
	pub(crate) pattern: Option<&'a RoutePattern>,
	pub(crate) params: &'a PathParams,
}

/// Runs the handlers of one pass against a fresh plan.
pub(crate) struct Composer<'a> {
	router: &'a Router,
	screen: Option<ScreenHandle>,
	window: Option<WindowHandle>,
	path: &'a str,
	query: &'a QueryParams,
	plan: Rc<RefCell<CompositionPlan>>,
}

impl<'a> Composer<'a> {
	pub(crate) fn new(
		router: &'a Router,
		screen: Option<ScreenHandle>,
		window: Option<WindowHandle>,
		path: &'a str,
		query: &'a QueryParams,
	) -> Self {
		Self {
			router,
			screen,
			window,
			path,
			query,
			plan: Rc::new(RefCell::new(CompositionPlan::default())),
		}
	}

	/// Renders `layouts` outer to inner, then the leaf, and returns the
	/// staged plan.
	///
	/// # Errors
	///
	/// Returns [`CompositionError::ContinuationNotInvoked`] for the
	/// outermost layout that did not render its child.
	pub(crate) fn compose(
		self,
		layouts: &[MatchedLayout],
		leaf: LeafPass<'_>,
	) -> Result<CompositionPlan, CompositionError> {
		self.render_level(layouts, &leaf, AttachTarget::Root)?;
		let plan = std::mem::take(&mut *self.plan.borrow_mut());
		debug!(path = self.path, staged = plan.staged_count(), "composition staged");
		Ok(plan)
	}

	fn render_level(
		&self,
		layouts: &[MatchedLayout],
		leaf: &LeafPass<'_>,
		target: AttachTarget,
	) -> Result<(), CompositionError> {
		let Some((layout, inner)) = layouts.split_first() else {
			let frame = self.plan.borrow_mut().open_frame(target);
			let mut context = self.context(leaf.params.clone(), leaf.pattern.cloned(), frame);
			debug!(
				path = self.path,
				pattern = ?leaf.pattern.map(RoutePattern::as_str),
				"rendering route"
			);
			(leaf.handler)(&mut context);
			return Ok(());
		};

		let frame = self.plan.borrow_mut().open_frame(target);
		let mut context =
			self.context(layout.params.clone(), Some(layout.pattern.clone()), frame);
		debug!(path = self.path, layout = layout.pattern.as_str(), "rendering layout");

		let mut invoked = false;
		let mut inner_result = Ok(());
		let mut next = || {
			invoked = true;
			let child_target = self.plan.borrow().child_target(frame, &layout.pattern);
			inner_result = match child_target {
				Some(child_target) => self.render_level(inner, leaf, child_target),
				None => Ok(()),
			};
		};
		(layout.handler)(&mut context, RenderChild::new(&mut next));

		if !invoked {
			return Err(CompositionError::ContinuationNotInvoked {
				layout: layout.pattern.to_string(),
			});
		}
		inner_result
	}

	fn context(
		&self,
		params: PathParams,
		pattern: Option<RoutePattern>,
		frame: usize,
	) -> RouteContext {
		RouteContext::new(
			params,
			self.query.clone(),
			self.path.to_string(),
			pattern,
			self.router.clone(),
			self.screen.clone(),
			self.window.clone(),
			Rc::clone(&self.plan),
			frame,
		)
	}
}
