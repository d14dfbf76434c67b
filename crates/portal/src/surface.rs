//! Render surface: the ordered layer stack painted above a host's content.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use indexmap::IndexMap;
use portico_primitives::{OverlayKey, PointerEvent, Rect};

use crate::PortalError;
use crate::host::{Host, HostShared};
use crate::op::{OpKind, PortalOp};

/// One registered overlay as seen by the surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer<C> {
	pub key: OverlayKey,
	pub content: C,
}

/// Notification emitted after the layer stack changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceChange {
	pub key: OverlayKey,
	pub kind: OpKind,
	pub revision: u64,
}

/// Content that can claim pointer input inside its own bounds.
///
/// Layers are laid out over the whole screen but only capture input where
/// they actually draw; everywhere else input falls through to what is below.
pub trait HitTarget {
	/// Area that captures pointer input, or `None` for display-only content.
	fn hit_area(&self) -> Option<Rect>;
}

impl HitTarget for Rect {
	fn hit_area(&self) -> Option<Rect> {
		Some(*self)
	}
}

/// Result of routing a pointer event through the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerRoute {
	/// The topmost layer containing the pointer takes the event.
	Captured(OverlayKey),
	/// No layer claims the event; it belongs to the host's ordinary content.
	PassThrough,
}

type ChangeListener = Box<dyn FnMut(&SurfaceChange)>;

/// Layer stack shared between a [`Surface`] and its host's attachment slot.
pub(crate) struct SurfaceCore<C> {
	layers: RefCell<IndexMap<OverlayKey, C>>,
	revision: Cell<u64>,
	needs_redraw: Cell<bool>,
	listeners: RefCell<Vec<ChangeListener>>,
}

impl<C> SurfaceCore<C> {
	fn new() -> Self {
		Self {
			layers: RefCell::new(IndexMap::new()),
			revision: Cell::new(0),
			needs_redraw: Cell::new(false),
			listeners: RefCell::new(Vec::new()),
		}
	}

	pub(crate) fn apply(&self, op: PortalOp<C>) {
		match op {
			PortalOp::Register { key, content } => self.register(key, content),
			PortalOp::Update { key, content } => self.update(key, content),
			PortalOp::Deregister { key } => self.deregister(key),
		}
	}

	fn register(&self, key: OverlayKey, content: C) {
		let inserted = {
			let mut layers = self.layers.borrow_mut();
			if layers.contains_key(&key) {
				false
			} else {
				layers.insert(key, content);
				true
			}
		};
		if inserted {
			self.changed(key, OpKind::Register);
		} else {
			tracing::debug!(%key, "ignoring duplicate overlay registration");
		}
	}

	fn update(&self, key: OverlayKey, content: C) {
		let updated = match self.layers.borrow_mut().get_mut(&key) {
			Some(slot) => {
				*slot = content;
				true
			}
			None => false,
		};
		if updated {
			self.changed(key, OpKind::Update);
		} else {
			tracing::trace!(%key, "update for absent overlay ignored");
		}
	}

	fn deregister(&self, key: OverlayKey) {
		let removed = self.layers.borrow_mut().shift_remove(&key).is_some();
		if removed {
			self.changed(key, OpKind::Deregister);
		} else {
			tracing::trace!(%key, "deregister for absent overlay ignored");
		}
	}

	fn changed(&self, key: OverlayKey, kind: OpKind) {
		let revision = self.revision.get() + 1;
		self.revision.set(revision);
		self.needs_redraw.set(true);

		let change = SurfaceChange { key, kind, revision };
		// Listeners are taken out while they run so they may call back into
		// the host. Nested changes still bump the revision but do not re-enter
		// listeners.
		let mut running = RunningListeners {
			slot: &self.listeners,
			running: std::mem::take(&mut *self.listeners.borrow_mut()),
		};
		for listener in running.running.iter_mut() {
			listener(&change);
		}
	}
}

/// Puts taken-out listeners back in front of any added while they ran, also
/// when a listener unwinds.
struct RunningListeners<'a> {
	slot: &'a RefCell<Vec<ChangeListener>>,
	running: Vec<ChangeListener>,
}

impl Drop for RunningListeners<'_> {
	fn drop(&mut self) {
		let mut listeners = self.slot.borrow_mut();
		let mut added = std::mem::take(&mut *listeners);
		*listeners = std::mem::take(&mut self.running);
		listeners.append(&mut added);
	}
}

/// The render surface ("manager") for one [`Host`].
///
/// Mounting a surface attaches it to the host and replays every operation the
/// host buffered while detached. Dropping the surface detaches it; the host
/// buffers again until another surface is mounted. Layers are kept in
/// first-registration order and an update never moves a layer.
pub struct Surface<C> {
	core: Rc<SurfaceCore<C>>,
	host: Rc<HostShared<C>>,
}

impl<C> Surface<C> {
	/// Attaches a new, empty surface to `host` and drains its buffer.
	pub fn mount(host: &Host<C>) -> Result<Self, PortalError> {
		Self::attach(host, SurfaceCore::new())
	}

	/// Like [`Self::mount`], with `listener` installed before the buffer drains
	/// so it observes the replayed operations too.
	pub fn mount_with(host: &Host<C>, listener: impl FnMut(&SurfaceChange) + 'static) -> Result<Self, PortalError> {
		let mut core = SurfaceCore::new();
		core.listeners.get_mut().push(Box::new(listener));
		Self::attach(host, core)
	}

	fn attach(host: &Host<C>, core: SurfaceCore<C>) -> Result<Self, PortalError> {
		let core = Rc::new(core);
		let shared = host.shared().clone();
		shared.attach(&core)?;
		Ok(Self { core, host: shared })
	}

	/// Detaches from the host. Equivalent to dropping the surface.
	pub fn unmount(self) {
		drop(self);
	}

	/// Appends a layer. A key that is already present is left untouched.
	pub fn register(&self, key: OverlayKey, content: C) {
		self.core.register(key, content);
	}

	/// Replaces a layer's content in place. Absent keys are ignored.
	pub fn update(&self, key: OverlayKey, content: C) {
		self.core.update(key, content);
	}

	/// Removes a layer. Absent keys are ignored.
	pub fn deregister(&self, key: OverlayKey) {
		self.core.deregister(key);
	}

	/// Keys in paint order, bottom to top.
	pub fn layers(&self) -> Vec<OverlayKey> {
		self.core.layers.borrow().keys().copied().collect()
	}

	/// Number of layers on the stack.
	pub fn len(&self) -> usize {
		self.core.layers.borrow().len()
	}

	/// Returns true when no layer is registered.
	pub fn is_empty(&self) -> bool {
		self.core.layers.borrow().is_empty()
	}

	/// Returns true if `key` has a layer on the stack.
	pub fn contains(&self, key: OverlayKey) -> bool {
		self.core.layers.borrow().contains_key(&key)
	}

	/// Index of `key` in paint order.
	pub fn position(&self, key: OverlayKey) -> Option<usize> {
		self.core.layers.borrow().get_index_of(&key)
	}

	/// Runs `f` against one layer's content.
	///
	/// # Panics
	///
	/// Panics if `f` registers, updates or removes overlays on this surface's
	/// host, for example by dropping a [`Portal`](crate::Portal).
	pub fn with_content<R>(&self, key: OverlayKey, f: impl FnOnce(&C) -> R) -> Option<R> {
		self.core.layers.borrow().get(&key).map(f)
	}

	/// Visits every layer bottom to top.
	///
	/// # Panics
	///
	/// Panics if `paint` registers, updates or removes overlays on this
	/// surface's host while it runs.
	pub fn paint(&self, mut paint: impl FnMut(OverlayKey, &C)) {
		for (key, content) in self.core.layers.borrow().iter() {
			paint(*key, content);
		}
	}

	/// Counter bumped by every effective change to the layer stack.
	pub fn revision(&self) -> u64 {
		self.core.revision.get()
	}

	/// Returns whether the stack changed since the last call, clearing the flag.
	pub fn take_redraw(&self) -> bool {
		self.core.needs_redraw.replace(false)
	}

	/// Registers a listener invoked after each effective change.
	pub fn on_change(&self, listener: impl FnMut(&SurfaceChange) + 'static) {
		self.core.listeners.borrow_mut().push(Box::new(listener));
	}

	/// Owned copy of the stack in paint order.
	pub fn snapshot(&self) -> Vec<Layer<C>>
	where
		C: Clone,
	{
		self.core
			.layers
			.borrow()
			.iter()
			.map(|(key, content)| Layer {
				key: *key,
				content: content.clone(),
			})
			.collect()
	}
}

impl<C: HitTarget> Surface<C> {
	/// Finds the layer that receives `event`.
	///
	/// Layers are tested top to bottom; the first whose hit area contains the
	/// pointer captures it.
	///
	/// # Panics
	///
	/// Panics if a [`HitTarget::hit_area`] implementation registers, updates
	/// or removes overlays on this surface's host.
	pub fn route_pointer(&self, event: &PointerEvent) -> PointerRoute {
		let layers = self.core.layers.borrow();
		let hit = layers.iter().rev().find(|(_, content)| {
			content
				.hit_area()
				.is_some_and(|area| area.contains(event.position))
		});
		match hit {
			Some((key, _)) => PointerRoute::Captured(*key),
			None => PointerRoute::PassThrough,
		}
	}
}

impl<C> Drop for Surface<C> {
	fn drop(&mut self) {
		self.host.detach(&self.core);
	}
}

#[cfg(test)]
mod tests;
