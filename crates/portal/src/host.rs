//! Mount point for overlays.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use portico_primitives::{KeyAllocator, OverlayKey};

use crate::PortalError;
use crate::op::{OpKind, PendingQueue, PortalOp};
use crate::options::HostOptions;
use crate::registry::{PortalContext, PortalRegistry, Registry};
use crate::surface::SurfaceCore;

/// The durable anchor that owns an overlay registry.
///
/// A host allocates keys, forwards operations to its attached [`Surface`] and
/// buffers them while no surface is attached. Portals nested under ordinary
/// content usually register before the surface mounts, so the buffer is what
/// keeps first-frame overlays from being dropped.
///
/// Hosts are plain values; any number can coexist.
///
/// [`Surface`]: crate::Surface
pub struct Host<C> {
	shared: Rc<HostShared<C>>,
}

impl<C> Host<C> {
	/// Creates a detached host with default options.
	pub fn new() -> Self {
		Self::with_options(HostOptions::default())
	}

	/// Creates a detached host with the given options.
	pub fn with_options(options: HostOptions) -> Self {
		Self {
			shared: Rc::new(HostShared {
				keys: KeyAllocator::new(),
				options,
				state: RefCell::new(HostState::default()),
			}),
		}
	}

	/// Options this host was created with.
	pub fn options(&self) -> &HostOptions {
		&self.shared.options
	}

	/// Cloneable registry handle for this host.
	pub fn registry(&self) -> PortalRegistry<C> {
		PortalRegistry::new(self.shared.clone())
	}

	/// Context to hand down to code that creates portals.
	pub fn context(&self) -> PortalContext<C> {
		PortalContext::provide(self.registry())
	}

	/// Returns true while a surface is attached.
	pub fn is_attached(&self) -> bool {
		self.shared.state.borrow().live_surface().is_some()
	}

	/// Number of operations waiting for a surface.
	pub fn pending_len(&self) -> usize {
		self.shared.state.borrow().pending.len()
	}

	/// Keys and kinds of the buffered operations, oldest first.
	pub fn pending_snapshot(&self) -> Vec<(OverlayKey, OpKind)> {
		let state = self.shared.state.borrow();
		state.pending.iter().map(|op| (op.key(), op.kind())).collect()
	}

	/// Owned copy of the buffered operations, oldest first.
	pub fn pending_ops(&self) -> Vec<PortalOp<C>>
	where
		C: Clone,
	{
		self.shared.state.borrow().pending.iter().cloned().collect()
	}

	pub(crate) fn shared(&self) -> &Rc<HostShared<C>> {
		&self.shared
	}
}

impl<C> Default for Host<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> Registry<C> for Host<C> {
	fn register(&self, content: C) -> OverlayKey {
		self.shared.register(content)
	}

	fn update(&self, key: OverlayKey, content: C) {
		self.shared.update(key, content);
	}

	fn unmount(&self, key: OverlayKey) {
		self.shared.unmount(key);
	}
}

/// State shared by a host, its registry handles, and its surface.
pub(crate) struct HostShared<C> {
	keys: KeyAllocator,
	options: HostOptions,
	state: RefCell<HostState<C>>,
}

struct HostState<C> {
	pending: PendingQueue<C>,
	surface: Option<Weak<SurfaceCore<C>>>,
	draining: bool,
	warned: bool,
}

impl<C> Default for HostState<C> {
	fn default() -> Self {
		Self {
			pending: PendingQueue::default(),
			surface: None,
			draining: false,
			warned: false,
		}
	}
}

impl<C> HostState<C> {
	fn live_surface(&self) -> Option<Rc<SurfaceCore<C>>> {
		self.surface.as_ref().and_then(Weak::upgrade)
	}

	fn is_attached_to(&self, core: &Rc<SurfaceCore<C>>) -> bool {
		self.surface
			.as_ref()
			.is_some_and(|slot| std::ptr::eq(slot.as_ptr(), Rc::as_ptr(core)))
	}
}

impl<C> HostShared<C> {
	pub(crate) fn register(&self, content: C) -> OverlayKey {
		let key = self.keys.allocate();
		tracing::trace!(host = %self.options.label, %key, "register overlay");
		self.dispatch(PortalOp::Register { key, content });
		key
	}

	pub(crate) fn update(&self, key: OverlayKey, content: C) {
		tracing::trace!(host = %self.options.label, %key, "update overlay");
		self.dispatch(PortalOp::Update { key, content });
	}

	pub(crate) fn unmount(&self, key: OverlayKey) {
		tracing::trace!(host = %self.options.label, %key, "unmount overlay");
		self.dispatch(PortalOp::Deregister { key });
	}

	/// Sends `op` to the attached surface or buffers it.
	///
	/// The state borrow is released before the surface sees the operation so
	/// change listeners may call back into the host.
	fn dispatch(&self, op: PortalOp<C>) {
		let core = {
			let mut state = self.state.borrow_mut();
			if state.draining {
				// Queued behind the remaining buffered ops; the active drain
				// loop dispatches it.
				state.pending.push(op);
				return;
			}
			match state.live_surface() {
				Some(core) => core,
				None => {
					self.buffer(&mut state, op);
					return;
				}
			}
		};
		core.apply(op);
	}

	fn buffer(&self, state: &mut HostState<C>, op: PortalOp<C>) {
		match op {
			PortalOp::Register { .. } | PortalOp::Deregister { .. } => state.pending.push(op),
			PortalOp::Update { key, content } => {
				if state.pending.coalesce_update(key, content) {
					tracing::trace!(host = %self.options.label, %key, "coalesced pending update");
				}
			}
		}

		let pending = state.pending.len();
		if pending > self.options.pending_warn_threshold && !state.warned {
			state.warned = true;
			tracing::warn!(
				host = %self.options.label,
				pending,
				"overlay operations are piling up with no surface attached"
			);
		}
	}

	/// Fills the attachment slot and replays the buffer into `core`.
	pub(crate) fn attach(&self, core: &Rc<SurfaceCore<C>>) -> Result<(), PortalError> {
		{
			let mut state = self.state.borrow_mut();
			if state.live_surface().is_some() {
				return Err(PortalError::SurfaceAlreadyAttached);
			}
			state.surface = Some(Rc::downgrade(core));
			state.draining = !state.pending.is_empty();
			state.warned = false;
		}
		self.drain(core);
		Ok(())
	}

	fn drain(&self, core: &Rc<SurfaceCore<C>>) {
		let mut drained = 0usize;
		loop {
			let op = {
				let mut state = self.state.borrow_mut();
				if !state.is_attached_to(core) {
					break;
				}
				state.pending.pop_front()
			};
			let Some(op) = op else { break };
			core.apply(op);
			drained += 1;
		}

		let mut state = self.state.borrow_mut();
		state.draining = false;
		tracing::debug!(
			host = %self.options.label,
			drained,
			left = state.pending.len(),
			"surface attached"
		);
	}

	/// Clears the attachment slot if it still points at `core`.
	pub(crate) fn detach(&self, core: &Rc<SurfaceCore<C>>) {
		let mut state = self.state.borrow_mut();
		if state.is_attached_to(core) {
			state.surface = None;
			state.draining = false;
			tracing::debug!(host = %self.options.label, "surface detached");
		}
	}
}
