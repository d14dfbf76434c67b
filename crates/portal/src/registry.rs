//! Registry capability handed down from a host to the code that opens portals.

use std::fmt;
use std::rc::Rc;

use portico_primitives::OverlayKey;

use crate::host::HostShared;

/// The three operations a host exposes to its descendants.
///
/// None of them can fail: with no surface attached the host buffers the
/// operation, and operations on keys the surface no longer holds are ignored.
pub trait Registry<C> {
	/// Allocates a fresh key and registers `content` under it.
	fn register(&self, content: C) -> OverlayKey;
	/// Replaces the content registered under `key`.
	fn update(&self, key: OverlayKey, content: C);
	/// Deregisters `key`.
	fn unmount(&self, key: OverlayKey);
}

/// Cloneable handle to one host's registry.
pub struct PortalRegistry<C> {
	host: Rc<HostShared<C>>,
}

impl<C> PortalRegistry<C> {
	pub(crate) fn new(host: Rc<HostShared<C>>) -> Self {
		Self { host }
	}

	/// Returns true when both handles point at the same host.
	pub fn same_host(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.host, &other.host)
	}
}

impl<C> Clone for PortalRegistry<C> {
	fn clone(&self) -> Self {
		Self {
			host: self.host.clone(),
		}
	}
}

impl<C> fmt::Debug for PortalRegistry<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PortalRegistry")
			.field("host", &Rc::as_ptr(&self.host))
			.finish()
	}
}

impl<C> Registry<C> for PortalRegistry<C> {
	fn register(&self, content: C) -> OverlayKey {
		self.host.register(content)
	}

	fn update(&self, key: OverlayKey, content: C) {
		self.host.update(key, content);
	}

	fn unmount(&self, key: OverlayKey) {
		self.host.unmount(key);
	}
}

/// What a subtree knows about its enclosing host.
///
/// Passed down explicitly in place of implicit tree lookup. A context created
/// with [`PortalContext::empty`] stands for a subtree with no host above it;
/// opening a portal from it is a configuration error.
pub struct PortalContext<C> {
	registry: Option<PortalRegistry<C>>,
}

impl<C> PortalContext<C> {
	/// A context with no host in scope.
	pub fn empty() -> Self {
		Self { registry: None }
	}

	/// A context providing `registry` to everything below it.
	pub fn provide(registry: PortalRegistry<C>) -> Self {
		Self {
			registry: Some(registry),
		}
	}

	/// Registry handle, if a host is in scope.
	pub fn registry(&self) -> Option<&PortalRegistry<C>> {
		self.registry.as_ref()
	}

	/// Returns true when a host is in scope.
	pub fn has_host(&self) -> bool {
		self.registry.is_some()
	}
}

impl<C> Default for PortalContext<C> {
	fn default() -> Self {
		Self::empty()
	}
}

impl<C> Clone for PortalContext<C> {
	fn clone(&self) -> Self {
		Self {
			registry: self.registry.clone(),
		}
	}
}

impl<C> fmt::Debug for PortalContext<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PortalContext")
			.field("registry", &self.registry)
			.finish()
	}
}
