//! RAII binding between caller content and a host's registry.

use portico_primitives::{OverlayKey, Rect};

use crate::PortalError;
use crate::registry::{PortalContext, PortalRegistry, Registry};
use crate::surface::HitTarget;

/// Content teleported to its host's surface for as long as the value lives.
///
/// Creating a `Portal` registers the content, [`Portal::set_content`] updates
/// it, and dropping the portal deregisters it. Drop runs on every exit path,
/// including early returns and unwinding, so a portal never leaks a layer.
/// The portal itself draws nothing where it is created.
#[must_use = "dropping a portal immediately removes its overlay"]
pub struct Portal<C> {
	registry: PortalRegistry<C>,
	key: OverlayKey,
	registered: bool,
}

impl<C> Portal<C> {
	/// Registers `content` with the host provided by `ctx`.
	///
	/// Fails with [`PortalError::MissingRegistry`] before registering anything
	/// when `ctx` has no host.
	pub fn new(ctx: &PortalContext<C>, content: C) -> Result<Self, PortalError> {
		let Some(registry) = ctx.registry() else {
			return Err(PortalError::MissingRegistry);
		};
		let registry = registry.clone();
		let key = registry.register(content);
		Ok(Self {
			registry,
			key,
			registered: true,
		})
	}

	/// Key issued at registration.
	pub fn key(&self) -> OverlayKey {
		self.key
	}

	/// Replaces the displayed content.
	pub fn set_content(&mut self, content: C) {
		self.registry.update(self.key, content);
	}

	/// Deregisters now instead of at drop.
	pub fn close(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if std::mem::replace(&mut self.registered, false) {
			self.registry.unmount(self.key);
		}
	}
}

impl<C, T> Portal<Themed<C, T>> {
	/// Registers `content` together with an opaque theme value.
	pub fn with_theme(ctx: &PortalContext<Themed<C, T>>, content: C, theme: T) -> Result<Self, PortalError> {
		Self::new(ctx, Themed { content, theme })
	}
}

impl<C> Drop for Portal<C> {
	fn drop(&mut self) {
		self.release();
	}
}

impl<C> std::fmt::Debug for Portal<C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Portal")
			.field("key", &self.key)
			.field("registered", &self.registered)
			.finish()
	}
}

/// Content paired with a theme the portal machinery carries but never reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Themed<C, T> {
	pub content: C,
	pub theme: T,
}

impl<C: HitTarget, T> HitTarget for Themed<C, T> {
	fn hit_area(&self) -> Option<Rect> {
		self.content.hit_area()
	}
}
