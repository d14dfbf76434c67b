//! Error types for portal wiring.

use thiserror::Error;

/// Configuration errors raised while wiring portals to a host.
///
/// Registry operations themselves never fail; these only surface when the
/// tree is assembled incorrectly.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PortalError {
	/// A portal was created from a context that no host provides.
	#[error("no portal host in scope: create a `Host` and pass its `context()` down to the portal")]
	MissingRegistry,

	/// A second surface was mounted while the host already has one.
	#[error("portal host already has an attached surface")]
	SurfaceAlreadyAttached,
}
