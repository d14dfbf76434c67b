//! Overlay registration: render content declared anywhere in a tree on a
//! single top-level layer.
//!
//! Three pieces cooperate:
//!
//! - [`Host`] owns the registry. It allocates keys and buffers operations
//!   while no surface is attached.
//! - [`Surface`] holds the ordered layer stack. Mounting one drains the host's
//!   buffer in order; dropping it detaches.
//! - [`Portal`] is an RAII binding that registers content on creation,
//!   updates it on [`Portal::set_content`], and deregisters on drop.
//!
//! Descendants receive the registry through an explicit [`PortalContext`].
//!
//! ```
//! use portico_portal::{Host, Portal, Surface};
//!
//! let host = Host::<&str>::new();
//! let ctx = host.context();
//!
//! // Nested content commits before the surface exists.
//! let menu = Portal::new(&ctx, "menu")?;
//! assert_eq!(host.pending_len(), 1);
//!
//! let surface = Surface::mount(&host)?;
//! assert_eq!(surface.layers(), vec![menu.key()]);
//!
//! drop(menu);
//! assert!(surface.is_empty());
//! # Ok::<(), portico_portal::PortalError>(())
//! ```

pub mod binding;
pub mod error;
pub mod host;
pub mod op;
pub mod options;
pub mod registry;
pub mod surface;

pub use binding::{Portal, Themed};
pub use error::PortalError;
pub use host::Host;
pub use op::{OpKind, PortalOp};
pub use options::HostOptions;
pub use portico_primitives::OverlayKey;
pub use registry::{PortalContext, PortalRegistry, Registry};
pub use surface::{HitTarget, Layer, PointerRoute, Surface, SurfaceChange};
