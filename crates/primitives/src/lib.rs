//! Core types for overlay compositing: keys, geometry, and pointer events.

/// Screen-space geometry used for hit testing.
pub mod geometry;
/// Overlay identifiers and their allocator.
pub mod key;
/// Pointer input events.
pub mod pointer;

pub use geometry::{Position, Rect};
pub use key::{KeyAllocator, OverlayKey};
pub use pointer::{PointerEvent, PointerKind};
