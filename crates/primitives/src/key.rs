use std::cell::Cell;
use std::fmt;

/// Identifier for one registered overlay.
///
/// Keys come from a [`KeyAllocator`] in strictly increasing order and are
/// never handed out twice by the same allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayKey(pub u64);

impl OverlayKey {
	/// Raw key value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for OverlayKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Monotonic key source for a single host.
///
/// Uses interior mutability so shared handles can allocate without `&mut`.
#[derive(Debug, Default)]
pub struct KeyAllocator {
	next: Cell<u64>,
}

impl KeyAllocator {
	/// Creates an allocator whose first key is 0.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a fresh key.
	pub fn allocate(&self) -> OverlayKey {
		let key = self.next.get();
		self.next.set(key + 1);
		OverlayKey(key)
	}
}
