/// A cell position in screen space.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
	pub x: u16,
	pub y: u16,
}

impl Position {
	/// Creates a position.
	pub const fn new(x: u16, y: u16) -> Self {
		Self { x, y }
	}
}

/// An axis-aligned rectangle.
///
/// The origin is inclusive and the far edges are exclusive, so a zero-sized
/// rectangle contains nothing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
	pub x: u16,
	pub y: u16,
	pub width: u16,
	pub height: u16,
}

impl Rect {
	/// Creates a rectangle, clamping the size so the far edges stay within `u16`.
	pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
		let max_width = u16::MAX - x;
		let max_height = u16::MAX - y;
		Self {
			x,
			y,
			width: if width > max_width { max_width } else { width },
			height: if height > max_height { max_height } else { height },
		}
	}

	/// Inclusive left edge.
	pub const fn left(&self) -> u16 {
		self.x
	}

	/// Exclusive right edge.
	pub const fn right(&self) -> u16 {
		self.x.saturating_add(self.width)
	}

	/// Inclusive top edge.
	pub const fn top(&self) -> u16 {
		self.y
	}

	/// Exclusive bottom edge.
	pub const fn bottom(&self) -> u16 {
		self.y.saturating_add(self.height)
	}

	/// Returns true when either dimension is zero.
	pub const fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// Returns true if `pos` lies inside the rectangle.
	pub const fn contains(&self, pos: Position) -> bool {
		pos.x >= self.left() && pos.x < self.right() && pos.y >= self.top() && pos.y < self.bottom()
	}
}
