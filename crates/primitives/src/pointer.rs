use crate::Position;

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PointerKind {
	Down,
	Up,
	Move,
	Scroll,
}

/// A pointer or touch event in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointerEvent {
	pub kind: PointerKind,
	pub position: Position,
}

impl PointerEvent {
	/// Creates an event of `kind` at `position`.
	pub const fn new(kind: PointerKind, position: Position) -> Self {
		Self { kind, position }
	}

	/// A press at `(x, y)`.
	pub const fn down(x: u16, y: u16) -> Self {
		Self::new(PointerKind::Down, Position::new(x, y))
	}
}
