use std::collections::VecDeque;

use portico_primitives::OverlayKey;

/// Discriminant of a [`PortalOp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
	Register,
	Update,
	Deregister,
}

/// One registry operation, either dispatched live or held in a host's buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalOp<C> {
	Register { key: OverlayKey, content: C },
	Update { key: OverlayKey, content: C },
	Deregister { key: OverlayKey },
}

impl<C> PortalOp<C> {
	/// Overlay the operation targets.
	pub fn key(&self) -> OverlayKey {
		match self {
			Self::Register { key, .. } | Self::Update { key, .. } | Self::Deregister { key } => *key,
		}
	}

	/// Variant tag without the content.
	pub fn kind(&self) -> OpKind {
		match self {
			Self::Register { .. } => OpKind::Register,
			Self::Update { .. } => OpKind::Update,
			Self::Deregister { .. } => OpKind::Deregister,
		}
	}

	/// Carried content; `None` for deregistrations.
	pub fn content(&self) -> Option<&C> {
		match self {
			Self::Register { content, .. } | Self::Update { content, .. } => Some(content),
			Self::Deregister { .. } => None,
		}
	}
}

/// FIFO of operations issued while no surface is attached.
///
/// Updates coalesce into the pending entry for the same key so that only the
/// latest content is replayed. Deregistrations never coalesce.
#[derive(Debug)]
pub(crate) struct PendingQueue<C> {
	ops: VecDeque<PortalOp<C>>,
}

impl<C> Default for PendingQueue<C> {
	fn default() -> Self {
		Self { ops: VecDeque::new() }
	}
}

impl<C> PendingQueue<C> {
	/// Appends `op` without coalescing.
	pub fn push(&mut self, op: PortalOp<C>) {
		self.ops.push_back(op);
	}

	/// Buffers an update for `key`.
	///
	/// Overwrites the pending register/update entry for `key` in place, or
	/// appends a new one. The stored entry is always a registration so a
	/// surface attached later shows the latest content even if the key was
	/// first registered against an earlier surface.
	///
	/// Returns true when an existing entry was overwritten.
	pub fn coalesce_update(&mut self, key: OverlayKey, content: C) -> bool {
		let slot = self
			.ops
			.iter_mut()
			.find(|op| op.key() == key && op.kind() != OpKind::Deregister);
		match slot {
			Some(slot) => {
				*slot = PortalOp::Register { key, content };
				true
			}
			None => {
				self.ops.push_back(PortalOp::Register { key, content });
				false
			}
		}
	}

	/// Removes the oldest entry.
	pub fn pop_front(&mut self) -> Option<PortalOp<C>> {
		self.ops.pop_front()
	}

	/// Number of buffered entries.
	pub fn len(&self) -> usize {
		self.ops.len()
	}

	/// Returns true when nothing is buffered.
	pub fn is_empty(&self) -> bool {
		self.ops.is_empty()
	}

	/// Entries oldest first.
	pub fn iter(&self) -> impl Iterator<Item = &PortalOp<C>> {
		self.ops.iter()
	}
}

#[cfg(test)]
mod tests {
	use portico_primitives::OverlayKey;

	use super::{OpKind, PendingQueue, PortalOp};

	fn kinds(queue: &PendingQueue<&'static str>) -> Vec<(u64, OpKind)> {
		queue.iter().map(|op| (op.key().get(), op.kind())).collect()
	}

	#[test]
	fn update_overwrites_pending_register_in_place() {
		let mut queue = PendingQueue::default();
		queue.push(PortalOp::Register { key: OverlayKey(0), content: "a" });
		queue.push(PortalOp::Register { key: OverlayKey(1), content: "b" });

		assert!(queue.coalesce_update(OverlayKey(0), "a2"));

		assert_eq!(queue.len(), 2);
		let first = queue.pop_front().unwrap();
		assert_eq!(first, PortalOp::Register { key: OverlayKey(0), content: "a2" });
	}

	#[test]
	fn update_without_pending_entry_appends_registration() {
		let mut queue = PendingQueue::default();
		queue.push(PortalOp::Register { key: OverlayKey(0), content: "a" });

		assert!(!queue.coalesce_update(OverlayKey(7), "z"));

		assert_eq!(kinds(&queue), vec![(0, OpKind::Register), (7, OpKind::Register)]);
	}

	#[test]
	fn update_only_matches_its_own_key() {
		let mut queue = PendingQueue::default();
		queue.push(PortalOp::Register { key: OverlayKey(0), content: "a" });
		queue.push(PortalOp::Register { key: OverlayKey(1), content: "b" });

		queue.coalesce_update(OverlayKey(1), "b2");

		let contents: Vec<_> = queue.iter().filter_map(|op| op.content().copied()).collect();
		assert_eq!(contents, vec!["a", "b2"]);
	}

	#[test]
	fn update_skips_pending_deregister() {
		let mut queue = PendingQueue::default();
		queue.push(PortalOp::Deregister { key: OverlayKey(3) });

		queue.coalesce_update(OverlayKey(3), "late");

		assert_eq!(kinds(&queue), vec![(3, OpKind::Deregister), (3, OpKind::Register)]);
	}
}
