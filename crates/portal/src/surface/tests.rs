use std::cell::{Cell, RefCell};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use portico_primitives::{OverlayKey, PointerEvent, Rect};

use crate::{Host, OpKind, PointerRoute, Registry, Surface, SurfaceChange};

#[test]
fn update_keeps_position() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let a = host.register("a");
	let b = host.register("b");
	let c = host.register("c");

	host.update(a, "a2");

	assert_eq!(surface.layers(), vec![a, b, c]);
	assert_eq!(surface.position(a), Some(0));
	assert_eq!(surface.with_content(a, |content| *content), Some("a2"));
}

#[test]
fn removal_keeps_relative_order_of_the_rest() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let a = host.register("a");
	let b = host.register("b");
	let c = host.register("c");

	host.unmount(b);

	assert_eq!(surface.layers(), vec![a, c]);
}

#[test]
fn absent_keys_are_ignored() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let a = host.register("a");
	let before = surface.revision();

	surface.update(OverlayKey(99), "ghost");
	surface.deregister(OverlayKey(99));
	host.unmount(a);
	host.unmount(a);
	host.update(a, "late");

	assert!(surface.is_empty());
	assert_eq!(surface.revision(), before + 1);
}

#[test]
fn duplicate_register_is_ignored() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let a = host.register("a");

	surface.register(a, "impostor");

	assert_eq!(surface.len(), 1);
	assert_eq!(surface.with_content(a, |content| *content), Some("a"));
}

#[test]
fn direct_surface_operations_bypass_the_host() {
	let host = Host::<&str>::new();
	let surface = Surface::mount(&host).unwrap();

	surface.register(OverlayKey(10), "x");
	surface.update(OverlayKey(10), "y");
	assert_eq!(surface.with_content(OverlayKey(10), |content| *content), Some("y"));

	surface.deregister(OverlayKey(10));
	assert!(!surface.contains(OverlayKey(10)));
}

#[test]
fn paint_visits_layers_bottom_to_top() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	host.register("back");
	let mid = host.register("mid");
	host.register("front");
	host.update(mid, "mid2");

	let mut painted = Vec::new();
	surface.paint(|_, content| painted.push(*content));

	assert_eq!(painted, vec!["back", "mid2", "front"]);
}

#[test]
fn redraw_flag_tracks_effective_changes() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	assert!(!surface.take_redraw());

	let a = host.register("a");
	assert!(surface.take_redraw());
	assert!(!surface.take_redraw(), "flag clears on read");

	host.unmount(OverlayKey(42));
	assert!(!surface.take_redraw());

	host.update(a, "b");
	assert!(surface.take_redraw());
}

#[test]
fn listeners_receive_each_change() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let changes: Rc<RefCell<Vec<SurfaceChange>>> = Rc::default();
	let sink = changes.clone();
	surface.on_change(move |change| sink.borrow_mut().push(*change));

	let a = host.register("a");
	host.update(a, "a2");
	host.unmount(a);

	let kinds: Vec<_> = changes.borrow().iter().map(|c| (c.kind, c.revision)).collect();
	assert_eq!(
		kinds,
		vec![(OpKind::Register, 1), (OpKind::Update, 2), (OpKind::Deregister, 3)]
	);
}

#[test]
fn listeners_survive_a_panicking_listener() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let calls = Rc::new(Cell::new(0));
	let counter = calls.clone();
	surface.on_change(move |_| counter.set(counter.get() + 1));
	let mut armed = true;
	surface.on_change(move |_| {
		if std::mem::take(&mut armed) {
			panic!("listener failed");
		}
	});

	let result = catch_unwind(AssertUnwindSafe(|| host.register("x")));
	assert!(result.is_err());
	host.register("y");

	assert_eq!(calls.get(), 2);
	assert_eq!(surface.layers(), vec![OverlayKey(0), OverlayKey(1)]);
}

#[test]
fn dropping_surface_detaches_from_host() {
	let host = Host::new();
	{
		let _surface = Surface::mount(&host).unwrap();
		assert!(host.is_attached());
	}
	assert!(!host.is_attached());

	host.register("buffered");
	assert_eq!(host.pending_len(), 1);
}

#[test]
fn pointer_inside_topmost_layer_is_captured() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	let below = host.register(Rect::new(0, 0, 20, 10));
	let above = host.register(Rect::new(5, 5, 5, 5));

	assert_eq!(surface.route_pointer(&PointerEvent::down(6, 6)), PointerRoute::Captured(above));
	assert_eq!(surface.route_pointer(&PointerEvent::down(1, 1)), PointerRoute::Captured(below));
}

#[test]
fn pointer_outside_all_layers_passes_through() {
	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	host.register(Rect::new(0, 0, 4, 4));

	assert_eq!(surface.route_pointer(&PointerEvent::down(10, 10)), PointerRoute::PassThrough);
}

#[test]
fn display_only_layers_never_capture() {
	struct Toast;
	impl crate::HitTarget for Toast {
		fn hit_area(&self) -> Option<Rect> {
			None
		}
	}

	let host = Host::new();
	let surface = Surface::mount(&host).unwrap();
	host.register(Toast);

	assert_eq!(surface.route_pointer(&PointerEvent::down(0, 0)), PointerRoute::PassThrough);
}
