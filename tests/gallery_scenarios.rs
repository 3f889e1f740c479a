use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use zoom_gallery::prelude::*;

const FRAME: Duration = Duration::from_micros(16_667);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn measured_gallery(count: usize) -> Gallery<&'static str> {
    let items = ["first", "second", "third", "fourth"];
    let mut gallery = Gallery::new(items[..count].to_vec());
    gallery.set_root_size(SizeVector::new(400.0, 800.0));
    gallery.set_root_child_size(SizeVector::new(1200.0, 800.0));
    gallery
}

/// Horizontal spans of the drawn items must leave no gap in the viewport.
fn assert_covers_viewport(frame: &ResolvedFrame, width: f32) {
    let mut spans: Vec<(f32, f32)> = frame
        .visible()
        .map(|t| (t.offset_x, t.offset_x + t.width))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut covered = 0.0_f32;
    for (start, end) in spans {
        if start > covered + 1e-3 {
            break;
        }
        covered = covered.max(end);
    }
    assert!(
        covered >= width - 1e-3,
        "viewport covered only up to {}: {:?}",
        covered,
        frame
    );
}

fn run_until_idle<T>(gallery: &mut Gallery<T>) {
    for _ in 0..1000 {
        if !gallery.tick(FRAME) {
            return;
        }
    }
    panic!("gallery kept animating");
}

#[test]
fn pinch_zoom_and_back() {
    init_logging();
    let mut gallery = measured_gallery(3);
    gallery.scroll_to_index(1);
    run_until_idle(&mut gallery);
    let center = Vector2::new(200.0, 400.0);

    assert!(gallery
        .handle_pinch(PinchEvent::Began { focal: center })
        .is_accepted());
    gallery.handle_pinch(PinchEvent::Changed {
        scale: 2.0,
        focal: center,
    });

    let state = gallery.viewport().snapshot();
    assert_eq!(state.scale, 2.0);
    assert!(state.has_zoomed);
    assert_eq!(state.overflow, Overflow::Visible);
    assert!(state.hide_adjacent_items);
    let frame = gallery.frame();
    assert!(frame.previous.is_none());
    assert!(frame.next.is_none());
    assert!(!frame.active.unwrap().clip);

    gallery.handle_pinch(PinchEvent::Changed {
        scale: 1.0,
        focal: center,
    });
    gallery.handle_pinch(PinchEvent::Ended);
    run_until_idle(&mut gallery);

    let state = gallery.viewport().snapshot();
    assert_eq!(state.scale, 1.0);
    assert_eq!(state.translate, Vector2::ZERO);
    assert!(!state.has_zoomed);
    assert_eq!(state.overflow, Overflow::Hidden);
    assert!(!state.hide_adjacent_items);
    let frame = gallery.frame();
    assert!(frame.previous.is_some());
    assert!(frame.next.is_some());
}

#[test]
fn swipe_to_next_item() {
    init_logging();
    let mut gallery = measured_gallery(3);
    let changes = Rc::new(RefCell::new(Vec::new()));
    let _on_change = gallery.on_index_change({
        let changes = changes.clone();
        move |index| changes.borrow_mut().push(index)
    });

    gallery.handle_pan(PanEvent::Began {
        position: Vector2::new(380.0, 400.0),
    });
    gallery.handle_pan(PanEvent::Changed {
        translation: Vector2::new(-360.0, 0.0),
        velocity: Vector2::new(-900.0, 0.0),
    });
    assert!((gallery.viewport().scroll() - 0.9).abs() < 1e-5);
    assert!(gallery.viewport().is_scrolling());

    gallery.handle_pan(PanEvent::Ended {
        velocity: Vector2::new(-900.0, 0.0),
    });
    assert_eq!(gallery.active_index(), 1);
    run_until_idle(&mut gallery);

    let state = gallery.viewport().snapshot();
    assert_eq!(state.active_index, 1);
    assert_eq!(state.scroll, 1.0);
    assert_eq!(state.scroll_offset, 0.0);
    assert!(!state.is_scrolling);
    assert_eq!(*changes.borrow(), vec![1]);
}

#[test]
fn long_drag_keeps_viewport_covered() {
    init_logging();
    let mut gallery = measured_gallery(3);
    gallery.handle_pan(PanEvent::Began {
        position: Vector2::new(380.0, 400.0),
    });
    gallery.handle_pan(PanEvent::Changed {
        translation: Vector2::new(-720.0, 0.0),
        velocity: Vector2::new(-900.0, 0.0),
    });
    // One item per swipe
    assert_eq!(gallery.viewport().scroll(), 1.0);
    assert_covers_viewport(&gallery.frame(), 400.0);

    gallery.handle_pan(PanEvent::Ended {
        velocity: Vector2::new(-900.0, 0.0),
    });
    run_until_idle(&mut gallery);
    assert_eq!(gallery.active_index(), 1);
}

#[test]
fn scroll_across_several_items_keeps_viewport_covered() {
    init_logging();
    let mut gallery = measured_gallery(4);
    gallery.scroll_to_index(3);
    let mut frames = 0;
    while gallery.tick(FRAME) {
        assert_covers_viewport(&gallery.frame(), 400.0);
        frames += 1;
        assert!(frames < 1000, "snap never landed");
    }
    assert_eq!(gallery.viewport().scroll(), 3.0);
    assert!(gallery.frame().passing.is_empty());
}

#[test]
fn swipe_is_rejected_while_zoomed() {
    init_logging();
    let mut gallery = measured_gallery(3);
    gallery.handle_double_tap(Vector2::new(200.0, 400.0));
    run_until_idle(&mut gallery);
    assert!(gallery.viewport().has_zoomed());

    // A drag now pans the item instead of swiping
    gallery.handle_pan(PanEvent::Began {
        position: Vector2::ZERO,
    });
    assert_eq!(gallery.gesture_in_flight(), Some(GestureKind::Pan));
    gallery.handle_pan(PanEvent::Changed {
        translation: Vector2::new(-1640.0, 0.0),
        velocity: Vector2::ZERO,
    });
    assert_eq!(gallery.viewport().scroll(), 0.0);
    assert_eq!(gallery.viewport().translate().x, -1640.0);

    // Released past the edge: settles back inside
    gallery.handle_pan(PanEvent::Ended {
        velocity: Vector2::ZERO,
    });
    assert!(gallery.is_animating());
    run_until_idle(&mut gallery);
    assert_eq!(gallery.viewport().translate().x, -1600.0);
    let frame = gallery.frame();
    let active = frame.active.unwrap();
    assert!(active.offset_x <= 0.0);
    assert!(active.offset_x + active.width >= 400.0 - 1e-3);
}

#[test]
fn frame_requests_follow_changes() {
    init_logging();
    let mut gallery = measured_gallery(2);
    gallery.handle_double_tap(Vector2::new(200.0, 400.0));
    gallery.tick(FRAME);
    assert!(take_frame_request());
    assert!(gallery.is_animating());
}

#[test]
fn instances_cover_visible_items() {
    let gallery = measured_gallery(3);
    let instances = gallery.frame().instances();
    assert_eq!(instances.len(), 2);
    assert_eq!(instances[0].index, 1);
    assert_eq!(instances[1].index, 0);
    assert_eq!(instances[0].rect, [400.0, 0.0, 400.0, 800.0]);
}

#[test]
fn reader_snapshot_on_another_thread() {
    let mut gallery = measured_gallery(3);
    gallery.scroll_to_index(2);
    run_until_idle(&mut gallery);
    let reader = gallery.reader();
    let index = std::thread::spawn(move || reader.snapshot().active_index)
        .join()
        .unwrap();
    assert_eq!(index, 2);
}
