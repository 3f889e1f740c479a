//! Drives a gallery with a scripted gesture sequence and prints what a host
//! would draw each frame.
//!
//! This example shows:
//! - Feeding recognizer events into the gallery
//! - Stepping animations with a fixed frame delta
//! - Drawing through `render` and reacting to index changes
//!
//! Run with `RUST_LOG=debug` to see gesture decisions.

use std::time::Duration;

use zoom_gallery::prelude::*;

const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Debug)]
struct Photo {
    name: &'static str,
    width: f32,
    height: f32,
}

fn draw(gallery: &Gallery<Photo>, label: &str) {
    let lines = gallery.render(|photo, t| {
        format!(
            "  {:<8} at ({:>8.1}, {:>8.1}) size {:>7.1} x {:>7.1} scale {:.2}{}",
            photo.name,
            t.offset_x,
            t.offset_y,
            t.width,
            t.height,
            t.scale,
            if t.clip { "" } else { " (unclipped)" }
        )
    });
    println!("{}:", label);
    for line in lines {
        println!("{}", line);
    }
}

fn run_frames(gallery: &mut Gallery<Photo>) -> usize {
    let mut frames = 0;
    while gallery.tick(FRAME) {
        frames += 1;
    }
    frames
}

/// Active item's natural size, as a host reports it once the image loads.
fn measure_active(gallery: &mut Gallery<Photo>) {
    let index = gallery.active_index();
    let size = gallery
        .items()
        .get(index)
        .map(|photo| SizeVector::new(photo.width, photo.height))
        .unwrap_or(SizeVector::ZERO);
    gallery.set_root_child_size(size);
}

fn main() {
    env_logger::init();

    let photos = vec![
        Photo {
            name: "harbor",
            width: 3000.0,
            height: 2000.0,
        },
        Photo {
            name: "tower",
            width: 1000.0,
            height: 3000.0,
        },
        Photo {
            name: "field",
            width: 2000.0,
            height: 2000.0,
        },
    ];

    let config = GalleryConfig::default()
        .item_spacing(16.0)
        .double_tap_scale(2.5);
    let mut gallery = Gallery::with_config(photos, config);
    gallery.set_root_size(SizeVector::new(390.0, 844.0));
    measure_active(&mut gallery);

    let _on_change = gallery.on_index_change(|index| println!("-> now showing item {}", index));
    draw(&gallery, "initial");

    // Pinch out around a point right of center, then let go
    let focal = Vector2::new(260.0, 420.0);
    gallery.handle_pinch(PinchEvent::Began { focal });
    for step in 1..=10 {
        let scale = 1.0 + step as f32 * 0.15;
        gallery.handle_pinch(PinchEvent::Changed { scale, focal });
    }
    gallery.handle_pinch(PinchEvent::Ended);
    let frames = run_frames(&mut gallery);
    draw(&gallery, &format!("after pinch ({} settle frames)", frames));

    // Swiping is off while zoomed
    let response = gallery.handle_pan(PanEvent::Began {
        position: Vector2::ZERO,
    });
    println!("drag while zoomed: {:?} as {:?}", response, gallery.gesture_in_flight());
    gallery.handle_pan(PanEvent::Cancelled);
    run_frames(&mut gallery);

    // Double tap goes back to rest
    gallery.handle_double_tap(focal);
    run_frames(&mut gallery);
    draw(&gallery, "after double tap");

    // Fling to the next photo
    gallery.handle_pan(PanEvent::Began {
        position: Vector2::new(350.0, 400.0),
    });
    for step in 1..=6 {
        gallery.handle_pan(PanEvent::Changed {
            translation: Vector2::new(-20.0 * step as f32, 0.0),
            velocity: Vector2::new(-1200.0, 0.0),
        });
    }
    gallery.handle_pan(PanEvent::Ended {
        velocity: Vector2::new(-1200.0, 0.0),
    });
    let frames = run_frames(&mut gallery);
    measure_active(&mut gallery);
    draw(&gallery, &format!("after fling ({} snap frames)", frames));

    gallery.scroll_to_index(2);
    run_frames(&mut gallery);
    measure_active(&mut gallery);
    draw(&gallery, "after scroll_to_index(2)");

    let bytes: usize = gallery.frame().instances().len() * std::mem::size_of::<TransformInstance>();
    println!("instance buffer: {} bytes", bytes);
}
