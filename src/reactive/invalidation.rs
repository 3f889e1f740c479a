use std::sync::atomic::{AtomicBool, Ordering};

/// Set by any observed write, cleared by the frame loop.
static FRAME_REQUESTED: AtomicBool = AtomicBool::new(true);

/// Ask the host for another frame. Safe to call from any thread.
pub fn request_frame() {
    FRAME_REQUESTED.store(true, Ordering::Release);
}

/// Returns whether a frame was requested since the last call, clearing the
/// flag. Hosts poll this from their frame callback to skip idle frames.
pub fn take_frame_request() -> bool {
    FRAME_REQUESTED.swap(false, Ordering::AcqRel)
}
