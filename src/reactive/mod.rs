//! Observable values backing the viewport state.
//!
//! A [`SharedValue`] is a publish-on-write cell. [`Subscription`]s and
//! [`Derived`] values record which cells they read and re-run when one of
//! them changes. Writes grouped with [`batch`] are delivered together.

mod derived;
mod effect;
mod invalidation;
mod runtime;
mod shared;

pub use derived::{Derived, create_derived};
pub use effect::{Subscription, subscribe};
pub use invalidation::{request_frame, take_frame_request};
pub use runtime::{batch, untracked};
pub use shared::{ReadValue, SharedValue, create_shared};
