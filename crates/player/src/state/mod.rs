//! Client-side state owned by the session runtime
//!
//! - `SessionStore`: the latest authoritative session snapshot
//! - `RollOverlay`: the transient roll-event display machine

mod roll_overlay;
mod session_store;

pub use roll_overlay::{RollOverlay, DISMISS_AFTER, REVEAL_AFTER};
pub use session_store::SessionStore;
