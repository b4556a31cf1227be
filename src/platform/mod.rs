//! Platform abstraction layer
//!
//! Reduces device input to the engine's command surface:
//! - `input`: commands, key bindings, hold-repeat timers, swipe recognition
//! - `autopilot`: scripted player for demos

pub mod autopilot;
pub mod input;

pub use autopilot::Autopilot;
pub use input::{
    Command, HoldRepeat, SwipeTracker, TapGuard, command_for_key, dispatch, dispatch_with_cues,
};
