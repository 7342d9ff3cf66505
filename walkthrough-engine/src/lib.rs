//! Interactive two-room walkthrough: an avatar walks into a living room, sits
//! down and teleports into an explorable exhibit room.

pub mod engine;
pub mod interaction;
pub mod rpc;

pub use engine::core::app_setup::create_app;
