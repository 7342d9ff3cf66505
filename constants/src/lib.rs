//! Tunable defaults for the walkthrough controller.
//!
//! Every value here can be overridden by the `walkthrough.json` config asset;
//! these are the values used when it is missing or fails to load.

pub mod approach;
pub mod avatar;
pub mod camera;
pub mod interaction;
pub mod paths;
pub mod transition;
