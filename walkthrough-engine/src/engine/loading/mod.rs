//! Load progress tracking for both scenes.
//!
//! Each scene owns a one-shot tracker: resources are registered as they are
//! requested and the asset server's load states are polled into it until the
//! ready signal fires.

/// One-shot start/done aggregation into a percentage.
pub mod progress;

/// Asset server polling and the progress/ready events.
pub mod tracked_loads;
