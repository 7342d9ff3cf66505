//! Diagnostics shared by both scenes.

/// FPS notifications for the page and the native FPS text.
pub mod fps_tracking;
