//! Session lifecycle, configuration and the shared scheduler.
//!
//! Handles application setup, the session state machine, timed actions,
//! errors and window configuration for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Creates the app with the asset loaders, the RPC bridge, and the
/// state-gated walkthrough systems in their per-frame order.
pub mod app_setup;

/// Session state machine, config application and loading transitions.
pub mod app_state;

/// Tunable values loaded from the `*.walkthrough.json` asset.
pub mod config;

/// Controller error type and its fatal/recoverable classification.
pub mod error;

/// Named, scoped, cancellable delayed actions.
pub mod scheduler;

/// Session scheduler resource, user intents and the fatal error path.
pub mod session;

/// Platform-specific window configuration for native and WASM builds.
///
/// Configures canvas integration for web targets and vsync settings.
pub mod window_config;
