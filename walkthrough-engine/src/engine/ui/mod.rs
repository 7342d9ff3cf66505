//! Native bevy_ui overlays.
//!
//! Overlay entities are only spawned on native builds; in the browser the
//! host page draws its own UI from the RPC notifications. The update systems
//! run on both targets and simply find nothing to update on wasm, except for
//! the notifications they send.

/// Exhibit info panel with placement and close button.
pub mod info_panel;

/// Loading, prompts, teleport flash, instructions and error screens.
pub mod overlays;

use bevy::prelude::*;

pub(crate) const PANEL_BACKGROUND: Color = Color::srgba(0.05, 0.05, 0.08, 0.85);
pub(crate) const ACCENT: Color = Color::srgb(0.0, 0.97, 1.0);

pub(crate) fn label(text: impl Into<String>, size: f32, color: Color) -> (Text, TextFont, TextColor) {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}
