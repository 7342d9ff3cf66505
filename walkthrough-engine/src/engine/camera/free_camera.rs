use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use super::camera_rig::{CameraRig, RigSettings};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::ui::info_panel::InfoPanelRoot;

/// Left drag orbits, the wheel zooms. Drag is ignored while the pointer is
/// over the info panel so its links and close button stay usable.
pub fn free_camera_controller(
    mut rig: ResMut<CameraRig>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    panels: Query<&Interaction, With<InfoPanelRoot>>,
    config: Res<WalkthroughConfig>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    let over_panel = panels
        .iter()
        .any(|interaction| *interaction != Interaction::None);
    let drag = if mouse_button.pressed(MouseButton::Left) && !over_panel {
        mouse_delta
    } else {
        Vec2::ZERO
    };

    if drag == Vec2::ZERO && scroll_accum.abs() <= f32::EPSILON {
        return;
    }
    rig.manipulate(drag, scroll_accum, &RigSettings::from(&config.camera));
}
