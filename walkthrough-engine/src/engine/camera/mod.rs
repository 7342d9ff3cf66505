//! Walkthrough camera.
//!
//! A single [`CameraRig`](camera_rig::CameraRig) resource drives whichever
//! camera entity the current scene spawned. Pointer orbit in the top view
//! and the exhibit room is handled by [`free_camera`].

/// Camera state machine with per-frame interpolation and free orbit.
pub mod camera_rig;

/// Drag-to-orbit and wheel zoom, before the approach and after the teleport.
pub mod free_camera;

use bevy::prelude::*;

use crate::engine::avatar::{Avatar, AvatarSeated};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::{WalkthroughAction, WalkthroughInput};
use crate::rpc::web_rpc::WebRpcInterface;
use camera_rig::{CameraRig, RigSettings};

/// The camera the rig writes into.
#[derive(Component)]
pub struct WalkthroughCamera;

/// Apply the approach and seated triggers to the rig.
pub fn handle_camera_triggers(
    mut inputs: EventReader<WalkthroughInput>,
    mut seated: EventReader<AvatarSeated>,
    mut rig: ResMut<CameraRig>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let mut changed = false;

    for input in inputs.read() {
        if input.action != WalkthroughAction::BeginApproach {
            continue;
        }
        match rig.begin_approach() {
            Ok(()) => changed = true,
            Err(err) => debug!("{}", err),
        }
    }

    for _ in seated.read() {
        match rig.avatar_seated() {
            Ok(()) => changed = true,
            Err(err) => warn!("{}", err),
        }
    }

    if changed {
        info!("Camera mode: {:?}", rig.mode());
        notify_camera_mode(&rig, &mut rpc_interface);
    }
}

pub fn notify_camera_mode(rig: &CameraRig, rpc_interface: &mut WebRpcInterface) {
    rpc_interface.send_notification(
        "camera_mode_changed",
        serde_json::json!({ "mode": rig.mode() }),
    );
}

/// Interpolate the rig toward its current goal. Runs after the avatar moved.
pub fn update_camera_rig(
    mut rig: ResMut<CameraRig>,
    avatars: Query<&Avatar>,
    config: Res<WalkthroughConfig>,
) {
    let avatar = avatars
        .single()
        .map(|avatar| avatar.0.position())
        .unwrap_or(rig.target());
    rig.tick(avatar, &RigSettings::from(&config.camera));
}

pub fn sync_camera_transform(
    rig: Res<CameraRig>,
    mut cameras: Query<&mut Transform, With<WalkthroughCamera>>,
) {
    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    *transform = Transform::from_translation(rig.position()).looking_at(rig.target(), Vec3::Y);
}
