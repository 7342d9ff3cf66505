//! Avatar walk from the street to the sofa.
//!
//! [`PathFollower`](path_follower::PathFollower) is the pure state machine;
//! the systems here feed it the frame tick and copy its pose onto the model.

/// Walk and sit clip playback on the avatar model.
pub mod animation;

/// Waypoint following with smoothed facing and a one-way phase.
pub mod path_follower;

use bevy::prelude::*;

use crate::engine::audio::{CueId, IntroMusic, PlayCue};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::error::WalkthroughError;
use crate::engine::core::scheduler::SceneScope;
use crate::engine::core::session::{
    FatalSessionError, SessionAction, SessionScheduler, WalkthroughAction, WalkthroughInput,
};
use crate::rpc::web_rpc::WebRpcInterface;
use path_follower::{AvatarPhase, FollowEvent, PathFollower, StepSettings};

/// The walking avatar. Only avatar systems write to it.
#[derive(Component, Debug)]
pub struct Avatar(pub PathFollower);

impl Avatar {
    pub fn from_config(config: &WalkthroughConfig) -> Result<Self, WalkthroughError> {
        let avatar = &config.avatar;
        PathFollower::new(
            avatar.waypoints(),
            Vec3::from_array(avatar.start_position),
            avatar.start_facing,
        )
        .map(Self)
    }
}

/// Written once, when the avatar sits down.
#[derive(Event, Debug, Clone, Copy)]
pub struct AvatarSeated {
    pub position: Vec3,
}

pub fn step_settings(config: &WalkthroughConfig) -> StepSettings {
    let avatar = &config.avatar;
    StepSettings {
        step: avatar.step,
        tolerance: avatar.arrive_tolerance,
        turn_smoothing: avatar.turn_smoothing,
        seat: avatar
            .seat_position
            .map(|seat| (Vec3::from_array(seat), avatar.seat_facing)),
    }
}

/// Rebuild the idle avatar's path once the loaded config is in place.
pub fn rebuild_avatar_path(
    config: Res<WalkthroughConfig>,
    mut avatars: Query<(&mut Avatar, &mut Transform)>,
    mut fatal: EventWriter<FatalSessionError>,
) {
    if !config.is_changed() {
        return;
    }
    for (mut avatar, mut transform) in &mut avatars {
        if avatar.0.phase() != AvatarPhase::Idle {
            continue;
        }
        match Avatar::from_config(&config) {
            Ok(rebuilt) => {
                *avatar = rebuilt;
                transform.translation = avatar.0.position();
                transform.rotation = Quat::from_rotation_y(avatar.0.facing());
            }
            Err(err) => {
                fatal.write(FatalSessionError(err));
            }
        }
    }
}

/// Start the walk on the first `BeginApproach`.
///
/// A successful start also stops the intro music, plays the click cue and
/// schedules the approach cues.
pub fn begin_avatar_walk(
    mut commands: Commands,
    mut inputs: EventReader<WalkthroughInput>,
    mut avatars: Query<&mut Avatar>,
    music: Query<Entity, With<IntroMusic>>,
    config: Res<WalkthroughConfig>,
    mut scheduler: ResMut<SessionScheduler>,
    mut cues: EventWriter<PlayCue>,
) {
    for input in inputs.read() {
        if input.action != WalkthroughAction::BeginApproach {
            continue;
        }
        let Ok(mut avatar) = avatars.single_mut() else {
            continue;
        };

        match avatar.0.start() {
            Ok(()) => {
                info!("Approach started via {:?}", input.source);
                for entity in &music {
                    commands.entity(entity).despawn();
                }
                cues.write(PlayCue(CueId::Click));
                for cue in &config.approach.cues {
                    scheduler.schedule(
                        "approach cue",
                        SceneScope::Primary,
                        cue.delay(),
                        SessionAction::PlayCue(cue.cue),
                    );
                }
            }
            Err(err) => debug!("{}", err),
        }
    }
}

/// Advance the walking avatar one step and mirror its pose onto the model.
pub fn advance_avatar(
    mut avatars: Query<(&mut Avatar, &mut Transform)>,
    config: Res<WalkthroughConfig>,
    mut scheduler: ResMut<SessionScheduler>,
    mut seated: EventWriter<AvatarSeated>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    let settings = step_settings(&config);

    for (mut avatar, mut transform) in &mut avatars {
        if avatar.0.phase() != AvatarPhase::Walking {
            continue;
        }

        let event = avatar.0.tick(&settings);
        transform.translation = avatar.0.position();
        transform.rotation = Quat::from_rotation_y(avatar.0.facing());

        match event {
            None => {}
            Some(FollowEvent::Reached(index)) => debug!("Avatar reached waypoint {}", index),
            Some(FollowEvent::Seated) => {
                info!("Avatar seated");
                seated.write(AvatarSeated {
                    position: avatar.0.position(),
                });
                scheduler.schedule(
                    "teleport prompt",
                    SceneScope::Primary,
                    config.avatar.sit_prompt_delay(),
                    SessionAction::ShowTeleportPrompt,
                );
                rpc_interface.send_notification(
                    "avatar_seated",
                    serde_json::json!({ "position": avatar.0.position().to_array() }),
                );
            }
        }
    }
}
