//! Teleport from the living room into the exhibit room.
//!
//! The prompt arms after the avatar sits. A trigger then runs the portal
//! effect to completion and [`handoff`] swaps the scenes.

/// Scene swap once the portal effect completes.
pub mod handoff;

/// Progress and intensity of the portal effect.
pub mod orchestrator;

use bevy::prelude::*;

use crate::engine::audio::{CueId, PlayCue};
use crate::engine::avatar::Avatar;
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::scheduler::SceneScope;
use crate::engine::core::session::{
    SessionAction, SessionActionFired, SessionScheduler, WalkthroughAction, WalkthroughInput,
};
use crate::engine::scene::PrimaryScene;
use crate::rpc::web_rpc::WebRpcInterface;
use orchestrator::{Transition, TransitionPhase};

/// Whether the "press any key" prompt is up. Triggers are only accepted while armed.
#[derive(Resource, Debug, Default)]
pub struct TeleportPrompt {
    armed: bool,
}

impl TeleportPrompt {
    pub fn armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self) {
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

/// Written on the frame the portal effect reaches full progress.
#[derive(Event, Debug, Clone, Copy)]
pub struct TransitionCompleted;

/// The growing portal sphere around the avatar.
#[derive(Component)]
pub struct PortalEffect;

pub fn arm_teleport_prompt(
    mut fired: EventReader<SessionActionFired>,
    mut prompt: ResMut<TeleportPrompt>,
    transition: Res<Transition>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for SessionActionFired(action) in fired.read() {
        if *action != SessionAction::ShowTeleportPrompt {
            continue;
        }
        if transition.phase() != TransitionPhase::Idle {
            continue;
        }
        prompt.arm();
        info!("Teleport prompt armed");
        rpc_interface.send_notification("teleport_prompt", serde_json::json!({ "visible": true }));
    }
}

/// Start the teleport once the prompt is up.
pub fn handle_transition_trigger(
    mut commands: Commands,
    mut inputs: EventReader<WalkthroughInput>,
    mut prompt: ResMut<TeleportPrompt>,
    mut transition: ResMut<Transition>,
    mut scheduler: ResMut<SessionScheduler>,
    mut cues: EventWriter<PlayCue>,
    avatars: Query<&Avatar>,
    config: Res<WalkthroughConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for input in inputs.read() {
        if input.action != WalkthroughAction::TriggerTransition {
            continue;
        }
        if !prompt.armed() {
            debug!("Teleport trigger via {:?} ignored, prompt not shown", input.source);
            continue;
        }
        if let Err(err) = transition.trigger() {
            debug!("{}", err);
            continue;
        }

        info!("Teleport triggered via {:?}", input.source);
        prompt.disarm();
        rpc_interface.send_notification("teleport_prompt", serde_json::json!({ "visible": false }));

        cues.write(PlayCue(CueId::Click));
        for cue in &config.transition.cues {
            scheduler.schedule(
                "teleport cue",
                SceneScope::Session,
                cue.delay(),
                SessionAction::PlayCue(cue.cue),
            );
        }

        let origin = avatars
            .single()
            .map(|avatar| avatar.0.position())
            .unwrap_or_default();
        let scale = transition.effect_scale(&config.transition);
        commands.spawn((
            Mesh3d(meshes.add(Sphere::new(1.0).mesh().uv(32, 32))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgba(0.0, 0.97, 1.0, 0.0),
                emissive: LinearRgba::BLACK,
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(origin).with_scale(Vec3::splat(scale)),
            PortalEffect,
            PrimaryScene,
        ));
    }
}

/// Advance the running teleport and drive the portal sphere from it.
pub fn advance_transition(
    mut transition: ResMut<Transition>,
    config: Res<WalkthroughConfig>,
    mut effects: Query<(&mut Transform, &MeshMaterial3d<StandardMaterial>), With<PortalEffect>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut completed: EventWriter<TransitionCompleted>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if transition.phase() != TransitionPhase::Running {
        return;
    }

    let finished = transition.tick(&config.transition);
    let scale = transition.effect_scale(&config.transition);
    let intensity = transition.portal_intensity();

    for (mut transform, material) in &mut effects {
        transform.scale = Vec3::splat(scale);
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color.set_alpha(intensity * 0.6);
            material.emissive = LinearRgba::rgb(0.0, 0.97, 1.0) * (intensity * 4.0);
        }
    }

    rpc_interface.send_notification(
        "transition_progress",
        serde_json::json!({
            "progress": transition.progress(),
            "intensity": intensity,
        }),
    );

    if finished {
        info!("Teleport effect complete");
        completed.write(TransitionCompleted);
    }
}
