use bevy::prelude::*;
use constants::paths;

use super::Avatar;
use super::path_follower::AvatarPhase;
use crate::engine::loading::tracked_loads::TrackedLoads;

/// Animation graph shared by the avatar's walk and sit clips.
#[derive(Resource)]
pub struct AvatarAnimations {
    graph: Handle<AnimationGraph>,
    walk: AnimationNodeIndex,
    sit: AnimationNodeIndex,
}

impl AvatarAnimations {
    pub fn load(
        asset_server: &AssetServer,
        graphs: &mut Assets<AnimationGraph>,
        loads: &mut TrackedLoads,
    ) -> Self {
        let walk_clip: Handle<AnimationClip> =
            asset_server.load(GltfAssetLabel::Animation(0).from_asset(paths::WALK_CLIP_PATH));
        let sit_clip: Handle<AnimationClip> =
            asset_server.load(GltfAssetLabel::Animation(0).from_asset(paths::SIT_CLIP_PATH));
        loads.track("walk clip", &walk_clip);
        loads.track("sit clip", &sit_clip);

        let (graph, nodes) = AnimationGraph::from_clips([walk_clip, sit_clip]);
        Self {
            graph: graphs.add(graph),
            walk: nodes[0],
            sit: nodes[1],
        }
    }
}

/// Links the avatar to the animation player inside its glTF scene.
#[derive(Component)]
pub struct AvatarRig {
    player: Entity,
    applied: AvatarPhase,
}

/// glTF players appear a few frames after the scene spawns. Find the one
/// under the avatar and give it the clip graph.
pub fn attach_avatar_animations(
    mut commands: Commands,
    animations: Option<Res<AvatarAnimations>>,
    players: Query<Entity, Added<AnimationPlayer>>,
    parents: Query<&ChildOf>,
    avatars: Query<(), With<Avatar>>,
) {
    let Some(animations) = animations else {
        return;
    };

    for player in &players {
        let mut current = player;
        let avatar = loop {
            if avatars.contains(current) {
                break Some(current);
            }
            match parents.get(current) {
                Ok(child_of) => current = child_of.parent(),
                Err(_) => break None,
            }
        };

        if let Some(avatar) = avatar {
            commands
                .entity(player)
                .insert(AnimationGraphHandle(animations.graph.clone()));
            commands.entity(avatar).insert(AvatarRig {
                player,
                applied: AvatarPhase::Idle,
            });
            debug!("Avatar animation player attached");
        }
    }
}

/// Loop the walk clip while walking, then play the sit clip once.
pub fn drive_avatar_animation(
    mut avatars: Query<(&Avatar, &mut AvatarRig)>,
    mut players: Query<&mut AnimationPlayer>,
    animations: Option<Res<AvatarAnimations>>,
) {
    let Some(animations) = animations else {
        return;
    };

    for (avatar, mut rig) in &mut avatars {
        let phase = avatar.0.phase();
        if phase == rig.applied {
            continue;
        }
        let Ok(mut player) = players.get_mut(rig.player) else {
            continue;
        };

        match phase {
            AvatarPhase::Idle => {}
            AvatarPhase::Walking => {
                player.play(animations.walk).repeat();
            }
            AvatarPhase::Sitting => {
                // Sit clip holds its last frame.
                player.stop(animations.walk);
                player.play(animations.sit);
            }
        }
        rig.applied = phase;
    }
}
