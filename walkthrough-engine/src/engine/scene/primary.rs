use bevy::prelude::*;
use constants::paths;

use super::{CatalogueLoader, PrimaryScene};
use crate::engine::audio::CueLibrary;
use crate::engine::avatar::Avatar;
use crate::engine::avatar::animation::AvatarAnimations;
use crate::engine::camera::WalkthroughCamera;
use crate::engine::camera::camera_rig::{CameraMode, CameraRig};
use crate::engine::core::app_state::ConfigLoader;
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::FatalSessionError;
use crate::engine::loading::tracked_loads::{SceneKind, TrackedLoads};
use crate::engine::transition::TeleportPrompt;
use crate::engine::transition::orchestrator::Transition;

/// Focus of the seated camera: the living room TV.
const TV_POSITION: Vec3 = Vec3::new(0.0, 19.0, -49.8);
const TV_SIZE: Vec3 = Vec3::new(35.0, 19.0, 0.5);

/// Kick off every primary load and spawn the street scene.
///
/// Runs with the built-in config; the loaded file replaces it before the
/// user can interact.
pub fn setup_primary_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<WalkthroughConfig>,
) {
    let mut loads = TrackedLoads::new(SceneKind::Primary);

    let config_handle: Handle<WalkthroughConfig> = asset_server.load(paths::CONFIG_PATH);
    loads.track("walkthrough config", &config_handle);
    commands.insert_resource(ConfigLoader {
        handle: config_handle,
        applied: false,
    });

    let catalogue = asset_server.load(paths::CATALOGUE_PATH);
    loads.track("exhibit catalogue", &catalogue);
    commands.insert_resource(CatalogueLoader { handle: catalogue });

    commands.insert_resource(CueLibrary::load(&asset_server, &mut loads));
    commands.insert_resource(AvatarAnimations::load(
        &asset_server,
        &mut graphs,
        &mut loads,
    ));

    let room = asset_server.load(GltfAssetLabel::Scene(0).from_asset(paths::LIVING_ROOM_PATH));
    loads.track("living room", &room);
    commands.spawn((SceneRoot(room), Transform::default(), PrimaryScene));

    commands.spawn((
        Mesh3d(meshes.add(Cuboid::from_size(TV_SIZE))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb_u8(0x22, 0x22, 0x22),
            ..default()
        })),
        Transform::from_translation(TV_POSITION),
        PrimaryScene,
    ));

    let avatar_model =
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(paths::AVATAR_MODEL_PATH));
    loads.track("avatar", &avatar_model);
    match Avatar::from_config(&config) {
        Ok(avatar) => {
            let transform = Transform::from_translation(avatar.0.position())
                .with_rotation(Quat::from_rotation_y(avatar.0.facing()))
                .with_scale(Vec3::splat(config.avatar.scale));
            commands.spawn((SceneRoot(avatar_model), transform, avatar, PrimaryScene));
        }
        Err(err) => {
            commands.send_event(FatalSessionError(err));
        }
    }

    let camera = &config.camera;
    let rig = CameraRig::top_view(
        Vec3::from_array(camera.top_view_position),
        Vec3::from_array(camera.top_view_target),
    );
    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(rig.position()).looking_at(rig.target(), Vec3::Y),
        WalkthroughCamera,
        PrimaryScene,
    ));
    commands.insert_resource(rig);

    spawn_lighting(&mut commands);

    commands.insert_resource(Transition::default());
    commands.insert_resource(TeleportPrompt::default());
    commands.insert_resource(loads);
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
        PrimaryScene,
    ));
}

/// Re-frame the top view once the loaded config is in place.
pub fn reframe_top_view(config: Res<WalkthroughConfig>, mut rig: ResMut<CameraRig>) {
    if !config.is_changed() || rig.mode() != CameraMode::TopView {
        return;
    }
    let camera = &config.camera;
    *rig = CameraRig::top_view(
        Vec3::from_array(camera.top_view_position),
        Vec3::from_array(camera.top_view_target),
    );
}
