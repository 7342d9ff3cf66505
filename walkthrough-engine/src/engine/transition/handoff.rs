use bevy::prelude::*;

use super::{PortalEffect, TransitionCompleted};
use crate::engine::camera::camera_rig::CameraRig;
use crate::engine::camera::notify_camera_mode;
use crate::engine::core::app_state::SessionState;
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::scheduler::SceneScope;
use crate::engine::core::session::{FatalSessionError, SessionScheduler};
use crate::engine::scene::catalogue::{ExhibitCatalogue, ExhibitLayout};
use crate::engine::scene::exhibit::spawn_exhibit_scene;
use crate::engine::scene::{CatalogueLoader, PrimaryScene, despawn_scene};
use crate::interaction::info::InfoPanel;
use crate::interaction::router::InteractionRouter;
use crate::rpc::web_rpc::WebRpcInterface;

/// Swap the primary scene for the exhibit room.
///
/// The layout is validated before anything is torn down, so a broken
/// catalogue leaves the living room on screen behind the error overlay.
pub fn perform_hand_off(
    mut commands: Commands,
    mut completed: EventReader<TransitionCompleted>,
    loader: Res<CatalogueLoader>,
    catalogues: Res<Assets<ExhibitCatalogue>>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<WalkthroughConfig>,
    mut scheduler: ResMut<SessionScheduler>,
    mut rig: ResMut<CameraRig>,
    primary_roots: Query<Entity, With<PrimaryScene>>,
    portals: Query<Entity, With<PortalEffect>>,
    mut next_state: ResMut<NextState<SessionState>>,
    mut fatal: EventWriter<FatalSessionError>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    if completed.read().last().is_none() {
        return;
    }

    let layout = match ExhibitLayout::build(catalogues.get(&loader.handle)) {
        Ok(layout) => layout,
        Err(err) => {
            for entity in &portals {
                commands.entity(entity).despawn();
            }
            fatal.write(FatalSessionError(err));
            return;
        }
    };

    scheduler.cancel_scope(SceneScope::Primary);
    despawn_scene(&mut commands, &primary_roots);

    let camera = &config.camera;
    let position = Vec3::from_array(camera.exhibit_position);
    let target = Vec3::from_array(camera.exhibit_target);
    let (certificates, loads) = spawn_exhibit_scene(
        &mut commands,
        &asset_server,
        &mut meshes,
        &mut materials,
        &layout,
        position,
        target,
    );

    match rig.hand_off(position, target) {
        Ok(()) => notify_camera_mode(&rig, &mut rpc_interface),
        Err(err) => warn!("{}", err),
    }

    commands.insert_resource(InteractionRouter::default());
    commands.insert_resource(InfoPanel::default());
    commands.insert_resource(certificates);
    commands.insert_resource(loads);

    info!(
        "Exhibit room spawned ({} exhibits, {} certificates, {} session actions pending)",
        layout.exhibits.len(),
        layout.screen.images.len(),
        scheduler.pending()
    );
    println!("→ Transitioning to Exhibit state");
    next_state.set(SessionState::Exhibit);
}
