use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use walkthrough_engine::engine::audio::CueId;
use walkthrough_engine::engine::avatar::path_follower::PathFollower;
use walkthrough_engine::engine::avatar::{Avatar, AvatarSeated, advance_avatar};
use walkthrough_engine::engine::camera::camera_rig::{CameraMode, CameraRig};
use walkthrough_engine::engine::camera::update_camera_rig;
use walkthrough_engine::engine::core::app_setup::{WalkthroughSet, configure_walkthrough_sets};
use walkthrough_engine::engine::core::app_state::SessionState;
use walkthrough_engine::engine::core::config::WalkthroughConfig;
use walkthrough_engine::engine::core::error::WalkthroughError;
use walkthrough_engine::engine::core::scheduler::SceneScope;
use walkthrough_engine::engine::core::session::{
    FatalSessionError, SessionAction, SessionFailure, SessionScheduler, handle_fatal_errors,
};
use walkthrough_engine::engine::scene::catalogue::ExhibitCatalogue;
use walkthrough_engine::engine::scene::exhibit::CertificateCarousel;
use walkthrough_engine::engine::scene::{CatalogueLoader, ExhibitScene, PrimaryScene};
use walkthrough_engine::engine::transition::handoff::perform_hand_off;
use walkthrough_engine::engine::transition::{PortalEffect, TransitionCompleted};
use walkthrough_engine::interaction::router::InteractionRouter;
use walkthrough_engine::rpc::web_rpc::WebRpcInterface;

const CATALOGUE: &str = include_str!("../assets/config/exhibits.catalogue.json");

fn seated_rig() -> CameraRig {
    let mut rig = CameraRig::top_view(Vec3::new(-400.0, 200.0, 150.0), Vec3::ZERO);
    rig.begin_approach().unwrap();
    rig.avatar_seated().unwrap();
    rig
}

/// Headless app running only the hand-off and the fatal error controller.
fn hand_off_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default(), StatesPlugin))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>()
        .init_asset::<Scene>()
        .init_asset::<ExhibitCatalogue>()
        .insert_state(SessionState::Primary)
        .init_resource::<WalkthroughConfig>()
        .init_resource::<SessionScheduler>()
        .init_resource::<WebRpcInterface>()
        .init_resource::<CatalogueLoader>()
        .insert_resource(seated_rig())
        .add_event::<TransitionCompleted>()
        .add_event::<FatalSessionError>()
        .add_systems(Update, (perform_hand_off, handle_fatal_errors).chain());
    app
}

struct PrimaryFixture {
    room: Entity,
    portal: Entity,
}

fn spawn_primary(app: &mut App) -> PrimaryFixture {
    let world = app.world_mut();
    let room = world.spawn((Transform::default(), PrimaryScene)).id();
    let portal = world.spawn((Transform::default(), PortalEffect, PrimaryScene)).id();

    let mut scheduler = world.resource_mut::<SessionScheduler>();
    scheduler.schedule(
        "teleport prompt",
        SceneScope::Primary,
        Duration::from_secs(3),
        SessionAction::ShowTeleportPrompt,
    );
    scheduler.schedule(
        "teleport cue",
        SceneScope::Session,
        Duration::from_millis(1_500),
        SessionAction::PlayCue(CueId::PortalSecond),
    );
    PrimaryFixture { room, portal }
}

fn complete_transition(app: &mut App) {
    app.world_mut().send_event(TransitionCompleted);
    app.update();
    // NextState is applied on the following frame.
    app.update();
}

fn state(app: &App) -> SessionState {
    *app.world().resource::<State<SessionState>>().get()
}

fn count<F: bevy::ecs::query::QueryFilter>(app: &mut App) -> usize {
    let world = app.world_mut();
    world.query_filtered::<(), F>().iter(world).count()
}

#[test]
fn missing_catalogue_keeps_primary_scene_and_fails_session() {
    let mut app = hand_off_app();
    let fixture = spawn_primary(&mut app);

    complete_transition(&mut app);

    assert_eq!(state(&app), SessionState::Failed);
    assert!(app.world().get_entity(fixture.room).is_ok());
    assert!(app.world().get_entity(fixture.portal).is_err());
    assert_eq!(count::<With<ExhibitScene>>(&mut app), 0);
    assert!(app.world().contains_resource::<SessionFailure>());
    assert!(!app.world().contains_resource::<InteractionRouter>());
    assert_eq!(app.world().resource::<SessionScheduler>().pending(), 0);
    assert_eq!(app.world().resource::<CameraRig>().mode(), CameraMode::Sitting);
}

#[test]
fn invalid_catalogue_is_fatal() {
    let mut app = hand_off_app();
    let fixture = spawn_primary(&mut app);

    let mut catalogue: ExhibitCatalogue = serde_json::from_str(CATALOGUE).expect("catalogue parses");
    let duplicate = catalogue.exhibits[0].clone();
    catalogue.exhibits.push(duplicate);
    let handle = app
        .world_mut()
        .resource_mut::<Assets<ExhibitCatalogue>>()
        .add(catalogue);
    app.world_mut().resource_mut::<CatalogueLoader>().handle = handle;

    complete_transition(&mut app);

    assert_eq!(state(&app), SessionState::Failed);
    assert!(app.world().get_entity(fixture.room).is_ok());
    assert!(matches!(
        app.world().resource::<SessionFailure>().0,
        WalkthroughError::SceneConstruction(_)
    ));
}

#[test]
fn valid_catalogue_swaps_scenes_and_cancels_primary_actions() {
    let mut app = hand_off_app();
    let fixture = spawn_primary(&mut app);

    let catalogue: ExhibitCatalogue = serde_json::from_str(CATALOGUE).expect("catalogue parses");
    let handle = app
        .world_mut()
        .resource_mut::<Assets<ExhibitCatalogue>>()
        .add(catalogue);
    app.world_mut().resource_mut::<CatalogueLoader>().handle = handle;

    complete_transition(&mut app);

    assert_eq!(state(&app), SessionState::Exhibit);
    assert!(app.world().get_entity(fixture.room).is_err());
    assert!(app.world().get_entity(fixture.portal).is_err());
    assert_eq!(count::<With<PrimaryScene>>(&mut app), 0);
    assert!(count::<With<ExhibitScene>>(&mut app) > 0);
    assert!(app.world().contains_resource::<InteractionRouter>());
    assert!(app.world().contains_resource::<CertificateCarousel>());
    assert!(!app.world().contains_resource::<SessionFailure>());
    assert_eq!(app.world().resource::<CameraRig>().mode(), CameraMode::Free);

    // Only the session-scoped teleport cue survives the teardown.
    let mut scheduler = app.world_mut().resource_mut::<SessionScheduler>();
    assert_eq!(scheduler.pending(), 1);
    assert_eq!(
        scheduler.tick(Duration::from_secs(10)),
        vec![SessionAction::PlayCue(CueId::PortalSecond)]
    );
}

#[test]
fn camera_reads_the_avatar_position_of_the_same_frame() {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .init_resource::<WalkthroughConfig>()
        .init_resource::<SessionScheduler>()
        .init_resource::<WebRpcInterface>()
        .add_event::<AvatarSeated>();
    configure_walkthrough_sets(&mut app);
    // Registered camera first, so only the set order can put the avatar ahead.
    app.add_systems(Update, update_camera_rig.in_set(WalkthroughSet::Camera))
        .add_systems(Update, advance_avatar.in_set(WalkthroughSet::Avatar));

    let mut rig = CameraRig::top_view(Vec3::new(-400.0, 200.0, 150.0), Vec3::ZERO);
    rig.begin_approach().unwrap();
    app.insert_resource(rig);

    let mut follower = PathFollower::new(vec![Vec3::X * 100.0], Vec3::ZERO, 0.0).unwrap();
    follower.start().unwrap();
    app.world_mut().spawn((Avatar(follower), Transform::default()));

    app.update();

    let config = WalkthroughConfig::default();
    let world = app.world_mut();
    let avatar = world.query::<&Avatar>().single(world).unwrap().0.position();
    assert!((avatar.x - config.avatar.step).abs() < 1e-5);

    let expected = Vec3::ZERO.lerp(avatar, config.camera.smoothing);
    let target = app.world().resource::<CameraRig>().target();
    assert!(target.distance(expected) < 1e-5, "camera lagged a frame: {target}");
}

#[test]
fn recoverable_errors_do_not_end_the_session() {
    let mut app = hand_off_app();
    let fixture = spawn_primary(&mut app);

    app.world_mut()
        .send_event(FatalSessionError(WalkthroughError::UnbalancedDone));
    app.update();
    app.update();

    assert_eq!(state(&app), SessionState::Primary);
    assert!(app.world().get_entity(fixture.room).is_ok());
    assert!(!app.world().contains_resource::<SessionFailure>());
    assert_eq!(app.world().resource::<SessionScheduler>().pending(), 2);
}
