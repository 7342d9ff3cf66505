use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

use crate::engine::audio::{PlayCue, play_cues, play_intro_music};
use crate::engine::avatar::animation::{attach_avatar_animations, drive_avatar_animation};
use crate::engine::avatar::{AvatarSeated, advance_avatar, begin_avatar_walk, rebuild_avatar_path};
use crate::engine::camera::free_camera::free_camera_controller;
use crate::engine::camera::{handle_camera_triggers, sync_camera_transform, update_camera_rig};
use crate::engine::core::app_state::{
    SessionState, apply_loaded_config, in_walkthrough, transition_to_primary,
    update_loading_frontend,
};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::{
    FatalSessionError, SessionActionFired, SessionScheduler, WalkthroughInput,
    handle_fatal_errors, keyboard_input_system, run_session_scheduler,
};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::tracked_loads::{LoadProgressed, LoadingReady, poll_tracked_loads};
use crate::engine::scene::catalogue::ExhibitCatalogue;
use crate::engine::scene::effects::{animate_click_pulses, animate_emissive_pulses, animate_floating};
use crate::engine::scene::exhibit::{
    ScreenImageChanged, advance_certificates, schedule_instructions, update_certificate_screen,
};
use crate::engine::scene::primary::{reframe_top_view, setup_primary_scene};
use crate::engine::systems::fps_tracking::{
    FpsReport, fps_notification_system, fps_text_update_system,
};
use crate::engine::transition::handoff::perform_hand_off;
use crate::engine::transition::{
    TransitionCompleted, advance_transition, arm_teleport_prompt, handle_transition_trigger,
};
use crate::engine::ui::info_panel::{handle_close_button, sync_info_panel};
use crate::engine::ui::overlays::{
    show_error_overlay, show_exhibit_loading, toggle_instructions, update_exhibit_loading,
    update_primary_loading, update_system_message, update_teleport_flash, update_teleport_prompt,
};
use crate::interaction::InfoPanelEvent;
use crate::interaction::pointer::{
    handle_dismiss_requests, handle_pointer_clicks, handle_pointer_hover,
};
use crate::rpc::web_rpc::WebRpcPlugin;

/// Per-frame order of the walkthrough controllers.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum WalkthroughSet {
    Input,
    Avatar,
    Camera,
    Transition,
    Interaction,
    Presentation,
}

/// Chain the controller sets. The avatar moves before the camera reads it.
pub fn configure_walkthrough_sets(app: &mut App) {
    app.configure_sets(
        Update,
        (
            WalkthroughSet::Input,
            WalkthroughSet::Avatar,
            WalkthroughSet::Camera,
            WalkthroughSet::Transition,
            WalkthroughSet::Interaction,
            WalkthroughSet::Presentation,
        )
            .chain(),
    );
}

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(JsonAssetPlugin::<WalkthroughConfig>::new(&["walkthrough.json"]))
        .add_plugins(JsonAssetPlugin::<ExhibitCatalogue>::new(&["catalogue.json"]))
        .add_plugins(WebRpcPlugin)
        .init_state::<SessionState>()
        .init_resource::<WalkthroughConfig>()
        .init_resource::<SessionScheduler>()
        .init_resource::<FpsReport>()
        .add_event::<WalkthroughInput>()
        .add_event::<SessionActionFired>()
        .add_event::<FatalSessionError>()
        .add_event::<PlayCue>()
        .add_event::<LoadProgressed>()
        .add_event::<LoadingReady>()
        .add_event::<AvatarSeated>()
        .add_event::<TransitionCompleted>()
        .add_event::<ScreenImageChanged>()
        .add_event::<InfoPanelEvent>();
    configure_walkthrough_sets(&mut app);
    app.add_systems(Startup, setup_primary_scene);

    // Overlays are drawn by the host page on wasm.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Startup, setup_native_overlays);
    }

    // Loading and config, active from the first frame.
    app.add_systems(
        Update,
        (
            poll_tracked_loads,
            update_loading_frontend,
            apply_loaded_config,
            (rebuild_avatar_path, reframe_top_view),
            transition_to_primary.run_if(in_state(SessionState::Loading)),
        )
            .chain()
            .in_set(WalkthroughSet::Input),
    )
    .add_systems(OnEnter(SessionState::Primary), play_intro_music)
    .add_systems(OnEnter(SessionState::Exhibit), show_exhibit_loading)
    .add_systems(OnEnter(SessionState::Failed), show_error_overlay);

    app.add_systems(
        Update,
        (keyboard_input_system, run_session_scheduler)
            .in_set(WalkthroughSet::Input)
            .run_if(in_walkthrough),
    )
    .add_systems(
        Update,
        (begin_avatar_walk, advance_avatar, arm_teleport_prompt)
            .chain()
            .in_set(WalkthroughSet::Avatar)
            .run_if(in_state(SessionState::Primary)),
    )
    .add_systems(
        Update,
        (
            handle_camera_triggers.run_if(in_state(SessionState::Primary)),
            free_camera_controller,
            update_camera_rig,
            sync_camera_transform,
        )
            .chain()
            .in_set(WalkthroughSet::Camera)
            .run_if(in_walkthrough),
    )
    .add_systems(
        Update,
        (handle_transition_trigger, advance_transition, perform_hand_off)
            .chain()
            .in_set(WalkthroughSet::Transition)
            .run_if(in_state(SessionState::Primary)),
    )
    .add_systems(
        Update,
        (
            handle_close_button,
            handle_pointer_hover,
            handle_pointer_clicks,
            handle_dismiss_requests,
            advance_certificates,
            schedule_instructions,
        )
            .chain()
            .in_set(WalkthroughSet::Interaction)
            .run_if(in_state(SessionState::Exhibit)),
    )
    .add_systems(
        Update,
        (
            update_certificate_screen,
            sync_info_panel,
            toggle_instructions,
            animate_floating,
            animate_click_pulses,
            animate_emissive_pulses.after(update_certificate_screen),
        )
            .in_set(WalkthroughSet::Presentation)
            .run_if(in_state(SessionState::Exhibit)),
    )
    .add_systems(
        Update,
        (
            attach_avatar_animations,
            drive_avatar_animation,
            update_primary_loading,
            update_system_message,
            update_teleport_prompt,
            update_teleport_flash,
        )
            .in_set(WalkthroughSet::Presentation),
    )
    .add_systems(
        Update,
        (
            update_exhibit_loading,
            play_cues,
            handle_fatal_errors.run_if(not(in_state(SessionState::Failed))),
            fps_notification_system,
        )
            .in_set(WalkthroughSet::Presentation),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

#[cfg(not(target_arch = "wasm32"))]
fn setup_native_overlays(mut commands: Commands, config: Res<WalkthroughConfig>) {
    crate::engine::ui::overlays::create_native_overlays(&mut commands, &config);
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: "wgpu=error,naga=warn,walkthrough_engine=debug".to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
