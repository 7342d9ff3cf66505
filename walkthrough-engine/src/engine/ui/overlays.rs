use bevy::prelude::*;

use super::info_panel::spawn_info_panel;
use super::{ACCENT, PANEL_BACKGROUND, label};
use crate::engine::camera::camera_rig::{CameraMode, CameraRig};
use crate::engine::core::app_state::{FpsText, SessionState};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::{SessionAction, SessionActionFired, SessionFailure};
use crate::engine::loading::tracked_loads::{LoadProgressed, LoadingReady, SceneKind};
use crate::engine::transition::TeleportPrompt;
use crate::engine::transition::orchestrator::{Transition, TransitionPhase};
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Component)]
pub struct LoadingOverlay;

#[derive(Component)]
pub struct LoadingText;

/// Walk hint shown before the approach.
#[derive(Component)]
pub struct SystemMessage;

#[derive(Component)]
pub struct TeleportPromptText;

#[derive(Component)]
pub struct TeleportFlash;

#[derive(Component)]
pub struct ExhibitLoadingBar;

#[derive(Component)]
pub struct ExhibitLoadingFill;

#[derive(Component)]
pub struct InstructionBanner;

#[derive(Component)]
pub struct ErrorOverlay;

#[derive(Component)]
pub struct ErrorText;

pub fn create_native_overlays(commands: &mut Commands, config: &WalkthroughConfig) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(Color::BLACK),
                    LoadingOverlay,
                ))
                .with_children(|overlay| {
                    overlay.spawn((label("Loading 0%", 28.0, Color::WHITE), LoadingText));
                });

            parent.spawn((
                label("Press the Down arrow to walk in", 22.0, Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    left: Val::Px(24.0),
                    ..default()
                },
                Visibility::Hidden,
                SystemMessage,
            ));

            parent.spawn((
                label("Press any key to teleport", 26.0, ACCENT),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(48.0),
                    width: Val::Percent(100.0),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                TextLayout::new_with_justify(JustifyText::Center),
                Visibility::Hidden,
                TeleportPromptText,
            ));

            parent.spawn((
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Percent(100.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.0)),
                Visibility::Hidden,
                TeleportFlash,
            ));

            parent
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        bottom: Val::Px(24.0),
                        left: Val::Percent(25.0),
                        width: Val::Percent(50.0),
                        height: Val::Px(6.0),
                        ..default()
                    },
                    BackgroundColor(PANEL_BACKGROUND),
                    Visibility::Hidden,
                    ExhibitLoadingBar,
                ))
                .with_children(|bar| {
                    bar.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(ACCENT),
                        ExhibitLoadingFill,
                    ));
                });

            parent.spawn((
                label(
                    "Drag to look around, scroll to zoom.\nClick an object to learn more, double-click the screen to stop it.",
                    18.0,
                    Color::WHITE,
                ),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(24.0),
                    left: Val::Px(24.0),
                    padding: UiRect::all(Val::Px(12.0)),
                    ..default()
                },
                BackgroundColor(PANEL_BACKGROUND),
                Visibility::Hidden,
                InstructionBanner,
            ));

            spawn_info_panel(parent, config);

            parent
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        flex_direction: FlexDirection::Column,
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        row_gap: Val::Px(12.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.8)),
                    Visibility::Hidden,
                    ErrorOverlay,
                ))
                .with_children(|overlay| {
                    overlay.spawn((label("", 22.0, Color::srgb(1.0, 0.4, 0.4)), ErrorText));
                    overlay.spawn(label("Restart the walkthrough to try again.", 18.0, Color::WHITE));
                });

            parent.spawn((
                label("FPS: ", 16.0, Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn update_primary_loading(
    mut progressed: EventReader<LoadProgressed>,
    mut ready: EventReader<LoadingReady>,
    mut texts: Query<&mut Text, With<LoadingText>>,
    mut overlays: Query<&mut Visibility, With<LoadingOverlay>>,
) {
    for event in progressed.read().filter(|event| event.scene == SceneKind::Primary) {
        for mut text in &mut texts {
            text.0 = format!("Loading {:.0}%", event.percent);
        }
    }
    if ready.read().any(|event| event.scene == SceneKind::Primary) {
        for mut visibility in &mut overlays {
            *visibility = Visibility::Hidden;
        }
    }
}

pub fn show_exhibit_loading(mut bars: Query<&mut Visibility, With<ExhibitLoadingBar>>) {
    for mut visibility in &mut bars {
        *visibility = Visibility::Inherited;
    }
}

pub fn update_exhibit_loading(
    mut progressed: EventReader<LoadProgressed>,
    mut ready: EventReader<LoadingReady>,
    mut fills: Query<&mut Node, With<ExhibitLoadingFill>>,
    mut bars: Query<&mut Visibility, With<ExhibitLoadingBar>>,
) {
    for event in progressed.read().filter(|event| event.scene == SceneKind::Exhibit) {
        for mut node in &mut fills {
            node.width = Val::Percent(event.percent);
        }
    }
    if ready.read().any(|event| event.scene == SceneKind::Exhibit) {
        for mut visibility in &mut bars {
            *visibility = Visibility::Hidden;
        }
    }
}

/// The walk hint stays up until the camera leaves the top view.
pub fn update_system_message(
    state: Res<State<SessionState>>,
    rig: Option<Res<CameraRig>>,
    mut messages: Query<&mut Visibility, With<SystemMessage>>,
) {
    let visible = *state.get() == SessionState::Primary
        && rig.is_some_and(|rig| rig.mode() == CameraMode::TopView);
    for mut visibility in &mut messages {
        visibility.set_if_neq(shown(visible));
    }
}

pub fn update_teleport_prompt(
    prompt: Option<Res<TeleportPrompt>>,
    mut texts: Query<&mut Visibility, With<TeleportPromptText>>,
) {
    let visible = prompt.is_some_and(|prompt| prompt.armed());
    for mut visibility in &mut texts {
        visibility.set_if_neq(shown(visible));
    }
}

/// Full-screen flash fading out while the portal sphere grows.
pub fn update_teleport_flash(
    transition: Option<Res<Transition>>,
    config: Res<WalkthroughConfig>,
    mut flashes: Query<(&mut BackgroundColor, &mut Visibility), With<TeleportFlash>>,
) {
    let opacity = transition
        .filter(|transition| transition.phase() == TransitionPhase::Running)
        .map(|transition| transition.flash_opacity(&config.transition));

    for (mut background, mut visibility) in &mut flashes {
        visibility.set_if_neq(shown(opacity.is_some()));
        if let Some(opacity) = opacity {
            background.0 = Color::srgba(1.0, 1.0, 1.0, opacity);
        }
    }
}

pub fn toggle_instructions(
    mut fired: EventReader<SessionActionFired>,
    mut banners: Query<&mut Visibility, With<InstructionBanner>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for SessionActionFired(action) in fired.read() {
        let visible = match action {
            SessionAction::RevealInstructions => true,
            SessionAction::HideInstructions => false,
            _ => continue,
        };
        for mut visibility in &mut banners {
            *visibility = shown(visible);
        }
        rpc_interface.send_notification("instructions", serde_json::json!({ "visible": visible }));
    }
}

/// Runs on entering [`SessionState::Failed`].
pub fn show_error_overlay(
    failure: Option<Res<SessionFailure>>,
    mut overlays: Query<&mut Visibility, With<ErrorOverlay>>,
    mut texts: Query<&mut Text, With<ErrorText>>,
) {
    let message = failure
        .map(|failure| failure.0.to_string())
        .unwrap_or_else(|| "The walkthrough stopped unexpectedly.".to_string());
    for mut text in &mut texts {
        text.0 = message.clone();
    }
    for mut visibility in &mut overlays {
        *visibility = Visibility::Inherited;
    }
}

fn shown(visible: bool) -> Visibility {
    if visible {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    }
}
