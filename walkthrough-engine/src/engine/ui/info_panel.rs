use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::{ACCENT, PANEL_BACKGROUND, label};
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::{InputSource, WalkthroughAction, WalkthroughInput};
use crate::engine::scene::catalogue::ExhibitInfo;
use crate::interaction::InfoPanelEvent;
use crate::interaction::info::place_info_panel;
use crate::rpc::web_rpc::WebRpcInterface;

/// Root node of the info panel. Carries [`Interaction`] so pointer systems
/// can tell when the cursor is over it.
#[derive(Component)]
pub struct InfoPanelRoot;

#[derive(Component)]
pub struct InfoTitle;

#[derive(Component)]
pub struct InfoBody;

#[derive(Component)]
pub struct InfoLinks;

#[derive(Component)]
pub struct InfoCloseButton;

pub fn spawn_info_panel(parent: &mut ChildSpawnerCommands, config: &WalkthroughConfig) {
    let [width, height] = config.interaction.panel_size;
    parent
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Px(width),
                min_height: Val::Px(height),
                flex_direction: FlexDirection::Column,
                padding: UiRect::all(Val::Px(16.0)),
                row_gap: Val::Px(8.0),
                ..default()
            },
            BackgroundColor(PANEL_BACKGROUND),
            BorderRadius::all(Val::Px(8.0)),
            Interaction::default(),
            Visibility::Hidden,
            InfoPanelRoot,
        ))
        .with_children(|panel| {
            panel
                .spawn(Node {
                    justify_content: JustifyContent::SpaceBetween,
                    ..default()
                })
                .with_children(|header| {
                    header.spawn((label("", 22.0, ACCENT), InfoTitle));
                    header
                        .spawn((
                            Button,
                            Node {
                                padding: UiRect::horizontal(Val::Px(6.0)),
                                ..default()
                            },
                            InfoCloseButton,
                        ))
                        .with_children(|button| {
                            button.spawn(label("X", 18.0, Color::WHITE));
                        });
                });
            panel.spawn((label("", 16.0, Color::WHITE), InfoBody));
            panel.spawn((label("", 14.0, Color::srgb(0.7, 0.8, 1.0)), InfoLinks));
        });
}

fn links_text(info: &ExhibitInfo) -> String {
    info.links
        .iter()
        .map(|link| format!("{}: {}", link.label, link.url))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply panel events to the native panel and tell the page.
pub fn sync_info_panel(
    mut events: EventReader<InfoPanelEvent>,
    infos: Query<&ExhibitInfo>,
    windows: Query<&Window, With<PrimaryWindow>>,
    config: Res<WalkthroughConfig>,
    mut panels: Query<(&mut Node, &mut Visibility), With<InfoPanelRoot>>,
    mut titles: Query<&mut Text, (With<InfoTitle>, Without<InfoBody>, Without<InfoLinks>)>,
    mut bodies: Query<&mut Text, (With<InfoBody>, Without<InfoTitle>, Without<InfoLinks>)>,
    mut links: Query<&mut Text, (With<InfoLinks>, Without<InfoTitle>, Without<InfoBody>)>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    // Only the latest event matters within a frame.
    let Some(event) = events.read().last() else {
        return;
    };

    match *event {
        InfoPanelEvent::Hidden => {
            for (_, mut visibility) in &mut panels {
                *visibility = Visibility::Hidden;
            }
            rpc_interface.send_notification("info_hidden", serde_json::json!({}));
        }
        InfoPanelEvent::Shown {
            entity,
            tag,
            anchor,
        } => {
            let Ok(info) = infos.get(entity) else {
                warn!("Info requested for {:?} without a payload", tag);
                return;
            };

            for mut text in &mut titles {
                text.0 = info.title.clone();
            }
            for mut text in &mut bodies {
                text.0 = info.body.clone();
            }
            for mut text in &mut links {
                text.0 = links_text(info);
            }

            let interaction = &config.interaction;
            if let Ok(window) = windows.single() {
                let placed = place_info_panel(
                    anchor,
                    window.size(),
                    Vec2::from_array(interaction.panel_size),
                    interaction.panel_margin,
                );
                for (mut node, mut visibility) in &mut panels {
                    node.left = Val::Px(placed.x);
                    node.top = Val::Px(placed.y);
                    *visibility = Visibility::Inherited;
                }
            }

            rpc_interface.send_notification(
                "info_shown",
                serde_json::json!({
                    "tag": tag,
                    "title": info.title,
                    "body": info.body,
                    "links": info.links,
                    "anchor": anchor.to_array(),
                }),
            );
        }
    }
}

pub fn handle_close_button(
    buttons: Query<&Interaction, (Changed<Interaction>, With<InfoCloseButton>)>,
    mut inputs: EventWriter<WalkthroughInput>,
) {
    if buttons.iter().any(|interaction| *interaction == Interaction::Pressed) {
        inputs.write(WalkthroughInput {
            action: WalkthroughAction::DismissInfo,
            source: InputSource::Pointer,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::scene::catalogue::ExhibitLink;

    #[test]
    fn links_are_listed_one_per_line() {
        let info = ExhibitInfo {
            title: "GitHub".into(),
            body: "Projects".into(),
            links: vec![
                ExhibitLink {
                    label: "Profile".into(),
                    url: "https://github.com".into(),
                },
                ExhibitLink {
                    label: "Blog".into(),
                    url: "https://example.com".into(),
                },
            ],
        };
        assert_eq!(
            links_text(&info),
            "Profile: https://github.com\nBlog: https://example.com"
        );
    }
}
