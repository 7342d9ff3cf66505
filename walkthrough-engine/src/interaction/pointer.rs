use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::info::InfoPanel;
use super::ray::PickBounds;
use super::resolver::{pointer_to_ndc, resolve, tag_of};
use super::router::{ClickEffect, ClickOutcome, HoverChange, InteractionRouter, Target, click_effect};
use super::{InfoPanelEvent, InteractiveTag};
use crate::engine::audio::{CueId, PlayCue};
use crate::engine::camera::WalkthroughCamera;
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::session::{
    SessionAction, SessionActionFired, SessionScheduler, WalkthroughAction, WalkthroughInput,
};
use crate::engine::scene::catalogue::ExhibitInfo;
use crate::engine::scene::effects::ClickPulse;
use crate::engine::scene::exhibit::{CertificateCarousel, ScreenImageChanged};
use crate::engine::ui::info_panel::InfoPanelRoot;

/// Everything needed to turn the cursor into a [`Target`].
#[derive(SystemParam)]
pub struct PickingContext<'w, 's> {
    windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    cameras: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<WalkthroughCamera>>,
    picks: Query<'w, 's, (Entity, &'static GlobalTransform, &'static PickBounds)>,
    tags: Query<'w, 's, &'static InteractiveTag>,
    parents: Query<'w, 's, &'static ChildOf>,
    transforms: Query<'w, 's, &'static GlobalTransform>,
    infos: Query<'w, 's, &'static ExhibitInfo>,
    panels: Query<'w, 's, &'static Interaction, With<InfoPanelRoot>>,
}

impl PickingContext<'_, '_> {
    pub fn cursor(&self) -> Option<Vec2> {
        self.windows.single().ok()?.cursor_position()
    }

    /// The UI panel sits above the scene, so it swallows the pointer.
    pub fn over_panel(&self) -> bool {
        self.panels
            .iter()
            .any(|interaction| *interaction != Interaction::None)
    }

    /// Resolve the cursor to the tagged entity under it.
    pub fn pick(&self) -> Option<Target> {
        let window = self.windows.single().ok()?;
        let cursor = window.cursor_position()?;
        let ndc = pointer_to_ndc(cursor, window.size())?;
        let (camera, camera_transform) = self.cameras.single().ok()?;

        let hit = resolve(ndc, camera, camera_transform, self.picks.iter())?;
        let (entity, tag) = tag_of(
            hit.entity,
            |entity| self.tags.get(entity).ok().map(|tag| tag.0),
            |entity| self.parents.get(entity).ok().map(ChildOf::parent),
        )?;
        Some(Target { entity, tag })
    }

    pub fn has_info(&self, entity: Entity) -> bool {
        self.infos.contains(entity)
    }

    /// Screen position of an entity's origin, falling back to the cursor.
    pub fn anchor(&self, entity: Entity) -> Option<Vec2> {
        let projected = self.cameras.single().ok().and_then(|(camera, camera_transform)| {
            let world = self.transforms.get(entity).ok()?.translation();
            camera.world_to_viewport(camera_transform, world).ok()
        });
        projected.or_else(|| self.cursor())
    }
}

/// Press position of the gesture in progress.
#[derive(Debug, Default)]
pub struct PointerGesture {
    pressed_at: Option<Vec2>,
}

impl PointerGesture {
    /// Whether a release at `released_at` ends a click rather than a drag.
    pub fn release(&mut self, released_at: Vec2, threshold: f32) -> bool {
        self.pressed_at
            .take()
            .is_some_and(|pressed| pressed.distance(released_at) <= threshold)
    }
}

pub fn handle_pointer_hover(
    picking: PickingContext,
    mouse: Res<ButtonInput<MouseButton>>,
    mut router: ResMut<InteractionRouter>,
    mut panel: ResMut<InfoPanel>,
    mut panel_events: EventWriter<InfoPanelEvent>,
) {
    // Orbiting the camera is not hovering.
    if mouse.pressed(MouseButton::Left) || picking.over_panel() {
        return;
    }

    match router.hover(picking.pick()) {
        HoverChange::Unchanged => {}
        HoverChange::Entered(target) => {
            if picking.has_info(target.entity) && panel.show_hover(target) {
                if let Some(anchor) = picking.anchor(target.entity) {
                    panel_events.write(InfoPanelEvent::Shown {
                        entity: target.entity,
                        tag: target.tag,
                        anchor,
                    });
                }
            } else if panel.hover_ended() {
                panel_events.write(InfoPanelEvent::Hidden);
            }
        }
        HoverChange::Left => {
            if panel.hover_ended() {
                panel_events.write(InfoPanelEvent::Hidden);
            }
        }
    }
}

/// Classify a completed click and apply its effect.
pub fn handle_pointer_clicks(
    mut commands: Commands,
    mut gesture: Local<PointerGesture>,
    picking: PickingContext,
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    config: Res<WalkthroughConfig>,
    asset_server: Res<AssetServer>,
    mut router: ResMut<InteractionRouter>,
    mut panel: ResMut<InfoPanel>,
    mut scheduler: ResMut<SessionScheduler>,
    certificates: Option<ResMut<CertificateCarousel>>,
    pulsing: Query<&Transform, Without<ClickPulse>>,
    mut cues: EventWriter<PlayCue>,
    mut screen: EventWriter<ScreenImageChanged>,
    mut panel_events: EventWriter<InfoPanelEvent>,
) {
    let Some(cursor) = picking.cursor() else {
        return;
    };
    if mouse.just_pressed(MouseButton::Left) && !picking.over_panel() {
        gesture.pressed_at = Some(cursor);
    }
    if !mouse.just_released(MouseButton::Left) {
        return;
    }
    if !gesture.release(cursor, config.interaction.click_drag_threshold) {
        return;
    }

    let interaction = &config.interaction;
    let outcome = router.click(picking.pick(), time.elapsed(), interaction.double_click_window());
    if outcome.acknowledged() {
        cues.write(PlayCue(CueId::Click));
    }

    let target = match outcome {
        ClickOutcome::Miss => {
            if panel.hide(&mut scheduler) {
                panel_events.write(InfoPanelEvent::Hidden);
            }
            return;
        }
        ClickOutcome::Single(target) | ClickOutcome::Double(target) => target,
    };

    let mut certificates = certificates.filter(|certificates| certificates.screen == target.entity);
    let active = certificates
        .as_ref()
        .is_some_and(|certificates| certificates.carousel.is_active());

    match click_effect(&outcome, active, picking.has_info(target.entity)) {
        ClickEffect::Activate => {
            let Some(certificates) = certificates.as_mut() else {
                return;
            };
            certificates
                .carousel
                .refresh_loaded(|image| asset_server.is_loaded_with_dependencies(image.id()));
            match certificates.carousel.activate(
                &mut scheduler.0,
                interaction.carousel_interval(),
                SessionAction::AdvanceCarousel,
            ) {
                Ok(image) => {
                    info!("Certificate carousel started");
                    screen.write(ScreenImageChanged(Some(image.clone())));
                }
                Err(err) => debug!("{}", err),
            }
        }
        ClickEffect::Deactivate => {
            if let Some(certificates) = certificates.as_mut() {
                if certificates.carousel.deactivate(&mut scheduler.0) {
                    info!("Certificate carousel stopped");
                    screen.write(ScreenImageChanged(None));
                }
            }
        }
        ClickEffect::OpenInfo => {
            panel.show_pinned(target, &mut scheduler, interaction.info_auto_dismiss());
            if let Ok(transform) = pulsing.get(target.entity) {
                commands.entity(target.entity).insert(ClickPulse::new(
                    transform.scale,
                    interaction.pulse_scale,
                    interaction.pulse(),
                ));
            }
            panel_events.write(InfoPanelEvent::Shown {
                entity: target.entity,
                tag: target.tag,
                anchor: picking.anchor(target.entity).unwrap_or(cursor),
            });
        }
        ClickEffect::Nothing => {}
    }
}

/// Explicit dismissal (Escape, close button, frontend) and the auto-dismiss timer.
pub fn handle_dismiss_requests(
    mut inputs: EventReader<WalkthroughInput>,
    mut fired: EventReader<SessionActionFired>,
    panel: Option<ResMut<InfoPanel>>,
    mut scheduler: ResMut<SessionScheduler>,
    mut panel_events: EventWriter<InfoPanelEvent>,
) {
    let Some(mut panel) = panel else {
        inputs.clear();
        fired.clear();
        return;
    };

    let mut hidden = false;
    for input in inputs.read() {
        if input.action == WalkthroughAction::DismissInfo {
            hidden |= panel.hide(&mut scheduler);
        }
    }
    for SessionActionFired(action) in fired.read() {
        if *action == SessionAction::DismissInfo {
            hidden |= panel.auto_dismissed();
        }
    }

    if hidden {
        panel_events.write(InfoPanelEvent::Hidden);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_travel_is_a_click() {
        let mut gesture = PointerGesture {
            pressed_at: Some(Vec2::new(100.0, 100.0)),
        };
        assert!(gesture.release(Vec2::new(103.0, 101.0), 5.0));
    }

    #[test]
    fn long_travel_is_a_drag() {
        let mut gesture = PointerGesture {
            pressed_at: Some(Vec2::new(100.0, 100.0)),
        };
        assert!(!gesture.release(Vec2::new(140.0, 100.0), 5.0));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut gesture = PointerGesture::default();
        assert!(!gesture.release(Vec2::ZERO, 5.0));
    }
}
