use bevy::prelude::*;

use super::ExhibitScene;
use super::catalogue::{ExhibitLayout, ModelPlacement};
use super::effects::{EmissivePulse, Floating, FloatingLight};
use crate::engine::camera::WalkthroughCamera;
use crate::engine::core::config::WalkthroughConfig;
use crate::engine::core::scheduler::SceneScope;
use crate::engine::core::session::{SessionAction, SessionActionFired, SessionScheduler};
use crate::engine::loading::tracked_loads::{LoadingReady, SceneKind, TrackedLoads};
use crate::interaction::carousel::Carousel;
use crate::interaction::ray::PickBounds;
use crate::interaction::{ExhibitTag, InteractiveTag};

/// The certificate screen and its carousel.
#[derive(Resource)]
pub struct CertificateCarousel {
    pub carousel: Carousel<Handle<Image>>,
    pub screen: Entity,
}

/// Written when the screen should show a different image, or go black.
#[derive(Event, Debug, Clone)]
pub struct ScreenImageChanged(pub Option<Handle<Image>>);

/// Spawn the exhibit room described by `layout` and register its loads.
/// Cannot fail: validation already happened in [`ExhibitLayout::build`].
pub fn spawn_exhibit_scene(
    commands: &mut Commands,
    asset_server: &AssetServer,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    layout: &ExhibitLayout,
    camera_position: Vec3,
    camera_target: Vec3,
) -> (CertificateCarousel, TrackedLoads) {
    let mut loads = TrackedLoads::new(SceneKind::Exhibit);

    commands.spawn((
        Camera3d::default(),
        Transform::from_translation(camera_position).looking_at(camera_target, Vec3::Y),
        WalkthroughCamera,
        ExhibitScene,
    ));
    commands.spawn((
        DirectionalLight {
            illuminance: 8_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(100.0, 200.0, 100.0).looking_at(Vec3::ZERO, Vec3::Y),
        ExhibitScene,
    ));

    let room = spawn_model(commands, asset_server, &mut loads, &layout.room, "exhibit room");
    commands.entity(room).insert(ExhibitScene);

    for exhibit in &layout.exhibits {
        let label = format!("{:?} model", exhibit.tag);
        let model = asset_server.load(GltfAssetLabel::Scene(0).from_asset(exhibit.model.clone()));
        loads.track(label, &model);

        let mut root = commands.spawn((
            exhibit.transform,
            Visibility::default(),
            InteractiveTag(exhibit.tag),
            ExhibitScene,
        ));
        if let Some(info) = &exhibit.info {
            root.insert(info.clone());
        }
        root.with_children(|parent| {
            parent.spawn((
                SceneRoot(model),
                Transform::from_scale(exhibit.model_scale),
            ));
            parent.spawn((Transform::default(), PickBounds(exhibit.pick_size)));
        });
    }

    let images: Vec<Handle<Image>> = layout
        .screen
        .images
        .iter()
        .map(|path| asset_server.load(path.clone()))
        .collect();
    for (index, image) in images.iter().enumerate() {
        loads.track(format!("certificate {index}"), image);
    }

    let size = layout.screen.size;
    let screen = commands
        .spawn((
            Mesh3d(meshes.add(Rectangle::new(size.x, size.y))),
            MeshMaterial3d(materials.add(screen_material(None))),
            layout.screen.transform,
            InteractiveTag(ExhibitTag::CertificateScreen),
            PickBounds(size.extend(0.5)),
            ExhibitScene,
        ))
        .id();

    for floating in &layout.floating {
        let entity = spawn_model(
            commands,
            asset_server,
            &mut loads,
            &floating.model,
            "floating object",
        );
        commands
            .entity(entity)
            .insert((
                Floating {
                    anchor: floating.model.transform.translation,
                    amplitude: floating.amplitude,
                    speed: floating.speed,
                },
                ExhibitScene,
            ))
            .with_children(|parent| {
                parent.spawn((
                    PointLight {
                        intensity: floating.light_intensity,
                        color: floating.light_color,
                        ..default()
                    },
                    Transform::default(),
                    FloatingLight {
                        base_intensity: floating.light_intensity,
                        speed: floating.speed,
                    },
                ));
            });
    }

    let carousel = CertificateCarousel {
        carousel: Carousel::new(images),
        screen,
    };
    (carousel, loads)
}

fn spawn_model(
    commands: &mut Commands,
    asset_server: &AssetServer,
    loads: &mut TrackedLoads,
    placement: &ModelPlacement,
    label: &str,
) -> Entity {
    let scene = asset_server.load(GltfAssetLabel::Scene(0).from_asset(placement.model.clone()));
    loads.track(label, &scene);
    commands.spawn((SceneRoot(scene), placement.transform)).id()
}

/// Screen material for `image`, or the black screen for `None`.
///
/// An image is shown lit so the emphasis pulse on `emissive` stays visible.
pub fn screen_material(image: Option<&Handle<Image>>) -> StandardMaterial {
    match image {
        Some(image) => StandardMaterial {
            base_color: Color::WHITE,
            base_color_texture: Some(image.clone()),
            emissive: LinearRgba::WHITE,
            emissive_texture: Some(image.clone()),
            unlit: false,
            ..default()
        },
        None => StandardMaterial {
            base_color: Color::BLACK,
            unlit: true,
            ..default()
        },
    }
}

/// Reveal the instruction banner shortly after the room is ready, then hide it.
pub fn schedule_instructions(
    mut ready: EventReader<LoadingReady>,
    config: Res<WalkthroughConfig>,
    mut scheduler: ResMut<SessionScheduler>,
) {
    if !ready.read().any(|event| event.scene == SceneKind::Exhibit) {
        return;
    }
    let reveal = config.interaction.instruction_reveal();
    let hide = config.interaction.instruction_hide();

    scheduler.schedule(
        "instructions reveal",
        SceneScope::Exhibit,
        reveal,
        SessionAction::RevealInstructions,
    );
    scheduler.schedule(
        "instructions hide",
        SceneScope::Exhibit,
        reveal + hide,
        SessionAction::HideInstructions,
    );
}

/// Step the carousel on each scheduled advance.
pub fn advance_certificates(
    mut fired: EventReader<SessionActionFired>,
    certificates: Option<ResMut<CertificateCarousel>>,
    mut changed: EventWriter<ScreenImageChanged>,
) {
    let Some(mut certificates) = certificates else {
        return;
    };
    for SessionActionFired(action) in fired.read() {
        if *action != SessionAction::AdvanceCarousel {
            continue;
        }
        if let Some(image) = certificates.carousel.advance() {
            changed.write(ScreenImageChanged(Some(image.clone())));
        }
    }
}

/// Apply image changes to the screen material, with an emphasis pulse.
pub fn update_certificate_screen(
    mut commands: Commands,
    mut changed: EventReader<ScreenImageChanged>,
    certificates: Option<Res<CertificateCarousel>>,
    screens: Query<&MeshMaterial3d<StandardMaterial>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<WalkthroughConfig>,
) {
    let Some(certificates) = certificates else {
        changed.clear();
        return;
    };
    let Some(ScreenImageChanged(image)) = changed.read().last() else {
        return;
    };
    let Ok(material) = screens.get(certificates.screen) else {
        return;
    };
    let Some(material) = materials.get_mut(&material.0) else {
        return;
    };

    *material = screen_material(image.as_ref());
    if image.is_some() {
        let interaction = &config.interaction;
        commands.entity(certificates.screen).insert(EmissivePulse::new(
            interaction.carousel_emphasis_peak,
            interaction.carousel_emphasis(),
        ));
    } else {
        commands.entity(certificates.screen).remove::<EmissivePulse>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shown_image_is_lit_so_emphasis_shows() {
        let image = Handle::<Image>::default();
        let material = screen_material(Some(&image));

        assert!(!material.unlit);
        assert_eq!(material.base_color_texture, Some(image.clone()));
        assert_eq!(material.emissive_texture, Some(image));
        assert_eq!(material.emissive, LinearRgba::WHITE);
    }

    #[test]
    fn blank_screen_is_black_without_textures() {
        let material = screen_material(None);

        assert_eq!(material.base_color, Color::BLACK);
        assert!(material.base_color_texture.is_none());
        assert!(material.emissive_texture.is_none());
        assert_eq!(material.emissive, LinearRgba::BLACK);
    }
}
