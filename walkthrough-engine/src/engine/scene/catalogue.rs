use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::core::error::WalkthroughError;
use crate::interaction::ExhibitTag;

/// Exhibit room description as a Bevy asset, loaded from `*.catalogue.json`.
#[derive(Asset, Debug, Clone, Serialize, Deserialize, TypePath)]
pub struct ExhibitCatalogue {
    pub room: RoomEntry,
    pub exhibits: Vec<ExhibitEntry>,
    pub certificate_screen: ScreenEntry,
    #[serde(default)]
    pub floating: Vec<FloatingEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomEntry {
    pub model: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExhibitEntry {
    pub tag: ExhibitTag,
    pub model: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_y: f32,
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    /// World-space size of the pick box around the model.
    pub pick_size: [f32; 3],
    #[serde(default)]
    pub info: Option<ExhibitInfo>,
}

/// Payload shown in the info panel for one exhibit.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitInfo {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub links: Vec<ExhibitLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExhibitLink {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenEntry {
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_y: f32,
    pub size: [f32; 2],
    /// Certificate images cycled by the carousel, in display order.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingEntry {
    pub model: String,
    pub position: [f32; 3],
    #[serde(default = "unit_scale")]
    pub scale: [f32; 3],
    pub amplitude: f32,
    pub speed: f32,
    #[serde(default)]
    pub light_intensity: f32,
    #[serde(default = "white")]
    pub light_color: [f32; 3],
}

fn unit_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn white() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// A model placed in the room.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPlacement {
    pub model: String,
    pub transform: Transform,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExhibitPlacement {
    pub tag: ExhibitTag,
    pub model: String,
    /// Root transform. Scale lives on `model_scale` so the pick box stays in
    /// world units.
    pub transform: Transform,
    pub model_scale: Vec3,
    pub pick_size: Vec3,
    pub info: Option<ExhibitInfo>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenPlacement {
    pub transform: Transform,
    pub size: Vec2,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloatingPlacement {
    pub model: ModelPlacement,
    pub amplitude: f32,
    pub speed: f32,
    pub light_intensity: f32,
    pub light_color: Color,
}

/// Validated exhibit room, ready to spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ExhibitLayout {
    pub room: ModelPlacement,
    pub exhibits: Vec<ExhibitPlacement>,
    pub screen: ScreenPlacement,
    pub floating: Vec<FloatingPlacement>,
}

impl ExhibitLayout {
    /// Validate the catalogue. Any problem is a scene construction failure.
    pub fn build(catalogue: Option<&ExhibitCatalogue>) -> Result<Self, WalkthroughError> {
        let catalogue = catalogue.ok_or_else(|| {
            WalkthroughError::SceneConstruction("exhibit catalogue is not loaded".into())
        })?;

        let room = ModelPlacement {
            model: model_path(&catalogue.room.model, "room")?,
            transform: Transform::from_translation(vector(catalogue.room.position, "room position")?)
                .with_scale(positive(catalogue.room.scale, "room scale")?),
        };

        let mut seen = HashSet::new();
        let mut exhibits = Vec::with_capacity(catalogue.exhibits.len());
        for entry in &catalogue.exhibits {
            let context = format!("{:?}", entry.tag);
            if entry.tag == ExhibitTag::CertificateScreen {
                return Err(WalkthroughError::SceneConstruction(
                    "certificate_screen is defined by `certificate_screen`, not as an exhibit"
                        .into(),
                ));
            }
            if !seen.insert(entry.tag) {
                return Err(WalkthroughError::SceneConstruction(format!(
                    "exhibit {context} is listed twice"
                )));
            }
            exhibits.push(ExhibitPlacement {
                tag: entry.tag,
                model: model_path(&entry.model, &context)?,
                transform: Transform::from_translation(vector(entry.position, &context)?)
                    .with_rotation(Quat::from_rotation_y(entry.rotation_y)),
                model_scale: positive(entry.scale, &context)?,
                pick_size: positive(entry.pick_size, &context)?,
                info: entry.info.clone(),
            });
        }

        let screen = &catalogue.certificate_screen;
        if screen.images.is_empty() {
            return Err(WalkthroughError::SceneConstruction(
                "certificate screen has no images".into(),
            ));
        }
        let size = positive([screen.size[0], screen.size[1], 1.0], "certificate screen")?;
        let screen = ScreenPlacement {
            transform: Transform::from_translation(vector(screen.position, "certificate screen")?)
                .with_rotation(Quat::from_rotation_y(screen.rotation_y)),
            size: size.truncate(),
            images: screen.images.clone(),
        };

        let floating = catalogue
            .floating
            .iter()
            .map(|entry| {
                Ok(FloatingPlacement {
                    model: ModelPlacement {
                        model: model_path(&entry.model, "floating object")?,
                        transform: Transform::from_translation(vector(
                            entry.position,
                            "floating object",
                        )?)
                        .with_scale(positive(entry.scale, "floating object")?),
                    },
                    amplitude: entry.amplitude,
                    speed: entry.speed,
                    light_intensity: entry.light_intensity.max(0.0),
                    light_color: Color::srgb(
                        entry.light_color[0],
                        entry.light_color[1],
                        entry.light_color[2],
                    ),
                })
            })
            .collect::<Result<Vec<_>, WalkthroughError>>()?;

        Ok(Self {
            room,
            exhibits,
            screen,
            floating,
        })
    }
}

fn model_path(path: &str, context: &str) -> Result<String, WalkthroughError> {
    if path.trim().is_empty() {
        return Err(WalkthroughError::SceneConstruction(format!(
            "{context} has no model path"
        )));
    }
    Ok(path.to_string())
}

fn vector(value: [f32; 3], context: &str) -> Result<Vec3, WalkthroughError> {
    let value = Vec3::from_array(value);
    if !value.is_finite() {
        return Err(WalkthroughError::SceneConstruction(format!(
            "{context}: non-finite coordinate {value}"
        )));
    }
    Ok(value)
}

fn positive(value: [f32; 3], context: &str) -> Result<Vec3, WalkthroughError> {
    let value = vector(value, context)?;
    if value.min_element() <= 0.0 {
        return Err(WalkthroughError::SceneConstruction(format!(
            "{context}: sizes must be positive, got {value}"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "room": { "model": "models/room.glb" },
        "exhibits": [
            {
                "tag": "trophy",
                "model": "models/trophy.glb",
                "position": [10.0, 0.0, -5.0],
                "pick_size": [8.0, 12.0, 8.0],
                "info": { "title": "Hackathon", "body": "First place." }
            },
            {
                "tag": "github",
                "model": "models/github.glb",
                "position": [0.0, 5.0, 0.0],
                "scale": [2.0, 2.0, 2.0],
                "pick_size": [4.0, 4.0, 1.0]
            }
        ],
        "certificate_screen": {
            "position": [0.0, 20.0, -60.0],
            "size": [40.0, 22.0],
            "images": ["certificates/a.png", "certificates/b.png"]
        },
        "floating": [
            { "model": "models/robot.glb", "position": [0.0, 30.0, 0.0], "amplitude": 12.0, "speed": 1.5 }
        ]
    }"#;

    fn sample() -> ExhibitCatalogue {
        serde_json::from_str(SAMPLE).expect("valid catalogue")
    }

    #[test]
    fn builds_layout_from_catalogue() {
        let layout = ExhibitLayout::build(Some(&sample())).unwrap();

        assert_eq!(layout.exhibits.len(), 2);
        assert_eq!(layout.exhibits[0].tag, ExhibitTag::Trophy);
        assert_eq!(layout.exhibits[0].model_scale, Vec3::ONE);
        assert_eq!(layout.exhibits[1].model_scale, Vec3::splat(2.0));
        assert!(layout.exhibits[1].info.is_none());
        assert_eq!(layout.screen.size, Vec2::new(40.0, 22.0));
        assert_eq!(layout.screen.images.len(), 2);
        assert_eq!(layout.floating[0].amplitude, 12.0);
        assert_eq!(layout.room.transform.scale, Vec3::ONE);
    }

    #[test]
    fn missing_catalogue_is_a_construction_failure() {
        let err = ExhibitLayout::build(None).unwrap_err();
        assert!(matches!(err, WalkthroughError::SceneConstruction(_)));
        assert!(err.is_fatal());
    }

    #[test]
    fn duplicate_tags_are_rejected() {
        let mut catalogue = sample();
        let duplicate = catalogue.exhibits[0].clone();
        catalogue.exhibits.push(duplicate);
        assert!(ExhibitLayout::build(Some(&catalogue)).is_err());
    }

    #[test]
    fn screen_without_images_is_rejected() {
        let mut catalogue = sample();
        catalogue.certificate_screen.images.clear();
        assert!(ExhibitLayout::build(Some(&catalogue)).is_err());
    }

    #[test]
    fn degenerate_pick_box_is_rejected() {
        let mut catalogue = sample();
        catalogue.exhibits[0].pick_size = [8.0, 0.0, 8.0];
        assert!(ExhibitLayout::build(Some(&catalogue)).is_err());

        let mut catalogue = sample();
        catalogue.exhibits[1].position = [f32::NAN, 0.0, 0.0];
        assert!(ExhibitLayout::build(Some(&catalogue)).is_err());
    }
}
