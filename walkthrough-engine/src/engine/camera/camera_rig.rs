use bevy::prelude::*;

use crate::engine::core::config::CameraConfig;
use crate::engine::core::error::{StateMachine, WalkthroughError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    TopView,
    Following,
    Sitting,
    Free,
}

impl CameraMode {
    fn name(self) -> &'static str {
        match self {
            Self::TopView => "TopView",
            Self::Following => "Following",
            Self::Sitting => "Sitting",
            Self::Free => "Free",
        }
    }
}

/// Orbit parameters for the free camera, around the look target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
}

impl Orbit {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            radius,
        }
    }

    fn offset(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.radius
    }
}

/// Interpolation targets, resolved once per frame from [`CameraConfig`].
#[derive(Debug, Clone, Copy)]
pub struct RigSettings {
    pub follow_offset: Vec3,
    pub smoothing: f32,
    pub sit_position: Vec3,
    pub sit_target: Vec3,
    pub drag_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_pitch: f32,
}

impl From<&CameraConfig> for RigSettings {
    fn from(config: &CameraConfig) -> Self {
        Self {
            follow_offset: Vec3::from_array(config.follow_offset),
            smoothing: config.smoothing,
            sit_position: Vec3::from_array(config.sit_position),
            sit_target: Vec3::from_array(config.sit_target),
            drag_sensitivity: config.drag_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
            min_radius: config.min_radius,
            max_radius: config.max_radius,
            max_pitch: config.max_pitch,
        }
    }
}

/// Camera state machine: TopView → Following → Sitting → Free.
///
/// Only camera systems hold a mutable reference. Every mode change goes
/// through one of the trigger methods and is rejected from any other mode.
#[derive(Resource, Debug, Clone)]
pub struct CameraRig {
    mode: CameraMode,
    position: Vec3,
    target: Vec3,
    orbit: Option<Orbit>,
}

impl CameraRig {
    pub fn top_view(position: Vec3, target: Vec3) -> Self {
        Self {
            mode: CameraMode::TopView,
            position,
            target,
            orbit: Some(Orbit::from_offset(position - target)),
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn orbit(&self) -> Option<Orbit> {
        self.orbit
    }

    fn require(&self, mode: CameraMode, action: &'static str) -> Result<(), WalkthroughError> {
        if self.mode == mode {
            Ok(())
        } else {
            Err(WalkthroughError::invalid(
                StateMachine::Camera,
                self.mode.name(),
                action,
            ))
        }
    }

    /// The approach begins and locks the top-view orbit until the hand-off.
    pub fn begin_approach(&mut self) -> Result<(), WalkthroughError> {
        self.require(CameraMode::TopView, "begin_approach")?;
        self.mode = CameraMode::Following;
        self.orbit = None;
        Ok(())
    }

    pub fn avatar_seated(&mut self) -> Result<(), WalkthroughError> {
        self.require(CameraMode::Following, "avatar_seated")?;
        self.mode = CameraMode::Sitting;
        Ok(())
    }

    /// Move into the exhibit room and hand control to the user.
    pub fn hand_off(&mut self, position: Vec3, target: Vec3) -> Result<(), WalkthroughError> {
        self.require(CameraMode::Sitting, "hand_off")?;
        self.mode = CameraMode::Free;
        self.position = position;
        self.target = target;
        self.orbit = Some(Orbit::from_offset(position - target));
        Ok(())
    }

    /// Per-frame interpolation. Position and target share one smoothing
    /// factor so they converge together.
    pub fn tick(&mut self, avatar: Vec3, settings: &RigSettings) {
        let (position, target) = match self.mode {
            CameraMode::TopView | CameraMode::Free => return,
            CameraMode::Following => (avatar + settings.follow_offset, avatar),
            CameraMode::Sitting => (settings.sit_position, settings.sit_target),
        };
        self.position = self.position.lerp(position, settings.smoothing);
        self.target = self.target.lerp(target, settings.smoothing);
    }

    /// Direct orbit manipulation. Only the top view and the exhibit room
    /// accept it.
    pub fn manipulate(&mut self, drag: Vec2, scroll: f32, settings: &RigSettings) {
        if !matches!(self.mode, CameraMode::TopView | CameraMode::Free) {
            return;
        }
        let Some(orbit) = self.orbit.as_mut() else {
            return;
        };

        orbit.yaw -= drag.x * settings.drag_sensitivity;
        orbit.pitch = (orbit.pitch + drag.y * settings.drag_sensitivity)
            .clamp(-settings.max_pitch, settings.max_pitch);
        orbit.radius = (orbit.radius * (1.0 - scroll * settings.zoom_sensitivity))
            .clamp(settings.min_radius, settings.max_radius);

        self.position = self.target + orbit.offset();
    }
}
