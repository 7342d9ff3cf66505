use std::time::Duration;

use bevy::prelude::*;
use constants::{approach, avatar, camera, interaction, transition};
use serde::Deserialize;

use crate::engine::audio::CueId;
use crate::engine::core::error::WalkthroughError;

/// Walkthrough tuning loaded from `*.walkthrough.json`.
///
/// Every section falls back to the `constants` crate, so a partial file only
/// overrides what it names.
#[derive(Asset, TypePath, Resource, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct WalkthroughConfig {
    pub avatar: AvatarConfig,
    pub camera: CameraConfig,
    pub transition: TransitionConfig,
    pub interaction: InteractionConfig,
    pub approach: ApproachConfig,
}

impl WalkthroughConfig {
    /// Replace values that would stall the walk, the camera or the teleport
    /// with their defaults. Returns one error per replaced value.
    pub fn sanitize(&mut self) -> Vec<WalkthroughError> {
        let avatar = AvatarConfig::default();
        let camera = CameraConfig::default();
        let transition = TransitionConfig::default();

        let mut rejected = Vec::new();
        let mut check = |field: &'static str, value: &mut f32, fallback: f32, valid: fn(f32) -> bool| {
            if !valid(*value) {
                rejected.push(WalkthroughError::InvalidConfig {
                    field,
                    value: *value,
                    fallback,
                });
                *value = fallback;
            }
        };

        check("avatar.step", &mut self.avatar.step, avatar.step, positive);
        check(
            "avatar.arrive_tolerance",
            &mut self.avatar.arrive_tolerance,
            avatar.arrive_tolerance,
            positive,
        );
        check(
            "avatar.turn_smoothing",
            &mut self.avatar.turn_smoothing,
            avatar.turn_smoothing,
            unit_factor,
        );
        check("camera.smoothing", &mut self.camera.smoothing, camera.smoothing, unit_factor);
        check(
            "transition.progress_step",
            &mut self.transition.progress_step,
            transition.progress_step,
            positive,
        );
        rejected
    }
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// A per-frame lerp factor in (0, 1].
fn unit_factor(value: f32) -> bool {
    value.is_finite() && value > 0.0 && value <= 1.0
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AvatarConfig {
    pub start_position: [f32; 3],
    pub start_facing: f32,
    pub waypoints: Vec<[f32; 3]>,
    pub step: f32,
    pub arrive_tolerance: f32,
    pub turn_smoothing: f32,
    pub seat_position: Option<[f32; 3]>,
    pub seat_facing: f32,
    pub sit_prompt_delay_secs: f32,
    pub scale: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            start_position: avatar::START_POSITION,
            start_facing: avatar::START_FACING,
            waypoints: avatar::WAYPOINTS.to_vec(),
            step: avatar::WALK_STEP,
            arrive_tolerance: avatar::ARRIVE_TOLERANCE,
            turn_smoothing: avatar::TURN_SMOOTHING,
            seat_position: Some(avatar::SEAT_POSITION),
            seat_facing: avatar::SEAT_FACING,
            sit_prompt_delay_secs: avatar::SIT_PROMPT_DELAY_SECS,
            scale: avatar::AVATAR_SCALE,
        }
    }
}

impl AvatarConfig {
    pub fn waypoints(&self) -> Vec<Vec3> {
        self.waypoints.iter().copied().map(Vec3::from_array).collect()
    }

    pub fn sit_prompt_delay(&self) -> Duration {
        secs(self.sit_prompt_delay_secs)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CameraConfig {
    pub top_view_position: [f32; 3],
    pub top_view_target: [f32; 3],
    pub follow_offset: [f32; 3],
    pub smoothing: f32,
    pub sit_position: [f32; 3],
    pub sit_target: [f32; 3],
    pub exhibit_position: [f32; 3],
    pub exhibit_target: [f32; 3],
    pub drag_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub max_pitch: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            top_view_position: camera::TOP_VIEW_POSITION,
            top_view_target: camera::TOP_VIEW_TARGET,
            follow_offset: camera::FOLLOW_OFFSET,
            smoothing: camera::FOLLOW_SMOOTHING,
            sit_position: camera::SIT_POSITION,
            sit_target: camera::SIT_TARGET,
            exhibit_position: camera::EXHIBIT_POSITION,
            exhibit_target: camera::EXHIBIT_TARGET,
            drag_sensitivity: camera::DRAG_SENSITIVITY,
            zoom_sensitivity: camera::ZOOM_SENSITIVITY,
            min_radius: camera::MIN_ORBIT_RADIUS,
            max_radius: camera::MAX_ORBIT_RADIUS,
            max_pitch: camera::MAX_PITCH,
        }
    }
}

/// A cue played at a fixed offset from a trigger.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DelayedCue {
    pub cue: CueId,
    pub delay_secs: f32,
}

impl DelayedCue {
    pub fn delay(&self) -> Duration {
        secs(self.delay_secs)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TransitionConfig {
    pub progress_step: f32,
    pub intensity_threshold: f32,
    pub effect_start_scale: f32,
    pub effect_end_scale: f32,
    pub cues: Vec<DelayedCue>,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            progress_step: transition::PROGRESS_STEP,
            intensity_threshold: transition::INTENSITY_THRESHOLD,
            effect_start_scale: transition::EFFECT_START_SCALE,
            effect_end_scale: transition::EFFECT_END_SCALE,
            cues: vec![DelayedCue {
                cue: CueId::PortalSecond,
                delay_secs: transition::SECOND_CUE_DELAY_SECS,
            }],
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct InteractionConfig {
    pub double_click_secs: f32,
    pub info_auto_dismiss_secs: f32,
    pub panel_margin: f32,
    pub panel_size: [f32; 2],
    pub click_drag_threshold: f32,
    pub pulse_scale: f32,
    pub pulse_secs: f32,
    pub carousel_interval_secs: f32,
    pub carousel_emphasis_secs: f32,
    pub carousel_emphasis_peak: f32,
    pub instruction_reveal_secs: f32,
    pub instruction_hide_secs: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            double_click_secs: interaction::DOUBLE_CLICK_SECS,
            info_auto_dismiss_secs: interaction::INFO_AUTO_DISMISS_SECS,
            panel_margin: interaction::INFO_PANEL_MARGIN,
            panel_size: interaction::INFO_PANEL_SIZE,
            click_drag_threshold: interaction::CLICK_DRAG_THRESHOLD,
            pulse_scale: interaction::CLICK_PULSE_SCALE,
            pulse_secs: interaction::CLICK_PULSE_SECS,
            carousel_interval_secs: interaction::CAROUSEL_INTERVAL_SECS,
            carousel_emphasis_secs: interaction::CAROUSEL_EMPHASIS_SECS,
            carousel_emphasis_peak: interaction::CAROUSEL_EMPHASIS_PEAK,
            instruction_reveal_secs: interaction::INSTRUCTION_REVEAL_SECS,
            instruction_hide_secs: interaction::INSTRUCTION_HIDE_SECS,
        }
    }
}

impl InteractionConfig {
    pub fn double_click_window(&self) -> Duration {
        secs(self.double_click_secs)
    }

    pub fn info_auto_dismiss(&self) -> Duration {
        secs(self.info_auto_dismiss_secs)
    }

    pub fn carousel_interval(&self) -> Duration {
        secs(self.carousel_interval_secs)
    }

    pub fn carousel_emphasis(&self) -> Duration {
        secs(self.carousel_emphasis_secs)
    }

    pub fn pulse(&self) -> Duration {
        secs(self.pulse_secs)
    }

    pub fn instruction_reveal(&self) -> Duration {
        secs(self.instruction_reveal_secs)
    }

    pub fn instruction_hide(&self) -> Duration {
        secs(self.instruction_hide_secs)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApproachConfig {
    pub cues: Vec<DelayedCue>,
    pub intro_volume: f32,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            cues: vec![DelayedCue {
                cue: CueId::PortalOpen,
                delay_secs: approach::PORTAL_CUE_DELAY_SECS,
            }],
            intro_volume: approach::INTRO_VOLUME,
        }
    }
}

/// Negative or NaN durations in a hand-edited file clamp to zero.
fn secs(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}
