use std::f32::consts::PI;
use std::time::Duration;

use bevy::prelude::*;

/// 0 → 1 → 0 over `fraction` in [0, 1].
pub fn yoyo(fraction: f32) -> f32 {
    (fraction.clamp(0.0, 1.0) * PI).sin()
}

/// Sine bob around an anchor height.
#[derive(Component, Debug, Clone, Copy)]
pub struct Floating {
    pub anchor: Vec3,
    pub amplitude: f32,
    pub speed: f32,
}

impl Floating {
    pub fn offset(&self, elapsed: f32) -> f32 {
        (elapsed * self.speed).sin() * self.amplitude
    }
}

/// Light attached to a floating object, pulsing with it.
#[derive(Component, Debug, Clone, Copy)]
pub struct FloatingLight {
    pub base_intensity: f32,
    pub speed: f32,
}

impl FloatingLight {
    pub fn intensity(&self, elapsed: f32) -> f32 {
        self.base_intensity * (0.75 + 0.25 * (elapsed * self.speed * 2.0).sin())
    }
}

pub fn animate_floating(
    time: Res<Time>,
    mut floating: Query<(&Floating, &mut Transform)>,
    mut lights: Query<(&FloatingLight, &mut PointLight)>,
) {
    let elapsed = time.elapsed_secs();
    for (object, mut transform) in &mut floating {
        transform.translation.y = object.anchor.y + object.offset(elapsed);
    }
    for (light, mut point_light) in &mut lights {
        point_light.intensity = light.intensity(elapsed);
    }
}

/// Short scale pulse on a clicked exhibit.
#[derive(Component, Debug, Clone)]
pub struct ClickPulse {
    timer: Timer,
    base: Vec3,
    peak: f32,
}

impl ClickPulse {
    pub fn new(base: Vec3, peak: f32, duration: Duration) -> Self {
        Self {
            timer: Timer::new(duration, TimerMode::Once),
            base,
            peak,
        }
    }

    fn scale(&self) -> Vec3 {
        self.base * (1.0 + (self.peak - 1.0) * yoyo(self.timer.fraction()))
    }
}

pub fn animate_click_pulses(
    mut commands: Commands,
    time: Res<Time>,
    mut pulses: Query<(Entity, &mut ClickPulse, &mut Transform)>,
) {
    for (entity, mut pulse, mut transform) in &mut pulses {
        pulse.timer.tick(time.delta());
        if pulse.timer.finished() {
            transform.scale = pulse.base;
            commands.entity(entity).remove::<ClickPulse>();
        } else {
            transform.scale = pulse.scale();
        }
    }
}

/// Emissive flash on the certificate screen when its image changes.
#[derive(Component, Debug, Clone)]
pub struct EmissivePulse {
    timer: Timer,
    peak: f32,
}

impl EmissivePulse {
    pub fn new(peak: f32, duration: Duration) -> Self {
        Self {
            timer: Timer::new(duration, TimerMode::Once),
            peak,
        }
    }

    /// Emissive multiplier: 1 at rest, `peak` mid-pulse.
    pub fn strength(&self) -> f32 {
        1.0 + (self.peak - 1.0) * yoyo(self.timer.fraction())
    }
}

pub fn animate_emissive_pulses(
    mut commands: Commands,
    time: Res<Time>,
    mut pulses: Query<(Entity, &mut EmissivePulse, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    for (entity, mut pulse, material) in &mut pulses {
        pulse.timer.tick(time.delta());
        let strength = if pulse.timer.finished() {
            commands.entity(entity).remove::<EmissivePulse>();
            1.0
        } else {
            pulse.strength()
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.emissive = LinearRgba::rgb(strength, strength, strength);
        }
    }
}
