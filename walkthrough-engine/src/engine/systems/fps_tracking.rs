use std::time::Duration;

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::core::app_state::FpsText;
use crate::rpc::web_rpc::WebRpcInterface;

const FPS_REPORT_INTERVAL: Duration = Duration::from_millis(500);

/// Throttles `fps_update` notifications.
#[derive(Resource)]
pub struct FpsReport {
    timer: Timer,
}

impl Default for FpsReport {
    fn default() -> Self {
        Self {
            timer: Timer::new(FPS_REPORT_INTERVAL, TimerMode::Repeating),
        }
    }
}

fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut report: ResMut<FpsReport>,
    diagnostics: Res<DiagnosticsStore>,
    time: Res<Time>,
) {
    if !report.timer.tick(time.delta()).just_finished() {
        return;
    }
    if let Some(value) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification("fps_update", serde_json::json!({ "fps": value as f32 }));
    }
}

pub fn format_fps(value: f64) -> String {
    format!("FPS: {value:.1}")
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format_fps(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_text_has_one_decimal() {
        assert_eq!(format_fps(59.94), "FPS: 59.9");
    }

    #[test]
    fn report_fires_every_half_second() {
        let mut report = FpsReport::default();
        assert!(!report.timer.tick(Duration::from_millis(300)).just_finished());
        assert!(report.timer.tick(Duration::from_millis(200)).just_finished());
    }
}
