use bevy::prelude::*;
use serde::Serialize;

use crate::engine::core::config::WalkthroughConfig;
use crate::engine::loading::tracked_loads::{LoadProgressed, LoadingReady, SceneKind};
use crate::rpc::web_rpc::WebRpcInterface;

/// Walkthrough session lifecycle. `Failed` is reachable from any state.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    #[default]
    Loading,
    Primary,
    Exhibit,
    Failed,
}

/// Run condition: the user can interact (either scene, not loading or failed).
pub fn in_walkthrough(state: Option<Res<State<SessionState>>>) -> bool {
    state.is_some_and(|state| matches!(state.get(), SessionState::Primary | SessionState::Exhibit))
}

#[derive(Component)]
pub struct FpsText;

/// Handle of the config asset, applied once it is available.
#[derive(Resource, Default)]
pub struct ConfigLoader {
    pub handle: Handle<WalkthroughConfig>,
    pub applied: bool,
}

/// Replace the default config with the loaded one.
///
/// A missing or broken file keeps the defaults; the tracker already logged it.
/// Out-of-range values are replaced by their defaults.
pub fn apply_loaded_config(
    mut loader: ResMut<ConfigLoader>,
    configs: Res<Assets<WalkthroughConfig>>,
    mut config: ResMut<WalkthroughConfig>,
) {
    if loader.applied {
        return;
    }
    if let Some(loaded) = configs.get(&loader.handle) {
        let mut loaded = loaded.clone();
        for rejected in loaded.sanitize() {
            warn!("{}", rejected);
        }
        *config = loaded;
        loader.applied = true;
        info!("Walkthrough config applied");
    }
}

/// Leave Loading once every primary resource has reported.
pub fn transition_to_primary(
    mut ready: EventReader<LoadingReady>,
    loader: Res<ConfigLoader>,
    mut next_state: ResMut<NextState<SessionState>>,
) {
    if ready.read().any(|event| event.scene == SceneKind::Primary) {
        if !loader.applied {
            warn!("Walkthrough config unavailable, using built-in defaults");
        }
        println!("→ Transitioning to Primary state");
        next_state.set(SessionState::Primary);
    }
}

/// Forward load progress of either scene to the frontend.
pub fn update_loading_frontend(
    mut progressed: EventReader<LoadProgressed>,
    mut ready: EventReader<LoadingReady>,
    mut rpc_interface: ResMut<WebRpcInterface>,
) {
    for event in progressed.read() {
        rpc_interface.send_notification(
            "loading_progress",
            serde_json::json!({
                "scene": event.scene,
                "progress": event.percent,
            }),
        );
    }
    for event in ready.read() {
        rpc_interface.send_notification(
            "loading_ready",
            serde_json::json!({ "scene": event.scene }),
        );
    }
}
