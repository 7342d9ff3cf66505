use bevy::asset::{LoadState, UntypedAssetId};
use bevy::prelude::*;
use serde::Serialize;

use crate::engine::core::error::WalkthroughError;
use crate::engine::loading::progress::{LoadingProgress, ProgressUpdate};

/// The two render contexts of the walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    Primary,
    Exhibit,
}

/// Written on every accepted completion.
#[derive(Event, Debug, Clone, Copy)]
pub struct LoadProgressed {
    pub scene: SceneKind,
    pub percent: f32,
}

/// Written once per scene, when every tracked load is done.
#[derive(Event, Debug, Clone, Copy)]
pub struct LoadingReady {
    pub scene: SceneKind,
}

struct PendingLoad {
    label: String,
    id: UntypedAssetId,
}

/// Feeds asset server load states into a scene's [`LoadingProgress`].
#[derive(Resource)]
pub struct TrackedLoads {
    scene: SceneKind,
    progress: LoadingProgress,
    pending: Vec<PendingLoad>,
}

impl TrackedLoads {
    pub fn new(scene: SceneKind) -> Self {
        Self {
            scene,
            progress: LoadingProgress::default(),
            pending: Vec::new(),
        }
    }

    /// Register a handle whose load counts toward this scene.
    pub fn track<A: Asset>(&mut self, label: impl Into<String>, handle: &Handle<A>) {
        let label = label.into();
        match self.progress.notify_start() {
            Ok(()) => self.pending.push(PendingLoad {
                label,
                id: handle.id().untyped(),
            }),
            Err(err) => warn!("{:?} loads: `{}` not tracked: {}", self.scene, label, err),
        }
    }

    fn complete(&mut self, index: usize, ok: bool) -> Option<ProgressUpdate> {
        let load = self.pending.swap_remove(index);
        if !ok {
            warn!("{}", WalkthroughError::ResourceFailure { label: load.label });
        }
        match self.progress.notify_done(ok) {
            Ok(update) => Some(update),
            Err(err) => {
                warn!("{:?} loads: {}", self.scene, err);
                None
            }
        }
    }
}

/// Poll the asset server for every pending load of the active scene.
pub fn poll_tracked_loads(
    loads: Option<ResMut<TrackedLoads>>,
    asset_server: Res<AssetServer>,
    mut progressed: EventWriter<LoadProgressed>,
    mut ready: EventWriter<LoadingReady>,
) {
    let Some(mut loads) = loads else {
        return;
    };
    if loads.progress.is_complete() {
        return;
    }

    let mut index = 0;
    while index < loads.pending.len() {
        let outcome = match asset_server.get_load_state(loads.pending[index].id) {
            Some(LoadState::Loaded) => Some(true),
            Some(LoadState::Failed(_)) => Some(false),
            _ => None,
        };

        let Some(ok) = outcome else {
            index += 1;
            continue;
        };

        // swap_remove moves the last entry into `index`, so do not advance.
        if let Some(update) = loads.complete(index, ok) {
            let scene = loads.scene;
            progressed.write(LoadProgressed {
                scene,
                percent: update.percent,
            });
            if update.ready {
                info!(
                    "✓ {:?} scene loaded ({} resources, {} failed)",
                    scene,
                    loads.progress.total(),
                    loads.progress.failed()
                );
                ready.write(LoadingReady { scene });
            }
        }
    }
}
