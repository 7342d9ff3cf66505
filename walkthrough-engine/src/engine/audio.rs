//! Fire-and-forget audio cues.

use bevy::audio::Volume;
use bevy::prelude::*;
use constants::paths;
use serde::Deserialize;

use crate::engine::loading::tracked_loads::TrackedLoads;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CueId {
    Intro,
    Click,
    PortalOpen,
    PortalSecond,
}

/// Request to play a cue. Nothing is reported back.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayCue(pub CueId);

#[derive(Resource, Default)]
pub struct CueLibrary {
    intro: Handle<AudioSource>,
    click: Handle<AudioSource>,
    portal_open: Handle<AudioSource>,
    portal_second: Handle<AudioSource>,
}

impl CueLibrary {
    pub fn load(asset_server: &AssetServer, loads: &mut TrackedLoads) -> Self {
        let library = Self {
            intro: asset_server.load(paths::INTRO_CUE_PATH),
            click: asset_server.load(paths::CLICK_CUE_PATH),
            portal_open: asset_server.load(paths::PORTAL_OPEN_CUE_PATH),
            portal_second: asset_server.load(paths::PORTAL_SECOND_CUE_PATH),
        };
        loads.track("intro cue", &library.intro);
        loads.track("click cue", &library.click);
        loads.track("portal open cue", &library.portal_open);
        loads.track("portal second cue", &library.portal_second);
        library
    }

    fn handle(&self, cue: CueId) -> Handle<AudioSource> {
        match cue {
            CueId::Intro => self.intro.clone(),
            CueId::Click => self.click.clone(),
            CueId::PortalOpen => self.portal_open.clone(),
            CueId::PortalSecond => self.portal_second.clone(),
        }
    }
}

/// Marks the intro track so the approach can stop it.
#[derive(Component)]
pub struct IntroMusic;

pub fn play_cues(
    mut commands: Commands,
    mut cues: EventReader<PlayCue>,
    library: Option<Res<CueLibrary>>,
    config: Res<crate::engine::core::config::WalkthroughConfig>,
) {
    let Some(library) = library else {
        cues.clear();
        return;
    };

    for PlayCue(cue) in cues.read() {
        let player = AudioPlayer::new(library.handle(*cue));
        match cue {
            CueId::Intro => {
                commands.spawn((
                    player,
                    PlaybackSettings::DESPAWN
                        .with_volume(Volume::Linear(config.approach.intro_volume)),
                    IntroMusic,
                ));
            }
            _ => {
                commands.spawn((player, PlaybackSettings::DESPAWN));
            }
        }
        debug!("Cue {:?}", cue);
    }
}

/// Intro track for the street, started when the primary scene is ready.
pub fn play_intro_music(mut cues: EventWriter<PlayCue>) {
    cues.write(PlayCue(CueId::Intro));
}
