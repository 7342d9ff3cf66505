//! Session-wide plumbing shared by every controller: the scheduler, user
//! input events and the fatal error path.

use bevy::prelude::*;
use serde::Serialize;

use crate::engine::audio::{CueId, PlayCue};
use crate::engine::core::app_state::SessionState;
use crate::engine::core::error::WalkthroughError;
use crate::engine::core::scheduler::ActionScheduler;

/// Everything the session scheduler can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    PlayCue(CueId),
    ShowTeleportPrompt,
    DismissInfo,
    AdvanceCarousel,
    RevealInstructions,
    HideInstructions,
}

/// The one scheduler of the session. Each scene cancels its own scope on teardown.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct SessionScheduler(pub ActionScheduler<SessionAction>);

/// A scheduled action that came due this frame.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionActionFired(pub SessionAction);

pub fn run_session_scheduler(
    time: Res<Time>,
    mut scheduler: ResMut<SessionScheduler>,
    mut fired: EventWriter<SessionActionFired>,
    mut cues: EventWriter<PlayCue>,
) {
    for action in scheduler.tick(time.delta()) {
        match action {
            SessionAction::PlayCue(cue) => {
                cues.write(PlayCue(cue));
            }
            other => {
                fired.write(SessionActionFired(other));
            }
        }
    }
}

/// Discrete user intents, from the keyboard or the frontend bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkthroughAction {
    BeginApproach,
    TriggerTransition,
    DismissInfo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Keyboard,
    Pointer,
    Rpc,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WalkthroughInput {
    pub action: WalkthroughAction,
    pub source: InputSource,
}

/// Map key presses to walkthrough intents.
///
/// ArrowDown starts the approach. Once the teleport prompt is up any key
/// triggers the transition. Escape closes the info panel.
pub fn keyboard_input_system(
    keyboard: Res<ButtonInput<KeyCode>>,
    state: Res<State<SessionState>>,
    prompt: Option<Res<crate::engine::transition::TeleportPrompt>>,
    mut inputs: EventWriter<WalkthroughInput>,
) {
    if keyboard.get_just_pressed().next().is_none() {
        return;
    }

    let mut send = |action| {
        inputs.write(WalkthroughInput {
            action,
            source: InputSource::Keyboard,
        });
    };

    match state.get() {
        SessionState::Primary => {
            if prompt.is_some_and(|prompt| prompt.armed()) {
                send(WalkthroughAction::TriggerTransition);
            } else if keyboard.just_pressed(KeyCode::ArrowDown) {
                send(WalkthroughAction::BeginApproach);
            }
        }
        SessionState::Exhibit => {
            if keyboard.just_pressed(KeyCode::Escape) {
                send(WalkthroughAction::DismissInfo);
            }
        }
        SessionState::Loading | SessionState::Failed => {}
    }
}

/// A fatal error raised by a controller. Ends interactivity.
#[derive(Event, Debug, Clone)]
pub struct FatalSessionError(pub WalkthroughError);

/// The error that ended the session, kept for the error overlay.
#[derive(Resource, Debug, Clone)]
pub struct SessionFailure(pub WalkthroughError);

/// Top-level session controller for fatal errors.
///
/// Enters [`SessionState::Failed`], cancels every pending action and leaves
/// the error overlay (with its reload prompt) to the UI layer. Recoverable
/// errors escalated by mistake are logged and absorbed.
pub fn handle_fatal_errors(
    mut commands: Commands,
    mut errors: EventReader<FatalSessionError>,
    mut scheduler: ResMut<SessionScheduler>,
    mut next_state: ResMut<NextState<SessionState>>,
    mut rpc_interface: ResMut<crate::rpc::web_rpc::WebRpcInterface>,
) {
    let mut failure = None;
    for FatalSessionError(error) in errors.read() {
        if error.is_fatal() {
            failure = Some(error);
        } else {
            warn!("Recoverable error escalated to the session: {}", error);
        }
    }
    let Some(error) = failure else {
        return;
    };

    error!("Walkthrough session failed: {}", error);
    scheduler.cancel_all();
    rpc_interface.send_notification(
        "session_error",
        serde_json::json!({
            "message": error.to_string(),
            "recoverable": false,
        }),
    );
    commands.insert_resource(SessionFailure(error.clone()));
    println!("→ Transitioning to Failed state");
    next_state.set(SessionState::Failed);
}
