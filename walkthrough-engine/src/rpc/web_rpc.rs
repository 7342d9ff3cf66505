use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::camera::camera_rig::{CameraMode, CameraRig};
use crate::engine::core::app_state::SessionState;
use crate::engine::core::session::{InputSource, WalkthroughAction, WalkthroughInput};
use crate::engine::transition::TeleportPrompt;
use crate::engine::transition::orchestrator::Transition;
use crate::interaction::ExhibitTag;
use crate::interaction::info::InfoPanel;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Queued traffic to the hosting page. Controllers push notifications, the
/// plugin drains them once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }
}

/// Bridge between the walkthrough and the page embedding its canvas.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            // Attempt JSON parsing to validate RPC format before queuing.
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Prevent closure from being dropped by transferring ownership to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message received from the parent window.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    // Write events using the non-deprecated method.
    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Read-only view of the session for `get_session_state`.
#[derive(SystemParam)]
pub struct SessionSnapshot<'w> {
    state: Res<'w, State<SessionState>>,
    rig: Option<Res<'w, CameraRig>>,
    transition: Option<Res<'w, Transition>>,
    prompt: Option<Res<'w, TeleportPrompt>>,
    panel: Option<Res<'w, InfoPanel>>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub state: SessionState,
    pub camera_mode: Option<CameraMode>,
    pub teleport_prompt: bool,
    pub transition_progress: f32,
    pub info: Option<ExhibitTag>,
}

impl SessionSnapshot<'_> {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            state: *self.state.get(),
            camera_mode: self.rig.as_ref().map(|rig| rig.mode()),
            teleport_prompt: self.prompt.as_ref().is_some_and(|prompt| prompt.armed()),
            transition_progress: self
                .transition
                .as_ref()
                .map_or(0.0, |transition| transition.progress()),
            info: self
                .panel
                .as_ref()
                .and_then(|panel| panel.shown())
                .map(|shown| shown.target.tag),
        }
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Res<DiagnosticsStore>,
    snapshot: SessionSnapshot,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut inputs: EventWriter<WalkthroughInput>,
) {
    for event in events.read() {
        // Send debug notification to frontend.
        rpc_interface.send_notification(
            "debug_message",
            serde_json::json!({
                "message": format!("Received RPC: {}", event.content)
            }),
        );

        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Processing method: {}", request.method)
                    }),
                );

                if let Some(response) =
                    handle_rpc_request(&request, &diagnostics, &snapshot, &mut inputs)
                {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
            }
        }
    }
}

/// Handle individual RPC request and generate response based on method.
fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: &DiagnosticsStore,
    snapshot: &SessionSnapshot,
    inputs: &mut EventWriter<WalkthroughInput>,
) -> Option<RpcResponse> {
    // Intents are accepted as notifications too; only requests get a reply.
    let result = match request.method.as_str() {
        "begin_approach" => dispatch_input(WalkthroughAction::BeginApproach, inputs),
        "trigger_transition" => dispatch_input(WalkthroughAction::TriggerTransition, inputs),
        "dismiss_info" => dispatch_input(WalkthroughAction::DismissInfo, inputs),
        "get_session_state" => handle_get_session_state(snapshot),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Forward a frontend intent to the controllers. Whether it applies is
/// decided there, exactly as for the keyboard.
fn dispatch_input(
    action: WalkthroughAction,
    inputs: &mut EventWriter<WalkthroughInput>,
) -> Result<serde_json::Value, RpcError> {
    inputs.write(WalkthroughInput {
        action,
        source: InputSource::Rpc,
    });

    info!("Walkthrough input dispatched: {:?}", action);

    Ok(serde_json::json!({
        "accepted": true,
        "action": action
    }))
}

fn handle_get_session_state(snapshot: &SessionSnapshot) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(snapshot.summary())
        .map_err(|e| RpcError::internal_error(&format!("Failed to serialize session: {e}")))
}

/// Handle FPS retrieval with diagnostic system integration.
fn handle_get_fps(diagnostics: &DiagnosticsStore) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the hosting page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to the parent window.
fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_without_id_parse_as_notifications() {
        let request: RpcRequest = serde_json::from_str(
            r#"{"jsonrpc":"2.0","method":"begin_approach","params":{},"id":null}"#,
        )
        .unwrap();
        assert_eq!(request.method, "begin_approach");
        assert!(request.id.is_none());
    }

    #[test]
    fn error_response_carries_code_and_id() {
        let response = create_error_response(serde_json::json!(7), -32601, "Method not found", None);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], -32601);
        assert_eq!(json["id"], 7);
        assert!(json["result"].is_null());
    }

    #[test]
    fn session_summary_serializes_snake_case() {
        let summary = SessionSummary {
            state: SessionState::Exhibit,
            camera_mode: Some(CameraMode::Free),
            teleport_prompt: false,
            transition_progress: 1.0,
            info: Some(ExhibitTag::CertificateScreen),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["state"], "exhibit");
        assert_eq!(json["camera_mode"], "free");
        assert_eq!(json["info"], "certificate_screen");
    }
}
