//! JSON-RPC 2.0 bridge to the page embedding the walkthrough canvas.
//!
//! Messages travel over iframe `postMessage`. The page can drive the same
//! intents as the keyboard and query the session; controllers push
//! progress and state changes back as notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Host page (parent window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Dispatch intent / read state
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! Intents sent without an ID are still dispatched, they just get no reply.
//!
//! ## Methods
//!
//! - `begin_approach`: start the walk, same as ArrowDown
//! - `trigger_transition`: teleport once the prompt is shown
//! - `dismiss_info`: close the info panel
//! - `get_session_state`: session state, camera mode, prompt, transition
//!   progress and the exhibit whose info is open
//! - `get_fps`: current frame rate
//!
//! ## Notifications
//!
//! - `loading_progress` / `loading_ready`: per scene, `scene` is `primary`
//!   or `exhibit`
//! - `camera_mode_changed`
//! - `avatar_seated`
//! - `teleport_prompt`: `{ "visible": bool }`
//! - `transition_progress`: `{ "progress", "intensity" }` every frame of
//!   the portal effect
//! - `info_shown` / `info_hidden`
//! - `session_error`: the session stopped, the page should offer a reload
//! - `fps_update`, `debug_message`
//!
//! ```typescript
//! iframe.contentWindow.postMessage(JSON.stringify({
//!   jsonrpc: "2.0",
//!   method: "trigger_transition",
//!   params: {},
//!   id: 1
//! }), "*");
//! ```
//!
//! ## Error Handling
//!
//! Standard JSON-RPC 2.0 error codes:
//! - `-32601`: Method not found
//! - `-32603`: Internal error

/// JSON-RPC 2.0 interface resource, plugin and method dispatch.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
