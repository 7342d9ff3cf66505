/// Two clicks on the same entity closer than this count as a double click (seconds).
pub const DOUBLE_CLICK_SECS: f32 = 0.3;

/// Pinned info panels hide themselves after this long (seconds).
pub const INFO_AUTO_DISMISS_SECS: f32 = 10.0;

/// Margin between the info panel and the viewport edge / anchor (pixels).
pub const INFO_PANEL_MARGIN: f32 = 20.0;

/// Info panel size used for placement (pixels).
pub const INFO_PANEL_SIZE: [f32; 2] = [360.0, 240.0];

/// Pointer travel above which a press-release is a drag, not a click (pixels).
pub const CLICK_DRAG_THRESHOLD: f32 = 5.0;

/// Scale multiplier and duration of the click pulse.
pub const CLICK_PULSE_SCALE: f32 = 1.2;
pub const CLICK_PULSE_SECS: f32 = 0.3;

/// Certificate carousel advance interval and emphasis pulse (seconds).
pub const CAROUSEL_INTERVAL_SECS: f32 = 2.0;
pub const CAROUSEL_EMPHASIS_SECS: f32 = 0.5;
pub const CAROUSEL_EMPHASIS_PEAK: f32 = 1.2;

/// Instruction banner timing in the exhibit room (seconds).
pub const INSTRUCTION_REVEAL_SECS: f32 = 0.3;
pub const INSTRUCTION_HIDE_SECS: f32 = 10.0;

/// Ancestor hops walked when resolving a hit to its tagged entity.
pub const MAX_TAG_DEPTH: usize = 32;
