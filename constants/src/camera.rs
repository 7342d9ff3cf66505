/// Static framing shown while loading and before the approach.
pub const TOP_VIEW_POSITION: [f32; 3] = [-400.0, 200.0, 150.0];
pub const TOP_VIEW_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Offset from the avatar the following camera converges to.
pub const FOLLOW_OFFSET: [f32; 3] = [-55.0, 15.0, 5.0];

/// Shared lerp factor for camera position and look target.
pub const FOLLOW_SMOOTHING: f32 = 0.1;

/// Camera framing of the screen once the avatar is seated.
pub const SIT_POSITION: [f32; 3] = [0.0, 5.0, 49.0];
pub const SIT_TARGET: [f32; 3] = [0.0, 19.0, -69.8];

/// Exhibit room camera pose after the hand-off.
pub const EXHIBIT_POSITION: [f32; 3] = [125.0, -5.0, -10.0];
pub const EXHIBIT_TARGET: [f32; 3] = [0.0, 0.0, 0.0];

/// Radians per pixel of drag.
pub const DRAG_SENSITIVITY: f32 = 0.005;

/// Fraction of the orbit radius changed per wheel line.
pub const ZOOM_SENSITIVITY: f32 = 0.1;

pub const MIN_ORBIT_RADIUS: f32 = 10.0;
pub const MAX_ORBIT_RADIUS: f32 = 600.0;

/// Pitch limit for the free camera, just short of straight up/down.
pub const MAX_PITCH: f32 = 1.55;
