/// Distance the avatar covers per tick while walking.
pub const WALK_STEP: f32 = 1.3;

/// Distance below which a waypoint counts as reached.
pub const ARRIVE_TOLERANCE: f32 = 1.0;

/// Exponential smoothing factor applied to the facing angle each tick.
pub const TURN_SMOOTHING: f32 = 0.1;

/// Where the avatar stands before the approach begins.
pub const START_POSITION: [f32; 3] = [-240.0, -12.5, 15.0];

/// Initial facing angle around Y (radians).
pub const START_FACING: f32 = std::f32::consts::FRAC_PI_2;

/// Door, then sofa.
pub const WAYPOINTS: &[[f32; 3]] = &[[-24.9, -12.5, 0.0], [0.0, -8.5, 9.0]];

/// Pose the avatar snaps to once seated, so the sit clip lines up with the sofa.
pub const SEAT_POSITION: [f32; 3] = [0.0, -10.2, 14.5];
pub const SEAT_FACING: f32 = std::f32::consts::PI;

/// Delay between sitting down and the teleport prompt appearing (seconds).
/// Covers the stand-to-sit clip plus a short pause.
pub const SIT_PROMPT_DELAY_SECS: f32 = 2.5;

/// Uniform scale applied to the avatar model.
pub const AVATAR_SCALE: f32 = 0.1;
