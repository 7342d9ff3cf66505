/// Progress added per tick while the teleport is running (50 ticks to complete).
pub const PROGRESS_STEP: f32 = 0.02;

/// Progress at which the portal effect reaches full intensity.
pub const INTENSITY_THRESHOLD: f32 = 0.5;

/// Portal sphere scale at progress 0 and 1.
pub const EFFECT_START_SCALE: f32 = 5.0;
pub const EFFECT_END_SCALE: f32 = 10.0;

/// Delay of the second portal cue after the trigger (seconds).
pub const SECOND_CUE_DELAY_SECS: f32 = 1.5;
