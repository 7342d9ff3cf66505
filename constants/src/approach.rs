/// Delay of the portal-open cue after the approach begins (seconds).
pub const PORTAL_CUE_DELAY_SECS: f32 = 1.88;

/// Intro music volume.
pub const INTRO_VOLUME: f32 = 0.5;
