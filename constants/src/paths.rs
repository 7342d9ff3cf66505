/// Walkthrough tuning, loaded through the JSON asset plugin.
pub const CONFIG_PATH: &str = "config/default.walkthrough.json";

/// Exhibit descriptions, models and carousel images for the second room.
pub const CATALOGUE_PATH: &str = "config/exhibits.catalogue.json";

pub const AVATAR_MODEL_PATH: &str = "models/avatar.glb";
pub const WALK_CLIP_PATH: &str = "models/avatar_walk.glb";
pub const SIT_CLIP_PATH: &str = "models/avatar_sit.glb";
pub const LIVING_ROOM_PATH: &str = "models/living_room.glb";

pub const INTRO_CUE_PATH: &str = "sounds/intro.ogg";
pub const CLICK_CUE_PATH: &str = "sounds/click.ogg";
pub const PORTAL_OPEN_CUE_PATH: &str = "sounds/portal_open.ogg";
pub const PORTAL_SECOND_CUE_PATH: &str = "sounds/portal_second.ogg";
