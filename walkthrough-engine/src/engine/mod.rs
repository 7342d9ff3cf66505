pub mod audio;
pub mod avatar;
pub mod camera;
pub mod core;
pub mod loading;
pub mod scene;
pub mod systems;
pub mod transition;
pub mod ui;
