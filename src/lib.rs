pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod export;
pub mod material;
pub mod math;
pub mod render;
pub mod scene;
pub mod scenes;
pub mod types;
pub mod viewport;

pub use scenes::create_facade_scene;
