pub mod app;
pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod editor;
pub mod gizmo;
pub mod loaders;
pub mod math;
pub mod navigator;
pub mod scene;
pub mod scenes;
pub mod selection;
pub mod traits;
pub mod ui;
pub mod viewport;

pub use editor::Editor;
pub use scene::SceneGraph;
pub use selection::{Axis, EngineCapabilities, SelectionEngine, TransformField, TransformMirror};
