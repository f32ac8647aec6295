pub mod manipulator;
pub mod navigator;
pub mod scene_host;

pub use manipulator::*;
pub use navigator::*;
pub use scene_host::*;
