pub mod clock;
pub mod gpu_context;
pub mod triangle_intersection;

pub use clock::Clock;
pub use gpu_context::{GpuContext, RenderError};
pub use triangle_intersection::{moller_trumbore_intersect, nearest_triangle_hit};
