//! In-memory scene graph that the editor picks from, highlights and edits.

mod geometry;
mod graph;
mod material;
mod node;
mod transform;

pub use geometry::{Geometry, GeometryKind};
pub use graph::{Hit, SceneGraph};
pub use material::{Material, MaterialId, MaterialLibrary};
pub use node::{Light, LightKind, MeshPart, Node, NodeId, NodeKind};
pub use transform::Transform;
