use glam::Mat4;

use crate::math::Color;
use crate::scene::{MaterialId, NodeId, Transform};

/// Upward links of a node hierarchy.
pub trait ParentLinks {
    /// Node everything hangs from; objects directly below it are selectable units.
    fn root(&self) -> NodeId;

    /// Parent of `node`, `None` for the root or a detached node.
    fn parent_of(&self, node: NodeId) -> Option<NodeId>;
}

/// Walks parent links from `node` up to the node whose parent is the root.
///
/// A node with no parent (detached, or the root itself) is its own top-level ancestor.
pub fn top_level_ancestor<L: ParentLinks + ?Sized>(links: &L, node: NodeId) -> NodeId {
    let root = links.root();
    let mut current = node;
    while let Some(parent) = links.parent_of(current) {
        if parent == root {
            break;
        }
        current = parent;
    }
    current
}

/// Local-to-world matrix of `node` composed from its own and every ancestor's transform.
pub fn world_matrix<H: SceneHost + ?Sized>(host: &H, node: NodeId) -> Mat4 {
    let mut matrix = Mat4::IDENTITY;
    let mut current = Some(node);
    while let Some(id) = current {
        let Some(transform) = host.transform(id) else {
            break;
        };
        matrix = transform.matrix() * matrix;
        current = host.parent_of(id);
    }
    matrix
}

/// Scene access the selection engine and the gizmo need.
pub trait SceneHost: ParentLinks {
    fn name(&self, node: NodeId) -> Option<&str>;

    /// Fallback label for unnamed nodes ("Mesh", "Group", ...).
    fn kind_label(&self, node: NodeId) -> &'static str;

    fn transform(&self, node: NodeId) -> Option<Transform>;

    /// Returns `false` when `node` does not exist.
    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool;

    /// Renderable nodes in the subtree of `node`, including `node` itself.
    fn mesh_nodes(&self, node: NodeId) -> Vec<NodeId>;

    fn material(&self, mesh: NodeId) -> Option<MaterialId>;

    fn set_material(&mut self, mesh: NodeId, material: MaterialId) -> bool;

    /// New material equal to `material` except for its base color.
    fn clone_material_with_color(&mut self, material: MaterialId, color: Color) -> Option<MaterialId>;

    fn release_material(&mut self, material: MaterialId);
}
