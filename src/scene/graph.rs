use glam::Mat4;
use std::sync::Arc;

use crate::core::triangle_intersection::nearest_triangle_hit;
use crate::math::{intersect_aabb, Color, Ray, AABB};
use crate::traits::{ParentLinks, SceneHost};

use super::geometry::Geometry;
use super::material::{MaterialId, MaterialLibrary};
use super::node::{Light, MeshPart, Node, NodeId, NodeKind};
use super::transform::Transform;

/// One ray/mesh intersection, `distance` in world units along the ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// Node arena with a single root plus the materials its meshes reference.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    materials: MaterialLibrary,
    pub background: Color,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            nodes: vec![Some(Node::new("", NodeKind::Scene, Transform::IDENTITY))],
            root: NodeId(0),
            materials: MaterialLibrary::new(),
            background: Color::from_hex(0x222222),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn materials(&self) -> &MaterialLibrary {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut MaterialLibrary {
        &mut self.materials
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Live nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i), n)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> {
        self.nodes
            .iter_mut()
            .enumerate()
            .filter_map(|(i, n)| n.as_mut().map(|n| (NodeId(i), n)))
    }

    /// Adds `node` under `parent`. Falls back to the root if `parent` is gone.
    pub fn add_node(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let parent = if self.contains(parent) { parent } else { self.root };
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(Some(node));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        id
    }

    pub fn add_group(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform) -> NodeId {
        self.add_node(parent, Node::new(name, NodeKind::Group, transform))
    }

    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        transform: Transform,
        geometry: Arc<Geometry>,
        material: MaterialId,
    ) -> NodeId {
        let mesh = MeshPart { geometry, material };
        self.add_node(parent, Node::new(name, NodeKind::Mesh(mesh), transform))
    }

    pub fn add_light(&mut self, parent: NodeId, name: impl Into<String>, transform: Transform, light: Light) -> NodeId {
        self.add_node(parent, Node::new(name, NodeKind::Light(light), transform))
    }

    /// Removes `id` and everything below it. The root cannot be removed.
    /// Returns the number of nodes removed.
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        if id == self.root || !self.contains(id) {
            return 0;
        }
        let doomed = self.descendants(id);
        if let Some(parent) = self.node(id).and_then(Node::parent) {
            if let Some(p) = self.node_mut(parent) {
                p.children.retain(|c| *c != id);
            }
        }
        for node in &doomed {
            self.nodes[node.0] = None;
        }
        doomed.len()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    pub fn top_level_children(&self) -> &[NodeId] {
        self.children(self.root)
    }

    /// Pre-order walk of the subtree rooted at `id`, `id` first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev().copied());
        }
        out
    }

    pub fn mesh_descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|n| self.node(*n).and_then(Node::mesh).is_some())
            .collect()
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.node(node_id) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// World-space bounds of every mesh below `id`.
    pub fn world_bounds(&self, id: NodeId) -> AABB {
        self.mesh_descendants(id)
            .into_iter()
            .filter_map(|n| {
                let mesh = self.node(n)?.mesh()?;
                Some(mesh.geometry.bounds().transformed(&self.world_matrix(n)))
            })
            .fold(AABB::empty(), |acc, b| acc.union(&b))
    }

    /// Every light with its world-space position.
    pub fn lights(&self) -> Vec<(NodeId, glam::Vec3, Light)> {
        self.iter()
            .filter_map(|(id, node)| {
                let light = *node.light()?;
                Some((id, self.world_matrix(id).transform_point3(glam::Vec3::ZERO), light))
            })
            .collect()
    }

    pub fn set_material(&mut self, mesh: NodeId, material: MaterialId) -> bool {
        match self.node_mut(mesh).and_then(Node::mesh_mut) {
            Some(part) => {
                part.material = material;
                true
            }
            None => false,
        }
    }

    /// Intersects `ray` with every mesh and returns the hits nearest first.
    pub fn hit_test(&self, ray: &Ray) -> Vec<Hit> {
        let mut hits: Vec<Hit> = self
            .iter()
            .filter_map(|(id, node)| {
                let mesh = node.mesh()?;
                let world = self.world_matrix(id);
                let bounds = mesh.geometry.bounds().transformed(&world);
                if intersect_aabb(ray.origin, ray.direction, bounds.min, bounds.max) < 0.0 {
                    return None;
                }
                let distance =
                    nearest_triangle_hit(ray, &mesh.geometry.positions, &mesh.geometry.indices, &world)?;
                Some(Hit { node: id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl ParentLinks for SceneGraph {
    fn root(&self) -> NodeId {
        self.root
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).and_then(Node::parent)
    }
}

impl SceneHost for SceneGraph {
    fn name(&self, node: NodeId) -> Option<&str> {
        self.node(node).map(|n| n.name.as_str())
    }

    fn kind_label(&self, node: NodeId) -> &'static str {
        self.node(node).map(|n| n.kind.label()).unwrap_or("Object3D")
    }

    fn transform(&self, node: NodeId) -> Option<Transform> {
        self.node(node).map(|n| n.transform)
    }

    fn set_transform(&mut self, node: NodeId, transform: Transform) -> bool {
        match self.node_mut(node) {
            Some(n) => {
                n.transform = transform;
                true
            }
            None => false,
        }
    }

    fn mesh_nodes(&self, node: NodeId) -> Vec<NodeId> {
        self.mesh_descendants(node)
    }

    fn material(&self, mesh: NodeId) -> Option<MaterialId> {
        self.node(mesh).and_then(Node::mesh).map(|m| m.material)
    }

    fn set_material(&mut self, mesh: NodeId, material: MaterialId) -> bool {
        SceneGraph::set_material(self, mesh, material)
    }

    fn clone_material_with_color(&mut self, material: MaterialId, color: Color) -> Option<MaterialId> {
        self.materials.clone_with_color(material, color)
    }

    fn release_material(&mut self, material: MaterialId) {
        self.materials.release(material);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Material;
    use crate::traits::top_level_ancestor;
    use glam::Vec3;

    fn cube_scene() -> (SceneGraph, NodeId, NodeId) {
        let mut scene = SceneGraph::new();
        let material = scene.materials_mut().insert(Material::standard(Color::WHITE));
        let geometry = Arc::new(Geometry::cuboid(1.0, 1.0, 1.0));
        let near = scene.add_mesh(
            scene.root(),
            "near",
            Transform::from_position(Vec3::new(0.0, 0.0, -3.0)),
            geometry.clone(),
            material,
        );
        let far = scene.add_mesh(
            scene.root(),
            "far",
            Transform::from_position(Vec3::new(0.0, 0.0, -8.0)),
            geometry,
            material,
        );
        (scene, near, far)
    }

    #[test]
    fn test_hit_test_orders_nearest_first() {
        let (scene, near, far) = cube_scene();
        let hits = scene.hit_test(&Ray::new(Vec3::ZERO, Vec3::NEG_Z));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert_eq!(hits[1].node, far);
        assert!((hits[0].distance - 2.5).abs() < 1e-4);
        assert!((hits[1].distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn test_hit_test_miss_is_empty() {
        let (scene, _, _) = cube_scene();
        assert!(scene.hit_test(&Ray::new(Vec3::ZERO, Vec3::Z)).is_empty());
        assert!(scene.hit_test(&Ray::new(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z)).is_empty());
    }

    #[test]
    fn test_hit_test_uses_parent_transform() {
        let mut scene = SceneGraph::new();
        let material = scene.materials_mut().insert(Material::standard(Color::WHITE));
        let group = scene.add_group(scene.root(), "model", Transform::from_position(Vec3::new(3.0, 0.0, 3.0)));
        let mesh = scene.add_mesh(group, "", Transform::IDENTITY, Arc::new(Geometry::cuboid(1.0, 1.0, 1.0)), material);

        let hits = scene.hit_test(&Ray::new(Vec3::new(3.0, 10.0, 3.0), Vec3::NEG_Y));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, mesh);
        assert_eq!(top_level_ancestor(&scene, hits[0].node), group);
    }

    #[test]
    fn test_descendants_pre_order() {
        let mut scene = SceneGraph::new();
        let a = scene.add_group(scene.root(), "a", Transform::IDENTITY);
        let b = scene.add_group(a, "b", Transform::IDENTITY);
        let c = scene.add_group(b, "c", Transform::IDENTITY);
        let d = scene.add_group(a, "d", Transform::IDENTITY);
        assert_eq!(scene.descendants(a), vec![a, b, c, d]);
        assert_eq!(scene.top_level_children(), &[a]);
    }

    #[test]
    fn test_remove_subtree() {
        let mut scene = SceneGraph::new();
        let a = scene.add_group(scene.root(), "a", Transform::IDENTITY);
        let b = scene.add_group(a, "b", Transform::IDENTITY);
        let keep = scene.add_group(scene.root(), "keep", Transform::IDENTITY);

        assert_eq!(scene.remove_subtree(a), 2);
        assert!(!scene.contains(a));
        assert!(!scene.contains(b));
        assert_eq!(scene.top_level_children(), &[keep]);
        assert_eq!(scene.remove_subtree(scene.root()), 0);
    }

    #[test]
    fn test_add_under_missing_parent_falls_back_to_root() {
        let mut scene = SceneGraph::new();
        let a = scene.add_group(scene.root(), "a", Transform::IDENTITY);
        scene.remove_subtree(a);
        let b = scene.add_group(a, "b", Transform::IDENTITY);
        assert_eq!(scene.parent_of(b), Some(scene.root()));
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let (scene, near, _) = cube_scene();
        let bounds = scene.world_bounds(near);
        assert!((bounds.center() - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-5);
    }

    #[test]
    fn test_kind_label_for_unnamed_nodes() {
        let (scene, near, _) = cube_scene();
        assert_eq!(scene.kind_label(near), "Mesh");
        assert_eq!(scene.kind_label(scene.root()), "Scene");
    }
}
