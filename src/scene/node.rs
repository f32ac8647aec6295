use std::sync::Arc;

use crate::math::Color;

use super::geometry::Geometry;
use super::material::MaterialId;
use super::transform::Transform;

/// Handle into a [`super::SceneGraph`]. Handles are never reused after removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional,
    Point { range: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
}

/// Renderable part of a node: shared geometry plus the material it is drawn with.
#[derive(Clone, Debug)]
pub struct MeshPart {
    pub geometry: Arc<Geometry>,
    pub material: MaterialId,
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Scene,
    Group,
    Mesh(MeshPart),
    Light(Light),
}

impl NodeKind {
    /// Label shown when a picked object has no name.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Scene => "Scene",
            NodeKind::Group => "Group",
            NodeKind::Mesh(_) => "Mesh",
            NodeKind::Light(light) => match light.kind {
                LightKind::Ambient => "AmbientLight",
                LightKind::Directional => "DirectionalLight",
                LightKind::Point { .. } => "PointLight",
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub kind: NodeKind,
    pub transform: Transform,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub fn new(name: impl Into<String>, kind: NodeKind, transform: Transform) -> Self {
        Self {
            name: name.into(),
            kind,
            transform,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn mesh(&self) -> Option<&MeshPart> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn mesh_mut(&mut self) -> Option<&mut MeshPart> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}
