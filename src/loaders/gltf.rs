use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{EulerRot, Quat, Vec3};
use thiserror::Error;

use crate::math::Color;
use crate::scene::{Geometry, GeometryKind, Material, MaterialId, NodeId, SceneGraph, Transform};

/// Where imported models are placed.
pub const IMPORT_POSITION: Vec3 = Vec3::new(3.0, 0.0, 3.0);

pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["glb", "gltf"];

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported model file `{0}`, expected .glb or .gltf")]
    UnsupportedExtension(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid glTF data: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("mesh `{0}` has a primitive without positions")]
    MissingPositions(String),
}

pub fn is_supported_model(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.iter().any(|s| ext.eq_ignore_ascii_case(s)))
}

/// Display name for an imported file: everything before the first `.`.
pub fn model_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}

/// Reads `path` and imports it with [`import_model`].
pub fn import_model_file(scene: &mut SceneGraph, path: impl AsRef<Path>) -> Result<NodeId, ImportError> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_supported_model(path) {
        return Err(ImportError::UnsupportedExtension(file_name));
    }
    let bytes = std::fs::read(path).map_err(|source| ImportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_model(scene, &bytes, &file_name)
}

/// Parses a glTF/GLB payload and adds it to `scene` as one top-level group
/// named after `file_name`, placed at [`IMPORT_POSITION`].
pub fn import_model(scene: &mut SceneGraph, bytes: &[u8], file_name: &str) -> Result<NodeId, ImportError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;

    let gltf_scene = document.default_scene().or_else(|| document.scenes().next());
    log::debug!(
        "parsed {}: {} nodes, {} meshes, {} materials",
        file_name,
        document.nodes().count(),
        document.meshes().count(),
        document.materials().count()
    );

    // Parse everything before touching the scene so a bad file adds nothing.
    let mut builder = ModelBuilder {
        buffers: &buffers,
        nodes: Vec::new(),
    };
    if let Some(gltf_scene) = &gltf_scene {
        for node in gltf_scene.nodes() {
            builder.process_node(&node, None)?;
        }
    }

    let group = scene.add_group(scene.root(), model_name(file_name), Transform::from_position(IMPORT_POSITION));
    let mut created: Vec<NodeId> = Vec::with_capacity(builder.nodes.len());
    let mut materials: HashMap<Option<usize>, MaterialId> = HashMap::new();

    for pending in builder.nodes {
        let parent = pending.parent.map_or(group, |i| created[i]);
        let id = match pending.mesh {
            Some(mesh) => {
                let material = *materials
                    .entry(mesh.material_index)
                    .or_insert_with(|| scene.materials_mut().insert(mesh.material.clone()));
                scene.add_mesh(parent, pending.name, pending.transform, Arc::new(mesh.geometry), material)
            }
            None => scene.add_group(parent, pending.name, pending.transform),
        };
        created.push(id);
    }

    let triangles: usize = scene
        .mesh_descendants(group)
        .iter()
        .filter_map(|id| scene.node(*id)?.mesh().map(|m| m.geometry.triangle_count()))
        .sum();
    log::info!(
        "imported `{}`: {} nodes, {} triangles",
        model_name(file_name),
        created.len(),
        triangles
    );
    Ok(group)
}

struct PendingMesh {
    geometry: Geometry,
    material: Material,
    material_index: Option<usize>,
}

struct PendingNode {
    parent: Option<usize>,
    name: String,
    transform: Transform,
    mesh: Option<PendingMesh>,
}

struct ModelBuilder<'a> {
    buffers: &'a [gltf::buffer::Data],
    nodes: Vec<PendingNode>,
}

impl ModelBuilder<'_> {
    /// Single-primitive meshes become the node itself; otherwise the node is a
    /// group with one child per primitive.
    fn process_node(&mut self, node: &gltf::Node, parent: Option<usize>) -> Result<(), ImportError> {
        let name = node.name().unwrap_or_default().to_string();
        let transform = node_transform(node);

        let mut primitives = match node.mesh() {
            Some(mesh) => self.process_mesh(&mesh)?,
            None => Vec::new(),
        };

        let index = self.nodes.len();
        if primitives.len() == 1 {
            self.nodes.push(PendingNode {
                parent,
                name,
                transform,
                mesh: primitives.pop(),
            });
        } else {
            self.nodes.push(PendingNode {
                parent,
                name,
                transform,
                mesh: None,
            });
            for mesh in primitives {
                self.nodes.push(PendingNode {
                    parent: Some(index),
                    name: String::new(),
                    transform: Transform::IDENTITY,
                    mesh: Some(mesh),
                });
            }
        }

        for child in node.children() {
            self.process_node(&child, Some(index))?;
        }
        Ok(())
    }

    fn process_mesh(&self, mesh: &gltf::Mesh) -> Result<Vec<PendingMesh>, ImportError> {
        let mut out = Vec::new();
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("skipping {:?} primitive in mesh {:?}", primitive.mode(), mesh.name());
                continue;
            }
            let reader = primitive.reader(|buffer| self.buffers.get(buffer.index()).map(|data| &data.0[..]));
            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| ImportError::MissingPositions(mesh.name().unwrap_or_default().to_string()))?
                .map(Vec3::from_array)
                .collect();

            let count = positions.len() as u32;
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices
                    .into_u32()
                    .collect::<Vec<_>>()
                    .chunks_exact(3)
                    .filter(|tri| tri.iter().all(|i| *i < count))
                    .flatten()
                    .copied()
                    .collect(),
                None => (0..count - count % 3).collect(),
            };

            let gltf_material = primitive.material();
            let pbr = gltf_material.pbr_metallic_roughness();
            let [r, g, b, a] = pbr.base_color_factor();
            let mut material = Material::standard(Color::new(r, g, b));
            material.opacity = a;
            material.roughness = pbr.roughness_factor();
            material.metalness = pbr.metallic_factor();
            material.emissive = Color::from_array(gltf_material.emissive_factor());
            if let Some(name) = gltf_material.name() {
                material = material.named(name);
            }

            out.push(PendingMesh {
                geometry: Geometry::new(GeometryKind::Imported, positions, indices),
                material,
                material_index: gltf_material.index(),
            });
        }
        Ok(out)
    }
}

fn node_transform(node: &gltf::Node) -> Transform {
    let (translation, rotation, scale) = node.transform().decomposed();
    let (x, y, z) = Quat::from_array(rotation).to_euler(EulerRot::XYZ);
    Transform {
        position: Vec3::from_array(translation),
        rotation: Vec3::new(x, y, z),
        scale: Vec3::from_array(scale),
    }
}
