//! Software-projected scene view painted with egui.
//!
//! Triangles are projected through the camera, flat shaded and drawn back to
//! front as a single `egui::Mesh`, so the GPU only ever runs the egui pass.

use egui::{Color32, Pos2, Rect, Sense, Shape, Stroke};
use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::editor::{Editor, PointerButton};
use crate::gizmo::HandleLine;
use crate::math::Color;
use crate::scene::{Light, LightKind, NodeId, SceneGraph};
use crate::selection::Axis;

/// Pixels of wheel scroll per zoom notch.
const SCROLL_PER_NOTCH: f32 = 50.0;
const HANDLE_WIDTH: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadedTriangle {
    pub points: [Vec2; 3],
    pub depth: f32,
    pub color: Color32,
}

/// Projects and lights every mesh triangle, farthest first.
pub fn shade_scene(scene: &SceneGraph, camera: &Camera, viewport: Vec2) -> Vec<ShadedTriangle> {
    let lights = scene.lights();
    let mut triangles = Vec::new();

    for (id, node) in scene.iter() {
        let Some(mesh) = node.mesh() else {
            continue;
        };
        let Some(material) = scene.materials().get(mesh.material) else {
            continue;
        };
        let world = scene.world_matrix(id);
        let alpha = (material.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        let positions = &mesh.geometry.positions;

        for tri in mesh.geometry.indices.chunks_exact(3) {
            let (Some(a), Some(b), Some(c)) = (
                positions.get(tri[0] as usize),
                positions.get(tri[1] as usize),
                positions.get(tri[2] as usize),
            ) else {
                continue;
            };
            let world_points = [a, b, c].map(|p| world.transform_point3(*p));
            let Some(projected) = project_triangle(camera, &world_points, viewport) else {
                continue;
            };

            let centroid = (world_points[0] + world_points[1] + world_points[2]) / 3.0;
            let mut normal = (world_points[1] - world_points[0]).cross(world_points[2] - world_points[0]);
            if normal.length_squared() < 1e-12 {
                continue;
            }
            normal = normal.normalize();
            if normal.dot(camera.position - centroid) < 0.0 {
                normal = -normal;
            }

            let lit = shade(material.color, material.emissive, centroid, normal, &lights);
            triangles.push(ShadedTriangle {
                points: [projected[0].truncate(), projected[1].truncate(), projected[2].truncate()],
                depth: (projected[0].z + projected[1].z + projected[2].z) / 3.0,
                color: to_color32(lit, alpha),
            });
        }
    }

    triangles.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    triangles
}

fn project_triangle(camera: &Camera, points: &[Vec3; 3], viewport: Vec2) -> Option<[Vec3; 3]> {
    let projected = [
        camera.project(points[0], viewport)?,
        camera.project(points[1], viewport)?,
        camera.project(points[2], viewport)?,
    ];
    let outside = |test: &dyn Fn(&Vec3) -> bool| projected.iter().all(test);
    if outside(&|p| p.x < 0.0)
        || outside(&|p| p.y < 0.0)
        || outside(&|p| p.x > viewport.x)
        || outside(&|p| p.y > viewport.y)
    {
        return None;
    }
    Some(projected)
}

/// Lambert diffuse from ambient, directional and point lights.
fn shade(base: Color, emissive: Color, point: Vec3, normal: Vec3, lights: &[(NodeId, Vec3, Light)]) -> Color {
    let mut irradiance = Color::BLACK;
    for (_, position, light) in lights {
        let radiance = light.color.scaled(light.intensity);
        let factor = match light.kind {
            LightKind::Ambient => 1.0,
            LightKind::Directional => normal.dot(position.normalize_or_zero()).max(0.0),
            LightKind::Point { range } => {
                let to_light = *position - point;
                let distance = to_light.length();
                if distance < 1e-6 {
                    continue;
                }
                let mut falloff = 1.0 / (distance * distance).max(0.01);
                if range > 0.0 {
                    falloff *= (1.0 - (distance / range).powi(4)).clamp(0.0, 1.0).powi(2);
                }
                normal.dot(to_light / distance).max(0.0) * falloff
            }
        };
        irradiance = irradiance + radiance.scaled(factor);
    }
    base * irradiance + emissive
}

fn to_color32(color: Color, alpha: u8) -> Color32 {
    let [r, g, b] = color.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    Color32::from_rgba_unmultiplied(r, g, b, alpha)
}

/// One mesh holding every triangle, offset to `origin`.
pub fn build_mesh(origin: Pos2, triangles: &[ShadedTriangle]) -> egui::Mesh {
    let mut mesh = egui::Mesh::default();
    for tri in triangles {
        let base = mesh.vertices.len() as u32;
        for p in tri.points {
            mesh.colored_vertex(origin + egui::vec2(p.x, p.y), tri.color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }
    mesh
}

pub fn axis_color(axis: Axis, active: bool) -> Color32 {
    if active {
        return Color32::from_rgb(255, 255, 0);
    }
    match axis {
        Axis::X => Color32::from_rgb(255, 64, 64),
        Axis::Y => Color32::from_rgb(64, 220, 64),
        Axis::Z => Color32::from_rgb(64, 128, 255),
    }
}

fn handle_shapes(lines: &[HandleLine], camera: &Camera, rect: Rect) -> Vec<Shape> {
    let viewport = Vec2::new(rect.width(), rect.height());
    lines
        .iter()
        .map(|line| {
            let points: Vec<Pos2> = line
                .points
                .iter()
                .filter_map(|p| camera.project(*p, viewport))
                .map(|p| rect.min + egui::vec2(p.x, p.y))
                .collect();
            Shape::line(points, Stroke::new(HANDLE_WIDTH, axis_color(line.axis, line.active)))
        })
        .collect()
}

/// Paints the scene into the remaining space of `ui` and feeds pointer input
/// back into the editor.
pub fn show(ui: &mut egui::Ui, editor: &mut Editor) {
    let rect = ui.available_rect_before_wrap();
    let response = ui.allocate_rect(rect, Sense::click_and_drag());
    let viewport = Vec2::new(rect.width(), rect.height());
    editor.camera.resize(viewport.x, viewport.y);

    let local = |pos: Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);

    if let Some(pos) = response.hover_pos() {
        if !editor.gizmo.is_dragging() {
            editor.pointer_hover(local(pos), viewport);
        }
    }

    let (pressed, released, primary, delta, scroll) = ui.input(|i| {
        (
            i.pointer.any_pressed(),
            i.pointer.any_released(),
            i.pointer.primary_pressed() || i.pointer.primary_down(),
            i.pointer.delta(),
            i.smooth_scroll_delta.y,
        )
    });

    if pressed && response.hovered() {
        if let Some(pos) = response.interact_pointer_pos().or(response.hover_pos()) {
            let button = if primary { PointerButton::Primary } else { PointerButton::Secondary };
            editor.pointer_down(local(pos), viewport, button);
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            editor.pointer_drag(local(pos), Vec2::new(delta.x, delta.y), viewport);
        }
    }
    if released {
        editor.pointer_up();
    }
    if response.hovered() && scroll != 0.0 {
        editor.scroll(scroll / SCROLL_PER_NOTCH);
    }

    let triangles = shade_scene(&editor.scene, &editor.camera, viewport);
    let painter = ui.painter_at(rect);
    painter.add(Shape::mesh(build_mesh(rect.min, &triangles)));
    painter.extend(handle_shapes(
        &editor.gizmo.handle_lines(&editor.scene, &editor.camera),
        &editor.camera,
        rect,
    ));
}
