use glam::Vec3;
use shadowbox_scene::{Light, NodeKind, Scene, Shading};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(8.0, 8.0, 12.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Text renderer for terminals, logs, and tests.
///
/// Produces one line per node with its world position and payload summary.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let mesh_count = scene.meshes().count();
        out.push_str(&format!(
            "=== Scene ({} nodes, {} meshes) ===\n",
            scene.node_count(),
            mesh_count
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        for (id, node) in scene.iter() {
            let world = scene
                .world_transform(id)
                .map(|m| m.transform_point3(Vec3::ZERO))
                .unwrap_or(Vec3::ZERO);
            let what = match &node.kind {
                NodeKind::Group => format!("group ({} children)", scene.children(id).len()),
                NodeKind::Mesh(mesh) => {
                    let shading = match mesh.material.shading {
                        Shading::Lit => "lit",
                        Shading::Unlit => "unlit",
                    };
                    format!(
                        "mesh {} #{}{}{}",
                        shading,
                        mesh.material.color.to_hex(),
                        if mesh.cast_shadow { " casts" } else { "" },
                        if mesh.receive_shadow { " receives" } else { "" },
                    )
                }
                NodeKind::Light(Light::Ambient(light)) => {
                    format!("ambient #{} x{:.2}", light.color.to_hex(), light.intensity)
                }
                NodeKind::Light(Light::Directional(light)) => format!(
                    "directional #{} x{:.2}{}",
                    light.color.to_hex(),
                    light.intensity,
                    if light.cast_shadow { " casts" } else { "" },
                ),
            };
            out.push_str(&format!(
                "  [{}] {:<12} pos=({:.2}, {:.2}, {:.2}) {}\n",
                id.short(),
                node.name.as_deref().unwrap_or("-"),
                world.x,
                world.y,
                world.z,
                what
            ));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowbox_scene::{
        AmbientLight, Geometry, Material, MaterialConfig, Mesh, Node,
    };

    fn unit_box() -> Mesh {
        Mesh::new(
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::lit(MaterialConfig::default()),
        )
    }

    #[test]
    fn renders_empty_scene_header() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("0 nodes"));
        assert!(output.contains("fov=45"));
    }

    #[test]
    fn renders_node_names_and_payloads() {
        let mut scene = Scene::new();
        scene.add(Node::mesh(unit_box()).with_name("ground"));
        scene.add(Node::light(Light::Ambient(AmbientLight::default())).with_name("fill"));

        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("ground"));
        assert!(output.contains("fill"));
        assert!(output.contains("ambient #ffffff"));
        assert!(output.contains("2 nodes"));
        assert!(output.contains("1 meshes"));
    }
}
