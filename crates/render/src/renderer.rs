use crossfield_scene::{NodeKind, Scene};
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene, including its camera, and produces output.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the scene.
    fn render(&self, scene: &Scene) -> Self::Output;
}

/// Human-readable dump of the scene graph.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Print one line per box instead of only the count.
    pub list_boxes: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boxes() -> Self {
        Self { list_boxes: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene) -> String {
        let mut out = String::new();
        let cam = scene.camera();
        let mat = scene.material();
        let _ = writeln!(
            out,
            "=== Scene (nodes={}, boxes={}) ===",
            scene.node_count(),
            scene.box_count()
        );
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target.x,
            cam.target.y,
            cam.target.z,
            cam.fov_degrees
        );
        let _ = writeln!(
            out,
            "Material: roughness={:.2} metalness={:.2} env_intensity={:.2} env_map={}",
            mat.roughness,
            mat.metalness,
            mat.env_map_intensity,
            mat.env_map.as_deref().unwrap_or("none")
        );

        for (id, node) in scene.children() {
            match &node.kind {
                NodeKind::Camera(_) => {}
                NodeKind::AmbientLight(l) => {
                    let _ = writeln!(out, "  [{}] ambient intensity={:.1}", id.short(), l.intensity);
                }
                NodeKind::RectLight(l) => {
                    let _ = writeln!(
                        out,
                        "  [{}] rect_light pos=({:.1}, {:.1}, {:.1}) intensity={:.1} visible={}",
                        id.short(),
                        l.position.x,
                        l.position.y,
                        l.position.z,
                        l.intensity,
                        l.visible
                    );
                }
                NodeKind::Box(b) if self.list_boxes => {
                    let _ = writeln!(
                        out,
                        "  [{}] box pos=({:.2}, {:.2}, {:.2}) size={:.2}",
                        id.short(),
                        b.position.x,
                        b.position.y,
                        b.position.z,
                        b.size
                    );
                }
                NodeKind::Box(_) => {}
            }
        }

        out
    }
}
