use crate::inspector::SceneSummary;
use crossfield_pattern::{BOX_SIZE, Pattern, Spacing};
use crossfield_scene::{MaterialParam, RegenerateReport, Scene};

/// A parameter edit made in the control panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamChange {
    /// Direct assignment to the shared material.
    Material(MaterialParam, f32),
    /// New spacing; requires full box regeneration.
    Spacing(Spacing),
}

/// Apply a panel edit. Returns the regeneration report for spacing changes.
pub fn apply_change(
    scene: &mut Scene,
    pattern: &Pattern,
    change: ParamChange,
) -> Option<RegenerateReport> {
    match change {
        ParamChange::Material(param, value) => {
            scene.set_material_param(param, value);
            tracing::debug!(%param, value, "material updated");
            None
        }
        ParamChange::Spacing(spacing) => {
            let placements = pattern.generate(spacing);
            let report = scene.regenerate_boxes(&placements, BOX_SIZE);
            tracing::info!(
                spacing = spacing.value(),
                removed = report.removed,
                added = report.added,
                "pattern regenerated"
            );
            Some(report)
        }
    }
}

/// Slider panel for the material and pattern spacing.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    pub visible: bool,
    roughness: f32,
    metalness: f32,
    env_map_intensity: f32,
    spacing: f32,
}

impl ControlPanel {
    /// Panel with slider values mirroring the scene material and `spacing`.
    pub fn new(scene: &Scene, spacing: Spacing) -> Self {
        let material = scene.material();
        Self {
            visible: true,
            roughness: material.roughness,
            metalness: material.metalness,
            env_map_intensity: material.env_map_intensity,
            spacing: spacing.value(),
        }
    }

    pub fn value(&self, param: MaterialParam) -> f32 {
        match param {
            MaterialParam::Roughness => self.roughness,
            MaterialParam::Metalness => self.metalness,
            MaterialParam::EnvMapIntensity => self.env_map_intensity,
        }
    }

    pub fn spacing(&self) -> Spacing {
        Spacing::new(self.spacing)
    }

    fn slot(&mut self, param: MaterialParam) -> &mut f32 {
        match param {
            MaterialParam::Roughness => &mut self.roughness,
            MaterialParam::Metalness => &mut self.metalness,
            MaterialParam::EnvMapIntensity => &mut self.env_map_intensity,
        }
    }

    /// Draw the panel and return the edits made this frame.
    pub fn show(&mut self, ctx: &egui::Context, summary: &SceneSummary) -> Vec<ParamChange> {
        let mut changes = Vec::new();
        if !self.visible {
            return changes;
        }

        egui::SidePanel::left("controls")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Crossfield");
                ui.separator();

                egui::CollapsingHeader::new("Material Properties")
                    .default_open(true)
                    .show(ui, |ui| {
                        for param in MaterialParam::ALL {
                            let range = param.range();
                            let slider = egui::Slider::new(self.slot(param), range)
                                .step_by(0.01)
                                .text(param.label());
                            if ui.add(slider).changed() {
                                changes.push(ParamChange::Material(param, self.value(param)));
                            }
                        }
                    });

                egui::CollapsingHeader::new("Pattern Spacing")
                    .default_open(true)
                    .show(ui, |ui| {
                        let slider =
                            egui::Slider::new(&mut self.spacing, Spacing::MIN..=Spacing::MAX)
                                .step_by(0.01)
                                .text("Spacing");
                        if ui.add(slider).changed() {
                            changes.push(ParamChange::Spacing(Spacing::new(self.spacing)));
                        }
                    });

                ui.separator();
                ui.label(format!("Boxes: {}", summary.box_count));
                ui.label(format!(
                    "Environment: {}",
                    summary.environment.as_deref().unwrap_or("loading / none")
                ));
                let [x, y, z] = summary.camera_position;
                ui.label(format!("Camera: ({x:.1}, {y:.1}, {z:.1})"));
                ui.separator();
                ui.small("F1: Toggle Panel | LMB: Orbit | RMB: Pan | Wheel: Zoom | R: Reset");
            });

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::SceneInspector;
    use glam::Vec3;

    fn populated() -> (Scene, Pattern) {
        let mut scene = Scene::new();
        let pattern = Pattern::default();
        scene.regenerate_boxes(&pattern.generate(Spacing::new(0.0)), BOX_SIZE);
        (scene, pattern)
    }

    #[test]
    fn panel_mirrors_scene_material() {
        let (scene, _) = populated();
        let panel = ControlPanel::new(&scene, Spacing::new(0.25));
        assert_eq!(panel.value(MaterialParam::Roughness), 0.09);
        assert_eq!(panel.value(MaterialParam::Metalness), 1.0);
        assert_eq!(panel.value(MaterialParam::EnvMapIntensity), 0.9);
        assert_eq!(panel.spacing().value(), 0.25);
    }

    #[test]
    fn material_change_does_not_regenerate() {
        let (mut scene, pattern) = populated();
        let ids = scene.box_ids().to_vec();
        let report = apply_change(
            &mut scene,
            &pattern,
            ParamChange::Material(MaterialParam::Metalness, 0.3),
        );
        assert!(report.is_none());
        assert_eq!(scene.material().metalness, 0.3);
        assert_eq!(scene.box_ids(), ids.as_slice());
    }

    #[test]
    fn spacing_change_regenerates_all_boxes() {
        let (mut scene, pattern) = populated();
        let report = apply_change(&mut scene, &pattern, ParamChange::Spacing(Spacing::new(1.0)));
        assert_eq!(report, Some(RegenerateReport { removed: 75, added: 75 }));
        assert_eq!(scene.non_box_count(), 3);
        assert!(scene.box_positions().contains(&Vec3::new(0.0, 6.0, 0.0)));
    }

    #[test]
    fn headless_frame_emits_no_changes() {
        let (scene, _) = populated();
        let mut panel = ControlPanel::new(&scene, Spacing::default());
        let summary = SceneInspector::summary(&scene);
        let ctx = egui::Context::default();
        let mut changes = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = panel.show(ctx, &summary);
        });
        assert!(changes.is_empty());
    }

    #[test]
    fn hidden_panel_emits_nothing() {
        let (scene, _) = populated();
        let mut panel = ControlPanel::new(&scene, Spacing::default());
        panel.visible = false;
        let summary = SceneInspector::summary(&scene);
        let ctx = egui::Context::default();
        let mut changes = vec![ParamChange::Spacing(Spacing::default())];
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            changes = panel.show(ctx, &summary);
        });
        assert!(changes.is_empty());
    }
}
