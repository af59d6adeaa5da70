use crossfield_scene::Scene;

/// Read-only queries against the scene for the panel and logs.
pub struct SceneInspector;

impl SceneInspector {
    pub fn summary(scene: &Scene) -> SceneSummary {
        let cam = scene.camera();
        SceneSummary {
            node_count: scene.node_count(),
            box_count: scene.box_count(),
            environment: scene.environment().map(|e| e.source.clone()),
            camera_position: cam.position.to_array(),
            pending_events: scene.events().len(),
        }
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub node_count: usize,
    pub box_count: usize,
    pub environment: Option<String>,
    pub camera_position: [f32; 3],
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: nodes={} boxes={} environment={} pending_events={}",
            self.node_count,
            self.box_count,
            self.environment.as_deref().unwrap_or("none"),
            self.pending_events
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossfield_scene::EnvironmentInfo;

    #[test]
    fn summary_of_fresh_scene() {
        let scene = Scene::new();
        let s = SceneInspector::summary(&scene);
        assert_eq!(s.node_count, 3);
        assert_eq!(s.box_count, 0);
        assert_eq!(s.camera_position, [0.0, 0.0, 10.0]);
        assert_eq!(
            s.to_string(),
            "Scene: nodes=3 boxes=0 environment=none pending_events=3"
        );
    }

    #[test]
    fn summary_reports_environment() {
        let mut scene = Scene::new();
        scene.set_environment(EnvironmentInfo {
            source: "building.hdr".into(),
            width: 2,
            height: 1,
            mip_levels: 2,
        });
        let s = SceneInspector::summary(&scene);
        assert_eq!(s.environment.as_deref(), Some("building.hdr"));
    }
}
