use crate::camera::Camera;
use crate::light::{AmbientLight, RectLight};
use crate::material::{Material, MaterialParam};
use crossfield_common::{NodeId, Transform};
use crossfield_pattern::Placement;
use glam::Vec3;
use std::collections::{BTreeMap, HashSet};

/// Errors from scene graph operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error("node not found: {0:?}")]
    NotFound(NodeId),
    #[error("node {0:?} is a fixed scene member and cannot be removed")]
    FixedMember(NodeId),
}

/// A generated box. Geometry is a cube of edge `size` centered on `position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxNode {
    pub position: Vec3,
    pub size: f32,
}

impl BoxNode {
    pub fn transform(&self) -> Transform {
        Transform::from_position_scale(self.position, self.size)
    }
}

/// What a scene node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Camera(Camera),
    AmbientLight(AmbientLight),
    RectLight(RectLight),
    Box(BoxNode),
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Camera(_) => "camera",
            NodeKind::AmbientLight(_) => "ambient_light",
            NodeKind::RectLight(_) => "rect_light",
            NodeKind::Box(_) => "box",
        }
    }
}

/// A member of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
}

impl Node {
    pub fn position(&self) -> Vec3 {
        match &self.kind {
            NodeKind::Camera(c) => c.position,
            NodeKind::AmbientLight(_) => Vec3::ZERO,
            NodeKind::RectLight(l) => l.position,
            NodeKind::Box(b) => b.position,
        }
    }

    pub fn is_box(&self) -> bool {
        matches!(self.kind, NodeKind::Box(_))
    }
}

/// Description of an environment map applied to the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentInfo {
    pub source: String,
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
}

/// Record of a scene mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    NodeAdded { id: NodeId, kind: &'static str },
    NodeRemoved { id: NodeId, kind: &'static str },
    MaterialChanged {
        param: MaterialParam,
        old: f32,
        new: f32,
    },
    EnvironmentApplied { source: String },
}

/// Outcome of replacing the generated boxes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegenerateReport {
    pub removed: usize,
    pub added: usize,
}

/// The owned scene graph.
///
/// Nodes are stored by id; `children` keeps insertion order. Generated boxes
/// are tracked by handle so regeneration never relies on child positions.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    children: Vec<NodeId>,
    camera: NodeId,
    ambient_light: NodeId,
    rect_light: NodeId,
    boxes: Vec<NodeId>,
    material: Material,
    environment: Option<EnvironmentInfo>,
    event_log: Vec<SceneEvent>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Scene with the camera, ambient light and hidden rect light, and no boxes.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: BTreeMap::new(),
            children: Vec::new(),
            camera: NodeId::new(),
            ambient_light: NodeId::new(),
            rect_light: NodeId::new(),
            boxes: Vec::new(),
            material: Material::default(),
            environment: None,
            event_log: Vec::new(),
        };
        scene.insert(scene.camera, NodeKind::Camera(Camera::default()));
        scene.insert(
            scene.ambient_light,
            NodeKind::AmbientLight(AmbientLight::default()),
        );
        scene.insert(scene.rect_light, NodeKind::RectLight(RectLight::default()));
        scene
    }

    fn insert(&mut self, id: NodeId, kind: NodeKind) {
        self.event_log.push(SceneEvent::NodeAdded {
            id,
            kind: kind.name(),
        });
        self.nodes.insert(id, Node { kind });
        self.children.push(id);
    }

    /// Total number of nodes, fixed members included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn box_count(&self) -> usize {
        self.boxes.len()
    }

    pub fn non_box_count(&self) -> usize {
        self.nodes.len() - self.boxes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Nodes in insertion order.
    pub fn children(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.children
            .iter()
            .filter_map(|id| self.nodes.get(id).map(|n| (*id, n)))
    }

    /// Handles of the generated boxes, in generation order.
    pub fn box_ids(&self) -> &[NodeId] {
        &self.boxes
    }

    pub fn boxes(&self) -> impl Iterator<Item = &BoxNode> {
        self.boxes.iter().filter_map(|id| match self.nodes.get(id) {
            Some(Node {
                kind: NodeKind::Box(b),
            }) => Some(b),
            _ => None,
        })
    }

    pub fn box_positions(&self) -> Vec<Vec3> {
        self.boxes().map(|b| b.position).collect()
    }

    pub fn camera(&self) -> &Camera {
        match self.nodes.get(&self.camera).map(|n| &n.kind) {
            Some(NodeKind::Camera(c)) => c,
            _ => unreachable!("scene camera is a fixed member"),
        }
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        match self.nodes.get_mut(&self.camera).map(|n| &mut n.kind) {
            Some(NodeKind::Camera(c)) => c,
            _ => unreachable!("scene camera is a fixed member"),
        }
    }

    pub fn ambient_light(&self) -> &AmbientLight {
        match self.nodes.get(&self.ambient_light).map(|n| &n.kind) {
            Some(NodeKind::AmbientLight(l)) => l,
            _ => unreachable!("ambient light is a fixed member"),
        }
    }

    pub fn rect_light(&self) -> &RectLight {
        match self.nodes.get(&self.rect_light).map(|n| &n.kind) {
            Some(NodeKind::RectLight(l)) => l,
            _ => unreachable!("rect light is a fixed member"),
        }
    }

    pub fn rect_light_mut(&mut self) -> &mut RectLight {
        match self.nodes.get_mut(&self.rect_light).map(|n| &mut n.kind) {
            Some(NodeKind::RectLight(l)) => l,
            _ => unreachable!("rect light is a fixed member"),
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    /// Assign a material property. Every box sees the change.
    pub fn set_material_param(&mut self, param: MaterialParam, value: f32) {
        let old = self.material.set(param, value);
        let new = self.material.get(param);
        if old != new {
            self.event_log
                .push(SceneEvent::MaterialChanged { param, old, new });
        }
    }

    pub fn environment(&self) -> Option<&EnvironmentInfo> {
        self.environment.as_ref()
    }

    /// Use `info` as both the scene environment and the material's reflection map.
    pub fn set_environment(&mut self, info: EnvironmentInfo) {
        tracing::info!(
            source = %info.source,
            width = info.width,
            height = info.height,
            "environment applied"
        );
        self.material.env_map = Some(info.source.clone());
        self.event_log.push(SceneEvent::EnvironmentApplied {
            source: info.source.clone(),
        });
        self.environment = Some(info);
    }

    /// Add a single box and track it.
    pub fn add_box(&mut self, position: Vec3, size: f32) -> NodeId {
        let id = NodeId::new();
        self.insert(id, NodeKind::Box(BoxNode { position, size }));
        self.boxes.push(id);
        id
    }

    /// Remove a generated box. Fixed members are refused.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, SceneError> {
        if id == self.camera || id == self.ambient_light || id == self.rect_light {
            return Err(SceneError::FixedMember(id));
        }
        let node = self.nodes.remove(&id).ok_or(SceneError::NotFound(id))?;
        self.children.retain(|c| *c != id);
        self.boxes.retain(|b| *b != id);
        self.event_log.push(SceneEvent::NodeRemoved {
            id,
            kind: node.kind.name(),
        });
        Ok(node)
    }

    /// Remove every tracked box. Returns how many were removed.
    pub fn clear_boxes(&mut self) -> usize {
        let old: Vec<NodeId> = std::mem::take(&mut self.boxes);
        let gone: HashSet<NodeId> = old.iter().copied().collect();
        for id in &old {
            if let Some(node) = self.nodes.remove(id) {
                self.event_log.push(SceneEvent::NodeRemoved {
                    id: *id,
                    kind: node.kind.name(),
                });
            }
        }
        self.children.retain(|c| !gone.contains(c));
        old.len()
    }

    /// Replace all generated boxes with one box per placement.
    pub fn regenerate_boxes(&mut self, placements: &[Placement], size: f32) -> RegenerateReport {
        let removed = self.clear_boxes();
        for p in placements {
            self.add_box(p.position, size);
        }
        let report = RegenerateReport {
            removed,
            added: placements.len(),
        };
        tracing::debug!(
            removed = report.removed,
            added = report.added,
            "regenerated boxes"
        );
        report
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossfield_pattern::{BOX_SIZE, Pattern, Spacing};

    fn populated(spacing: f32) -> Scene {
        let mut scene = Scene::new();
        let placements = Pattern::default().generate(Spacing::new(spacing));
        scene.regenerate_boxes(&placements, BOX_SIZE);
        scene
    }

    #[test]
    fn new_scene_has_three_fixed_members() {
        let scene = Scene::new();
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.box_count(), 0);
        let kinds: Vec<&str> = scene.children().map(|(_, n)| n.kind.name()).collect();
        assert_eq!(kinds, vec!["camera", "ambient_light", "rect_light"]);
    }

    #[test]
    fn initial_generation() {
        let scene = populated(0.0);
        assert_eq!(scene.box_count(), 75);
        assert_eq!(scene.non_box_count(), 3);
        assert!(scene.boxes().all(|b| b.size == BOX_SIZE));
    }

    #[test]
    fn regeneration_replaces_only_boxes() {
        let mut scene = populated(0.0);
        let fixed: Vec<NodeId> = scene
            .children()
            .filter(|(_, n)| !n.is_box())
            .map(|(id, _)| id)
            .collect();
        let old_boxes = scene.box_ids().to_vec();
        scene.drain_events();

        let placements = Pattern::default().generate(Spacing::new(0.5));
        let report = scene.regenerate_boxes(&placements, BOX_SIZE);

        assert_eq!(report, RegenerateReport { removed: 75, added: 75 });
        assert_eq!(scene.non_box_count(), 3);
        for id in &fixed {
            assert!(scene.get(*id).is_some());
        }
        for id in &old_boxes {
            assert!(scene.get(*id).is_none());
        }
        let removed = scene
            .events()
            .iter()
            .filter(|e| matches!(e, SceneEvent::NodeRemoved { kind: "box", .. }))
            .count();
        let added = scene
            .events()
            .iter()
            .filter(|e| matches!(e, SceneEvent::NodeAdded { kind: "box", .. }))
            .count();
        assert_eq!((removed, added), (75, 75));
    }

    #[test]
    fn regeneration_with_same_spacing_keeps_positions() {
        let mut scene = populated(0.2);
        let before = scene.box_positions();
        let placements = Pattern::default().generate(Spacing::new(0.2));
        scene.regenerate_boxes(&placements, BOX_SIZE);
        assert_eq!(scene.box_positions(), before);
    }

    #[test]
    fn regeneration_survives_extra_non_box_members() {
        let mut scene = populated(0.0);
        scene.rect_light_mut().visible = true;
        scene.regenerate_boxes(&[], BOX_SIZE);
        assert_eq!(scene.node_count(), 3);
        assert!(scene.rect_light().visible);
    }

    #[test]
    fn fixed_members_cannot_be_removed() {
        let mut scene = Scene::new();
        let camera = scene.children().next().map(|(id, _)| id).unwrap();
        assert_eq!(scene.remove_node(camera), Err(SceneError::FixedMember(camera)));
        let missing = NodeId::new();
        assert_eq!(scene.remove_node(missing), Err(SceneError::NotFound(missing)));
    }

    #[test]
    fn remove_single_box() {
        let mut scene = Scene::new();
        let id = scene.add_box(Vec3::X, 0.8);
        assert!(scene.remove_node(id).is_ok());
        assert_eq!(scene.box_count(), 0);
        assert_eq!(scene.node_count(), 3);
    }

    #[test]
    fn material_change_is_shared_and_logged() {
        let mut scene = populated(0.0);
        scene.drain_events();
        scene.set_material_param(MaterialParam::Roughness, 0.4);
        scene.set_material_param(MaterialParam::Roughness, 0.4);
        assert_eq!(scene.material().roughness, 0.4);
        assert_eq!(
            scene.events(),
            &[SceneEvent::MaterialChanged {
                param: MaterialParam::Roughness,
                old: 0.09,
                new: 0.4,
            }]
        );
    }

    #[test]
    fn environment_binds_to_material() {
        let mut scene = Scene::new();
        assert!(scene.environment().is_none());
        scene.set_environment(EnvironmentInfo {
            source: "building.hdr".into(),
            width: 64,
            height: 32,
            mip_levels: 7,
        });
        assert_eq!(scene.material().env_map.as_deref(), Some("building.hdr"));
        assert_eq!(scene.environment().map(|e| e.width), Some(64));
    }

    #[test]
    fn drain_events_clears_log() {
        let mut scene = Scene::new();
        assert_eq!(scene.drain_events().len(), 3);
        assert!(scene.events().is_empty());
    }
}
