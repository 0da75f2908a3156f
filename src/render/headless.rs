//! Renderer and scene for running without a window
//!
//! The headless renderer keeps track of what would be drawn and reports
//! frames through tracing at a fixed cadence, serialized as JSON.

use std::collections::HashMap;

use tracing::{debug, info, trace, warn};

use crate::game::geometry::{Camera, Viewport};
use crate::game::snapshot::{FrameView, SnapshotCadence};

use super::{NodeId, NodeKind, Renderer, Scene, SceneNode};

/// In-memory scene registry
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
}

impl SceneGraph {
    #[cfg(test)]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.values().filter(|node| node.kind == kind).count()
    }
}

impl Scene for SceneGraph {
    fn add(&mut self, node: SceneNode) {
        trace!(id = %node.id, kind = ?node.kind, bounds = ?node.bounds, "Scene node added");
        if self.nodes.insert(node.id, node).is_some() {
            warn!("Scene node added twice");
        }
    }

    fn remove(&mut self, id: NodeId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// Renderer that logs frames instead of drawing them
pub struct HeadlessRenderer {
    surface: Viewport,
    applied: Option<Viewport>,
    cadence: SnapshotCadence,
    frames_rendered: u64,
}

impl HeadlessRenderer {
    /// `snapshot_every` is the report interval in frames, 0 disables reports
    pub fn new(surface: Viewport, snapshot_every: u32) -> Self {
        Self {
            surface,
            applied: None,
            cadence: SnapshotCadence::new(snapshot_every),
            frames_rendered: 0,
        }
    }

    /// Host-side surface change; pair with a resize request
    #[cfg(test)]
    pub fn resize_surface(&mut self, surface: Viewport) {
        self.surface = surface;
    }

    /// Size last applied through [`Renderer::set_size`]
    #[cfg(test)]
    pub fn applied_size(&self) -> Option<Viewport> {
        self.applied
    }

    #[cfg(test)]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl Renderer for HeadlessRenderer {
    type Scene = SceneGraph;

    fn surface_size(&self) -> Viewport {
        self.surface
    }

    fn set_size(&mut self, viewport: Viewport) {
        debug!(
            width = viewport.width,
            height = viewport.height,
            previous = ?self.applied,
            "Drawing buffer resized"
        );
        self.applied = Some(viewport);
    }

    fn render(&mut self, scene: &SceneGraph, camera: &Camera, view: &FrameView) {
        self.frames_rendered += 1;

        if view.is_notable() {
            self.cadence.force_next();
        }
        if self.cadence.should_send() {
            match serde_json::to_string(view) {
                Ok(json) => info!(
                    frames = self.frames_rendered,
                    nodes = scene.len(),
                    projectiles = scene.count(NodeKind::Projectile),
                    aspect = camera.aspect,
                    frame = %json,
                    "Frame"
                ),
                Err(e) => warn!(error = %e, "Failed to serialize frame view"),
            }
        }
    }
}
