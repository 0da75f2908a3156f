//! Rendering collaborators
//!
//! The simulation never draws anything itself. It keeps its own entity
//! state and forwards node additions and removals to a [`Scene`], then hands
//! the frame to a [`Renderer`].

pub mod animation;
pub mod assets;
pub mod headless;

pub use animation::AnimationMixer;
pub use assets::{AssetError, JsonAssetLoader, ShipAsset};
pub use headless::HeadlessRenderer;

use serde::Serialize;
use uuid::Uuid;

use crate::game::geometry::{Aabb, Camera, Viewport};
use crate::game::snapshot::FrameView;

pub type NodeId = Uuid;

/// What a scene node stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Player,
    Boss,
    Projectile,
}

/// A renderable registered with the scene
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// World-space bounds when the node was added
    pub bounds: Aabb,
}

/// Stateful render scene owned by the host
pub trait Scene {
    fn add(&mut self, node: SceneNode);

    /// Remove a node, returns false if it was not present
    fn remove(&mut self, id: NodeId) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Drawing backend
pub trait Renderer {
    type Scene: Scene;

    /// Current size of the host surface
    fn surface_size(&self) -> Viewport;

    /// Resize the drawing buffer
    fn set_size(&mut self, viewport: Viewport);

    /// Draw one frame
    fn render(&mut self, scene: &Self::Scene, camera: &Camera, view: &FrameView);
}
