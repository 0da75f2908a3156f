//! Ship asset loading
//!
//! Assets are small JSON descriptors carrying what the simulation needs
//! from a model: its name, placement, collision half extents and its idle
//! animation clip.

use std::future::Future;
use std::path::{Path, PathBuf};

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Looping animation attached to a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Clip length in seconds
    pub duration: f32,
}

/// Renderable model placement and extents
#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    pub name: String,
    pub position: Vec3,
    pub half_extents: Vec3,
}

/// A loaded model together with its clip
#[derive(Debug, Clone, PartialEq)]
pub struct ShipAsset {
    pub mesh: MeshAsset,
    pub clip: AnimationClip,
}

#[derive(Debug, Deserialize)]
struct AssetDescriptor {
    name: String,
    position: [f32; 3],
    half_extents: [f32; 3],
    clip: AnimationClip,
}

/// Asset loading errors, all fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Failed to read asset {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed asset {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Invalid asset {path}: {reason}")]
    Invalid { path: String, reason: &'static str },

    #[error("No boss assets configured")]
    NoBossAssets,
}

/// Source of ship models
pub trait AssetLoader {
    fn load(
        &self,
        path: &str,
    ) -> impl Future<Output = Result<(MeshAsset, AnimationClip), AssetError>> + Send;
}

/// Loads JSON asset descriptors from disk
#[derive(Debug, Clone, Default)]
pub struct JsonAssetLoader {
    root: PathBuf,
}

impl JsonAssetLoader {
    /// Loader resolving relative paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl AssetLoader for JsonAssetLoader {
    async fn load(&self, path: &str) -> Result<(MeshAsset, AnimationClip), AssetError> {
        let full_path = self.resolve(path);
        let text = tokio::fs::read_to_string(&full_path)
            .await
            .map_err(|source| AssetError::Io {
                path: path.to_string(),
                source,
            })?;
        parse_descriptor(path, &text)
    }
}

/// Parse and validate one descriptor
pub fn parse_descriptor(path: &str, text: &str) -> Result<(MeshAsset, AnimationClip), AssetError> {
    let descriptor: AssetDescriptor =
        serde_json::from_str(text).map_err(|source| AssetError::Parse {
            path: path.to_string(),
            source,
        })?;

    let half_extents = Vec3::from_array(descriptor.half_extents);
    if !half_extents.cmpgt(Vec3::ZERO).all() {
        return Err(AssetError::Invalid {
            path: path.to_string(),
            reason: "half extents must be positive",
        });
    }
    if !(descriptor.clip.duration > 0.0) {
        return Err(AssetError::Invalid {
            path: path.to_string(),
            reason: "clip duration must be positive",
        });
    }

    let mesh = MeshAsset {
        name: descriptor.name,
        position: Vec3::from_array(descriptor.position),
        half_extents,
    };
    Ok((mesh, descriptor.clip))
}

/// Load the player model then every boss model, in order
pub async fn load_ship_assets<L: AssetLoader>(
    loader: &L,
    player_path: &str,
    boss_paths: &[String],
) -> Result<(ShipAsset, Vec<ShipAsset>), AssetError> {
    if boss_paths.is_empty() {
        return Err(AssetError::NoBossAssets);
    }

    let (mesh, clip) = loader.load(player_path).await?;
    info!(asset = %mesh.name, path = player_path, "Player asset loaded");
    let player = ShipAsset { mesh, clip };

    let mut bosses = Vec::with_capacity(boss_paths.len());
    for path in boss_paths {
        let (mesh, clip) = loader.load(path).await?;
        info!(asset = %mesh.name, path = %path, "Boss asset loaded");
        bosses.push(ShipAsset { mesh, clip });
    }

    Ok((player, bosses))
}
