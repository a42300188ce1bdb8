//! Texture asset loading.

use anyhow::{Context, Result};
use image::RgbaImage;
use renderer::SceneTextures;
use std::path::{Path, PathBuf};

/// Cubemap face file names, in the +X, -X, +Y, -Y, +Z, -Z order the cube
/// sampler expects.
const SKYBOX_FACES: [&str; 6] = [
    "px.png", "nx.png", "py.png", "ny.png", "pz.png", "nz.png",
];

fn load_rgba(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Load the terrain color map and the six skybox faces from `assets_dir`.
///
/// Missing or undecodable files are fatal; the renderer has no placeholder
/// path, so we fail here with the offending file named.
pub fn load_scene_textures(assets_dir: &Path) -> Result<SceneTextures> {
    let terrain = load_rgba(&assets_dir.join("terrain.png"))?;

    let mut faces: Vec<RgbaImage> = Vec::with_capacity(6);
    for name in SKYBOX_FACES {
        faces.push(load_rgba(&assets_dir.join("skybox").join(name))?);
    }
    let skybox_faces: [RgbaImage; 6] = faces
        .try_into()
        .map_err(|_| anyhow::anyhow!("expected exactly 6 skybox faces"))?;

    log::info!(
        "loaded scene textures from {} ({}x{} terrain)",
        assets_dir.display(),
        terrain.width(),
        terrain.height()
    );

    Ok(SceneTextures {
        terrain,
        skybox_faces,
    })
}

/// Default asset directory: `assets/` next to the working directory.
pub fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
