use crate::animation::AnimationClip;
use crate::assets::catalog::{ClipSource, file_stem};
use crate::assets::io::AssetReader;
use crate::assets::loaders::GltfImport;
use crate::errors::{Result, StageError};

/// Imports one clip file for its animation only.
///
/// The first animation of the asset is returned; meshes, materials and any
/// further animations are never materialized. Unnamed animations are named
/// after the file stem.
pub async fn fetch_clip<R: AssetReader + ?Sized>(
    reader: &R,
    source: &ClipSource,
) -> Result<AnimationClip> {
    let bytes = reader.read_bytes(&source.path).await?;
    let import = GltfImport::parse(&bytes, &source.path)?;

    let clip = import
        .animations(file_stem(&source.path))
        .into_iter()
        .next()
        .ok_or_else(|| StageError::NoAnimation(source.path.clone()))?;

    log::debug!(
        "Fetched {:?} clip '{}' ({:.2}s, {} tracks) from {}",
        source.category,
        clip.name,
        clip.duration,
        clip.tracks.len(),
        source.path
    );
    Ok(clip)
}
