//! Avatar Load Pipeline
//!
//! ```text
//! fetch_library ──▶ bind_model ──▶ LoadedAvatar
//!  (clip by clip,     (mesh, retarget every
//!   failures skipped)  fetched clip in order)
//! ```
//!
//! Clip fetches are awaited one after another in plan order. A failing clip
//! is logged and skipped; only a failing model aborts the load, and then the
//! fetched clips are released with it.

use crate::animation::AnimationLibrary;
use crate::assets::catalog::{LoadPlan, file_stem, model_path};
use crate::assets::fetcher::fetch_clip;
use crate::assets::io::{AssetReader, is_remote, read_absolute};
use crate::assets::loaders::GltfImport;
use crate::config::EnvironmentConfig;
use crate::errors::Result;
use crate::scene::{Model, ReflectionTexture};

/// Outcome of the clip phase of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub fetched: usize,
    /// Paths of clips that could not be loaded.
    pub failed: Vec<String>,
}

/// A model with every fetched clip bound to it.
#[derive(Debug)]
pub struct LoadedAvatar {
    pub model: Model,
    pub report: LoadReport,
}

/// Fetches every clip of `plan` in order, skipping the ones that fail.
pub async fn fetch_library<R: AssetReader + ?Sized>(
    reader: &R,
    plan: &LoadPlan,
) -> (AnimationLibrary, LoadReport) {
    let mut library = AnimationLibrary::new();
    let mut report = LoadReport::default();

    for source in &plan.clips {
        match fetch_clip(reader, source).await {
            Ok(clip) => {
                library.push(clip);
                report.fetched += 1;
            }
            Err(e) => {
                log::warn!("Skipping clip {}: {e}", source.path);
                report.failed.push(source.path.clone());
            }
        }
    }

    log::info!(
        "Fetched {}/{} animation clips",
        report.fetched,
        plan.clips.len()
    );
    (library, report)
}

/// Loads `model_file` and retargets every clip of `library` onto it.
///
/// Bound clips keep library order, so clip `0` is the first fetched clip.
pub async fn bind_model<R: AssetReader + ?Sized>(
    reader: &R,
    model_file: &str,
    mut library: AnimationLibrary,
) -> Result<Model> {
    let path = model_path(model_file);

    let import = match reader.read_bytes(&path).await {
        Ok(bytes) => GltfImport::parse(&bytes, &path),
        Err(e) => Err(e),
    };
    let mut model = match import.and_then(|import| import.into_model(file_stem(model_file))) {
        Ok(model) => model,
        Err(e) => {
            log::error!(
                "Failed to load model {path}: {e}; releasing {} fetched clips",
                library.len()
            );
            return Err(e);
        }
    };

    for clip in library.drain() {
        model.bind_clip(clip);
    }

    log::info!(
        "Bound model '{}': {} nodes, {} meshes, {} clips",
        model.name(),
        model.node_count(),
        model.mesh_count(),
        model.clip_count()
    );
    Ok(model)
}

/// Runs the whole pipeline for one catalog entry.
pub async fn load_avatar<R: AssetReader + ?Sized>(
    reader: &R,
    plan: &LoadPlan,
    model_file: &str,
) -> Result<LoadedAvatar> {
    log::info!("Loading avatar {model_file} with {} clips", plan.len());
    let (library, report) = fetch_library(reader, plan).await;
    let model = bind_model(reader, model_file, library).await?;
    Ok(LoadedAvatar { model, report })
}

/// Fetches the configured reflection environment, if any.
///
/// Absolute URLs are fetched directly, other paths through `reader`.
pub async fn load_environment<R: AssetReader + ?Sized>(
    reader: &R,
    config: &EnvironmentConfig,
) -> Result<Option<ReflectionTexture>> {
    let Some(source) = config.texture.as_deref() else {
        return Ok(None);
    };

    let data = if is_remote(source) {
        read_absolute(source).await?
    } else {
        reader.read_bytes(source).await?
    };

    Ok(Some(ReflectionTexture::new(
        source,
        data,
        config.rotation_degrees.to_radians(),
    )))
}
