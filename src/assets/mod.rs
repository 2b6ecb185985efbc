//! Asset Module
//!
//! - [`io`]: byte readers for local directories and HTTP roots
//! - [`catalog`]: asset path layout, the clip load plan and the model catalog
//! - [`loaders`]: glTF/GLB import into clips and models
//! - [`fetcher`] / [`pipeline`]: the sequential avatar load

pub mod catalog;
pub mod fetcher;
pub mod io;
pub mod loaders;
pub mod pipeline;

pub use catalog::{CatalogStep, ClipCategory, ClipSource, LoadPlan, ModelCatalog};
pub use fetcher::fetch_clip;
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader};
pub use loaders::GltfImport;
pub use pipeline::{LoadReport, LoadedAvatar, bind_model, fetch_library, load_avatar, load_environment};
