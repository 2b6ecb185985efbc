//! # Avatar Stage
//!
//! Front-end of an avatar viewer: it streams animation clips for a character
//! model, retargets them onto the model by node name and cross-fades between
//! them on request, one step per rendered frame.
//!
//! The scene handed to a renderer is plain data (nodes, meshes, materials,
//! stage setup); no GPU work happens here.
//!
//! ```rust,ignore
//! use stage::{AssetReaderVariant, CatalogStep, Session, StageConfig};
//!
//! let config = StageConfig::default();
//! let reader = AssetReaderVariant::from_source(&config.resource_root)?;
//! let mut session = Session::new(config)?;
//! pollster::block_on(session.switch_model(&reader, CatalogStep::Current));
//! session.frame(1.0 / 60.0);
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod config;
pub mod errors;
pub mod scene;
pub mod session;
pub mod ui;
pub mod utils;

pub use animation::{
    AnimationAction, AnimationClip, AnimationLibrary, AnimationMixer, Binder, BlendRejection,
    ClipIndex, CrossFadeController, FadeStep, LoopMode, Playback,
};
pub use assets::{
    AssetReader, AssetReaderVariant, CatalogStep, FileAssetReader, LoadPlan, LoadedAvatar,
    ModelCatalog,
};
pub use config::StageConfig;
pub use errors::{Result, StageError};
pub use scene::{Model, Scene};
pub use session::{LoadTicket, Session};
pub use ui::UiState;
pub use utils::Timer;
