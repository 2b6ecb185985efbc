//! Asset path conventions and the model catalog.
//!
//! Layout under the resource root:
//!
//! ```text
//! models/<model>.glb
//! models/animations/<pack>/<category>/<prefix><NNN>.glb
//! ```

use serde::Deserialize;

use crate::config::StageConfig;
use crate::errors::{Result, StageError};

const MODELS_DIR: &str = "models";
const ANIMATIONS_DIR: &str = "animations";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipCategory {
    Idle,
    Dance,
    Expression,
}

impl ClipCategory {
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            ClipCategory::Idle => "idle",
            ClipCategory::Dance => "dance",
            ClipCategory::Expression => "expression",
        }
    }
}

/// One clip file scheduled for fetching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipSource {
    pub category: ClipCategory,
    /// Path relative to the resource root.
    pub path: String,
}

/// Ordered list of clip files fetched before a model is bound.
#[derive(Debug, Clone, Default)]
pub struct LoadPlan {
    pub clips: Vec<ClipSource>,
}

impl LoadPlan {
    /// Idle clips first, then dance, then expression.
    #[must_use]
    pub fn from_config(config: &StageConfig) -> Self {
        let clips = config
            .clip_sets()
            .into_iter()
            .flat_map(|set| {
                set.file_names().map(move |file| ClipSource {
                    category: set.category,
                    path: clip_path(&config.animation_pack, set.category, &file),
                })
            })
            .collect();
        Self { clips }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

#[must_use]
pub fn model_path(model_file: &str) -> String {
    format!("{MODELS_DIR}/{model_file}")
}

#[must_use]
pub fn clip_path(pack: &str, category: ClipCategory, file: &str) -> String {
    if pack.is_empty() {
        format!("{MODELS_DIR}/{ANIMATIONS_DIR}/{}/{file}", category.dir_name())
    } else {
        format!("{MODELS_DIR}/{ANIMATIONS_DIR}/{pack}/{}/{file}", category.dir_name())
    }
}

/// File stem of a path or URL (`models/readyplayer2.glb` → `readyplayer2`).
#[must_use]
pub fn file_stem(path: &str) -> &str {
    let file = path.rsplit('/').next().unwrap_or(path);
    file.strip_suffix(".glb")
        .or_else(|| file.strip_suffix(".gltf"))
        .unwrap_or(file)
}

/// Ordered, non-empty list of model files with a wrapping cursor.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    entries: Vec<String>,
    cursor: usize,
}

/// Which catalog entry a model switch should load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogStep {
    Current,
    Next,
    Previous,
}

impl ModelCatalog {
    pub fn new(entries: Vec<String>) -> Result<Self> {
        if entries.is_empty() {
            return Err(StageError::EmptyCatalog);
        }
        Ok(Self { entries, cursor: 0 })
    }

    #[must_use]
    pub fn current(&self) -> &str {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Moves the cursor and returns the selected entry.
    pub fn step(&mut self, step: CatalogStep) -> &str {
        let len = self.entries.len();
        self.cursor = match step {
            CatalogStep::Current => self.cursor,
            CatalogStep::Next => (self.cursor + 1) % len,
            CatalogStep::Previous => (self.cursor + len - 1) % len,
        };
        self.current()
    }
}
