//! Viewer Session
//!
//! [`Session`] owns everything a running viewer mutates: the scene with its
//! live model, the cross-fade state, the overlay and the model catalog.
//!
//! A model switch is split in two so that a render loop never waits on I/O:
//!
//! 1. [`Session::begin_switch`] disposes the live model, empties playback,
//!    shows the loading indicator and hands out a [`LoadTicket`].
//! 2. The caller runs [`load_avatar`] wherever it likes and passes the
//!    outcome to [`Session::finish_load`] together with the ticket.
//!
//! Tickets carry a generation number; a result whose ticket was superseded
//! by a later switch is dropped.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

use crate::animation::selection::BASE_CLIP;
use crate::animation::{
    BlendRejection, ClipIndex, CrossFadeController, FadeStep, Playback, pick_random_clip,
};
use crate::assets::catalog::{CatalogStep, LoadPlan, ModelCatalog};
use crate::assets::io::AssetReader;
use crate::assets::pipeline::{LoadedAvatar, load_avatar, load_environment};
use crate::config::StageConfig;
use crate::errors::Result;
use crate::scene::{DisposeReport, ReflectionTexture, Scene};
use crate::ui::UiState;

/// Identifies one model load started by [`Session::begin_switch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub model_file: String,
    /// What the switch released from the previous model.
    pub disposed: Option<DisposeReport>,
}

pub struct Session {
    config: StageConfig,
    plan: LoadPlan,
    catalog: ModelCatalog,
    scene: Scene,
    ui: UiState,
    crossfade: CrossFadeController,
    generation: u64,
    rng: StdRng,
}

impl Session {
    /// Creates a session seeded from the thread RNG.
    pub fn new(config: StageConfig) -> Result<Self> {
        let seed = rand::rng().random();
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Creates a session with a caller-provided RNG.
    pub fn with_rng(config: StageConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let catalog = ModelCatalog::new(config.models.clone())?;
        let plan = LoadPlan::from_config(&config);
        let scene = Scene::new(&config.environment, config.window.width, config.window.height);
        let crossfade = CrossFadeController::new(config.blend);

        Ok(Self {
            config,
            plan,
            catalog,
            scene,
            ui: UiState::new(),
            crossfade,
            generation: 0,
            rng,
        })
    }

    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    #[must_use]
    pub fn plan(&self) -> &LoadPlan {
        &self.plan
    }

    #[must_use]
    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[must_use]
    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    #[must_use]
    pub fn playback(&self) -> Playback {
        self.crossfade.playback()
    }

    #[must_use]
    pub fn crossfade(&self) -> &CrossFadeController {
        &self.crossfade
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Tears the live model down and starts a load of the selected entry.
    pub fn begin_switch(&mut self, step: CatalogStep) -> LoadTicket {
        let model_file = self.catalog.step(step).to_string();
        self.generation += 1;

        let disposed = self.scene.dispose_model();
        self.crossfade.reset();
        self.ui.clear_info();
        self.ui.show_loading();

        log::info!(
            "Switching to model {model_file} (#{}/{}, generation {})",
            self.catalog.index() + 1,
            self.catalog.len(),
            self.generation
        );
        LoadTicket {
            generation: self.generation,
            model_file,
            disposed,
        }
    }

    /// Installs the outcome of a load.
    ///
    /// Returns `false` when the ticket was superseded; the result is dropped.
    pub fn finish_load(&mut self, ticket: &LoadTicket, result: Result<LoadedAvatar>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Dropping stale load of {} (generation {} < {})",
                ticket.model_file,
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.ui.hide_loading();

        let avatar = match result {
            Ok(avatar) => avatar,
            Err(e) => {
                log::error!("Model {} failed to load: {e}", ticket.model_file);
                return true;
            }
        };

        if !avatar.report.failed.is_empty() {
            log::warn!(
                "{} of {} clips failed for {}",
                avatar.report.failed.len(),
                self.plan.len(),
                ticket.model_file
            );
        }

        self.scene.install_model(avatar.model);
        if let Some(model) = self.scene.model_mut() {
            if self.crossfade.start(model.mixer_mut(), BASE_CLIP) {
                if let Some(name) = model.clip_name(BASE_CLIP) {
                    self.ui.set_current_clip(name);
                }
            } else {
                log::warn!("Model '{}' has no clips to play", model.name());
            }
        }
        true
    }

    /// Runs a whole switch inline: dispose, load, install.
    pub async fn switch_model<R: AssetReader + ?Sized>(
        &mut self,
        reader: &R,
        step: CatalogStep,
    ) -> bool {
        let ticket = self.begin_switch(step);
        let result = load_avatar(reader, &self.plan, &ticket.model_file).await;
        self.finish_load(&ticket, result)
    }

    /// Fetches the configured environment; a failure leaves the stage without
    /// reflections.
    pub async fn load_environment<R: AssetReader + ?Sized>(&mut self, reader: &R) {
        let result = load_environment(reader, &self.config.environment).await;
        self.apply_environment(result);
    }

    pub fn apply_environment(&mut self, result: Result<Option<ReflectionTexture>>) {
        match result {
            Ok(Some(texture)) => self.scene.set_environment(texture),
            Ok(None) => log::debug!("No environment texture configured"),
            Err(e) => log::warn!("Environment texture unavailable: {e}"),
        }
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Cross-fades to a random non-base clip other than the active one.
    pub fn request_random_clip(
        &mut self,
        now: Duration,
    ) -> std::result::Result<ClipIndex, BlendRejection> {
        let Some(model) = self.scene.model() else {
            return Err(BlendRejection::NoClip);
        };
        let pick = pick_random_clip(&mut self.rng, model.clip_count(), self.crossfade.active())
            .ok_or(BlendRejection::NoCandidate)?;
        self.request_clip(pick, now)?;
        Ok(pick)
    }

    /// Cross-fades to `clip`.
    pub fn request_clip(
        &mut self,
        clip: ClipIndex,
        now: Duration,
    ) -> std::result::Result<(), BlendRejection> {
        let Some(model) = self.scene.model_mut() else {
            return Err(BlendRejection::NoClip);
        };
        match self.crossfade.request(model.mixer_mut(), clip, now) {
            Ok(()) => {
                if let Some(name) = model.clip_name(clip) {
                    log::info!("Blending to '{name}'");
                    self.ui.set_current_clip(name);
                }
                Ok(())
            }
            Err(rejection) => {
                log::debug!("Blend to clip {clip} rejected: {rejection:?}");
                Err(rejection)
            }
        }
    }

    /// Advances one rendered frame.
    pub fn frame(&mut self, dt: f32) -> FadeStep {
        self.scene.setup.camera.auto_rotate(dt);

        let Some(model) = self.scene.model_mut() else {
            return FadeStep::Idle;
        };
        let step = self.crossfade.tick(model.mixer_mut());
        if let FadeStep::Completed(clip) = step {
            log::debug!("Blend to '{}' complete", model.clip_name(clip).unwrap_or_default());
        }
        model.animate(dt);
        step
    }

    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.scene.resize(width, height, scale_factor);
    }
}
