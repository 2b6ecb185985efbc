use std::sync::Arc;

use crate::config::EnvironmentConfig;
use crate::scene::MeshKey;
use crate::scene::bootstrap::StageSetup;
use crate::scene::environment::{ReflectionTexture, SKYBOX_NAME, Skybox};
use crate::scene::model::{DisposeReport, Model, ReflectionBinding};

/// Mesh names that never cast shadows.
const SHADOW_EXCLUDED: [&str; 2] = ["ground", SKYBOX_NAME];

/// Meshes rendered into the shadow map.
#[derive(Debug, Clone, Default)]
pub struct ShadowCasterRegistry {
    casters: Vec<MeshKey>,
}

impl ShadowCasterRegistry {
    /// Whether a mesh called `name` belongs in the shadow map.
    #[must_use]
    pub fn accepts(name: &str) -> bool {
        !SHADOW_EXCLUDED.contains(&name)
    }

    pub fn add(&mut self, mesh: MeshKey) {
        if !self.casters.contains(&mesh) {
            self.casters.push(mesh);
        }
    }

    pub fn clear(&mut self) {
        self.casters.clear();
    }

    #[must_use]
    pub fn contains(&self, mesh: MeshKey) -> bool {
        self.casters.contains(&mesh)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.casters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.casters.is_empty()
    }
}

/// Output surface size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl Viewport {
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.width > 0 && self.height > 0).then(|| self.width as f32 / self.height as f32)
    }
}

/// The renderable stage: static setup plus at most one live model.
#[derive(Debug)]
pub struct Scene {
    pub setup: StageSetup,
    model: Option<Model>,
    shadow_casters: ShadowCasterRegistry,
    environment: Option<Arc<ReflectionTexture>>,
    skybox: Option<Skybox>,
    reflection_level: f32,
    environment_intensity: f32,
    viewport: Viewport,
}

impl Scene {
    #[must_use]
    pub fn new(environment: &EnvironmentConfig, width: u32, height: u32) -> Self {
        let mut scene = Self {
            setup: StageSetup::default(),
            model: None,
            shadow_casters: ShadowCasterRegistry::default(),
            environment: None,
            skybox: None,
            reflection_level: environment.reflection_level,
            environment_intensity: environment.environment_intensity,
            viewport: Viewport {
                width: 0,
                height: 0,
                scale_factor: 1.0,
            },
        };
        scene.resize(width, height, 1.0);
        scene
    }

    #[must_use]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    pub fn model_mut(&mut self) -> Option<&mut Model> {
        self.model.as_mut()
    }

    #[must_use]
    pub fn shadow_casters(&self) -> &ShadowCasterRegistry {
        &self.shadow_casters
    }

    #[must_use]
    pub fn environment(&self) -> Option<&Arc<ReflectionTexture>> {
        self.environment.as_ref()
    }

    #[must_use]
    pub fn skybox(&self) -> Option<&Skybox> {
        self.skybox.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Sets the reflection environment and the skybox built from it.
    ///
    /// Reflections apply to models installed afterwards.
    pub fn set_environment(&mut self, texture: ReflectionTexture) {
        log::info!("Environment '{}' ready ({} bytes)", texture.source, texture.byte_len());
        let texture = Arc::new(texture);
        self.skybox = Some(Skybox::new(Arc::clone(&texture)));
        self.environment = Some(texture);
    }

    /// Makes `model` the live model: registers its shadow casters and, when
    /// an environment is present, attaches reflections to its materials.
    ///
    /// Any previous model is disposed first.
    pub fn install_model(&mut self, mut model: Model) -> Option<DisposeReport> {
        let disposed = self.dispose_model();

        if let Some(texture) = &self.environment {
            for material in model
                .materials_mut()
                .iter_mut()
                .filter(|m| m.name != SKYBOX_NAME)
            {
                material.reflection = Some(ReflectionBinding {
                    texture: Arc::clone(texture),
                    level: self.reflection_level,
                    environment_intensity: self.environment_intensity,
                });
            }
        }

        for (key, mesh) in model.meshes() {
            if ShadowCasterRegistry::accepts(&mesh.name) {
                self.shadow_casters.add(key);
            }
        }

        self.model = Some(model);
        disposed
    }

    /// Drops the live model with all of its meshes and clips.
    pub fn dispose_model(&mut self) -> Option<DisposeReport> {
        let model = self.model.take()?;
        self.shadow_casters.clear();
        Some(model.dispose())
    }

    /// Re-synchronizes the output surface size and the camera aspect.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.viewport = Viewport {
            width,
            height,
            scale_factor,
        };
        if let Some(aspect) = self.viewport.aspect() {
            self.setup.camera.aspect = aspect;
        }
    }
}
