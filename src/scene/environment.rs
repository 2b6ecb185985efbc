use std::sync::Arc;

/// Prefiltered environment texture used for material reflections.
///
/// The payload is kept encoded; decoding and upload belong to the renderer.
#[derive(Debug, Clone)]
pub struct ReflectionTexture {
    pub source: String,
    pub data: Arc<[u8]>,
    /// Rotation around the vertical axis, in radians.
    pub rotation_y: f32,
}

impl ReflectionTexture {
    #[must_use]
    pub fn new(source: impl Into<String>, data: Vec<u8>, rotation_y: f32) -> Self {
        Self {
            source: source.into(),
            data: data.into(),
            rotation_y,
        }
    }

    #[must_use]
    pub fn byte_len(&self) -> usize {
        self.data.len()
    }
}

/// Name shared by the skybox mesh and its material.
pub const SKYBOX_NAME: &str = "skybox";

/// Background box textured with the reflection environment.
///
/// Rendered unlit, without back-face culling and centred on the camera.
#[derive(Debug, Clone)]
pub struct Skybox {
    pub name: &'static str,
    pub texture: Arc<ReflectionTexture>,
    /// Edge length of the box.
    pub size: f32,
    pub micro_surface: f32,
    pub lighting_disabled: bool,
    pub back_face_culling: bool,
    pub infinite_distance: bool,
}

impl Skybox {
    pub const SIZE: f32 = 1024.0;
    pub const MICRO_SURFACE: f32 = 0.4;

    #[must_use]
    pub fn new(texture: Arc<ReflectionTexture>) -> Self {
        Self {
            name: SKYBOX_NAME,
            texture,
            size: Self::SIZE,
            micro_surface: Self::MICRO_SURFACE,
            lighting_disabled: true,
            back_face_culling: false,
            infinite_distance: true,
        }
    }

    /// Rotation around the vertical axis, in radians.
    #[must_use]
    pub fn rotation_y(&self) -> f32 {
        self.texture.rotation_y
    }
}
