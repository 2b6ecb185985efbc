//! One-time stage setup: camera, lights, ground and shadows.
//!
//! These are plain values handed to the renderer; nothing here animates.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

/// Orbit camera around the avatar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    /// Horizontal angle, radians.
    pub alpha: f32,
    /// Vertical angle from the up axis, radians.
    pub beta: f32,
    pub radius: f32,
    pub target: Vec3,
    pub lower_radius_limit: f32,
    pub upper_radius_limit: f32,
    pub lower_beta_limit: f32,
    pub upper_beta_limit: f32,
    pub wheel_precision: f32,
    pub pinch_delta_percentage: f32,
    pub panning_enabled: bool,
    pub auto_rotate_speed: f32,
    pub aspect: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            alpha: (-90.0_f32).to_radians(),
            beta: 65.0_f32.to_radians(),
            radius: 5.0,
            target: Vec3::new(0.0, 1.0, 0.0),
            lower_radius_limit: 2.0,
            upper_radius_limit: 16.0,
            lower_beta_limit: 0.75,
            upper_beta_limit: FRAC_PI_2,
            wheel_precision: 60.0,
            pinch_delta_percentage: 0.0005,
            panning_enabled: false,
            auto_rotate_speed: 0.15,
            aspect: 16.0 / 9.0,
        }
    }
}

impl CameraRig {
    /// Keeps radius and beta inside their limits.
    pub fn constrain(&mut self) {
        self.radius = self.radius.clamp(self.lower_radius_limit, self.upper_radius_limit);
        self.beta = self.beta.clamp(self.lower_beta_limit, self.upper_beta_limit);
    }

    /// Idle auto-rotation.
    pub fn auto_rotate(&mut self, dt: f32) {
        self.alpha += self.auto_rotate_speed * dt;
    }

    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_b, cos_b) = self.beta.sin_cos();
        let (sin_a, cos_a) = self.alpha.sin_cos();
        self.target + Vec3::new(cos_a * sin_b, cos_b, sin_a * sin_b) * self.radius
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HemisphericLight {
    pub direction: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub intensity: f32,
}

/// Cylindrical stage floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ground {
    pub diameter: f32,
    pub height: f32,
    pub tessellation: u32,
    pub elevation: f32,
    pub albedo: Vec3,
    pub roughness: f32,
    pub metallic: f32,
    pub receives_shadows: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowSettings {
    pub map_size: u32,
    pub darkness: f32,
    pub bias: f32,
    pub blur_exponential: bool,
}

/// Everything the renderer needs before a model arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSetup {
    pub clear_color: Vec3,
    pub camera: CameraRig,
    pub ambient: HemisphericLight,
    pub sun: DirectionalLight,
    pub ground: Ground,
    pub shadows: ShadowSettings,
}

impl Default for StageSetup {
    fn default() -> Self {
        Self {
            clear_color: Vec3::ZERO,
            camera: CameraRig::default(),
            ambient: HemisphericLight {
                direction: Vec3::Y,
                intensity: 0.1,
            },
            sun: DirectionalLight {
                position: Vec3::new(0.0, 30.0, 10.0),
                direction: Vec3::new(-2.0, -4.0, -5.0),
                intensity: 1.5,
            },
            ground: Ground {
                diameter: 7.0,
                height: 0.2,
                tessellation: 80,
                elevation: -0.1,
                albedo: Vec3::splat(0.95),
                roughness: 0.15,
                metallic: 0.0,
                receives_shadows: true,
            },
            shadows: ShadowSettings {
                map_size: 2048,
                darkness: 0.1,
                bias: 0.00001,
                blur_exponential: true,
            },
        }
    }
}
