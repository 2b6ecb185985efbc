//! Application shells.

#[cfg(feature = "winit")]
pub mod winit;
