pub mod values;
pub mod tracks;
pub mod clip;
pub mod binding;
pub mod binder;
pub mod action;
pub mod mixer;
pub mod crossfade;
pub mod selection;
pub mod library;

pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use action::{AnimationAction, LoopMode};
pub use mixer::{AnimationMixer, ClipIndex};
pub use binder::{Binder, BoundClip};
pub use binding::{PropertyBinding, TargetPath};
pub use tracks::{InterpolationMode, KeyframeTrack};
pub use crossfade::{BlendRejection, CrossFadeController, FadeStep, Playback};
pub use selection::pick_random_clip;
pub use library::AnimationLibrary;
