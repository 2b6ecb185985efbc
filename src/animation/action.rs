use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::{
    binder::BoundClip,
    binding::PropertyBinding,
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    Once,
    Loop,
}

/// Playback state of one bound clip.
///
/// An action contributes to the pose only while it is `playing` or
/// `holding` and its weight is above zero. A held action keeps its current
/// time but stops advancing, which is how a clip that is being faded out
/// stays visible without moving.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,
    bindings: Vec<PropertyBinding>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,

    playing: bool,
    holding: bool,

    track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(bound: BoundClip) -> Self {
        let track_count = bound.clip.tracks.len();
        Self {
            clip: bound.clip,
            bindings: bound.bindings,
            time: 0.0,
            time_scale: 1.0,
            weight: 0.0,
            loop_mode: LoopMode::Loop,
            playing: false,
            holding: false,
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    #[must_use]
    pub fn bindings(&self) -> &[PropertyBinding] {
        &self.bindings
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    #[must_use]
    pub fn is_holding(&self) -> bool {
        self.holding
    }

    /// Whether this action currently contributes to the pose.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        (self.playing || self.holding) && self.weight > 0.0
    }

    /// Starts playback from the beginning.
    pub fn play(&mut self, looping: bool, speed_ratio: f32) {
        self.time = 0.0;
        self.time_scale = speed_ratio;
        self.loop_mode = if looping { LoopMode::Loop } else { LoopMode::Once };
        self.playing = true;
        self.holding = false;
        self.track_cursors.fill(KeyframeCursor::default());
    }

    /// Freezes the action at its current time; it keeps contributing its
    /// pose according to its weight.
    pub fn hold(&mut self) {
        self.playing = false;
        self.holding = true;
    }

    /// Stops the action entirely and rewinds it.
    pub fn stop(&mut self) {
        self.playing = false;
        self.holding = false;
        self.weight = 0.0;
        self.time = 0.0;
    }

    /// Advances time.
    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.hold();
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.hold();
                }
            }
            LoopMode::Loop => {
                self.time = self.time.rem_euclid(duration);
            }
        }
    }

    /// Samples the track behind `binding` at the current time.
    pub(crate) fn sample(&mut self, binding: &PropertyBinding) -> Option<TrackValue> {
        let track = self.clip.tracks.get(binding.track_index)?;
        let cursor = self.track_cursors.get_mut(binding.track_index)?;

        match &track.data {
            TrackData::Vector3(t) => t.sample_with_cursor(self.time, cursor).map(TrackValue::Vector3),
            TrackData::Quaternion(t) => {
                t.sample_with_cursor(self.time, cursor).map(TrackValue::Quaternion)
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}
