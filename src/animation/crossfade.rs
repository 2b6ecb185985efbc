//! Cross-fade Controller
//!
//! A two-state machine stepped once per rendered frame:
//!
//! ```text
//!            request(to != active)
//!   Steady ───────────────────────▶ Blending { from, to, weight }
//!     ▲                                   │ tick(): weight += step
//!     └───────────── weight >= 1 ─────────┘
//! ```
//!
//! `Empty` precedes the first bound model and follows every model disposal.
//!
//! While blending, the clip fading out holds its pose (it no longer
//! advances) and the clip fading in plays from its start. The weights always
//! sum to one and stay within `[0, 1]`.

use std::time::Duration;

use crate::animation::mixer::{AnimationMixer, ClipIndex};
use crate::config::BlendSettings;

/// Current playback of the bound model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Playback {
    /// No model bound, or the model has no clips.
    Empty,
    /// One clip at full weight, looping.
    Steady { current: ClipIndex },
    /// `from` fading out while `to` fades in; `weight` is the weight of `to`.
    Blending {
        from: ClipIndex,
        to: ClipIndex,
        weight: f32,
    },
}

/// Why a blend request was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendRejection {
    /// Nothing is playing yet.
    NoClip,
    /// The target index does not exist on the bound model.
    UnknownClip,
    /// The target is already playing, or already fading in.
    AlreadyActive,
    /// Too soon after the previous accepted request.
    CoolingDown,
    /// A random pick found no clip besides the base and active clips.
    NoCandidate,
}

/// Result of advancing an in-flight blend by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FadeStep {
    /// Nothing to do.
    Idle,
    /// Weights were updated; the blend continues next frame.
    Progress { from_weight: f32, to_weight: f32 },
    /// The blend finished and the given clip is now playing alone.
    Completed(ClipIndex),
}

#[derive(Debug, Clone)]
pub struct CrossFadeController {
    playback: Playback,
    settings: BlendSettings,
    last_request: Option<Duration>,
}

impl CrossFadeController {
    #[must_use]
    pub fn new(settings: BlendSettings) -> Self {
        Self {
            playback: Playback::Empty,
            settings,
            last_request: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn playback(&self) -> Playback {
        self.playback
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &BlendSettings {
        &self.settings
    }

    /// The clip that is, or is about to be, the only one at full weight.
    #[must_use]
    pub fn active(&self) -> Option<ClipIndex> {
        match self.playback {
            Playback::Empty => None,
            Playback::Steady { current } => Some(current),
            Playback::Blending { to, .. } => Some(to),
        }
    }

    /// The committed playback clip: during a blend this is still the clip
    /// fading out.
    #[must_use]
    pub fn current(&self) -> Option<ClipIndex> {
        match self.playback {
            Playback::Empty => None,
            Playback::Steady { current } => Some(current),
            Playback::Blending { from, .. } => Some(from),
        }
    }

    #[must_use]
    pub fn is_blending(&self) -> bool {
        matches!(self.playback, Playback::Blending { .. })
    }

    /// Returns `(from_weight, to_weight)` while blending.
    #[must_use]
    pub fn weights(&self) -> Option<(f32, f32)> {
        match self.playback {
            Playback::Blending { weight, .. } => Some((1.0 - weight, weight)),
            _ => None,
        }
    }

    /// Starts `clip` looping at full weight with nothing to blend from.
    ///
    /// Used once per bound model; returns `false` when the clip does not exist.
    pub fn start(&mut self, mixer: &mut AnimationMixer, clip: ClipIndex) -> bool {
        let Some(action) = mixer.action_mut(clip) else {
            return false;
        };
        action.play(true, 1.0);
        action.weight = 1.0;
        self.playback = Playback::Steady { current: clip };
        true
    }

    /// Back to `Empty`, forgetting the cooldown clock.
    pub fn reset(&mut self) {
        self.playback = Playback::Empty;
        self.last_request = None;
    }

    /// Asks for a cross-fade to `target`.
    ///
    /// `now` is the session clock. A request made while another blend is in
    /// flight (and past the cooldown) stops the clip fading out at once and
    /// restarts the ramp from the clip that was fading in.
    pub fn request(
        &mut self,
        mixer: &mut AnimationMixer,
        target: ClipIndex,
        now: Duration,
    ) -> Result<(), BlendRejection> {
        let Some(active) = self.active() else {
            return Err(BlendRejection::NoClip);
        };
        if target >= mixer.len() {
            return Err(BlendRejection::UnknownClip);
        }
        if let Some(last) = self.last_request
            && now.saturating_sub(last) < self.settings.cooldown()
        {
            return Err(BlendRejection::CoolingDown);
        }
        if target == active {
            return Err(BlendRejection::AlreadyActive);
        }

        if let Playback::Blending { from: fading_out, .. } = self.playback
            && let Some(action) = mixer.action_mut(fading_out)
        {
            log::debug!("Interrupting blend; stopping '{}'", action.name());
            action.stop();
        }

        let from = active;
        if let Some(action) = mixer.action_mut(from) {
            action.hold();
        }
        mixer.set_weight(from, 1.0);

        if let Some(action) = mixer.action_mut(target) {
            action.play(true, self.settings.speed_ratio);
        }
        mixer.set_weight(target, 0.0);

        self.playback = Playback::Blending {
            from,
            to: target,
            weight: 0.0,
        };
        self.last_request = Some(now);
        Ok(())
    }

    /// Advances an in-flight blend by one frame.
    pub fn tick(&mut self, mixer: &mut AnimationMixer) -> FadeStep {
        let Playback::Blending { from, to, weight } = self.playback else {
            return FadeStep::Idle;
        };

        let to_weight = (weight + self.settings.step).min(1.0);
        let from_weight = 1.0 - to_weight;
        mixer.set_weight(to, to_weight);
        mixer.set_weight(from, from_weight);

        if to_weight >= 1.0 {
            if let Some(action) = mixer.action_mut(from) {
                action.stop();
            }
            self.playback = Playback::Steady { current: to };
            return FadeStep::Completed(to);
        }

        self.playback = Playback::Blending {
            from,
            to,
            weight: to_weight,
        };
        FadeStep::Progress {
            from_weight,
            to_weight,
        }
    }
}
