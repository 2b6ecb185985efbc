//! Cross-fade Controller Tests
//!
//! Tests for:
//! - Steady/Blending transitions and weight ramps
//! - Rejections: active clip, cooldown, unknown clip, nothing playing
//! - Interrupting an in-flight blend
//! - Random clip selection

use std::sync::Arc;
use std::time::Duration;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use stage::animation::action::AnimationAction;
use stage::animation::binder::BoundClip;
use stage::animation::binding::TargetPath;
use stage::animation::clip::{AnimationClip, Track, TrackData, TrackMeta};
use stage::animation::selection::BASE_CLIP;
use stage::animation::tracks::{InterpolationMode, KeyframeTrack};
use stage::animation::{
    AnimationMixer, BlendRejection, CrossFadeController, FadeStep, Playback, pick_random_clip,
};
use stage::config::BlendSettings;

const EPSILON: f32 = 1e-4;

fn mixer_with(count: usize) -> AnimationMixer {
    let mut mixer = AnimationMixer::new();
    for i in 0..count {
        let track = Track {
            meta: TrackMeta {
                node_name: "Hips".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 2.0],
                vec![Vec3::ZERO, Vec3::Y],
                InterpolationMode::Linear,
            )),
        };
        mixer.add_action(AnimationAction::new(BoundClip {
            clip: Arc::new(AnimationClip::new(format!("clip_{i}"), vec![track])),
            bindings: Vec::new(),
        }));
    }
    mixer
}

fn started(count: usize) -> (AnimationMixer, CrossFadeController) {
    let mut mixer = mixer_with(count);
    let mut controller = CrossFadeController::new(BlendSettings::default());
    assert!(controller.start(&mut mixer, BASE_CLIP));
    (mixer, controller)
}

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn weight(mixer: &AnimationMixer, index: usize) -> f32 {
    mixer.action(index).unwrap().weight
}

// ============================================================================
// Start & Steady
// ============================================================================

#[test]
fn new_controller_is_empty() {
    let controller = CrossFadeController::new(BlendSettings::default());
    assert_eq!(controller.playback(), Playback::Empty);
    assert_eq!(controller.active(), None);
}

#[test]
fn start_plays_first_clip_looping() {
    let (mixer, controller) = started(3);

    assert_eq!(controller.playback(), Playback::Steady { current: 0 });
    let action = mixer.action(0).unwrap();
    assert!(action.is_playing());
    assert!((action.weight - 1.0).abs() < EPSILON);
}

#[test]
fn start_without_clips_stays_empty() {
    let mut mixer = AnimationMixer::new();
    let mut controller = CrossFadeController::new(BlendSettings::default());

    assert!(!controller.start(&mut mixer, BASE_CLIP));
    assert_eq!(controller.playback(), Playback::Empty);
}

// ============================================================================
// Request Rejections
// ============================================================================

#[test]
fn request_before_start_is_rejected() {
    let mut mixer = mixer_with(2);
    let mut controller = CrossFadeController::new(BlendSettings::default());

    assert_eq!(
        controller.request(&mut mixer, 1, ms(0)),
        Err(BlendRejection::NoClip)
    );
}

#[test]
fn request_for_active_clip_changes_nothing() {
    let (mut mixer, mut controller) = started(3);

    assert_eq!(
        controller.request(&mut mixer, 0, ms(0)),
        Err(BlendRejection::AlreadyActive)
    );
    assert_eq!(controller.playback(), Playback::Steady { current: 0 });
    assert!((weight(&mixer, 0) - 1.0).abs() < EPSILON);
}

#[test]
fn request_for_unknown_clip_is_rejected() {
    let (mut mixer, mut controller) = started(3);
    assert_eq!(
        controller.request(&mut mixer, 3, ms(0)),
        Err(BlendRejection::UnknownClip)
    );
}

#[test]
fn second_request_within_cooldown_is_dropped() {
    let (mut mixer, mut controller) = started(4);

    assert_eq!(controller.request(&mut mixer, 1, ms(1000)), Ok(()));
    assert_eq!(
        controller.request(&mut mixer, 2, ms(1300)),
        Err(BlendRejection::CoolingDown)
    );
    assert_eq!(
        controller.playback(),
        Playback::Blending {
            from: 0,
            to: 1,
            weight: 0.0
        }
    );
}

#[test]
fn cooldown_is_independent_of_blend_length() {
    let (mut mixer, mut controller) = started(3);
    controller.request(&mut mixer, 1, ms(0)).unwrap();

    // The blend needs ~50 frames, far longer than the cooldown.
    controller.tick(&mut mixer);
    assert!(controller.is_blending());
    assert_eq!(controller.request(&mut mixer, 2, ms(500)), Ok(()));
}

// ============================================================================
// Blending
// ============================================================================

#[test]
fn accepted_request_holds_old_and_starts_new() {
    let (mut mixer, mut controller) = started(3);
    mixer.action_mut(0).unwrap().time = 0.7;

    controller.request(&mut mixer, 2, ms(0)).unwrap();

    let old = mixer.action(0).unwrap();
    let new = mixer.action(2).unwrap();
    assert!(old.is_holding());
    assert!((old.time - 0.7).abs() < EPSILON);
    assert!((old.weight - 1.0).abs() < EPSILON);
    assert!(new.is_playing());
    assert!(new.time.abs() < EPSILON);
    assert!(new.weight.abs() < EPSILON);
    assert_eq!(controller.active(), Some(2));
    assert_eq!(controller.current(), Some(0));
}

#[test]
fn blend_weights_are_complementary_and_monotonic() {
    let (mut mixer, mut controller) = started(2);
    controller.request(&mut mixer, 1, ms(0)).unwrap();

    let mut last_new = 0.0;
    let mut frames = 0;
    loop {
        frames += 1;
        assert!(frames <= 60, "blend never completed");

        match controller.tick(&mut mixer) {
            FadeStep::Progress {
                from_weight,
                to_weight,
            } => {
                assert!((from_weight + to_weight - 1.0).abs() < EPSILON);
                assert!(to_weight > last_new);
                assert!((weight(&mixer, 0) - from_weight).abs() < EPSILON);
                assert!((weight(&mixer, 1) - to_weight).abs() < EPSILON);
                last_new = to_weight;
            }
            FadeStep::Completed(clip) => {
                assert_eq!(clip, 1);
                break;
            }
            FadeStep::Idle => panic!("blend went idle before completing"),
        }
    }

    // 1 / 0.02 steps, give or take float accumulation.
    assert!((50..=51).contains(&frames), "took {frames} frames");
    assert_eq!(controller.playback(), Playback::Steady { current: 1 });
    assert!(!mixer.action(0).unwrap().is_active());
    assert!((weight(&mixer, 1) - 1.0).abs() < EPSILON);
    assert_eq!(controller.tick(&mut mixer), FadeStep::Idle);
}

#[test]
fn custom_step_finishes_in_fewer_frames() {
    let mut mixer = mixer_with(2);
    let mut controller = CrossFadeController::new(BlendSettings {
        step: 0.25,
        ..BlendSettings::default()
    });
    controller.start(&mut mixer, 0);
    controller.request(&mut mixer, 1, ms(0)).unwrap();

    for _ in 0..3 {
        assert!(matches!(controller.tick(&mut mixer), FadeStep::Progress { .. }));
    }
    assert_eq!(controller.tick(&mut mixer), FadeStep::Completed(1));
}

#[test]
fn interrupt_restarts_from_incoming_clip() {
    let (mut mixer, mut controller) = started(3);
    controller.request(&mut mixer, 1, ms(0)).unwrap();
    for _ in 0..10 {
        controller.tick(&mut mixer);
    }

    controller.request(&mut mixer, 2, ms(600)).unwrap();

    assert_eq!(
        controller.playback(),
        Playback::Blending {
            from: 1,
            to: 2,
            weight: 0.0
        }
    );
    assert!(!mixer.action(0).unwrap().is_active());
    assert!(mixer.action(1).unwrap().is_holding());
    assert!((weight(&mixer, 1) - 1.0).abs() < EPSILON);
    assert_eq!(controller.weights(), Some((1.0, 0.0)));
}

#[test]
fn reset_returns_to_empty() {
    let (mut mixer, mut controller) = started(2);
    controller.request(&mut mixer, 1, ms(0)).unwrap();
    controller.reset();

    assert_eq!(controller.playback(), Playback::Empty);
    assert_eq!(controller.tick(&mut mixer), FadeStep::Idle);
}

// ============================================================================
// Random Selection
// ============================================================================

#[test]
fn random_pick_never_returns_base_or_active() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..500 {
        let pick = pick_random_clip(&mut rng, 14, Some(5)).unwrap();
        assert_ne!(pick, BASE_CLIP);
        assert_ne!(pick, 5);
        assert!(pick < 14);
    }
}

#[test]
fn random_pick_covers_every_candidate() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut seen = [false; 6];
    for _ in 0..500 {
        seen[pick_random_clip(&mut rng, 6, Some(0)).unwrap()] = true;
    }
    assert_eq!(seen, [false, true, true, true, true, true]);
}

#[test]
fn random_pick_without_candidates() {
    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(pick_random_clip(&mut rng, 0, None), None);
    assert_eq!(pick_random_clip(&mut rng, 1, Some(0)), None);
    assert_eq!(pick_random_clip(&mut rng, 2, Some(1)), None);
    assert_eq!(pick_random_clip(&mut rng, 2, Some(0)), Some(1));
}
