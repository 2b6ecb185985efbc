use glam::{Quat, Vec3, Vec4};
use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::animation::action::{AnimationAction, TrackValue};
use crate::animation::binding::TargetPath;
use crate::scene::{Node, NodeKey};

/// Index of a bound clip within its model, in fetch order.
pub type ClipIndex = usize;

/// Weighted sum of every active action's contribution to one property.
#[derive(Debug, Clone, Copy)]
struct Accumulator {
    weight: f32,
    vector: Vec3,
    rotation: Vec4,
}

impl Accumulator {
    fn new() -> Self {
        Self {
            weight: 0.0,
            vector: Vec3::ZERO,
            rotation: Vec4::ZERO,
        }
    }

    fn add(&mut self, value: TrackValue, weight: f32) {
        self.weight += weight;
        match value {
            TrackValue::Vector3(v) => self.vector += v * weight,
            TrackValue::Quaternion(q) => {
                // Keep all contributions in the same hemisphere before summing.
                let mut q = Vec4::from(q);
                if self.rotation.dot(q) < 0.0 {
                    q = -q;
                }
                self.rotation += q * weight;
            }
        }
    }
}

/// Owns the actions of one model and writes their blended pose into its nodes.
#[derive(Debug, Default)]
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    scratch: FxHashMap<(NodeKey, TargetPath), Accumulator>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: AnimationAction) -> ClipIndex {
        self.actions.push(action);
        self.actions.len() - 1
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn action(&self, index: ClipIndex) -> Option<&AnimationAction> {
        self.actions.get(index)
    }

    pub fn action_mut(&mut self, index: ClipIndex) -> Option<&mut AnimationAction> {
        self.actions.get_mut(index)
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    #[must_use]
    pub fn find(&self, name: &str) -> Option<ClipIndex> {
        self.actions.iter().position(|a| a.name() == name)
    }

    /// Sets the blend weight of a clip, clamped to `[0, 1]`.
    pub fn set_weight(&mut self, index: ClipIndex, weight: f32) {
        if let Some(action) = self.actions.get_mut(index) {
            action.weight = weight.clamp(0.0, 1.0);
        }
    }

    /// Advances every action by `dt` and writes the blended pose.
    pub fn update(&mut self, dt: f32, nodes: &mut SlotMap<NodeKey, Node>) {
        for action in &mut self.actions {
            action.update(dt);
        }

        self.scratch.clear();
        for action in &mut self.actions {
            if !action.is_active() {
                continue;
            }
            let weight = action.weight;
            for i in 0..action.bindings().len() {
                let binding = action.bindings()[i];
                if let Some(value) = action.sample(&binding) {
                    self.scratch
                        .entry((binding.node, binding.target))
                        .or_insert_with(Accumulator::new)
                        .add(value, weight);
                }
            }
        }

        for (&(node_key, target), acc) in &self.scratch {
            if acc.weight <= 0.0 {
                continue;
            }
            let Some(node) = nodes.get_mut(node_key) else {
                continue;
            };

            // Weight the clips leave uncovered goes to the rest pose.
            let mut acc = *acc;
            let rest = node.rest;
            let remainder = (1.0 - acc.weight).max(0.0);
            match target {
                TargetPath::Translation => {
                    acc.add(TrackValue::Vector3(rest.position), remainder);
                    node.transform.position = acc.vector / acc.weight;
                }
                TargetPath::Scale => {
                    acc.add(TrackValue::Vector3(rest.scale), remainder);
                    node.transform.scale = acc.vector / acc.weight;
                }
                TargetPath::Rotation => {
                    acc.add(TrackValue::Quaternion(rest.rotation), remainder);
                    if acc.rotation.length_squared() > f32::EPSILON {
                        node.transform.rotation = Quat::from_vec4(acc.rotation).normalize();
                    }
                }
            }
        }
    }

    /// Stops every action.
    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
    }
}
