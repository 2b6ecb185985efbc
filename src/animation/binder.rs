use std::sync::Arc;

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::AnimationClip;
use crate::scene::NodeNameIndex;

/// A clip retargeted onto one model.
#[derive(Debug, Clone)]
pub struct BoundClip {
    pub clip: Arc<AnimationClip>,
    pub bindings: Vec<PropertyBinding>,
}

impl BoundClip {
    /// A clip none of whose targets exist on the model. It still occupies a
    /// slot so that clip indices follow fetch order.
    #[inline]
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.bindings.is_empty()
    }
}

pub struct Binder;

impl Binder {
    /// Resolves every track's node name against `index`.
    ///
    /// Tracks whose node does not exist on the model are skipped silently.
    #[must_use]
    pub fn bind(index: &NodeNameIndex, clip: &AnimationClip) -> Vec<PropertyBinding> {
        clip.tracks
            .iter()
            .enumerate()
            .filter_map(|(track_index, track)| {
                index.get(&track.meta.node_name).map(|node| PropertyBinding {
                    track_index,
                    node,
                    target: track.meta.target,
                })
            })
            .collect()
    }

    /// Consumes a library clip and produces the model-owned copy named
    /// `<model>_<clip>`.
    #[must_use]
    pub fn retarget(model_name: &str, index: &NodeNameIndex, mut clip: AnimationClip) -> BoundClip {
        let bindings = Self::bind(index, &clip);
        clip.name = format!("{model_name}_{}", clip.name);
        let bound = BoundClip {
            clip: Arc::new(clip),
            bindings,
        };

        if bound.is_noop() {
            log::warn!("Clip '{}' matched no node of model '{model_name}'", bound.clip.name);
        } else {
            log::debug!(
                "Clip '{}' bound {} of {} tracks",
                bound.clip.name,
                bound.bindings.len(),
                bound.clip.tracks.len()
            );
        }
        bound
    }
}
