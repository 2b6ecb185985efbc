use crate::animation::clip::AnimationClip;

/// Clips fetched for the next model bind, in load order.
///
/// The library is skeleton independent and single use: binding drains it,
/// and a failed bind drops it.
#[derive(Debug, Default)]
pub struct AnimationLibrary {
    clips: Vec<AnimationClip>,
}

impl AnimationLibrary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, clip: AnimationClip) {
        self.clips.push(clip);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    /// Hands every clip over in load order, leaving the library empty.
    pub fn drain(&mut self) -> impl Iterator<Item = AnimationClip> + '_ {
        self.clips.drain(..)
    }
}

impl Drop for AnimationLibrary {
    fn drop(&mut self) {
        if !self.clips.is_empty() {
            log::debug!("Releasing {} unbound animation clips", self.clips.len());
        }
    }
}
