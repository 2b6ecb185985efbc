use rand::RngExt;

use crate::animation::mixer::ClipIndex;

/// Index reserved for the idle/base clip; never picked at random.
pub const BASE_CLIP: ClipIndex = 0;

/// Picks a clip uniformly from `1..clip_count`, never `active`.
///
/// Collisions with the active clip are redrawn rather than shifted to a
/// neighbour, which keeps the distribution uniform over the candidates.
/// Returns `None` when no candidate exists.
pub fn pick_random_clip<R: RngExt + ?Sized>(
    rng: &mut R,
    clip_count: usize,
    active: Option<ClipIndex>,
) -> Option<ClipIndex> {
    let candidates = (BASE_CLIP + 1..clip_count)
        .filter(|&i| Some(i) != active)
        .count();
    if candidates == 0 {
        return None;
    }

    loop {
        let pick = rng.random_range(BASE_CLIP + 1..clip_count);
        if Some(pick) != active {
            return Some(pick);
        }
        log::trace!("Random clip {pick} is already active, redrawing");
    }
}
