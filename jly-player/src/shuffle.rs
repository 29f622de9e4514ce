//! Shuffle selection
//!
//! Candidates are every pool entry except the item currently loaded, so a
//! shuffle never lands on what is already showing. Selection is uniform.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::catalog::VideoPoolEntry;

/// Entries eligible for the next shuffle
pub fn shuffle_candidates<'a>(
    pool: &'a [VideoPoolEntry],
    current_id: Option<&str>,
) -> Vec<&'a VideoPoolEntry> {
    pool.iter()
        .filter(|entry| Some(entry.id.as_str()) != current_id)
        .collect()
}

/// Draw the next item, or `None` when nothing else is available
pub fn pick_shuffle<'a, R: Rng + ?Sized>(
    pool: &'a [VideoPoolEntry],
    current_id: Option<&str>,
    rng: &mut R,
) -> Option<&'a VideoPoolEntry> {
    shuffle_candidates(pool, current_id).choose(rng).copied()
}
