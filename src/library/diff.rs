use std::collections::HashMap;

use super::model::{Track, TrackId};

/// Difference between two track lists, keyed by [`TrackId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListDiff {
    /// Ids present only in the new list, in new-list order.
    pub inserted: Vec<TrackId>,
    /// Ids present only in the old list, in old-list order.
    pub removed: Vec<TrackId>,
    /// Ids present in both lists whose contents differ, in new-list order.
    pub changed: Vec<TrackId>,
}

impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }
}

pub fn diff_tracks(old: &[Track], new: &[Track]) -> ListDiff {
    let old_by_id: HashMap<TrackId, &Track> = old.iter().map(|t| (t.id, t)).collect();
    let new_by_id: HashMap<TrackId, &Track> = new.iter().map(|t| (t.id, t)).collect();

    let mut diff = ListDiff::default();
    for track in new {
        match old_by_id.get(&track.id) {
            None => diff.inserted.push(track.id),
            Some(prev) if *prev != track => diff.changed.push(track.id),
            Some(_) => {}
        }
    }
    diff.removed = old
        .iter()
        .filter(|t| !new_by_id.contains_key(&t.id))
        .map(|t| t.id)
        .collect();
    diff
}

/// Position of the track with `id` in `tracks`.
pub fn position_of(tracks: &[Track], id: TrackId) -> Option<usize> {
    tracks.iter().position(|t| t.id == id)
}
