use std::collections::{HashMap, HashSet};

use crate::entities::*;

/// Answers "is this spot saved, and by which bookmark?"
/// for a list of bookmarks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedLookup {
    pub spot_ids: HashSet<String>,
    pub saved_ids: HashMap<String, Id>,
}

impl SavedLookup {
    pub fn is_saved(&self, spot_id: SpotId) -> bool {
        self.spot_ids.contains(&spot_id.to_string())
    }

    /// The id of the bookmark of a spot.
    pub fn saved_id(&self, spot_id: SpotId) -> Option<&Id> {
        self.saved_ids.get(&spot_id.to_string())
    }
}

/// Indexes bookmarks by the id of the saved spot.
///
/// Duplicate bookmarks of the same spot may exist,
/// the last one wins.
pub fn saved_lookup(saved: &[SavedSpot]) -> SavedLookup {
    saved
        .iter()
        .fold(SavedLookup::default(), |mut lookup, s| {
            let spot_id = s.spot_id.to_string();
            lookup.spot_ids.insert(spot_id.clone());
            lookup.saved_ids.insert(spot_id, s.id.clone());
            lookup
        })
}

pub fn has_reviewed(reviews: &[Review]) -> bool {
    !reviews.is_empty()
}
