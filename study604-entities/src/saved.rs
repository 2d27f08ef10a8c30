use crate::{id::*, spot::*, time::*};

/// A bookmark of a [`Spot`].
///
/// The spot attributes are a snapshot taken at save time
/// and are never updated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedSpot {
    pub id: Id,
    pub spot_id: SpotId,
    pub spot: SpotSnapshot,
    pub created_at: Option<Timestamp>,
}

impl SavedSpot {
    pub fn new(spot_id: SpotId, spot: SpotSnapshot) -> Self {
        Self {
            id: Id::new(),
            spot_id,
            spot,
            created_at: Some(Timestamp::now()),
        }
    }
}
