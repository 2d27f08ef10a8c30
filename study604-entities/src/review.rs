use crate::{id::*, rating::*, time::*};

/// A user's rating and text submission for a spot.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub id        : Id,
    pub spot_id   : SpotId,
    pub spot_name : String,
    pub ratings   : ReviewRatings,
    pub text      : String,
    pub timestamp : Timestamp,
}

impl Review {
    /// The star value of the review, i.e. the average
    /// over all categories.
    pub fn stars(&self) -> AvgRatingValue {
        self.ratings.average()
    }
}
