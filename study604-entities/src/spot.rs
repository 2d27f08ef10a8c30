use strum::{Display, EnumIter, EnumString};

use crate::{geo::*, id::*, rating::*, time::*};

/// Minimum outlet access rating of a spot that advertises outlets.
pub const OUTLETS_MIN_RATING: f64 = 3.0;

/// A café or library that is suitable for studying.
#[derive(Debug, Clone, PartialEq)]
pub struct Spot {
    pub id: SpotId,
    pub name: String,
    pub address: String,
    pub tagline: String,
    pub pos: MapPoint,
    pub image: String,
    pub rating: AvgRatingValue,
    pub description: String,
    pub wifi: bool,
    pub food: bool,
    /// Higher is more popular.
    pub popularity: f64,
    /// Distance proxy in meters, lower is closer.
    pub nearness: f64,
    pub review_count: u32,
    pub category_ratings: CategoryRatings,
    pub preview_images: Vec<String>,
    pub created_at: Option<Timestamp>,
}

impl Spot {
    pub fn has_amenity(&self, amenity: Amenity) -> bool {
        match amenity {
            Amenity::Wifi => self.wifi,
            Amenity::Food => self.food,
            Amenity::Outlets => {
                f64::from(self.category_ratings.outlet_access) >= OUTLETS_MIN_RATING
            }
        }
    }

    pub fn snapshot(&self) -> SpotSnapshot {
        SpotSnapshot::from(self)
    }
}

/// Amenities a user can filter spots by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumString, Display)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Amenity {
    Wifi,
    Food,
    Outlets,
}

/// The attributes of a spot that are copied into a bookmark.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotSnapshot {
    pub name: String,
    pub address: String,
    pub rating: AvgRatingValue,
    pub image: String,
}

impl From<&Spot> for SpotSnapshot {
    fn from(from: &Spot) -> Self {
        Self {
            name: from.name.clone(),
            address: from.address.clone(),
            rating: from.rating,
            image: from.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;

    #[test]
    fn amenities() {
        let spot = Spot::build()
            .wifi(true)
            .food(false)
            .outlet_access(3.0)
            .finish();
        assert!(spot.has_amenity(Amenity::Wifi));
        assert!(!spot.has_amenity(Amenity::Food));
        assert!(spot.has_amenity(Amenity::Outlets));

        let spot = Spot::build().outlet_access(2.9).finish();
        assert!(!spot.has_amenity(Amenity::Outlets));
    }

    #[test]
    fn snapshot_copies_display_fields() {
        let spot = Spot::build()
            .id(3)
            .name("Revolver")
            .address("325 Cambie St., Vancouver, BC")
            .rating(4.6)
            .image("revolver.jpg")
            .finish();
        let snapshot = spot.snapshot();
        assert_eq!("Revolver", snapshot.name);
        assert_eq!("325 Cambie St., Vancouver, BC", snapshot.address);
        assert_eq!(AvgRatingValue::from(4.6), snapshot.rating);
        assert_eq!("revolver.jpg", snapshot.image);
    }
}
