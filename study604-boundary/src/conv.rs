use super::*;
use study604_entities as e;
use thiserror::Error;

/// Reasons for rejecting a row read from the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowInvalidation {
    #[error("empty id")]
    EmptyId,
    #[error("position out of range")]
    Position,
    #[error("rating '{0}' out of range")]
    Rating(&'static str),
    #[error("'{0}' is not a finite number")]
    NotFinite(&'static str),
    #[error(transparent)]
    Timestamp(#[from] e::time::TimestampParseError),
}

fn avg_rating(field: &'static str, value: f64) -> Result<e::rating::AvgRatingValue, RowInvalidation> {
    let rating = e::rating::AvgRatingValue::from(value);
    if !rating.is_valid() {
        return Err(RowInvalidation::Rating(field));
    }
    Ok(rating)
}

fn finite(field: &'static str, value: f64) -> Result<f64, RowInvalidation> {
    if !value.is_finite() {
        return Err(RowInvalidation::NotFinite(field));
    }
    Ok(value)
}

fn star(field: &'static str, value: u8) -> Result<e::rating::RatingValue, RowInvalidation> {
    let value = e::rating::RatingValue::from(value);
    if value > e::rating::RatingValue::max() {
        return Err(RowInvalidation::Rating(field));
    }
    Ok(value)
}

fn id(from: String) -> Result<e::id::Id, RowInvalidation> {
    let id = e::id::Id::from(from);
    if !id.is_valid() {
        return Err(RowInvalidation::EmptyId);
    }
    Ok(id)
}

impl From<e::geo::MapPoint> for Position {
    fn from(from: e::geo::MapPoint) -> Self {
        Self {
            lat: from.lat(),
            lng: from.lng(),
        }
    }
}

impl TryFrom<Position> for e::geo::MapPoint {
    type Error = RowInvalidation;
    fn try_from(from: Position) -> Result<Self, Self::Error> {
        let Position { lat, lng } = from;
        e::geo::MapPoint::try_from_lat_lng_deg(lat, lng).ok_or(RowInvalidation::Position)
    }
}

impl From<e::spot::Spot> for Spot {
    fn from(from: e::spot::Spot) -> Self {
        let e::spot::Spot {
            id,
            name,
            address,
            tagline,
            pos,
            image,
            rating,
            description,
            wifi,
            food,
            popularity,
            nearness,
            review_count,
            category_ratings,
            preview_images,
            created_at,
        } = from;
        Self {
            id: id.into(),
            name,
            address,
            position: pos.into(),
            image,
            rating: rating.into(),
            description,
            wifi,
            food,
            popularity,
            nearness,
            review_count,
            tagline,
            atmosphere_rating: category_ratings.atmosphere.into(),
            wifi_rating: category_ratings.wifi.into(),
            outlet_access_rating: category_ratings.outlet_access.into(),
            food_beverage_rating: category_ratings.food_beverage.into(),
            table_space_rating: category_ratings.table_space.into(),
            preview_images: (!preview_images.is_empty()).then_some(preview_images),
            created_at: created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

impl TryFrom<Spot> for e::spot::Spot {
    type Error = RowInvalidation;
    fn try_from(from: Spot) -> Result<Self, Self::Error> {
        let Spot {
            id,
            name,
            address,
            position,
            image,
            rating,
            description,
            wifi,
            food,
            popularity,
            nearness,
            review_count,
            tagline,
            atmosphere_rating,
            wifi_rating,
            outlet_access_rating,
            food_beverage_rating,
            table_space_rating,
            preview_images,
            created_at,
        } = from;
        let category_ratings = e::rating::CategoryRatings {
            atmosphere: avg_rating("atmosphere_rating", atmosphere_rating)?,
            wifi: avg_rating("wifi_rating", wifi_rating)?,
            outlet_access: avg_rating("outlet_access_rating", outlet_access_rating)?,
            food_beverage: avg_rating("food_beverage_rating", food_beverage_rating)?,
            table_space: avg_rating("table_space_rating", table_space_rating)?,
        };
        Ok(Self {
            id: id.into(),
            name,
            address,
            tagline,
            pos: position.try_into()?,
            image,
            rating: avg_rating("rating", rating)?,
            description,
            wifi,
            food,
            popularity: finite("popularity", popularity)?,
            nearness: finite("nearness", nearness)?,
            review_count,
            category_ratings,
            preview_images: preview_images.unwrap_or_default(),
            created_at: created_at
                .map(|ts| ts.parse::<e::time::Timestamp>())
                .transpose()?,
        })
    }
}

impl From<e::saved::SavedSpot> for SavedSpot {
    fn from(from: e::saved::SavedSpot) -> Self {
        let e::saved::SavedSpot {
            id,
            spot_id,
            spot,
            created_at,
        } = from;
        let e::spot::SpotSnapshot {
            name,
            address,
            rating,
            image,
        } = spot;
        Self {
            id: id.into(),
            spot_id: spot_id.into(),
            spot_name: name,
            address,
            rating: rating.into(),
            image,
            created_at: created_at.map(|ts| ts.to_rfc3339()),
        }
    }
}

impl TryFrom<SavedSpot> for e::saved::SavedSpot {
    type Error = RowInvalidation;
    fn try_from(from: SavedSpot) -> Result<Self, Self::Error> {
        let SavedSpot {
            id: saved_id,
            spot_id,
            spot_name,
            address,
            rating,
            image,
            created_at,
        } = from;
        Ok(Self {
            id: id(saved_id)?,
            spot_id: spot_id.into(),
            spot: e::spot::SpotSnapshot {
                name: spot_name,
                address,
                rating: avg_rating("rating", rating)?,
                image,
            },
            created_at: created_at
                .map(|ts| ts.parse::<e::time::Timestamp>())
                .transpose()?,
        })
    }
}

impl From<e::rating::ReviewRatings> for ReviewRatings {
    fn from(from: e::rating::ReviewRatings) -> Self {
        let e::rating::ReviewRatings {
            atmosphere,
            wifi,
            outlet_access,
            food_beverage,
            table_space,
        } = from;
        Self {
            atmosphere: atmosphere.into(),
            wifi: wifi.into(),
            outlet_access: outlet_access.into(),
            food_beverage: food_beverage.into(),
            table_space: table_space.into(),
        }
    }
}

impl TryFrom<ReviewRatings> for e::rating::ReviewRatings {
    type Error = RowInvalidation;
    fn try_from(from: ReviewRatings) -> Result<Self, Self::Error> {
        let ReviewRatings {
            atmosphere,
            wifi,
            outlet_access,
            food_beverage,
            table_space,
        } = from;
        Ok(Self {
            atmosphere: star("atmosphere", atmosphere)?,
            wifi: star("wifi", wifi)?,
            outlet_access: star("outletAccess", outlet_access)?,
            food_beverage: star("foodBeverage", food_beverage)?,
            table_space: star("tableSpace", table_space)?,
        })
    }
}

impl From<e::review::Review> for Review {
    fn from(from: e::review::Review) -> Self {
        let e::review::Review {
            id,
            spot_id,
            spot_name,
            ratings,
            text,
            timestamp,
        } = from;
        Self {
            id: id.into(),
            spot_id: spot_id.into(),
            spot_name,
            ratings: ratings.into(),
            review_text: text,
            timestamp: timestamp.to_rfc3339(),
        }
    }
}

impl TryFrom<Review> for e::review::Review {
    type Error = RowInvalidation;
    fn try_from(from: Review) -> Result<Self, Self::Error> {
        let Review {
            id: review_id,
            spot_id,
            spot_name,
            ratings,
            review_text,
            timestamp,
        } = from;
        Ok(Self {
            id: id(review_id)?,
            spot_id: spot_id.into(),
            spot_name,
            ratings: ratings.try_into()?,
            text: review_text,
            timestamp: timestamp.parse::<e::time::Timestamp>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study604_entities::builders::*;

    fn spot_row() -> Spot {
        Spot {
            id: 7,
            name: "Nemesis Coffee".into(),
            address: "127 W Pender St, Vancouver, BC".into(),
            position: Position {
                lat: 49.2826,
                lng: -123.1089,
            },
            image: "nemesis.jpg".into(),
            rating: 4.7,
            description: "".into(),
            wifi: true,
            food: true,
            popularity: 64.0,
            nearness: 450.0,
            review_count: 12,
            tagline: "Roastery".into(),
            atmosphere_rating: 4.5,
            wifi_rating: 4.0,
            outlet_access_rating: 2.5,
            food_beverage_rating: 4.8,
            table_space_rating: 3.9,
            preview_images: None,
            created_at: Some("2024-05-01T08:00:00Z".into()),
        }
    }

    #[test]
    fn spot_row_into_entity_and_back() {
        let row = spot_row();
        let spot = e::spot::Spot::try_from(row.clone()).unwrap();
        assert_eq!(e::id::SpotId::new(7), spot.id);
        assert_eq!(450.0, spot.nearness);
        assert!(spot.preview_images.is_empty());
        assert_eq!(row, Spot::from(spot));
    }

    #[test]
    fn reject_spot_with_invalid_rating() {
        let mut row = spot_row();
        row.wifi_rating = 5.5;
        assert_eq!(
            Err(RowInvalidation::Rating("wifi_rating")),
            e::spot::Spot::try_from(row)
        );
    }

    #[test]
    fn reject_spot_with_invalid_position() {
        let mut row = spot_row();
        row.position.lat = 123.0;
        assert_eq!(
            Err(RowInvalidation::Position),
            e::spot::Spot::try_from(row)
        );
    }

    #[test]
    fn reject_spot_with_nan_nearness() {
        let mut row = spot_row();
        row.nearness = f64::NAN;
        assert_eq!(
            Err(RowInvalidation::NotFinite("nearness")),
            e::spot::Spot::try_from(row)
        );
    }

    #[test]
    fn reject_saved_spot_without_id() {
        let row = SavedSpot {
            id: "".into(),
            spot_id: 1,
            spot_name: "X".into(),
            address: "Y".into(),
            rating: 4.5,
            image: "z.jpg".into(),
            created_at: None,
        };
        assert_eq!(
            Err(RowInvalidation::EmptyId),
            e::saved::SavedSpot::try_from(row)
        );
    }

    #[test]
    fn review_row_keeps_ids_verbatim() {
        let review = e::review::Review::build()
            .id("lx2k9a1b2c3d4")
            .spot(3, "Revolver")
            .text("Outlets at every table")
            .finish();
        let row = Review::from(review.clone());
        assert_eq!("lx2k9a1b2c3d4", row.id);
        assert_eq!(3, row.spot_id);
        assert_eq!("Outlets at every table", row.review_text);
        let converted = e::review::Review::try_from(row).unwrap();
        assert_eq!(review.id, converted.id);
        assert_eq!(review.ratings, converted.ratings);
        assert_eq!(review.timestamp.as_seconds(), converted.timestamp.as_seconds());
    }

    #[test]
    fn reject_review_with_invalid_timestamp() {
        let review = e::review::Review::build().spot(3, "Revolver").finish();
        let mut row = Review::from(review);
        row.timestamp = "last tuesday".into();
        assert!(matches!(
            e::review::Review::try_from(row),
            Err(RowInvalidation::Timestamp(_))
        ));
    }
}
