pub trait Builder {
    type Build;
    fn build() -> Self::Build;
}

pub use self::{review_builder::*, spot_builder::*};

pub mod spot_builder {

    use super::*;
    use crate::{geo::*, id::*, rating::*, spot::*};

    #[derive(Debug)]
    pub struct SpotBuild {
        spot: Spot,
    }

    impl SpotBuild {
        pub fn id(mut self, id: i64) -> Self {
            self.spot.id = id.into();
            self
        }
        pub fn name(mut self, name: &str) -> Self {
            self.spot.name = name.into();
            self
        }
        pub fn address(mut self, address: &str) -> Self {
            self.spot.address = address.into();
            self
        }
        pub fn pos(mut self, pos: MapPoint) -> Self {
            self.spot.pos = pos;
            self
        }
        pub fn image(mut self, image: &str) -> Self {
            self.spot.image = image.into();
            self
        }
        pub fn rating(mut self, rating: f64) -> Self {
            self.spot.rating = rating.into();
            self
        }
        pub fn wifi(mut self, wifi: bool) -> Self {
            self.spot.wifi = wifi;
            self
        }
        pub fn food(mut self, food: bool) -> Self {
            self.spot.food = food;
            self
        }
        pub fn outlet_access(mut self, rating: f64) -> Self {
            self.spot.category_ratings.outlet_access = rating.into();
            self
        }
        pub fn popularity(mut self, popularity: f64) -> Self {
            self.spot.popularity = popularity;
            self
        }
        pub fn nearness(mut self, nearness: f64) -> Self {
            self.spot.nearness = nearness;
            self
        }
        pub fn preview_images(mut self, images: Vec<impl Into<String>>) -> Self {
            self.spot.preview_images = images.into_iter().map(Into::into).collect();
            self
        }
        pub fn finish(self) -> Spot {
            self.spot
        }
    }

    impl Builder for Spot {
        type Build = SpotBuild;
        fn build() -> SpotBuild {
            SpotBuild {
                spot: Spot {
                    id: SpotId::new(0),
                    name: "".into(),
                    address: "".into(),
                    tagline: "".into(),
                    pos: MapPoint::new(49.2827, -123.1207),
                    image: "".into(),
                    rating: AvgRatingValue::default(),
                    description: "".into(),
                    wifi: false,
                    food: false,
                    popularity: 0.0,
                    nearness: 0.0,
                    review_count: 0,
                    category_ratings: CategoryRatings::default(),
                    preview_images: vec![],
                    created_at: None,
                },
            }
        }
    }
}

pub mod review_builder {

    use super::*;
    use crate::{id::*, rating::*, review::*, time::*};

    #[derive(Debug)]
    pub struct ReviewBuild {
        review: Review,
    }

    impl ReviewBuild {
        pub fn id(mut self, id: &str) -> Self {
            self.review.id = id.into();
            self
        }
        pub fn spot(mut self, spot_id: i64, spot_name: &str) -> Self {
            self.review.spot_id = spot_id.into();
            self.review.spot_name = spot_name.into();
            self
        }
        pub fn ratings(mut self, ratings: ReviewRatings) -> Self {
            self.review.ratings = ratings;
            self
        }
        pub fn text(mut self, text: &str) -> Self {
            self.review.text = text.into();
            self
        }
        pub fn finish(self) -> Review {
            self.review
        }
    }

    impl Builder for Review {
        type Build = ReviewBuild;
        fn build() -> ReviewBuild {
            let stars = RatingValue::max();
            ReviewBuild {
                review: Review {
                    id: Id::new(),
                    spot_id: SpotId::new(0),
                    spot_name: "".into(),
                    ratings: ReviewRatings {
                        atmosphere: stars,
                        wifi: stars,
                        outlet_access: stars,
                        food_beverage: stars,
                        table_space: stars,
                    },
                    text: "".into(),
                    timestamp: Timestamp::now(),
                },
            }
        }
    }
}
