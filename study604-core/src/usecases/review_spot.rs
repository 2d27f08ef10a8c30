use super::prelude::*;

#[derive(Debug, Clone)]
pub struct NewReview {
    pub spot_id: SpotId,
    pub spot_name: String,
    pub ratings: ReviewRatings,
    pub text: String,
}

/// Every category needs to be rated.
pub fn validate_ratings(ratings: &ReviewRatings) -> Result<()> {
    let invalid = ratings.invalid_categories();
    if invalid.is_empty() {
        Ok(())
    } else {
        Err(Error::Validation(invalid))
    }
}

/// Checks a review before it is sent.
pub fn prepare_new_review(r: NewReview) -> Result<Review> {
    validate_ratings(&r.ratings)?;
    let NewReview {
        spot_id,
        spot_name,
        ratings,
        text,
    } = r;
    Ok(Review {
        id: Id::new(),
        spot_id,
        spot_name,
        ratings,
        text,
        timestamp: Timestamp::now(),
    })
}

pub async fn store_new_review<S: Store + ?Sized>(store: &S, review: Review) -> Result<Review> {
    log::info!("Storing review {} of spot {}", review.id, review.spot_id);
    Ok(access::insert(store, review).await?)
}
