use super::prelude::*;

pub async fn get_reviews_for_spot<S: Store + ?Sized>(
    store: &S,
    spot_id: SpotId,
) -> Result<Vec<Review>> {
    Ok(access::fetch_where(store, "spot_id", &spot_id.to_string()).await?)
}
