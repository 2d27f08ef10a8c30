use super::prelude::*;

pub async fn get_saved_spots<S: Store + ?Sized>(store: &S) -> Result<Vec<SavedSpot>> {
    Ok(access::fetch_all(store).await?)
}

/// Bookmarks a spot.
///
/// Doesn't check if the spot has already been saved,
/// i.e. concurrent sessions may create duplicates.
pub async fn save_spot<S: Store + ?Sized>(
    store: &S,
    spot_id: SpotId,
    snapshot: SpotSnapshot,
) -> Result<SavedSpot> {
    let saved = SavedSpot::new(spot_id, snapshot);
    log::info!("Saving spot {spot_id} as {}", saved.id);
    let saved = access::insert(store, saved).await?;
    debug_assert_eq!(spot_id, saved.spot_id);
    Ok(saved)
}

/// Removes a bookmark. Removing a bookmark that
/// no longer exists succeeds.
pub async fn unsave_spot<S: Store + ?Sized>(store: &S, saved_id: &Id) -> Result<()> {
    log::info!("Removing saved spot {saved_id}");
    Ok(access::remove::<SavedSpot, _>(store, saved_id.as_str()).await?)
}
