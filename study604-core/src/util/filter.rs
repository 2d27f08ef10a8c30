use crate::entities::*;

/// Spots whose name or address contains the query,
/// ignoring case.
///
/// The query is matched as is, only the empty query matches every spot.
pub fn search(spots: &[Spot], query: &str) -> Vec<Spot> {
    if query.is_empty() {
        return spots.to_vec();
    }
    let query = query.to_lowercase();
    spots
        .iter()
        .filter(|spot| {
            spot.name.to_lowercase().contains(&query)
                || spot.address.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// Spots that offer all of the given amenities.
pub fn filter_by_amenities(spots: &[Spot], amenities: &[Amenity]) -> Vec<Spot> {
    spots
        .iter()
        .filter(|spot| amenities.iter().all(|a| spot.has_amenity(*a)))
        .cloned()
        .collect()
}
