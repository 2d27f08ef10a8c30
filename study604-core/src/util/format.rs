use crate::entities::*;

/// Formats a distance in meters as kilometers, e.g. `1.2 km`.
pub fn format_distance(meters: f64) -> String {
    format!("{:.1} km", meters / 1000.0)
}

/// Formats a star rating, e.g. `4.5`.
pub fn format_rating(rating: AvgRatingValue) -> String {
    format!("{:.1}", f64::from(rating))
}
