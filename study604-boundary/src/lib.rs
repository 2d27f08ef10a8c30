//! Flat rows as they cross the boundary to the remote store.
//!
//! Field names follow the column names of the hosted tables.

use serde::{Deserialize, Serialize};

#[cfg(feature = "entity-conversions")]
mod conv;

#[cfg(feature = "entity-conversions")]
pub use conv::RowInvalidation;

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq))]
pub struct Position {
    pub lat: f64,
    pub lng: f64,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Spot {
    pub id                   : i64,
    pub name                 : String,
    pub address              : String,
    pub position             : Position,
    pub image                : String,
    pub rating               : f64,
    #[serde(default)]
    pub description          : String,
    pub wifi                 : bool,
    pub food                 : bool,
    pub popularity           : f64,
    pub nearness             : f64,
    #[serde(default)]
    pub review_count         : u32,
    #[serde(default)]
    pub tagline              : String,
    pub atmosphere_rating    : f64,
    pub wifi_rating          : f64,
    pub outlet_access_rating : f64,
    pub food_beverage_rating : f64,
    pub table_space_rating   : f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_images       : Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at           : Option<String>,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct SavedSpot {
    pub id         : String,
    pub spot_id    : i64,
    pub spot_name  : String,
    pub address    : String,
    pub rating     : f64,
    pub image      : String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at : Option<String>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, Copy, PartialEq, Eq))]
#[serde(rename_all = "camelCase")]
pub struct ReviewRatings {
    pub atmosphere: u8,
    pub wifi: u8,
    pub outlet_access: u8,
    pub food_beverage: u8,
    pub table_space: u8,
}

#[rustfmt::skip]
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq))]
pub struct Review {
    pub id          : String,
    pub spot_id     : i64,
    pub spot_name   : String,
    pub ratings     : ReviewRatings,
    pub review_text : String,
    pub timestamp   : String,
}

/// Error body returned by the hosted store.
#[derive(Serialize, Deserialize)]
#[cfg_attr(feature = "extra-derive", derive(Debug, Clone, PartialEq, Eq))]
pub struct Error {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
}

#[cfg(feature = "extra-derive")]
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[cfg(feature = "extra-derive")]
impl std::error::Error for Error {}
