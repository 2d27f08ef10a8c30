//! Single-shot operations on the remote store.
//!
//! The use cases know nothing about caching; see
//! [`Client`](crate::client::Client) for the cached view.

mod error;
mod get_reviews;
mod get_spots;
mod review_spot;
mod saved_spots;

pub use self::{error::Error, get_reviews::*, get_spots::*, review_spot::*, saved_spots::*};

pub type Result<T> = std::result::Result<T, Error>;

mod prelude {
    pub use super::{error::Error, Result};
    pub use crate::{access, entities::*, store::Store};
}
