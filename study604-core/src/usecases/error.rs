use thiserror::Error;

use crate::{entities::*, store};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Please rate {}", labels(.0))]
    Validation(Vec<RatingCategory>),
    #[error("Spot {0} is still being saved or unsaved")]
    ToggleInProgress(SpotId),
    #[error(transparent)]
    Store(#[from] store::Error),
}

impl Error {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(store::Error::NotFound))
    }
}

fn labels(categories: &[RatingCategory]) -> String {
    categories
        .iter()
        .map(|c| c.label())
        .collect::<Vec<_>>()
        .join(", ")
}
