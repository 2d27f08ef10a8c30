//! Pure projections of fetched rows for presentation.

pub mod filter;
pub mod format;
pub mod lookup;
pub mod sort;
