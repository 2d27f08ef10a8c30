#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(test, deny(warnings))]

//! # study604-entities
//!
//! Reusable, agnostic domain entities for study604.
//!
//! The entities only contain generic functionality that does not reveal any application-specific business logic.

pub mod geo;
pub mod id;
pub mod rating;
pub mod review;
pub mod saved;
pub mod spot;
pub mod time;

#[cfg(any(test, feature = "builders"))]
pub mod builders;
