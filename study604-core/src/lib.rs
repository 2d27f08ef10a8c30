#![deny(missing_debug_implementations)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # study604-core
//!
//! Data layer of the study604 app: typed access to the
//! remote row store, a query cache with mutations and the
//! projections that the views are built from.

pub mod entities {
    pub use study604_entities::{
        geo::*, id::*, rating::*, review::*, saved::*, spot::*, time::*,
    };
}

pub mod access;
pub mod cache;
pub mod client;
pub mod save_toggle;
pub mod store;
pub mod usecases;
pub mod util;

pub use self::{cache::Cache, client::Client, store::Store};
