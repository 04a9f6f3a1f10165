//! Domain types for the Terra geographic reference store: the country →
//! state → city rows, the nested source dataset, paging and search requests,
//! and the [`store::GeoStore`] trait that backends implement.
//!
//! Nothing here knows about HTTP or SQL.

pub mod error;
pub mod geo;
pub mod query;
pub mod search;
pub mod source;
pub mod store;

pub use error::{Error, Result};
