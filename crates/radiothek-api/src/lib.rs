//! Client for the ORF Radiothek catalog API.
//!
//! The catalog exposes a search endpoint and per-broadcast detail documents;
//! this crate holds the wire types and a thin client that performs one GET
//! per operation.

pub mod client;
pub mod error;
pub mod types;

pub use client::CatalogClient;
pub use error::ApiError;
