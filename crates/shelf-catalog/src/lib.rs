//! HTTP clients for the external read-only catalog and the remote
//! recommender service.

mod client;
mod error;
mod recommender;
mod retry;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use recommender::RecommenderClient;
