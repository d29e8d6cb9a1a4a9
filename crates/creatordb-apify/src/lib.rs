//! Scrape-provider boundary: synchronous actor-run client, raw payload
//! types, canonical mapping, and commenter aggregation.

pub mod client;
pub mod comments;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::ApifyClient;
pub use error::ApifyError;
