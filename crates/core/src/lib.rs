//! Gatherly domain core.
//!
//! Query-free domain logic shared by the repository layer, the API server,
//! and the event fan-out: shared type aliases, the domain error enum, feed
//! composition, image intake, tag/handle normalization, and search
//! suggestion types. This crate has no internal dependencies so it can be
//! used from every other workspace crate.

pub mod error;
pub mod feed;
pub mod image;
pub mod notify;
pub mod search;
pub mod tags;
pub mod types;

pub use error::CoreError;
