//! Normalized models built from upstream responses.

mod offer;

pub use offer::Offer;
