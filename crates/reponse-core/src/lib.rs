//! reponse-core — Evaluation model, tier cascade, and rate limiting.
//!
//! This crate defines the data model, the text-comparison pipeline
//! (normalization, similarity, band classification), the tiered
//! evaluation dispatcher, and the sliding-window rate limiter that the
//! rest of the reponse system builds on.

pub mod bands;
pub mod error;
pub mod model;
pub mod normalize;
pub mod ratelimit;
pub mod service;
pub mod similarity;
pub mod tiers;
pub mod traits;
