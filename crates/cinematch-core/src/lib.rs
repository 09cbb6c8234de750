//! # Cinematch Core
//!
//! Content-based similarity engine for Cinematch: tag assembly, TF-IDF
//! vector space, cosine similarity index, and recommendation ranking.
//!
//! This crate does no I/O and no logging. Ingestion, configuration, and
//! the CLI/HTTP frontends live in the `cinematch` app crate.
//!
//! ```text
//! RawMovie ──▶ tags ──▶ vectorize ──▶ similarity ──▶ recommend
//! ```

pub mod error;
pub mod models;
pub mod recommend;
pub mod similarity;
pub mod stopwords;
pub mod tags;
pub mod vectorize;

pub use error::ConstructionError;
pub use recommend::{build, BuildOptions, Recommender};
