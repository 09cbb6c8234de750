//! Engine construction from configuration.
//!
//! Loads the CSV tables, builds the core [`Recommender`], and logs what
//! construction did, including every record dropped for missing fields
//! and every list cell that failed to parse. Any failure here is fatal for
//! the caller.

use anyhow::{Context, Result};
use cinematch_core::recommend::{build, Recommender};
use tracing::{info, warn};

use crate::config::Config;
use crate::loader::{self, MalformedCell};

/// A built engine plus the ingestion diagnostics the core never sees.
pub struct BuiltIndex {
    pub recommender: Recommender,
    pub malformed: Vec<MalformedCell>,
}

pub fn build_engine(config: &Config) -> Result<Recommender> {
    Ok(build_index(config)?.recommender)
}

pub fn build_index(config: &Config) -> Result<BuiltIndex> {
    let loaded = loader::load_movies(config)?;
    info!(records = loaded.movies.len(), "loaded movie records");
    for cell in &loaded.malformed {
        warn!(
            position = cell.position,
            title = %cell.title,
            column = cell.column,
            error = %cell.error,
            "unparseable cell"
        );
    }

    let options = config.engine.build_options()?;
    let engine =
        build(&loaded.movies, &options).context("Failed to build recommendation index")?;

    let report = engine.report();
    if !report.dropped.is_empty() {
        warn!(
            dropped = report.dropped.len(),
            "dropped records with missing fields"
        );
        for d in &report.dropped {
            warn!(
                position = d.position,
                title = d.title.as_deref().unwrap_or("<untitled>"),
                missing = ?d.missing,
                "dropped record"
            );
        }
    }
    if !report.zero_vector_items.is_empty() {
        warn!(
            count = report.zero_vector_items.len(),
            "items with no vocabulary terms; they match nothing"
        );
    }
    info!(
        items = report.item_count,
        vocabulary = report.vocabulary_size,
        similarity = report.similarity,
        "index built"
    );

    Ok(BuiltIndex {
        recommender: engine,
        malformed: loaded.malformed,
    })
}
