//! `cine recommend` and `cine terms`.
//!
//! Both print to stdout; logging goes to stderr so output stays parseable.
//! An unknown title is not an error: the command prints a notice and
//! exits successfully.

use anyhow::Result;
use cinematch_core::recommend::Recommender;
use serde::Serialize;

use crate::config::Config;
use crate::engine::build_engine;

/// One scored entry in JSON output (CLI and HTTP share the shape).
#[derive(Debug, Serialize)]
pub struct ScoredTitle {
    pub title: String,
    pub score: f64,
}

/// JSON response shape for a recommendation query.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub title: String,
    pub results: Vec<ScoredTitle>,
}

pub fn recommend_response(engine: &Recommender, title: &str, limit: usize) -> RecommendResponse {
    RecommendResponse {
        title: title.to_string(),
        results: engine
            .recommend_scored(title, limit)
            .into_iter()
            .map(|r| ScoredTitle {
                title: r.title,
                score: r.score,
            })
            .collect(),
    }
}

pub fn run_recommend(
    config: &Config,
    title: &str,
    limit: Option<usize>,
    scores: bool,
    json: bool,
) -> Result<()> {
    let engine = build_engine(config)?;
    let limit = limit.unwrap_or(config.recommend.default_limit);
    let response = recommend_response(&engine, title, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if engine.lookup(title).is_none() {
        println!("No match for '{}'.", title);
        return Ok(());
    }

    for (rank, item) in response.results.iter().enumerate() {
        if scores {
            println!("{}. {} ({:.4})", rank + 1, item.title, item.score);
        } else {
            println!("{}. {}", rank + 1, item.title);
        }
    }
    Ok(())
}

pub fn run_terms(config: &Config, title: &str, limit: usize) -> Result<()> {
    let engine = build_engine(config)?;

    if engine.lookup(title).is_none() {
        println!("No match for '{}'.", title);
        return Ok(());
    }

    let terms = engine.top_terms(title, limit);
    if terms.is_empty() {
        println!("'{}' has no vocabulary terms.", title);
        return Ok(());
    }
    for (term, weight) in terms {
        println!("{:<24} {:.4}", term, weight);
    }
    Ok(())
}
