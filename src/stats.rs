//! Index statistics.
//!
//! Summarizes what construction produced: item count, dropped records,
//! vocabulary size, and items whose tags matched no vocabulary term.
//! Dropped records name the fields that were missing and, separately, the
//! ones that were present but not valid JSON. Used by `cine stats` to
//! check a dataset before serving it.

use anyhow::Result;

use crate::config::Config;
use crate::engine::build_index;

/// Run the stats command: build the index and print a summary.
pub fn run_stats(config: &Config) -> Result<()> {
    let index = build_index(config)?;
    let report = index.recommender.report();

    println!("Cinematch — Index Stats");
    println!("=======================");
    println!();
    println!("  Movies:      {}", config.data.movies_path.display());
    println!("  Credits:     {}", config.data.credits_path.display());
    println!();
    println!("  Items:       {}", report.item_count);
    println!("  Dropped:     {}", report.dropped.len());
    println!("  Vocabulary:  {}", report.vocabulary_size);
    println!("  Zero-vector: {}", report.zero_vector_items.len());
    println!("  Similarity:  {}", report.similarity);

    if !report.dropped.is_empty() {
        println!();
        println!("  Dropped records:");
        for d in &report.dropped {
            let unparseable: Vec<&str> = index
                .malformed
                .iter()
                .filter(|m| m.position == d.position)
                .map(|m| m.column)
                .collect();
            let mut line = format!(
                "    #{:<6} {:<40} missing: {}",
                d.position,
                d.title.as_deref().unwrap_or("<untitled>"),
                d.missing.join(", ")
            );
            if !unparseable.is_empty() {
                line.push_str(&format!(" (unparseable: {})", unparseable.join(", ")));
            }
            println!("{}", line);
        }
    }

    if !report.zero_vector_items.is_empty() {
        println!();
        println!("  Items with no vocabulary terms:");
        for title in &report.zero_vector_items {
            println!("    {}", title);
        }
    }

    Ok(())
}
