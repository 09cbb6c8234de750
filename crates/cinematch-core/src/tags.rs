//! Tag assembly: flattening movie metadata into one bag-of-words string.
//!
//! # Algorithm
//!
//! 1. Drop the record if any field is missing.
//! 2. Take the overview as-is.
//! 3. Take every genre and keyword name, in source order.
//! 4. Take the names of the first [`CAST_LIMIT`] cast entries.
//! 5. Take the names of crew entries whose job is exactly [`DIRECTOR_JOB`].
//! 6. Join the five parts with single spaces and lowercase the result.
//!
//! # Example
//!
//! ```rust
//! use cinematch_core::models::{CrewEntry, NamedEntry, RawMovie};
//! use cinematch_core::tags::assemble_tags;
//!
//! let movie = RawMovie {
//!     title: Some("Alien".into()),
//!     overview: Some("A crew meets a Creature".into()),
//!     genres: Some(vec![NamedEntry::new("Horror")]),
//!     keywords: Some(vec![]),
//!     cast: Some(vec![NamedEntry::new("Sigourney Weaver")]),
//!     crew: Some(vec![CrewEntry::new("Ridley Scott", "Director")]),
//! };
//! let record = assemble_tags(&movie).unwrap();
//! assert_eq!(record.tags, "a crew meets a creature horror  sigourney weaver ridley scott");
//! ```

use serde::Serialize;

use crate::models::{ItemRecord, NamedEntry, RawMovie};

/// Number of leading cast entries that contribute to the tags.
pub const CAST_LIMIT: usize = 5;

/// Crew job whose holders contribute to the tags (case-sensitive).
pub const DIRECTOR_JOB: &str = "Director";

/// A record discarded before assembly because fields were missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRecord {
    /// Position of the record in the input sequence.
    pub position: usize,
    /// The title, when the title itself was present.
    pub title: Option<String>,
    /// Names of the missing fields.
    pub missing: Vec<&'static str>,
}

/// Result of assembling a whole input sequence.
#[derive(Debug, Clone, Default)]
pub struct AssembledCorpus {
    /// Surviving records, in input order.
    pub records: Vec<ItemRecord>,
    /// Records dropped for missing fields, in input order.
    pub dropped: Vec<DroppedRecord>,
}

/// Names of the fields that are `None` on `movie`.
pub fn missing_fields(movie: &RawMovie) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if movie.title.is_none() {
        missing.push("title");
    }
    if movie.overview.is_none() {
        missing.push("overview");
    }
    if movie.genres.is_none() {
        missing.push("genres");
    }
    if movie.keywords.is_none() {
        missing.push("keywords");
    }
    if movie.cast.is_none() {
        missing.push("cast");
    }
    if movie.crew.is_none() {
        missing.push("crew");
    }
    missing
}

/// Assemble the tag blob for one movie.
///
/// Returns `None` when any field is missing. The input is not modified.
pub fn assemble_tags(movie: &RawMovie) -> Option<ItemRecord> {
    let title = movie.title.as_ref()?;
    let overview = movie.overview.as_ref()?;
    let genres = join_names(movie.genres.as_ref()?.iter());
    let keywords = join_names(movie.keywords.as_ref()?.iter());
    let cast = join_names(movie.cast.as_ref()?.iter().take(CAST_LIMIT));
    let directors = movie
        .crew
        .as_ref()?
        .iter()
        .filter(|c| c.job == DIRECTOR_JOB)
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let tags = [overview.as_str(), &genres, &keywords, &cast, &directors]
        .join(" ")
        .to_lowercase();

    Some(ItemRecord::new(title.clone(), tags))
}

/// Assemble every movie, dropping (and reporting) incomplete records.
///
/// Surviving records keep their relative input order.
pub fn assemble_corpus(movies: &[RawMovie]) -> AssembledCorpus {
    let mut corpus = AssembledCorpus::default();
    for (position, movie) in movies.iter().enumerate() {
        match assemble_tags(movie) {
            Some(record) => corpus.records.push(record),
            None => corpus.dropped.push(DroppedRecord {
                position,
                title: movie.title.clone(),
                missing: missing_fields(movie),
            }),
        }
    }
    corpus
}

fn join_names<'a>(entries: impl Iterator<Item = &'a NamedEntry>) -> String {
    entries
        .map(|e| e.name.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrewEntry;

    fn names(list: &[&str]) -> Vec<NamedEntry> {
        list.iter().map(|n| NamedEntry::new(*n)).collect()
    }

    fn complete_movie() -> RawMovie {
        RawMovie {
            title: Some("Avatar".to_string()),
            overview: Some("In the 22nd century, a Marine".to_string()),
            genres: Some(names(&["Action", "Adventure"])),
            keywords: Some(names(&["culture clash", "future"])),
            cast: Some(names(&["Sam Worthington", "Zoe Saldana"])),
            crew: Some(vec![
                CrewEntry::new("James Cameron", "Director"),
                CrewEntry::new("Jon Landau", "Producer"),
            ]),
        }
    }

    #[test]
    fn test_assemble_joins_and_lowercases() {
        let record = assemble_tags(&complete_movie()).unwrap();
        assert_eq!(record.title, "Avatar");
        assert_eq!(
            record.tags,
            "in the 22nd century, a marine action adventure culture clash future sam worthington zoe saldana james cameron"
        );
    }

    #[test]
    fn test_title_keeps_original_case() {
        let record = assemble_tags(&complete_movie()).unwrap();
        assert_eq!(record.title, "Avatar");
    }

    #[test]
    fn test_cast_truncated_to_five() {
        let mut movie = complete_movie();
        movie.cast = Some(names(&["A1", "A2", "A3", "A4", "A5", "A6", "A7"]));
        let record = assemble_tags(&movie).unwrap();
        assert!(record.tags.contains("a1 a2 a3 a4 a5"));
        assert!(!record.tags.contains("a6"));
        assert!(!record.tags.contains("a7"));
    }

    #[test]
    fn test_short_cast_kept_whole() {
        let mut movie = complete_movie();
        movie.cast = Some(names(&["Only One"]));
        let record = assemble_tags(&movie).unwrap();
        assert!(record.tags.contains("only one"));
    }

    #[test]
    fn test_director_match_is_exact() {
        let mut movie = complete_movie();
        movie.crew = Some(vec![
            CrewEntry::new("Lower Case", "director"),
            CrewEntry::new("Assistant", "Assistant Director"),
            CrewEntry::new("Real One", "Director"),
            CrewEntry::new("Co Helmer", "Director"),
        ]);
        let record = assemble_tags(&movie).unwrap();
        assert!(record.tags.ends_with("real one co helmer"));
        assert!(!record.tags.contains("lower case"));
        assert!(!record.tags.contains("assistant"));
    }

    #[test]
    fn test_no_director_is_empty_contribution() {
        let mut movie = complete_movie();
        movie.crew = Some(vec![CrewEntry::new("Jon Landau", "Producer")]);
        let record = assemble_tags(&movie).unwrap();
        assert!(record.tags.ends_with("zoe saldana "));
    }

    #[test]
    fn test_missing_field_drops_record() {
        let mut movie = complete_movie();
        movie.keywords = None;
        assert!(assemble_tags(&movie).is_none());
        assert_eq!(missing_fields(&movie), vec!["keywords"]);
    }

    #[test]
    fn test_assemble_corpus_reports_dropped() {
        let mut broken = complete_movie();
        broken.title = Some("Broken".to_string());
        broken.overview = None;
        broken.crew = None;
        let mut second = complete_movie();
        second.title = Some("Second".to_string());

        let corpus = assemble_corpus(&[complete_movie(), broken, second]);
        let titles: Vec<&str> = corpus.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Avatar", "Second"]);
        assert_eq!(corpus.dropped.len(), 1);
        assert_eq!(corpus.dropped[0].position, 1);
        assert_eq!(corpus.dropped[0].title.as_deref(), Some("Broken"));
        assert_eq!(corpus.dropped[0].missing, vec!["overview", "crew"]);
    }

    #[test]
    fn test_assemble_does_not_mutate_input() {
        let movie = complete_movie();
        let before = movie.clone();
        let _ = assemble_tags(&movie);
        assert_eq!(movie, before);
    }
}
