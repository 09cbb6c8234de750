//! CSV ingestion: movies and credits tables joined into [`RawMovie`]s.
//!
//! The movies table must have `title`, `overview`, `genres`, and `keywords`
//! columns; the credits table `title`, `cast`, and `crew`. Other columns
//! are ignored. List columns hold JSON arrays of objects.
//!
//! Rows are inner-joined on `title`: each movies row is paired with every
//! credits row of the same title, in movies order then credits order.
//!
//! An empty or unparseable cell becomes `None`, which makes the core drop
//! the record and list it in the build report. Unparseable cells are also
//! recorded as [`MalformedCell`]s so the report can say why. Only I/O and
//! header errors are fatal here.

use anyhow::{Context, Result};
use cinematch_core::models::{CrewEntry, NamedEntry, RawMovie};
use csv::StringRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

use crate::config::Config;

/// A list cell whose JSON could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedCell {
    /// Position of the joined record, matching the core's drop report.
    pub position: usize,
    pub title: String,
    pub column: &'static str,
    pub error: String,
}

/// Joined records plus the cells that failed to parse.
#[derive(Debug, Clone, Default)]
pub struct LoadedMovies {
    pub movies: Vec<RawMovie>,
    pub malformed: Vec<MalformedCell>,
}

type CellErrors = Vec<(&'static str, String)>;

struct MovieRow {
    title: Option<String>,
    overview: Option<String>,
    genres: Option<Vec<NamedEntry>>,
    keywords: Option<Vec<NamedEntry>>,
    errors: CellErrors,
}

struct CreditRow {
    cast: Option<Vec<NamedEntry>>,
    crew: Option<Vec<CrewEntry>>,
    errors: CellErrors,
}

/// Load and join the two tables named in `[data]`.
pub fn load_movies(config: &Config) -> Result<LoadedMovies> {
    load_from_paths(&config.data.movies_path, &config.data.credits_path)
}

pub fn load_from_paths(movies_path: &Path, credits_path: &Path) -> Result<LoadedMovies> {
    let movies = read_movies(movies_path)?;
    let credits = read_credits(credits_path)?;

    let mut by_title: HashMap<String, Vec<CreditRow>> = HashMap::new();
    for (title, row) in credits {
        by_title.entry(title).or_default().push(row);
    }

    let mut loaded = LoadedMovies::default();
    for movie in movies {
        let Some(title) = movie.title.as_ref() else {
            continue;
        };
        let Some(matches) = by_title.get(title) else {
            continue;
        };
        for credit in matches {
            let position = loaded.movies.len();
            for (column, error) in movie.errors.iter().chain(&credit.errors) {
                loaded.malformed.push(MalformedCell {
                    position,
                    title: title.clone(),
                    column: *column,
                    error: error.clone(),
                });
            }
            loaded.movies.push(RawMovie {
                title: movie.title.clone(),
                overview: movie.overview.clone(),
                genres: movie.genres.clone(),
                keywords: movie.keywords.clone(),
                cast: credit.cast.clone(),
                crew: credit.crew.clone(),
            });
        }
    }

    Ok(loaded)
}

fn read_movies(path: &Path) -> Result<Vec<MovieRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open movies file: {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let title = column(&headers, "title", path)?;
    let overview = column(&headers, "overview", path)?;
    let genres = column(&headers, "genres", path)?;
    let keywords = column(&headers, "keywords", path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read row from {}", path.display()))?;
        let mut errors = CellErrors::new();
        rows.push(MovieRow {
            title: text_cell(&record, title),
            overview: text_cell(&record, overview),
            genres: json_cell(&record, genres, "genres", &mut errors),
            keywords: json_cell(&record, keywords, "keywords", &mut errors),
            errors,
        });
    }
    Ok(rows)
}

/// Credits rows keyed by title. Rows without a title cannot join and are skipped.
fn read_credits(path: &Path) -> Result<Vec<(String, CreditRow)>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open credits file: {}", path.display()))?;
    let headers = reader.headers()?.clone();
    let title = column(&headers, "title", path)?;
    let cast = column(&headers, "cast", path)?;
    let crew = column(&headers, "crew", path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("Failed to read row from {}", path.display()))?;
        let Some(key) = text_cell(&record, title) else {
            continue;
        };
        let mut errors = CellErrors::new();
        let cast = json_cell(&record, cast, "cast", &mut errors);
        let crew = json_cell(&record, crew, "crew", &mut errors);
        rows.push((key, CreditRow { cast, crew, errors }));
    }
    Ok(rows)
}

fn column(headers: &StringRecord, name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .with_context(|| format!("Missing column '{}' in {}", name, path.display()))
}

fn text_cell(record: &StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a JSON list cell. Empty cells are `None`; parse failures are
/// `None` too, with the reason pushed onto `errors`.
fn json_cell<T: DeserializeOwned>(
    record: &StringRecord,
    idx: usize,
    name: &'static str,
    errors: &mut CellErrors,
) -> Option<T> {
    let raw = record.get(idx).filter(|v| !v.trim().is_empty())?;
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push((name, e.to_string()));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, rows: &[Vec<&str>]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut w = csv::Writer::from_path(&path).unwrap();
        for row in rows {
            w.write_record(row).unwrap();
        }
        w.flush().unwrap();
        path
    }

    const GENRES: &str = r#"[{"id": 28, "name": "Action"}, {"id": 12, "name": "Adventure"}]"#;
    const CAST: &str = r#"[{"cast_id": 1, "character": "Jake", "name": "Sam Worthington"}]"#;
    const CREW: &str = r#"[{"job": "Director", "name": "James Cameron", "department": "Directing"}]"#;

    #[test]
    fn test_join_on_title() {
        let dir = TempDir::new().unwrap();
        let movies = write(
            &dir,
            "movies.csv",
            &[
                vec!["budget", "title", "overview", "genres", "keywords"],
                vec!["1", "Avatar", "A marine", GENRES, "[]"],
                vec!["2", "Orphan", "No credits", GENRES, "[]"],
            ],
        );
        let credits = write(
            &dir,
            "credits.csv",
            &[
                vec!["movie_id", "title", "cast", "crew"],
                vec!["19995", "Avatar", CAST, CREW],
            ],
        );

        let rows = load_from_paths(&movies, &credits).unwrap().movies;
        assert_eq!(rows.len(), 1);
        let avatar = &rows[0];
        assert_eq!(avatar.title.as_deref(), Some("Avatar"));
        assert_eq!(avatar.genres.as_ref().unwrap()[1].name, "Adventure");
        assert_eq!(avatar.keywords.as_ref().unwrap().len(), 0);
        assert_eq!(avatar.cast.as_ref().unwrap()[0].name, "Sam Worthington");
        assert_eq!(avatar.crew.as_ref().unwrap()[0].job, "Director");
    }

    #[test]
    fn test_duplicate_titles_multiply() {
        let dir = TempDir::new().unwrap();
        let movies = write(
            &dir,
            "movies.csv",
            &[
                vec!["title", "overview", "genres", "keywords"],
                vec!["Twin", "first", "[]", "[]"],
                vec!["Twin", "second", "[]", "[]"],
            ],
        );
        let credits = write(
            &dir,
            "credits.csv",
            &[
                vec!["title", "cast", "crew"],
                vec!["Twin", "[]", "[]"],
                vec!["Twin", CAST, "[]"],
            ],
        );

        let rows = load_from_paths(&movies, &credits).unwrap().movies;
        let pairs: Vec<(&str, usize)> = rows
            .iter()
            .map(|r| {
                (
                    r.overview.as_deref().unwrap(),
                    r.cast.as_ref().unwrap().len(),
                )
            })
            .collect();
        assert_eq!(pairs, vec![("first", 0), ("first", 1), ("second", 0), ("second", 1)]);
    }

    #[test]
    fn test_bad_cells_become_missing() {
        let dir = TempDir::new().unwrap();
        let movies = write(
            &dir,
            "movies.csv",
            &[
                vec!["title", "overview", "genres", "keywords"],
                vec!["Broken", "", "not json", "[]"],
            ],
        );
        let credits = write(
            &dir,
            "credits.csv",
            &[vec!["title", "cast", "crew"], vec!["Broken", "", CREW]],
        );

        let rows = load_from_paths(&movies, &credits).unwrap().movies;
        assert_eq!(rows.len(), 1);
        assert!(rows[0].overview.is_none());
        assert!(rows[0].genres.is_none());
        assert!(rows[0].cast.is_none());
        assert!(rows[0].crew.is_some());
    }

    #[test]
    fn test_unparseable_cells_are_recorded() {
        let dir = TempDir::new().unwrap();
        let movies = write(
            &dir,
            "movies.csv",
            &[
                vec!["title", "overview", "genres", "keywords"],
                vec!["Fine", "ok", GENRES, "[]"],
                vec!["Broken", "", "not json", "[]"],
            ],
        );
        let credits = write(
            &dir,
            "credits.csv",
            &[
                vec!["title", "cast", "crew"],
                vec!["Fine", CAST, CREW],
                vec!["Broken", "", "[{\"job\": 1}"],
            ],
        );

        let loaded = load_from_paths(&movies, &credits).unwrap();
        assert_eq!(loaded.movies.len(), 2);
        let cols: Vec<(usize, &str)> = loaded
            .malformed
            .iter()
            .map(|m| (m.position, m.column))
            .collect();
        // Empty cells are missing, not malformed.
        assert_eq!(cols, vec![(1, "genres"), (1, "crew")]);
        assert!(loaded.malformed.iter().all(|m| m.title == "Broken"));
        assert!(!loaded.malformed[0].error.is_empty());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let dir = TempDir::new().unwrap();
        let movies = write(&dir, "movies.csv", &[vec!["title", "overview"]]);
        let credits = write(&dir, "credits.csv", &[vec!["title", "cast", "crew"]]);
        let err = load_from_paths(&movies, &credits).unwrap_err();
        assert!(err.to_string().contains("Missing column 'genres'"));
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        let credits = dir.path().join("credits.csv");
        fs::write(&credits, "title,cast,crew\n").unwrap();
        let err = load_from_paths(&dir.path().join("nope.csv"), &credits).unwrap_err();
        assert!(err.to_string().contains("Failed to open movies file"));
    }
}
