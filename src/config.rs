use anyhow::{Context, Result};
use cinematch_core::recommend::{BuildOptions, SimilarityStrategy};
use cinematch_core::stopwords::StopWords;
use cinematch_core::vectorize::{VectorizerOptions, VocabularyRanking, DEFAULT_MAX_VOCABULARY_SIZE};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub recommend: RecommendConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub movies_path: PathBuf,
    pub credits_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_max_vocabulary_size")]
    pub max_vocabulary_size: usize,
    #[serde(default = "default_ranking")]
    pub ranking: String,
    #[serde(default = "default_similarity")]
    pub similarity: String,
    #[serde(default = "default_stop_words")]
    pub stop_words: String,
    #[serde(default)]
    pub extra_stop_words: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_vocabulary_size: default_max_vocabulary_size(),
            ranking: default_ranking(),
            similarity: default_similarity(),
            stop_words: default_stop_words(),
            extra_stop_words: Vec::new(),
        }
    }
}

fn default_max_vocabulary_size() -> usize {
    DEFAULT_MAX_VOCABULARY_SIZE
}
fn default_ranking() -> String {
    "tfidf".to_string()
}
fn default_similarity() -> String {
    "dense".to_string()
}
fn default_stop_words() -> String {
    "english".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
        }
    }
}

fn default_limit() -> usize {
    cinematch_core::recommend::DEFAULT_LIMIT
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

impl EngineConfig {
    /// Translate the validated engine section into core build options.
    pub fn build_options(&self) -> Result<BuildOptions> {
        let ranking = match self.ranking.as_str() {
            "tfidf" => VocabularyRanking::TfIdf,
            "frequency" => VocabularyRanking::Frequency,
            other => anyhow::bail!(
                "Unknown engine.ranking: '{}'. Must be tfidf or frequency.",
                other
            ),
        };
        let similarity = match self.similarity.as_str() {
            "dense" => SimilarityStrategy::Dense,
            "on_demand" => SimilarityStrategy::OnDemand,
            other => anyhow::bail!(
                "Unknown engine.similarity: '{}'. Must be dense or on_demand.",
                other
            ),
        };
        let base = match self.stop_words.as_str() {
            "english" => StopWords::english(),
            "none" => StopWords::none(),
            other => anyhow::bail!(
                "Unknown engine.stop_words: '{}'. Must be english or none.",
                other
            ),
        };

        Ok(BuildOptions {
            vectorizer: VectorizerOptions {
                max_vocabulary_size: self.max_vocabulary_size,
                ranking,
                stop_words: base.extend(&self.extra_stop_words),
            },
            similarity,
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.engine.max_vocabulary_size == 0 {
        anyhow::bail!("engine.max_vocabulary_size must be > 0");
    }

    // Surfaces unknown ranking / similarity / stop-word names.
    config.engine.build_options()?;

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    const DATA: &str = r#"
[data]
movies_path = "movies.csv"
credits_path = "credits.csv"
"#;

    #[test]
    fn test_defaults() {
        let f = write_config(DATA);
        let cfg = load_config(f.path()).unwrap();
        assert_eq!(cfg.engine.max_vocabulary_size, 5000);
        assert_eq!(cfg.recommend.default_limit, 5);
        assert_eq!(cfg.server.bind, "127.0.0.1:7341");
        let opts = cfg.engine.build_options().unwrap();
        assert_eq!(opts.similarity, SimilarityStrategy::Dense);
        assert_eq!(opts.vectorizer.ranking, VocabularyRanking::TfIdf);
        assert!(opts.vectorizer.stop_words.contains("the"));
    }

    #[test]
    fn test_engine_overrides() {
        let f = write_config(&format!(
            "{}\n[engine]\nmax_vocabulary_size = 10\nranking = \"frequency\"\nsimilarity = \"on_demand\"\nstop_words = \"none\"\nextra_stop_words = [\"Film\"]\n",
            DATA
        ));
        let cfg = load_config(f.path()).unwrap();
        let opts = cfg.engine.build_options().unwrap();
        assert_eq!(opts.vectorizer.max_vocabulary_size, 10);
        assert_eq!(opts.vectorizer.ranking, VocabularyRanking::Frequency);
        assert_eq!(opts.similarity, SimilarityStrategy::OnDemand);
        assert!(!opts.vectorizer.stop_words.contains("the"));
        assert!(opts.vectorizer.stop_words.contains("film"));
    }

    #[test]
    fn test_zero_vocabulary_rejected() {
        let f = write_config(&format!("{}\n[engine]\nmax_vocabulary_size = 0\n", DATA));
        let err = load_config(f.path()).unwrap_err();
        assert!(err.to_string().contains("max_vocabulary_size"));
    }

    #[test]
    fn test_unknown_similarity_rejected() {
        let f = write_config(&format!("{}\n[engine]\nsimilarity = \"ann\"\n", DATA));
        let err = load_config(f.path()).unwrap_err();
        assert!(err.to_string().contains("engine.similarity"));
    }

    #[test]
    fn test_missing_data_section_rejected() {
        let f = write_config("[server]\nbind = \"0.0.0.0:1\"\n");
        assert!(load_config(f.path()).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
