//! Configuration handling for docqa.
//!
//! Settings are read from `<config dir>/docqa/config.toml` (or `--config`).
//! Every field has a default, so a missing file or a partial file is fine.

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use docqa_core::ChunkConfig;
use docqa_store::IndexPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Index location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Chunking configuration
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Query configuration
    #[serde(default)]
    pub query: QueryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the two index artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Index directory (default: `<data dir>/index`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_dir: Option<PathBuf>,

    /// Vector artifact file name
    #[serde(default = "default_vectors_file")]
    pub vectors_file: String,

    /// Metadata artifact file name
    #[serde(default = "default_metadata_file")]
    pub metadata_file: String,
}

fn default_vectors_file() -> String {
    docqa_store::persist::VECTORS_FILE.to_string()
}

fn default_metadata_file() -> String {
    docqa_store::persist::METADATA_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            index_dir: None,
            vectors_file: default_vectors_file(),
            metadata_file: default_metadata_file(),
        }
    }
}

/// Chunking-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Soft word budget per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Keep sentences whole
    #[serde(default = "default_sentence_aware")]
    pub sentence_aware: bool,
}

fn default_chunk_size() -> usize {
    500
}

fn default_sentence_aware() -> bool {
    true
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            sentence_aware: default_sentence_aware(),
        }
    }
}

/// Embedding-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Model to use
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector dimension
    #[serde(default = "default_dimension")]
    pub dimension: usize,
}

fn default_embedding_model() -> String {
    "hashing-bow".to_string()
}

fn default_dimension() -> usize {
    384
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: default_embedding_model(),
            dimension: default_dimension(),
        }
    }
}

/// Query-related configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Contexts retrieved when `-k` is not given
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,

    /// Upper bound for `-k`
    #[serde(default = "default_max_top_k")]
    pub max_top_k: usize,

    /// Longest context the answer extractor accepts, in words
    #[serde(default = "default_max_context_words")]
    pub max_context_words: usize,
}

fn default_top_k() -> usize {
    5
}

fn default_max_top_k() -> usize {
    10
}

fn default_max_context_words() -> usize {
    docqa_query::reader::DEFAULT_MAX_CONTEXT_WORDS
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            max_top_k: default_max_top_k(),
            max_context_words: default_max_context_words(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from `path`, or the default config path when `None`.
    ///
    /// A missing file yields the defaults; a malformed file is an error.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path.or_else(Self::config_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse and validate TOML text.
    pub fn parse(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            bail!("chunking.chunk_size must be > 0");
        }
        if self.embedding.dimension == 0 {
            bail!("embedding.dimension must be > 0");
        }
        if self.query.max_top_k == 0 {
            bail!("query.max_top_k must be > 0");
        }
        Ok(())
    }

    /// Default config file location.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Sample configuration file with every default spelled out.
    pub fn sample_toml() -> &'static str {
        r#"# docqa configuration

[storage]
# index_dir = "/path/to/index"
vectors_file = "vectors.bin"
metadata_file = "metadata.json"

[chunking]
chunk_size = 500
sentence_aware = true

[embedding]
model = "hashing-bow"
dimension = 384

[query]
default_top_k = 5
max_top_k = 10
max_context_words = 2048

[logging]
level = "info"
"#
    }

    /// Directory holding the index artifacts.
    pub fn index_dir(&self) -> Option<PathBuf> {
        self.storage
            .index_dir
            .clone()
            .or_else(|| data_dir().map(|dir| dir.join("index")))
    }

    pub fn index_paths(&self) -> Result<IndexPaths> {
        let dir = self
            .index_dir()
            .context("Failed to determine index directory")?;
        Ok(self.index_paths_in(&dir))
    }

    fn index_paths_in(&self, dir: &Path) -> IndexPaths {
        IndexPaths::new(
            dir.join(&self.storage.vectors_file),
            dir.join(&self.storage.metadata_file),
        )
    }

    pub fn chunk_config(&self) -> ChunkConfig {
        ChunkConfig {
            chunk_size: self.chunking.chunk_size,
            sentence_aware: self.chunking.sentence_aware,
        }
    }

    /// Requested `top_k`, or the default, clamped into `1..=max_top_k`.
    pub fn top_k(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.query.default_top_k)
            .clamp(1, self.query.max_top_k.max(1))
    }
}

/// Get the data directory for docqa.
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCQA_DATA_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docqa").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Get the config directory for docqa.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCQA_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docqa").map(|dirs| dirs.config_dir().to_path_buf())
}
