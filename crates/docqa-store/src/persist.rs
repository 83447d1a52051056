//! Reading and writing the two coupled index artifacts.
//!
//! The vector file is written before the metadata file, each through a `.tmp`
//! sibling and a rename. The metadata file carries a blake3 digest of the
//! vector file it was written with, so a crash between the two renames is caught
//! on the next load.

use docqa_core::{ChunkRecord, StoreError};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::flat::{FlatL2Index, FORMAT_VERSION};

/// Default vector artifact file name.
pub const VECTORS_FILE: &str = "vectors.bin";

/// Default metadata artifact file name.
pub const METADATA_FILE: &str = "metadata.json";

/// Locations of the two artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPaths {
    pub vectors: PathBuf,
    pub metadata: PathBuf,
}

impl IndexPaths {
    pub fn new(vectors: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        Self {
            vectors: vectors.into(),
            metadata: metadata.into(),
        }
    }

    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join(VECTORS_FILE), dir.join(METADATA_FILE))
    }
}

/// On-disk shape of the metadata artifact.
#[derive(Debug, Serialize, Deserialize)]
struct MetadataFile {
    version: u32,
    dimension: usize,
    count: u64,
    vectors_digest: String,
    records: Vec<ChunkRecord>,
}

/// Load both artifacts.
///
/// Returns `Ok(None)` when either file is absent, and `Err` when they exist but
/// are unreadable or inconsistent with each other or with `expected_dimension`.
pub async fn load(
    paths: &IndexPaths,
    expected_dimension: usize,
) -> Result<Option<(FlatL2Index, Vec<ChunkRecord>)>, StoreError> {
    let vectors_exists = tokio::fs::try_exists(&paths.vectors).await?;
    let metadata_exists = tokio::fs::try_exists(&paths.metadata).await?;
    if !vectors_exists || !metadata_exists {
        debug!(
            "Index artifacts incomplete (vectors: {}, metadata: {})",
            vectors_exists, metadata_exists
        );
        return Ok(None);
    }

    let vector_bytes = tokio::fs::read(&paths.vectors).await?;
    let metadata_bytes = tokio::fs::read(&paths.metadata).await?;

    let metadata: MetadataFile = serde_json::from_slice(&metadata_bytes)?;
    let index = FlatL2Index::from_bytes(&vector_bytes)?;

    if metadata.version != FORMAT_VERSION {
        return Err(StoreError::Corrupt(format!(
            "metadata version {} does not match vector format {}",
            metadata.version, FORMAT_VERSION
        )));
    }
    if metadata.vectors_digest != digest(&vector_bytes) {
        return Err(StoreError::Corrupt(
            "vector file does not match the digest recorded in metadata".to_string(),
        ));
    }
    if metadata.dimension != index.dimension() {
        return Err(StoreError::DimensionMismatch {
            expected: metadata.dimension,
            actual: index.dimension(),
        });
    }
    if index.dimension() != expected_dimension {
        return Err(StoreError::DimensionMismatch {
            expected: expected_dimension,
            actual: index.dimension(),
        });
    }
    if metadata.count != metadata.records.len() as u64 || metadata.count != index.len() as u64 {
        return Err(StoreError::Corrupt(format!(
            "entry counts disagree: metadata header {}, records {}, vectors {}",
            metadata.count,
            metadata.records.len(),
            index.len()
        )));
    }

    Ok(Some((index, metadata.records)))
}

/// Write both artifacts, vectors first.
pub async fn save(
    paths: &IndexPaths,
    index: &FlatL2Index,
    records: &[ChunkRecord],
) -> Result<(), StoreError> {
    for path in [&paths.vectors, &paths.metadata] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let vector_bytes = index.to_bytes();
    let metadata = MetadataFile {
        version: FORMAT_VERSION,
        dimension: index.dimension(),
        count: records.len() as u64,
        vectors_digest: digest(&vector_bytes),
        records: records.to_vec(),
    };
    let metadata_bytes = serde_json::to_vec_pretty(&metadata)?;

    write_atomic(&paths.vectors, &vector_bytes).await?;
    write_atomic(&paths.metadata, &metadata_bytes).await?;

    debug!(
        "Persisted {} entries to {:?} and {:?}",
        records.len(),
        paths.vectors,
        paths.metadata
    );
    Ok(())
}

/// Remove both artifacts; absent files are not an error.
pub async fn remove(paths: &IndexPaths) -> Result<(), StoreError> {
    for path in [&paths.vectors, &paths.metadata] {
        match tokio::fs::remove_file(path).await {
            Ok(()) => debug!("Removed {:?}", path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Combined on-disk size of whichever artifacts exist.
pub async fn disk_size(paths: &IndexPaths) -> u64 {
    let mut total = 0;
    for path in [&paths.vectors, &paths.metadata] {
        if let Ok(meta) = tokio::fs::metadata(path).await {
            total += meta.len();
        }
    }
    total
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = tmp_path(path);
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn digest(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> (FlatL2Index, Vec<ChunkRecord>) {
        let mut index = FlatL2Index::new(3);
        index
            .add(&[vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 0.0]])
            .unwrap();
        let records = vec![
            ChunkRecord::new("First chunk.", "a.txt", 0),
            ChunkRecord::new("Second chunk.", "a.txt", 1),
        ];
        (index, records)
    }

    #[test]
    fn test_in_dir_uses_default_names() {
        let paths = IndexPaths::in_dir("/data/index");
        assert_eq!(paths.vectors, PathBuf::from("/data/index/vectors.bin"));
        assert_eq!(paths.metadata, PathBuf::from("/data/index/metadata.json"));
    }

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/x/vectors.bin")),
            PathBuf::from("/x/vectors.bin.tmp")
        );
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path().join("nested/index"));
        let (index, records) = sample();

        save(&paths, &index, &records).await.unwrap();
        let (loaded_index, loaded_records) = load(&paths, 3).await.unwrap().unwrap();

        assert_eq!(loaded_index, index);
        assert_eq!(loaded_records, records);
        assert!(!tmp_path(&paths.vectors).exists());
        assert!(!tmp_path(&paths.metadata).exists());
    }

    #[tokio::test]
    async fn test_load_missing_files_is_none() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        assert!(load(&paths, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_metadata_records_the_vector_digest() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let (index, records) = sample();
        save(&paths, &index, &records).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&paths.metadata).unwrap()).unwrap();
        let vector_bytes = std::fs::read(&paths.vectors).unwrap();

        assert_eq!(json["version"], 1);
        assert_eq!(json["dimension"], 3);
        assert_eq!(json["count"], 2);
        assert_eq!(json["vectors_digest"], digest(&vector_bytes));
        assert_eq!(json["records"][1]["text"], "Second chunk.");
    }

    #[tokio::test]
    async fn test_load_rejects_count_disagreement() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let (index, mut records) = sample();
        records.pop();

        save(&paths, &index, &records).await.unwrap();

        assert!(matches!(
            load(&paths, 3).await,
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_unexpected_dimension() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        let (index, records) = sample();
        save(&paths, &index, &records).await.unwrap();

        assert!(matches!(
            load(&paths, 384).await,
            Err(StoreError::DimensionMismatch {
                expected: 384,
                actual: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_remove_ignores_absent_files() {
        let dir = tempdir().unwrap();
        let paths = IndexPaths::in_dir(dir.path());
        remove(&paths).await.unwrap();

        let (index, records) = sample();
        save(&paths, &index, &records).await.unwrap();
        assert!(disk_size(&paths).await > 0);

        remove(&paths).await.unwrap();
        assert!(!paths.vectors.exists());
        assert!(!paths.metadata.exists());
        assert_eq!(disk_size(&paths).await, 0);
    }
}
