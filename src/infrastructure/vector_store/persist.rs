//! On-disk form of a built index: a binary index artifact and a JSON metadata
//! artifact holding the document texts, written and read as a pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::domain::DomainError;
use crate::infrastructure::config::RagConfig;
use crate::infrastructure::vector_store::FlatL2Index;

const INDEX_MAGIC: &[u8; 4] = b"RRIX";
const FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedIndex {
    pub built_at: DateTime<Utc>,
    /// Embedding model the vectors came from.
    pub model: String,
    pub index: FlatL2Index,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactState {
    Missing,
    Present,
    /// Exactly one of the two artifacts exists.
    Partial,
}

#[derive(Debug, Clone)]
pub struct IndexArtifacts {
    index_path: PathBuf,
    metadata_path: PathBuf,
}

impl IndexArtifacts {
    pub fn new(index_path: impl Into<PathBuf>, metadata_path: impl Into<PathBuf>) -> Self {
        Self {
            index_path: index_path.into(),
            metadata_path: metadata_path.into(),
        }
    }

    pub fn from_config(config: &RagConfig) -> Self {
        Self::new(config.index_path(), config.metadata_path())
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    pub fn state(&self) -> ArtifactState {
        match (self.index_path.exists(), self.metadata_path.exists()) {
            (true, true) => ArtifactState::Present,
            (false, false) => ArtifactState::Missing,
            _ => ArtifactState::Partial,
        }
    }

    pub fn read(&self) -> Result<(PersistedIndex, Vec<String>), DomainError> {
        let mut reader = BufReader::new(File::open(&self.index_path)?);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic)?;
        if &magic != INDEX_MAGIC {
            return Err(DomainError::storage(format!(
                "{} is not an index artifact",
                self.index_path.display()
            )));
        }

        let mut version = [0u8; 2];
        reader.read_exact(&mut version)?;
        let version = u16::from_le_bytes(version);
        if version != FORMAT_VERSION {
            return Err(DomainError::storage(format!(
                "unsupported index format version {version} (expected {FORMAT_VERSION})"
            )));
        }

        let persisted: PersistedIndex =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
                .map_err(|e| DomainError::storage(format!("failed to decode index: {e}")))?;

        let metadata: Vec<String> =
            serde_json::from_reader(BufReader::new(File::open(&self.metadata_path)?))
                .map_err(|e| DomainError::storage(format!("failed to decode metadata: {e}")))?;

        Ok((persisted, metadata))
    }

    /// Writes both artifacts to temporary files, then renames them into place.
    /// On failure the temporary files are removed and neither artifact is
    /// created.
    pub fn write(&self, persisted: &PersistedIndex, metadata: &[String]) -> Result<(), DomainError> {
        for dir in [self.index_path.parent(), self.metadata_path.parent()]
            .into_iter()
            .flatten()
            .filter(|d| !d.as_os_str().is_empty())
        {
            fs::create_dir_all(dir)?;
        }

        let index_tmp = self.index_path.with_extension("tmp");
        let metadata_tmp = self.metadata_path.with_extension("json.tmp");

        let written = write_index(&index_tmp, persisted)
            .and_then(|_| write_metadata(&metadata_tmp, metadata))
            .and_then(|_| {
                fs::rename(&metadata_tmp, &self.metadata_path)?;
                fs::rename(&index_tmp, &self.index_path).map_err(|e| {
                    let _ = fs::remove_file(&self.metadata_path);
                    DomainError::from(e)
                })
            });

        if written.is_err() {
            let _ = fs::remove_file(&index_tmp);
            let _ = fs::remove_file(&metadata_tmp);
        }
        written
    }
}

fn write_index(path: &Path, persisted: &PersistedIndex) -> Result<(), DomainError> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(INDEX_MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    bincode::serde::encode_into_std_write(persisted, &mut writer, bincode::config::standard())
        .map_err(|e| DomainError::storage(format!("failed to encode index: {e}")))?;
    writer.flush()?;
    Ok(())
}

fn write_metadata(path: &Path, metadata: &[String]) -> Result<(), DomainError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, metadata)
        .map_err(|e| DomainError::storage(format!("failed to encode metadata: {e}")))?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Embedding;
    use tempfile::TempDir;

    fn sample() -> (PersistedIndex, Vec<String>) {
        let mut index = FlatL2Index::new(3);
        index.add(&Embedding::new(vec![0.1, 0.2, 0.3])).unwrap();
        index.add(&Embedding::new(vec![-1.5, 2.25, 1e-7])).unwrap();
        let persisted = PersistedIndex {
            built_at: Utc::now(),
            model: "nomic-embed-text".into(),
            index,
        };
        (persisted, vec!["first".into(), "second".into()])
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let artifacts = IndexArtifacts::new(
            dir.path().join("store/index.bin"),
            dir.path().join("store/metadata.json"),
        );
        assert_eq!(artifacts.state(), ArtifactState::Missing);

        let (persisted, metadata) = sample();
        artifacts.write(&persisted, &metadata).unwrap();

        assert_eq!(artifacts.state(), ArtifactState::Present);
        assert!(!dir.path().join("store/index.tmp").exists());

        let (loaded, loaded_meta) = artifacts.read().unwrap();
        assert_eq!(loaded, persisted);
        assert_eq!(loaded_meta, metadata);
    }

    #[test]
    fn test_partial_state() {
        let dir = TempDir::new().unwrap();
        let artifacts =
            IndexArtifacts::new(dir.path().join("index.bin"), dir.path().join("metadata.json"));
        fs::write(artifacts.metadata_path(), "[]").unwrap();

        assert_eq!(artifacts.state(), ArtifactState::Partial);
    }

    #[test]
    fn test_rejects_foreign_file() {
        let dir = TempDir::new().unwrap();
        let artifacts =
            IndexArtifacts::new(dir.path().join("index.bin"), dir.path().join("metadata.json"));
        fs::write(artifacts.index_path(), b"not an index").unwrap();
        fs::write(artifacts.metadata_path(), "[]").unwrap();

        let err = artifacts.read().unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));
    }
}
