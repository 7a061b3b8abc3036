use bson::oid::ObjectId;
use casefolio_config::StorageSettings;
use casefolio_db::models::StoragePointer;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Payload not found")]
    NotFound,
}

/// Local-disk object store. Keys are `org/case/uuid`, opaque to callers;
/// the pointer persisted on the document is provider-agnostic so an S3
/// backend can replace this without touching the DAOs.
#[derive(Clone)]
pub struct DocumentStorage {
    root_dir: PathBuf,
}

impl DocumentStorage {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            root_dir: PathBuf::from(&settings.root_dir),
        }
    }

    pub async fn store(
        &self,
        organization_id: ObjectId,
        case_id: ObjectId,
        bytes: &[u8],
    ) -> Result<StoragePointer, StorageError> {
        let storage_key = format!(
            "{}/{}/{}",
            organization_id.to_hex(),
            case_id.to_hex(),
            uuid::Uuid::new_v4()
        );
        let path = self.root_dir.join(&storage_key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        let url = format!("/api/documents/payload/{storage_key}");
        Ok(StoragePointer {
            provider: "local".to_string(),
            storage_key,
            url,
        })
    }

    pub async fn read(&self, pointer: &StoragePointer) -> Result<Vec<u8>, StorageError> {
        let path = self.root_dir.join(&pointer.storage_key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Best-effort: a missing or undeletable payload never blocks row
    /// deletion (sweeper and document DELETE both rely on this).
    pub async fn delete(&self, pointer: &StoragePointer) {
        let path = self.root_dir.join(&pointer.storage_key);
        if let Err(error) = tokio::fs::remove_file(&path).await {
            if error.kind() != std::io::ErrorKind::NotFound {
                warn!(%error, key = %pointer.storage_key, "Failed to delete stored payload");
            }
        }
    }
}
