use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::Document;

const DOCUMENT_FILE: &str = "danger.json";
const DEFAULT_SEED_PATH: &str = "danger.seed.json";
const DEFAULT_DELETION_PASSWORD: &str = "bola123";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write document: {0}")]
    Write(#[from] std::io::Error),
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Persistence seam for the scored comment document. `load` never fails:
/// missing or unreadable state degrades to the seed copy and finally to a
/// fresh document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Document;
    async fn save(&self, doc: &mut Document) -> Result<(), StoreError>;
}

/// Single-file JSON store. A save is a direct whole-file overwrite with no
/// lock, rename or version stamp, so two concurrent writers can lose an
/// update; acceptable for the single-process deployments this targets.
#[derive(Clone)]
pub struct FsDocumentStore {
    primary: PathBuf,
    seed: PathBuf,
}

impl FsDocumentStore {
    pub fn new(primary: impl Into<PathBuf>, seed: impl Into<PathBuf>) -> Self {
        Self {
            primary: primary.into(),
            seed: seed.into(),
        }
    }

    /// Resolve paths from the environment: `DANGERMETER_DATA_DIR` holds the
    /// writable copy, `DANGERMETER_SEED_PATH` the read-only deploy seed.
    pub fn from_env() -> Self {
        let data_dir = std::env::var("DANGERMETER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));
        let seed = std::env::var("DANGERMETER_SEED_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_SEED_PATH));
        Self::new(data_dir.join(DOCUMENT_FILE), seed)
    }

    pub fn primary_path(&self) -> &Path {
        &self.primary
    }

    fn read_document(path: &Path) -> Option<Document> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                info!("no document at '{}': {e}", path.display());
                return None;
            }
        };
        match serde_json::from_slice::<Document>(&bytes) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("failed to parse document '{}': {e}", path.display());
                None
            }
        }
    }

    fn write_document(&self, doc: &Document) -> Result<(), StoreError> {
        if let Some(dir) = self.primary.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let bytes = serde_json::to_vec_pretty(doc)?;
        std::fs::write(&self.primary, bytes)?;
        Ok(())
    }

    fn fresh_document() -> Document {
        let password = std::env::var("DANGERMETER_DELETION_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_DELETION_PASSWORD.to_string());
        Document::new(password)
    }
}

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn load(&self) -> Document {
        if let Some(doc) = Self::read_document(&self.primary) {
            return doc;
        }
        if let Some(doc) = Self::read_document(&self.seed) {
            info!("seeding '{}' from '{}'", self.primary.display(), self.seed.display());
            // Best effort: a failed copy only means the next load re-reads
            // the seed.
            if let Err(e) = self.write_document(&doc) {
                warn!("failed to copy seed into '{}': {e}", self.primary.display());
            }
            return doc;
        }
        info!("no stored document found, starting fresh");
        Self::fresh_document()
    }

    async fn save(&self, doc: &mut Document) -> Result<(), StoreError> {
        doc.last_updated = Utc::now();
        self.write_document(doc)
    }
}
