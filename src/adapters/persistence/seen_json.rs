//! Implements SeenStore using a JSON file.
//!
//! The file holds a pretty-printed JSON array of post identifiers.

use crate::domain::DomainError;
use crate::ports::SeenStore;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// JSON file-based seen set.
pub struct SeenJson {
    path: PathBuf,
    first_run: bool,
    cache: RwLock<BTreeSet<String>>,
}

impl SeenJson {
    /// Open the seen file. A missing file means first run and an empty set;
    /// an unreadable or corrupt file yields an empty set without first-run.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref().to_path_buf();
        let (first_run, ids) = match fs::read_to_string(&path).await {
            Ok(s) => match serde_json::from_str::<Vec<String>>(&s) {
                Ok(ids) => (false, ids.into_iter().collect()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "seen file is corrupt, starting empty");
                    (false, BTreeSet::new())
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => (true, BTreeSet::new()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "seen file unreadable, starting empty");
                (false, BTreeSet::new())
            }
        };
        info!(path = %path.display(), first_run, seen = ids.len(), "seen set loaded");
        Ok(Self {
            path,
            first_run,
            cache: RwLock::new(ids),
        })
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Atomic save: write temp file, sync_all, rename over the target.
    async fn save(&self) -> Result<(), DomainError> {
        let ids: Vec<String> = self.cache.read().await.iter().cloned().collect();
        let json =
            serde_json::to_string_pretty(&ids).map_err(|e| DomainError::State(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| DomainError::State(format!("create seen dir: {}", e)))?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::State(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::State(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::State(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::State(format!("atomic rename failed: {}", e)))?;

        info!(path = %self.path.display(), seen = ids.len(), "seen set saved");
        Ok(())
    }
}

#[async_trait::async_trait]
impl SeenStore for SeenJson {
    fn is_first_run(&self) -> bool {
        self.first_run
    }

    async fn contains(&self, post_id: &str) -> bool {
        self.cache.read().await.contains(post_id)
    }

    async fn insert(&self, post_id: String) {
        self.cache.write().await.insert(post_id);
    }

    async fn persist(&self) -> Result<(), DomainError> {
        self.save().await
    }
}
