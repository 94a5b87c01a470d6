use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::OperatorRef;

/// Storage area for untouched uploads.
pub const UPLOAD_AREA: &str = "uploads";
/// Storage area for annotated artifacts.
pub const RESULT_AREA: &str = "results";

/// Blob-storage boundary for raw and annotated image bytes. Keys are
/// opaque to the ledger; the stored reference is whatever `put` returns.
pub trait ImageStore {
    fn put(&self, key: &str, bytes: &[u8]) -> impl Future<Output = io::Result<String>>;
    fn get(&self, reference: &str) -> impl Future<Output = io::Result<Vec<u8>>>;
}

/// Build a collision-resistant storage key for one upload by one
/// operator: operator identity, server timestamp, and a short random
/// suffix, so concurrent uploads by the same operator never collide.
pub fn storage_key(area: &str, operator: &OperatorRef, extension: &str) -> String {
    let timestamp = OffsetDateTime::now_utc().unix_timestamp();
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}/{}_{}_{}.{}",
        area,
        operator,
        timestamp,
        &suffix[..8],
        extension
    )
}

/// Filesystem-backed image store rooted at a data directory with
/// `uploads/` and `results/` areas underneath it.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub async fn new(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        for area in [UPLOAD_AREA, RESULT_AREA] {
            tokio::fs::create_dir_all(root.join(area)).await?;
        }
        Ok(Self { root })
    }

    /// Absolute path of a stored reference, for callers that hand the
    /// artifact to something expecting a file.
    pub fn path_of(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }
}

impl ImageStore for FsImageStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> io::Result<String> {
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(key.to_string())
    }

    async fn get(&self, reference: &str) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.root.join(reference)).await
    }
}
