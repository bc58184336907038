//! Whole-file JSON persistence for the append-only stores.
//!
//! Each store keeps its full collection in memory and rewrites the backing
//! file on every mutation.  Rewrites go through a sibling temp file followed
//! by a rename, so a crash mid-write leaves either the old or the new file,
//! never a truncated one.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};

/// Load a JSON array from `path`.
///
/// A missing file is not an error: it yields an empty collection.
pub fn load_json_array<T: DeserializeOwned>(path: &Path) -> StoreResult<Vec<T>> {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "storage file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };

    let items: Vec<T> = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), count = items.len(), "storage file loaded");
    Ok(items)
}

/// Serialize `items` as a JSON array and atomically replace `path` with it.
pub fn write_json_array<T: Serialize>(path: &Path, items: &[T]) -> StoreResult<()> {
    let bytes = serde_json::to_vec(items)?;
    atomic_write(path, &bytes)
}

/// Write `content` to a temp file next to `target`, flush it to disk, then
/// rename it over `target`.
pub fn atomic_write(target: &Path, content: &[u8]) -> StoreResult<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let temp = temp_path(target);
    let result = (|| {
        let mut file = fs::File::create(&temp)?;
        file.write_all(content)?;
        file.sync_all()?;
        fs::rename(&temp, target)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp);
        return Err(StoreError::io(target, e));
    }

    debug!(path = %target.display(), bytes = content.len(), "storage file rewritten");
    Ok(())
}

/// Append `item` to a shared collection and persist the result to `path`.
///
/// `admit` inspects the current collection first and may refuse the item.
/// The file is rewritten with the item included before the in-memory
/// collection gains it, and the write lock is held until both are done.
/// The sequence runs on its own task, so dropping the caller's future cannot
/// interrupt it halfway.  Returns the new collection length.
pub(crate) async fn append_persisted<T, F>(
    items: Arc<RwLock<Vec<T>>>,
    path: PathBuf,
    item: T,
    admit: F,
) -> StoreResult<usize>
where
    T: Serialize + Send + Sync + 'static,
    F: FnOnce(&[T]) -> StoreResult<()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut guard = items.write_owned().await;
        admit(&guard)?;

        guard.push(item);
        let encoded = serde_json::to_vec(&*guard);
        let item = guard.pop();
        let bytes = encoded?;

        tokio::task::spawn_blocking(move || atomic_write(&path, &bytes)).await??;

        guard.extend(item);
        Ok::<_, StoreError>(guard.len())
    })
    .await?
}

fn temp_path(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "store".into());
    name.push(".tmp");
    target.with_file_name(name)
}
