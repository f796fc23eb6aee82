//! Whole-store snapshots.
//!
//! The snapshot is bincode-encoded and written through `atomicwrites`, so a
//! crash mid-save leaves the previous file intact.

use crate::store::ItemStore;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use lostfound_core::{Error, Item, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub version: u32,
    pub next_id: u64,
    pub items: Vec<Item>,
}

/// Write every item in `store` to `path`, replacing any previous snapshot.
pub fn save_snapshot<P: AsRef<Path>>(store: &ItemStore, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let snapshot = StoreSnapshot {
        version: SNAPSHOT_VERSION,
        next_id: store.next_id(),
        items: store.items(),
    };
    let data = bincode::serialize(&snapshot)?;

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .map_err(|e| Error::Persistence(e.to_string()))?;

    tracing::info!("saved {} items to {:?}", snapshot.items.len(), path);
    Ok(())
}

/// Load a store from `path`. A missing file yields an empty store.
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<ItemStore> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!("no snapshot at {:?}, starting empty", path);
        return Ok(ItemStore::new());
    }

    let data = std::fs::read(path)?;
    let snapshot: StoreSnapshot = bincode::deserialize(&data)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(Error::Persistence(format!(
            "unsupported snapshot version {} in {:?}",
            snapshot.version, path
        )));
    }

    tracing::info!("loaded {} items from {:?}", snapshot.items.len(), path);
    Ok(ItemStore::from_items(snapshot.items, snapshot.next_id))
}
