//! Durable record of Direct messages that have already been handled.
//!
//! The record is a single JSON object, `{"replied_to": [...]}`. Ids are only
//! ever added. `flush` rewrites the whole file; there is no partial-write
//! protection, so a crash mid-flush can leave a file that fails to load.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ResponderError;

#[derive(Debug, Default, Deserialize)]
struct StoreFile {
    #[serde(default)]
    replied_to: Vec<String>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    replied_to: &'a BTreeSet<String>,
}

/// Set of handled message ids, backed by a JSON file.
///
/// Ids are held sorted so a flush with no intervening `add` writes the same
/// bytes as the previous one.
#[derive(Debug)]
pub struct DedupStore {
    path: PathBuf,
    handled: BTreeSet<String>,
}

impl DedupStore {
    /// Load the record at `path`, creating an empty one if it does not exist.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ResponderError> {
        let path = path.into();

        match fs::read_to_string(&path) {
            Ok(raw) => {
                let file: StoreFile =
                    serde_json::from_str(&raw).map_err(|source| ResponderError::StoreFormat {
                        path: path.clone(),
                        source,
                    })?;
                let store = Self {
                    handled: file.replied_to.into_iter().collect(),
                    path,
                };
                info!(count = store.len(), "Loaded previously replied messages");
                Ok(store)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let store = Self {
                    path,
                    handled: BTreeSet::new(),
                };
                store.flush()?;
                info!(path = %store.path.display(), "Created new message store");
                Ok(store)
            }
            Err(source) => Err(ResponderError::StoreIo { path, source }),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.handled.contains(id)
    }

    /// Record `id` in memory. Returns false if it was already present.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.handled.insert(id.into())
    }

    /// Overwrite the backing file with the full current set.
    pub fn flush(&self) -> Result<(), ResponderError> {
        let mut json = serde_json::to_string_pretty(&StoreFileRef {
            replied_to: &self.handled,
        })
        .map_err(|source| ResponderError::StoreFormat {
            path: self.path.clone(),
            source,
        })?;
        json.push('\n');

        fs::write(&self.path, json).map_err(|source| ResponderError::StoreIo {
            path: self.path.clone(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.handled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handled.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.handled.iter().map(String::as_str)
    }
}
