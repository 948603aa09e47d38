// src/assets/source.rs

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use crate::error::AssetError;

/// Where encoded asset bytes come from.
pub trait AssetSource: Send + Sync + 'static {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError>;
}

/// Resolves references as paths relative to a root directory.
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    root: PathBuf,
}

impl FileAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn resolve(&self, reference: &str) -> PathBuf {
        self.root.join(reference)
    }
}

impl AssetSource for FileAssetSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        std::fs::read(self.resolve(reference)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AssetError::NotFound {
                reference: reference.to_string(),
            },
            _ => AssetError::Fetch {
                reference: reference.to_string(),
                source: e,
            },
        })
    }
}

/// Assets held in memory, keyed by reference.
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    pub fn insert(&self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(reference.into(), bytes);
    }
}

impl AssetSource for MemoryAssetSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>, AssetError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(reference)
            .cloned()
            .ok_or_else(|| AssetError::NotFound {
                reference: reference.to_string(),
            })
    }
}
