use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::core::dispatch::Blob;

const BLOB_SCHEME: &str = "blob:nanostudio/";

/// Registry of downloaded media, addressed by `blob:` handles.
///
/// Handles stay valid until revoked or the store is dropped.
#[derive(Clone, Default)]
pub struct BlobStore {
    blobs: Arc<RwLock<HashMap<String, Blob>>>,
}

impl BlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `blob` and returns a handle that resolves back to it.
    pub fn insert(&self, blob: Blob) -> String {
        let url = format!("{}{}", BLOB_SCHEME, uuid::Uuid::new_v4());
        if let Ok(mut blobs) = self.blobs.write() {
            blobs.insert(url.clone(), blob);
        }
        url
    }

    pub fn get(&self, url: &str) -> Option<Blob> {
        self.blobs.read().ok()?.get(url).cloned()
    }

    pub fn revoke(&self, url: &str) -> bool {
        self.blobs
            .write()
            .map(|mut blobs| blobs.remove(url).is_some())
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.blobs.read().map(|b| b.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_blob_url(url: &str) -> bool {
        url.starts_with(BLOB_SCHEME)
    }
}

impl fmt::Debug for BlobStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobStore").field("len", &self.len()).finish()
    }
}
