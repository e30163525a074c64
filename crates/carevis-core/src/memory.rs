//! In-memory [`ProfileRepository`] — the test double for the ambient
//! key-value store.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::{Arc, Mutex},
};

use crate::repository::{ProfileRepository, StorageKey};

/// A `ProfileRepository` backed by a plain map. Cloning is cheap; clones
/// share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
  entries: Arc<Mutex<HashMap<StorageKey, String>>>,
}

impl MemoryRepository {
  pub fn new() -> Self { Self::default() }

  fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, String>> {
    // A poisoned lock means a test already panicked; propagating the data
    // is still sound for a plain map.
    self.entries.lock().unwrap_or_else(|e| e.into_inner())
  }
}

impl ProfileRepository for MemoryRepository {
  type Error = Infallible;

  async fn get(&self, key: StorageKey) -> Result<Option<String>, Infallible> {
    Ok(self.lock().get(&key).cloned())
  }

  async fn set(
    &self,
    key: StorageKey,
    value: String,
  ) -> Result<(), Infallible> {
    self.lock().insert(key, value);
    Ok(())
  }

  async fn remove(&self, key: StorageKey) -> Result<(), Infallible> {
    self.lock().remove(&key);
    Ok(())
  }

  async fn clear(&self) -> Result<(), Infallible> {
    self.lock().clear();
    Ok(())
  }
}
