use crate::error::{DirectoryError, Result};
use crate::store::{DirectoryStore, StoreError};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// In-memory mirror of the distinct category names known to the store.
///
/// Read by the query engine to populate filter choices and by the creation
/// workflow to decide whether a submitted category is new.
pub struct CategoryRegistry {
    store: Arc<dyn DirectoryStore>,
    names: Mutex<BTreeSet<String>>,
}

impl CategoryRegistry {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            store,
            names: Mutex::new(BTreeSet::new()),
        }
    }

    /// Replaces the local set with the store's category names. On a store
    /// error the previous set stays intact (stale but valid).
    pub async fn load(&self) -> Result<Vec<String>> {
        match self.store.list_categories().await {
            Ok(fetched) => {
                let mut names = self.names.lock().unwrap();
                *names = fetched.into_iter().collect();
                debug!("Loaded {} categories", names.len());
                Ok(names.iter().cloned().collect())
            }
            Err(e) => {
                warn!("Failed to load categories: {}", e);
                Err(DirectoryError::Fetch {
                    message: e.to_string(),
                })
            }
        }
    }

    /// Exact, case-sensitive membership test against the local set.
    pub fn contains(&self, name: &str) -> bool {
        self.names.lock().unwrap().contains(name)
    }

    /// Snapshot of the known names for populating a selector.
    pub fn names(&self) -> Vec<String> {
        self.names.lock().unwrap().iter().cloned().collect()
    }

    /// Registers a category unless it is already known. A store conflict
    /// means another client inserted the same name first; that counts as
    /// success and the name is still added locally.
    pub async fn register_if_absent(&self, name: &str) -> Result<()> {
        if self.contains(name) {
            return Ok(());
        }

        match self.store.insert_category(name).await {
            Ok(()) => {
                info!("Registered new category: {}", name);
            }
            Err(StoreError::Conflict) => {
                debug!("Category already registered by another client: {}", name);
            }
            Err(e) => {
                warn!("Failed to register category '{}': {}", name, e);
                return Err(DirectoryError::Registration {
                    message: e.to_string(),
                });
            }
        }

        self.names.lock().unwrap().insert(name.to_string());
        Ok(())
    }
}
