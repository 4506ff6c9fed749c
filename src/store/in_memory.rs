use super::{DirectoryStore, StoreError, StoreResult};
use crate::types::{FilterPredicate, Helper, HelperDraft};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// In-memory store implementation for development/testing
pub struct InMemoryStore {
    helpers: Arc<Mutex<Vec<Helper>>>,
    categories: Arc<Mutex<BTreeSet<String>>>,
    next_id: AtomicI64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            helpers: Arc::new(Mutex::new(Vec::new())),
            categories: Arc::new(Mutex::new(BTreeSet::new())),
            next_id: AtomicI64::new(1),
        }
    }

    /// Seeds the store with existing rows, mirroring a populated remote table.
    pub fn with_rows(helpers: Vec<Helper>, categories: Vec<String>) -> Self {
        let store = Self::new();
        let max_id = helpers.iter().filter_map(|h| h.id).max().unwrap_or(0);
        store.next_id.store(max_id + 1, Ordering::SeqCst);
        *store.helpers.lock().unwrap() = helpers;
        *store.categories.lock().unwrap() = categories.into_iter().collect();
        store
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(predicate: &FilterPredicate, helper: &Helper) -> bool {
    if let Some(category) = &predicate.category {
        if helper.category != *category {
            return false;
        }
    }
    if let Some(term) = &predicate.search_term {
        let term = term.to_lowercase();
        if !helper.first_name.to_lowercase().contains(&term)
            && !helper.last_name.to_lowercase().contains(&term)
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl DirectoryStore for InMemoryStore {
    async fn list_helpers(&self, predicate: &FilterPredicate) -> StoreResult<Vec<Helper>> {
        let helpers = self.helpers.lock().unwrap();
        Ok(helpers
            .iter()
            .filter(|h| matches(predicate, h))
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> StoreResult<Vec<String>> {
        let categories = self.categories.lock().unwrap();
        Ok(categories.iter().cloned().collect())
    }

    async fn insert_category(&self, name: &str) -> StoreResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.insert(name.to_string()) {
            return Err(StoreError::Conflict);
        }
        debug!("Created category: {}", name);
        Ok(())
    }

    async fn insert_helper(&self, draft: &HelperDraft) -> StoreResult<Option<Helper>> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let helper = Helper {
            id: Some(id),
            first_name: draft.first_name.clone(),
            last_name: draft.last_name.clone(),
            description: draft.description.clone(),
            category: draft.category.clone(),
            social_media: draft.social_media.clone(),
            created_at: Some(Utc::now()),
        };

        let mut helpers = self.helpers.lock().unwrap();
        helpers.push(helper.clone());

        debug!("Created helper: {} with id {}", helper.full_name(), id);
        Ok(Some(helper))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SocialLinks;

    fn named(first: &str, last: &str, category: &str) -> Helper {
        Helper {
            id: None,
            first_name: first.to_string(),
            last_name: last.to_string(),
            description: format!("{} helps with {}", first, category),
            category: category.to_string(),
            social_media: SocialLinks::default(),
            created_at: None,
        }
    }

    #[test]
    fn test_search_matches_first_or_last_name_case_insensitively() {
        let predicate = FilterPredicate::new(None, Some("ann".to_string()));

        assert!(matches(&predicate, &named("Anna", "Smith", "Tutoring")));
        assert!(matches(&predicate, &named("Joann", "Lee", "Tutoring")));
        assert!(matches(&predicate, &named("Bob", "Mann", "Tutoring")));
        assert!(!matches(&predicate, &named("Bob", "Jones", "Tutoring")));
    }

    #[test]
    fn test_category_filter_is_exact() {
        let predicate = FilterPredicate::new(Some("Cooking".to_string()), None);

        assert!(matches(&predicate, &named("Ana", "Diaz", "Cooking")));
        assert!(!matches(&predicate, &named("Ana", "Diaz", "cooking")));
        assert!(!matches(&predicate, &named("Ana", "Diaz", "Tutoring")));
    }

    #[test]
    fn test_category_and_search_compose_with_and() {
        let predicate =
            FilterPredicate::new(Some("Cooking".to_string()), Some("diaz".to_string()));

        assert!(matches(&predicate, &named("Ana", "Diaz", "Cooking")));
        assert!(!matches(&predicate, &named("Ana", "Diaz", "Tutoring")));
        assert!(!matches(&predicate, &named("Ana", "Lopez", "Cooking")));
    }

    #[tokio::test]
    async fn test_insert_helper_assigns_monotonic_ids() {
        let store = InMemoryStore::new();
        let draft = HelperDraft {
            first_name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            description: "Meal prep".to_string(),
            category: "Cooking".to_string(),
            social_media: SocialLinks::default(),
        };

        let first = store.insert_helper(&draft).await.unwrap().unwrap();
        let second = store.insert_helper(&draft).await.unwrap().unwrap();
        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert!(first.created_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_category_insert_conflicts() {
        let store = InMemoryStore::new();
        store.insert_category("Nursing").await.unwrap();

        let result = store.insert_category("Nursing").await;
        assert!(matches!(result, Err(StoreError::Conflict)));
        assert_eq!(store.list_categories().await.unwrap(), vec!["Nursing"]);
    }
}
