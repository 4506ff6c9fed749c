use crate::error::DirectoryError;
use crate::store::DirectoryStore;
use crate::types::{DirectoryView, FilterPredicate, Helper};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Owns the authoritative local list of helpers and the loading/error state
/// of the last fetch. All mutation of the view happens here: completed
/// fetches replace the list, `merge_created` appends to it.
pub struct DirectoryEngine {
    store: Arc<dyn DirectoryStore>,
    state: Mutex<EngineState>,
    issued: AtomicU64,
}

#[derive(Default)]
struct EngineState {
    view: DirectoryView,
    active_predicate: FilterPredicate,
}

impl DirectoryEngine {
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            store,
            state: Mutex::new(EngineState::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Issues one filtered query for the predicate and returns the view
    /// after this fetch settles.
    ///
    /// The previous list stays visible while the fetch is outstanding. Only
    /// the most recently issued fetch may apply its result; a superseded
    /// fetch is discarded wholesale, errors included, and leaves `loading`
    /// to the fetch that superseded it. Fetch failures land in the view's
    /// `last_error` instead of propagating.
    pub async fn fetch(&self, predicate: FilterPredicate) -> DirectoryView {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap();
            state.view.loading = true;
            state.active_predicate = predicate.clone();
        }
        debug!(seq, ?predicate, "Fetching helpers");

        let result = self.store.list_helpers(&predicate).await;

        let mut state = self.state.lock().unwrap();
        if seq != self.issued.load(Ordering::SeqCst) {
            debug!(seq, "Discarding superseded fetch result");
            return state.view.clone();
        }

        match result {
            Ok(helpers) => {
                debug!(seq, count = helpers.len(), "Fetch applied");
                state.view.helpers = helpers;
                state.view.last_error = None;
            }
            Err(e) => {
                let error = DirectoryError::Fetch {
                    message: e.to_string(),
                };
                warn!(seq, "{}", error);
                state.view.last_error = Some(error.to_string());
            }
        }
        state.view.loading = false;
        state.view.clone()
    }

    /// Re-issues a fetch with the currently active predicate.
    pub async fn refetch(&self) -> DirectoryView {
        let predicate = self.state.lock().unwrap().active_predicate.clone();
        self.fetch(predicate).await
    }

    /// Appends a newly created helper to the visible list without waiting
    /// for a fetch.
    pub fn merge_created(&self, helper: Helper) {
        let mut state = self.state.lock().unwrap();
        debug!("Merging created helper: {}", helper.full_name());
        state.view.helpers.push(helper);
    }

    /// Current view for the presentation layer.
    pub fn snapshot(&self) -> DirectoryView {
        self.state.lock().unwrap().view.clone()
    }
}
