use crate::directory::DirectoryEngine;
use crate::error::{DirectoryError, Result};
use crate::registry::CategoryRegistry;
use crate::store::DirectoryStore;
use crate::types::{Helper, HelperDraft};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Lifecycle of one helper submission. `Failed` keeps the caller's field
/// values untouched and permits a retry; `Succeeded` terminates the
/// workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

/// The submitted form: field values plus whether the category was typed in
/// rather than picked from the known list.
#[derive(Debug, Clone, Default)]
pub struct HelperForm {
    pub draft: HelperDraft,
    pub new_category: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The helper was created and merged into the directory view.
    Created(Helper),
    /// A submission was already in flight, or the workflow had already
    /// succeeded; this call did nothing.
    Ignored,
}

/// Validates and submits a new helper profile, registering its category
/// first when needed, then merges the created record into the directory
/// and issues a confirming refetch.
pub struct CreationWorkflow {
    store: Arc<dyn DirectoryStore>,
    registry: Arc<CategoryRegistry>,
    directory: Arc<DirectoryEngine>,
    state: Mutex<WorkflowState>,
}

impl CreationWorkflow {
    pub fn new(
        store: Arc<dyn DirectoryStore>,
        registry: Arc<CategoryRegistry>,
        directory: Arc<DirectoryEngine>,
    ) -> Self {
        Self {
            store,
            registry,
            directory,
            state: Mutex::new(WorkflowState::Editing),
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state.lock().unwrap().clone()
    }

    fn set_state(&self, next: WorkflowState) {
        *self.state.lock().unwrap() = next;
    }

    pub async fn submit(&self, form: &HelperForm) -> Result<SubmitOutcome> {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                WorkflowState::Submitting | WorkflowState::Succeeded => {
                    debug!("Ignoring submit while workflow is {:?}", *state);
                    return Ok(SubmitOutcome::Ignored);
                }
                _ => {}
            }
            if let Err(e) = validate(&form.draft) {
                *state = WorkflowState::Editing;
                return Err(e);
            }
            *state = WorkflowState::Submitting;
        }

        // Registration must complete before the helper insert is issued. A
        // category registered here is not rolled back if the insert fails.
        if form.new_category || !self.registry.contains(&form.draft.category) {
            if let Err(e) = self.registry.register_if_absent(&form.draft.category).await {
                warn!("Category registration failed: {}", e);
                self.set_state(WorkflowState::Failed(e.to_string()));
                return Err(e);
            }
        }

        let created = match self.store.insert_helper(&form.draft).await {
            Ok(Some(helper)) => helper,
            Ok(None) => {
                // The store accepted the row without echoing it back; merge
                // the submitted values and let the confirming refetch pick
                // up the authoritative row.
                debug!("Insert returned no representation; using submitted values");
                form.draft.clone().into_helper()
            }
            Err(e) => {
                let error = DirectoryError::Insert {
                    message: e.to_string(),
                };
                warn!("{}", error);
                self.set_state(WorkflowState::Failed(error.to_string()));
                return Err(error);
            }
        };

        info!("Created helper: {}", created.full_name());
        self.directory.merge_created(created.clone());
        // Confirming refetch with the active predicate. Its outcome cannot
        // fail the already-committed submission; a fetch error lands in the
        // view's last_error.
        let _ = self.directory.refetch().await;

        self.set_state(WorkflowState::Succeeded);
        Ok(SubmitOutcome::Created(created))
    }
}

fn validate(draft: &HelperDraft) -> Result<()> {
    for (field, value) in [
        ("first_name", &draft.first_name),
        ("last_name", &draft.last_name),
        ("description", &draft.description),
        ("category", &draft.category),
    ] {
        if value.trim().is_empty() {
            return Err(DirectoryError::Validation(field.to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names_the_first_missing_field() {
        let draft = HelperDraft {
            first_name: "Ana".to_string(),
            last_name: "  ".to_string(),
            description: String::new(),
            category: "Cooking".to_string(),
            social_media: Default::default(),
        };

        match validate(&draft) {
            Err(DirectoryError::Validation(field)) => assert_eq!(field, "last_name"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_accepts_a_complete_draft() {
        let draft = HelperDraft {
            first_name: "Ana".to_string(),
            last_name: "Diaz".to_string(),
            description: "Meal prep".to_string(),
            category: "Cooking".to_string(),
            social_media: Default::default(),
        };
        assert!(validate(&draft).is_ok());
    }
}
