//! Domain types for the task store.

use std::collections::HashMap;
use todolists_api::{ApiError, Task, UpdateTaskRequest};
use todolists_macros::Action;

/// State of the task store: one cached sequence per list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskState {
    /// Tasks keyed by list id, in server order with new tasks first
    pub tasks: HashMap<String, Vec<Task>>,
    /// Request number of the fetch currently reflected for each list
    pub last_applied_fetch: HashMap<String, u64>,
}

impl TaskState {
    /// Creates an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached tasks of a list, empty when never fetched
    #[must_use]
    pub fn tasks_of(&self, list_id: &str) -> &[Task] {
        self.tasks.get(list_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether a fetch result for `list_id` is older than the one applied
    #[must_use]
    pub fn is_stale(&self, list_id: &str, request: u64) -> bool {
        self.last_applied_fetch
            .get(list_id)
            .is_some_and(|applied| request < *applied)
    }

    /// Replaces the matching task with `patch` merged over it
    ///
    /// Returns `false` when the task is not cached.
    pub(crate) fn patch(&mut self, list_id: &str, task_id: &str, patch: &UpdateTaskRequest) -> bool {
        let Some(task) = self
            .tasks
            .get_mut(list_id)
            .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
        else {
            return false;
        };

        *task = patch.apply_to(task);
        true
    }
}

/// Actions for the task store
#[derive(Action, Clone, Debug, PartialEq)]
pub enum TaskAction {
    // Fetch
    /// Fetch the tasks of a list
    Fetch {
        /// Owning list
        list_id: String,
    },

    /// Tasks fetched
    Fetched {
        /// Owning list
        list_id: String,
        /// Request number of the fetch
        request: u64,
        /// Tasks in server order
        tasks: Vec<Task>,
    },

    /// Fetch failed
    FetchFailed {
        /// Owning list
        list_id: String,
        /// Request number of the fetch
        request: u64,
        /// Cause
        error: ApiError,
    },

    // Create
    /// Create a task
    Create {
        /// Owning list
        list_id: String,
        /// Title of the new task
        title: String,
    },

    /// Task created
    Created {
        /// Owning list
        list_id: String,
        /// The task as stored by the server
        task: Task,
    },

    /// Create failed
    CreateFailed {
        /// Owning list
        list_id: String,
        /// Cause
        error: ApiError,
    },

    // Delete
    /// Delete a task
    Delete {
        /// Owning list
        list_id: String,
        /// Task to delete
        task_id: String,
    },

    /// Task deleted
    Deleted {
        /// Owning list
        list_id: String,
        /// Deleted task
        task_id: String,
    },

    /// Delete failed
    DeleteFailed {
        /// Owning list
        list_id: String,
        /// Task that was not deleted
        task_id: String,
        /// Cause
        error: ApiError,
    },

    // Update
    /// Update some fields of a task
    Update {
        /// Owning list
        list_id: String,
        /// Task to update
        task_id: String,
        /// Fields to change
        patch: UpdateTaskRequest,
    },

    /// Task updated
    ///
    /// Carries the patch rather than the server echo: the patch is merged
    /// over the local task as it is when the response arrives.
    Updated {
        /// Owning list
        list_id: String,
        /// Updated task
        task_id: String,
        /// Fields changed
        patch: UpdateTaskRequest,
    },

    /// Update failed
    UpdateFailed {
        /// Owning list
        list_id: String,
        /// Task that was not updated
        task_id: String,
        /// Cause
        error: ApiError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use todolists_api::TaskStatus;
    use todolists_testing::api::task;

    #[test]
    fn test_tasks_of_unknown_list_is_empty() {
        assert!(TaskState::new().tasks_of("missing").is_empty());
    }

    #[test]
    fn test_is_stale_per_list() {
        let mut state = TaskState::new();
        state.last_applied_fetch.insert("1".to_string(), 5);

        assert!(state.is_stale("1", 4));
        assert!(!state.is_stale("1", 5));
        assert!(!state.is_stale("2", 1));
    }

    #[test]
    fn test_patch_missing_task() {
        let mut state = TaskState::new();
        state
            .tasks
            .insert("1".to_string(), vec![task("1", "a", "A", TaskStatus::Active)]);

        assert!(!state.patch("1", "zzz", &UpdateTaskRequest::title("B")));
        assert!(!state.patch("2", "a", &UpdateTaskRequest::title("B")));
        assert_eq!(state.tasks_of("1")[0].title, "A");
    }

    #[test]
    fn test_action_name() {
        let action = TaskAction::Update {
            list_id: "1".to_string(),
            task_id: "a".to_string(),
            patch: UpdateTaskRequest::status(TaskStatus::Completed),
        };
        assert_eq!(action.name(), "Update");
    }
}
