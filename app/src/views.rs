//! Read models derived from several stores.

use crate::lists::ListState;
use crate::tasks::TaskState;
use std::sync::Arc;
use todolists_api::Task;
use todolists_runtime::{Subscription, derived};

/// Tasks of `list_id` that pass the list's display filter, in cache order
///
/// A list with no cached tasks yields nothing; a list missing from the list
/// cache shows every task.
#[must_use]
pub fn visible_tasks(lists: &ListState, tasks: &TaskState, list_id: &str) -> Vec<Task> {
    let filter = lists.filter_of(list_id);
    tasks
        .tasks_of(list_id)
        .iter()
        .filter(|task| filter.matches(task.status))
        .cloned()
        .collect()
}

/// Live view of [`visible_tasks`]
///
/// Recomputed whenever either store publishes; observers are only woken when
/// the visible sequence actually changes.
///
/// # Panics
///
/// Requires a running tokio runtime.
pub fn watch_visible_tasks(
    lists: Subscription<Arc<ListState>>,
    tasks: Subscription<Arc<TaskState>>,
    list_id: impl Into<String>,
) -> Subscription<Vec<Task>> {
    let list_id = list_id.into();
    derived::combine(
        lists.into_receiver(),
        tasks.into_receiver(),
        move |lists: &Arc<ListState>, tasks: &Arc<TaskState>| visible_tasks(lists, tasks, &list_id),
    )
}
