//! Reducer logic for the task store.

use super::types::{TaskAction, TaskState};
use crate::effects::Request;
use crate::environment::{AppEnvironment, Notifier};
use std::marker::PhantomData;
use std::sync::Arc;
use todolists_api::TodoApi;
use todolists_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Tag carried by every log line of the task store
pub const FEATURE: &str = "tasks";

/// Reducer for the task store
pub struct TaskReducer<A, N> {
    _environment: PhantomData<fn() -> (A, N)>,
}

impl<A, N> TaskReducer<A, N> {
    /// Creates a new `TaskReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _environment: PhantomData,
        }
    }
}

impl<A, N> Default for TaskReducer<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N> Clone for TaskReducer<A, N> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A, N> std::fmt::Debug for TaskReducer<A, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TaskReducer")
    }
}

impl<A, N> Reducer for TaskReducer<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    type State = TaskState;
    type Action = TaskAction;
    type Environment = AppEnvironment<A, N>;

    #[allow(clippy::too_many_lines)] // One arm per action
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        let notifier = Arc::clone(&env.notifier);
        let api = Arc::clone(&env.api);

        match action {
            // ========== Intents ==========
            TaskAction::Fetch { list_id } => {
                let request = env.next_request();
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "fetch",
                    %list_id,
                    request
                );
                let target = list_id.clone();
                let failed = list_id.clone();

                smallvec![Request::new(span, notifier).run(
                    async move { api.fetch_tasks(&target).await },
                    move |tasks| TaskAction::Fetched {
                        list_id,
                        request,
                        tasks,
                    },
                    move |error| TaskAction::FetchFailed {
                        list_id: failed,
                        request,
                        error,
                    },
                )]
            },

            TaskAction::Create { list_id, title } => {
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "create",
                    %list_id,
                    %title
                );
                let (target, created) = (list_id.clone(), list_id.clone());

                smallvec![Request::new(span, notifier).run(
                    async move { api.create_task(&target, &title).await },
                    move |task| TaskAction::Created {
                        list_id: created,
                        task,
                    },
                    move |error| TaskAction::CreateFailed { list_id, error },
                )]
            },

            TaskAction::Delete { list_id, task_id } => {
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "delete",
                    %list_id,
                    %task_id
                );
                let (target_list, target_task) = (list_id.clone(), task_id.clone());
                let (failed_list, failed_task) = (list_id.clone(), task_id.clone());

                smallvec![Request::new(span, notifier).run(
                    async move { api.delete_task(&target_list, &target_task).await },
                    move |()| TaskAction::Deleted { list_id, task_id },
                    move |error| TaskAction::DeleteFailed {
                        list_id: failed_list,
                        task_id: failed_task,
                        error,
                    },
                )]
            },

            TaskAction::Update {
                list_id,
                task_id,
                patch,
            } => {
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "update",
                    %list_id,
                    %task_id,
                    ?patch
                );
                let (target_list, target_task) = (list_id.clone(), task_id.clone());
                let (failed_list, failed_task) = (list_id.clone(), task_id.clone());
                let sent = patch.clone();

                smallvec![Request::new(span, notifier).run(
                    async move { api.update_task(&target_list, &target_task, &sent).await },
                    // The patch is merged over the local copy
                    move |()| TaskAction::Updated {
                        list_id,
                        task_id,
                        patch,
                    },
                    move |error| TaskAction::UpdateFailed {
                        list_id: failed_list,
                        task_id: failed_task,
                        error,
                    },
                )]
            },

            // ========== Outcomes ==========
            TaskAction::Fetched {
                list_id,
                request,
                tasks,
            } => {
                if state.is_stale(&list_id, request) {
                    tracing::warn!(
                        feature = FEATURE,
                        %list_id,
                        request,
                        "Discarding stale tasks response"
                    );
                    return SmallVec::new();
                }

                tracing::info!(feature = FEATURE, %list_id, count = tasks.len(), "Tasks data updated");
                state.last_applied_fetch.insert(list_id.clone(), request);
                state.tasks.insert(list_id, tasks);
                SmallVec::new()
            },

            TaskAction::Created { list_id, task } => {
                tracing::info!(feature = FEATURE, %list_id, id = %task.id, "Task added");
                state.tasks.entry(list_id).or_default().insert(0, task);
                SmallVec::new()
            },

            TaskAction::Deleted { list_id, task_id } => {
                if let Some(tasks) = state.tasks.get_mut(&list_id) {
                    tasks.retain(|task| task.id != task_id);
                }
                tracing::info!(feature = FEATURE, %list_id, %task_id, "Task deleted");
                SmallVec::new()
            },

            TaskAction::Updated {
                list_id,
                task_id,
                patch,
            } => {
                if state.patch(&list_id, &task_id, &patch) {
                    tracing::info!(feature = FEATURE, %list_id, %task_id, "Task updated");
                } else {
                    tracing::warn!(feature = FEATURE, %list_id, %task_id, "Updated task is not cached");
                }
                SmallVec::new()
            },

            // Already logged and notified by the request effect
            TaskAction::FetchFailed { .. }
            | TaskAction::CreateFailed { .. }
            | TaskAction::DeleteFailed { .. }
            | TaskAction::UpdateFailed { .. } => SmallVec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::NotificationCenter;
    use todolists_api::{ApiError, Task, TaskStatus, UpdateTaskRequest};
    use todolists_testing::api::task;
    use todolists_testing::{ApiCall, ApiOperation, MockTodoApi, ReducerTest, assertions, test_clock};

    type Env = AppEnvironment<MockTodoApi, NotificationCenter>;

    fn reducer() -> TaskReducer<MockTodoApi, NotificationCenter> {
        TaskReducer::new()
    }

    fn env_with(api: MockTodoApi) -> Env {
        AppEnvironment::new(
            Arc::new(api),
            Arc::new(NotificationCenter::new(Arc::new(test_clock()))),
        )
    }

    fn state_with(list_id: &str, tasks: Vec<Task>) -> TaskState {
        let mut state = TaskState::new();
        state.tasks.insert(list_id.to_string(), tasks);
        state
    }

    #[tokio::test]
    async fn test_fetch_requests_tasks_of_list() {
        let api = MockTodoApi::new().with_task("1", "a", "A", TaskStatus::Active);

        ReducerTest::new(reducer())
            .with_env(env_with(api.clone()))
            .given_state(TaskState::new())
            .when_action(TaskAction::Fetch {
                list_id: "1".to_string(),
            })
            .then_effects(assertions::assert_has_future_effect)
            .then_produces(|actions| {
                assert!(matches!(
                    actions,
                    [TaskAction::Fetched { list_id, request: 1, tasks }]
                        if list_id == "1" && tasks.len() == 1
                ));
            })
            .run_async()
            .await;

        assert_eq!(
            api.calls(),
            vec![ApiCall::FetchTasks {
                list_id: "1".to_string()
            }]
        );
    }

    #[test]
    fn test_fetched_replaces_only_that_list() {
        let mut given = state_with("1", vec![task("1", "old", "Old", TaskStatus::Active)]);
        given
            .tasks
            .insert("2".to_string(), vec![task("2", "b", "B", TaskStatus::Active)]);

        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(given)
            .when_action(TaskAction::Fetched {
                list_id: "1".to_string(),
                request: 3,
                tasks: vec![task("1", "a", "A", TaskStatus::Completed)],
            })
            .then_state(|state| {
                assert_eq!(state.tasks_of("1").len(), 1);
                assert_eq!(state.tasks_of("1")[0].id, "a");
                assert_eq!(state.tasks_of("2")[0].id, "b");
                assert_eq!(state.last_applied_fetch.get("1"), Some(&3));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_stale_fetch_is_discarded_per_list() {
        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(TaskState::new())
            .when_actions([
                TaskAction::Fetched {
                    list_id: "1".to_string(),
                    request: 4,
                    tasks: vec![task("1", "new", "New", TaskStatus::Active)],
                },
                // Older fetch of another list still applies
                TaskAction::Fetched {
                    list_id: "2".to_string(),
                    request: 2,
                    tasks: vec![task("2", "b", "B", TaskStatus::Active)],
                },
                TaskAction::Fetched {
                    list_id: "1".to_string(),
                    request: 3,
                    tasks: Vec::new(),
                },
            ])
            .then_state(|state| {
                assert_eq!(state.tasks_of("1")[0].id, "new");
                assert_eq!(state.tasks_of("2")[0].id, "b");
            })
            .run();
    }

    #[test]
    fn test_created_prepends_and_creates_key() {
        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(state_with("1", vec![task("1", "a", "A", TaskStatus::Active)]))
            .when_actions([
                TaskAction::Created {
                    list_id: "1".to_string(),
                    task: task("1", "b", "B", TaskStatus::Active),
                },
                TaskAction::Created {
                    list_id: "7".to_string(),
                    task: task("7", "c", "C", TaskStatus::Active),
                },
            ])
            .then_state(|state| {
                let ids: Vec<_> = state.tasks_of("1").iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids, vec!["b", "a"]);
                assert_eq!(state.tasks_of("7").len(), 1);
            })
            .run();
    }

    #[test]
    fn test_deleted_absent_task_is_noop() {
        let given = state_with("1", vec![task("1", "a", "A", TaskStatus::Active)]);
        let expected = given.clone();

        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(given)
            .when_actions([
                TaskAction::Deleted {
                    list_id: "1".to_string(),
                    task_id: "zzz".to_string(),
                },
                TaskAction::Deleted {
                    list_id: "9".to_string(),
                    task_id: "a".to_string(),
                },
            ])
            .then_state(move |state| assert_eq!(state, &expected))
            .run();
    }

    #[test]
    fn test_updated_merges_patch_over_local_task() {
        let mut local = task("1", "a", "Local title", TaskStatus::Active);
        local.priority = 3;

        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(state_with("1", vec![local]))
            .when_action(TaskAction::Updated {
                list_id: "1".to_string(),
                task_id: "a".to_string(),
                patch: UpdateTaskRequest::status(TaskStatus::Completed),
            })
            .then_state(|state| {
                let updated = &state.tasks_of("1")[0];
                assert_eq!(updated.status, TaskStatus::Completed);
                assert_eq!(updated.title, "Local title");
                assert_eq!(updated.priority, 3);
            })
            .run();
    }

    #[tokio::test]
    async fn test_update_keeps_local_fields() {
        // The server copy has a different title than the local one
        let api = MockTodoApi::new().with_task("1", "a", "Server title", TaskStatus::Active);

        let produced = ReducerTest::new(reducer())
            .with_env(env_with(api))
            .given_state(state_with("1", vec![task("1", "a", "Local title", TaskStatus::Active)]))
            .when_action(TaskAction::Update {
                list_id: "1".to_string(),
                task_id: "a".to_string(),
                patch: UpdateTaskRequest::status(TaskStatus::Completed),
            })
            .run_async()
            .await;

        ReducerTest::new(reducer())
            .with_env(env_with(MockTodoApi::new()))
            .given_state(state_with("1", vec![task("1", "a", "Local title", TaskStatus::Active)]))
            .when_actions(produced)
            .then_state(|state| {
                let updated = &state.tasks_of("1")[0];
                assert_eq!(updated.title, "Local title");
                assert_eq!(updated.status, TaskStatus::Completed);
            })
            .run();
    }

    #[tokio::test]
    async fn test_update_transport_failure() {
        let api = MockTodoApi::new().with_task("1", "a", "A", TaskStatus::Active);
        api.fail_next(
            ApiOperation::UpdateTask,
            ApiError::Transport("connection reset".to_string()),
        );

        ReducerTest::new(reducer())
            .with_env(env_with(api))
            .given_state(state_with("1", vec![task("1", "a", "A", TaskStatus::Active)]))
            .when_action(TaskAction::Update {
                list_id: "1".to_string(),
                task_id: "a".to_string(),
                patch: UpdateTaskRequest::status(TaskStatus::Completed),
            })
            .then_produces(|actions| {
                assert!(matches!(
                    actions,
                    [TaskAction::UpdateFailed { task_id, error: ApiError::Transport(_), .. }]
                        if task_id == "a"
                ));
            })
            .run_async()
            .await;
    }
}
