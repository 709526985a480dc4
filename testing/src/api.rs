//! In-memory fake of the todolists server

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use todolists_api::{
    ApiError, LoginRequest, MeResponse, Task, TaskStatus, TodoApi, TodoList, UpdateTaskRequest,
};

/// Date stamped on every entity the fake creates
const ADDED_DATE: &str = "2025-01-01T00:00:00";

/// The API operations, used to target failure and latency injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// `GET /todo-lists`
    FetchLists,
    /// `POST /todo-lists`
    CreateList,
    /// `DELETE /todo-lists/{id}`
    DeleteList,
    /// `PUT /todo-lists/{id}`
    RenameList,
    /// `GET /todo-lists/{id}/tasks`
    FetchTasks,
    /// `POST /todo-lists/{id}/tasks`
    CreateTask,
    /// `DELETE /todo-lists/{id}/tasks/{taskId}`
    DeleteTask,
    /// `PUT /todo-lists/{id}/tasks/{taskId}`
    UpdateTask,
    /// `POST /auth/login`
    Login,
    /// `DELETE /auth/login`
    Logout,
    /// `GET /auth/me`
    Me,
}

/// A recorded call with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)] // Variant fields mirror the TodoApi parameters
pub enum ApiCall {
    FetchLists,
    CreateList { title: String },
    DeleteList { list_id: String },
    RenameList { list_id: String, title: String },
    FetchTasks { list_id: String },
    CreateTask { list_id: String, title: String },
    DeleteTask { list_id: String, task_id: String },
    UpdateTask { list_id: String, task_id: String, patch: UpdateTaskRequest },
    Login { email: String },
    Logout,
    Me,
}

impl ApiCall {
    /// The operation this call invoked
    #[must_use]
    pub const fn operation(&self) -> ApiOperation {
        match self {
            Self::FetchLists => ApiOperation::FetchLists,
            Self::CreateList { .. } => ApiOperation::CreateList,
            Self::DeleteList { .. } => ApiOperation::DeleteList,
            Self::RenameList { .. } => ApiOperation::RenameList,
            Self::FetchTasks { .. } => ApiOperation::FetchTasks,
            Self::CreateTask { .. } => ApiOperation::CreateTask,
            Self::DeleteTask { .. } => ApiOperation::DeleteTask,
            Self::UpdateTask { .. } => ApiOperation::UpdateTask,
            Self::Login { .. } => ApiOperation::Login,
            Self::Logout => ApiOperation::Logout,
            Self::Me => ApiOperation::Me,
        }
    }
}

#[derive(Debug, Default)]
struct ServerState {
    lists: Vec<TodoList>,
    tasks: HashMap<String, Vec<Task>>,
    next_id: u64,
    account: Option<(String, String, MeResponse)>,
    authenticated: bool,
    calls: Vec<ApiCall>,
    failures: HashMap<ApiOperation, VecDeque<ApiError>>,
    delays: HashMap<ApiOperation, VecDeque<Duration>>,
}

impl ServerState {
    /// Next sequential id not already taken by a seeded entity
    fn allocate_id(&mut self) -> String {
        loop {
            self.next_id += 1;
            let id = self.next_id.to_string();
            let taken = self.lists.iter().any(|list| list.id == id)
                || self.tasks.values().flatten().any(|task| task.id == id);
            if !taken {
                return id;
            }
        }
    }
}

/// In-memory todolists server
///
/// Behaves like the real API for the happy path: ids are allocated
/// sequentially, new entities are prepended, updates apply the patch
/// server-side and echo the stored entity. Clones share state, so a test can
/// keep a handle while the stores own another.
///
/// Failures and delays are one-shot and queued per operation:
///
/// ```
/// use todolists_api::ApiError;
/// use todolists_testing::{ApiOperation, MockTodoApi};
///
/// let api = MockTodoApi::new();
/// api.fail_next(ApiOperation::FetchLists, ApiError::Transport("offline".into()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTodoApi {
    state: Arc<Mutex<ServerState>>,
}

impl MockTodoApi {
    /// Create an empty server with no account
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::expect_used)] // A poisoned mock means a test already panicked
    fn lock(&self) -> MutexGuard<'_, ServerState> {
        self.state.lock().expect("mock server state poisoned")
    }

    /// Seed a list with a given id
    #[must_use]
    pub fn with_list(self, id: &str, title: &str) -> Self {
        {
            let mut state = self.lock();
            let order = i64::try_from(state.lists.len()).unwrap_or(i64::MAX);
            state.lists.push(TodoList {
                id: id.to_string(),
                title: title.to_string(),
                order,
                added_date: ADDED_DATE.to_string(),
            });
        }
        self
    }

    /// Seed a task in `list_id` (appended, so seeds keep declaration order)
    #[must_use]
    pub fn with_task(self, list_id: &str, id: &str, title: &str, status: TaskStatus) -> Self {
        self.lock()
            .tasks
            .entry(list_id.to_string())
            .or_default()
            .push(task(list_id, id, title, status));
        self
    }

    /// Register the single account the server accepts
    #[must_use]
    pub fn with_account(self, email: &str, password: &str, login: &str) -> Self {
        {
            let mut state = self.lock();
            state.account = Some((
                email.to_string(),
                password.to_string(),
                MeResponse {
                    id: 1,
                    email: email.to_string(),
                    login: login.to_string(),
                },
            ));
        }
        self
    }

    /// Start with an active session for the registered account
    #[must_use]
    pub fn authenticated(self) -> Self {
        self.lock().authenticated = true;
        self
    }

    /// Make the next call of `operation` fail with `error`
    pub fn fail_next(&self, operation: ApiOperation, error: ApiError) {
        self.lock()
            .failures
            .entry(operation)
            .or_default()
            .push_back(error);
    }

    /// Delay the next call of `operation` by `delay`
    pub fn delay_next(&self, operation: ApiOperation, delay: Duration) {
        self.lock()
            .delays
            .entry(operation)
            .or_default()
            .push_back(delay);
    }

    /// Every call received so far, in arrival order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of calls received for `operation`
    #[must_use]
    pub fn call_count(&self, operation: ApiOperation) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    /// Server-side copy of the lists
    #[must_use]
    pub fn server_lists(&self) -> Vec<TodoList> {
        self.lock().lists.clone()
    }

    /// Server-side copy of one list's tasks
    #[must_use]
    pub fn server_tasks(&self, list_id: &str) -> Vec<Task> {
        self.lock().tasks.get(list_id).cloned().unwrap_or_default()
    }

    /// Record `call`, apply its injected delay, then either fail or run `handler`
    async fn handle<T>(
        &self,
        call: ApiCall,
        handler: impl FnOnce(&mut ServerState) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let operation = call.operation();
        let delay = {
            let mut state = self.lock();
            state.calls.push(call);
            state.delays.get_mut(&operation).and_then(VecDeque::pop_front)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.lock();
        if let Some(error) = state
            .failures
            .get_mut(&operation)
            .and_then(VecDeque::pop_front)
        {
            tracing::debug!(?operation, %error, "Mock API injecting failure");
            return Err(error);
        }

        handler(&mut state)
    }
}

/// Build a task with neutral defaults
#[must_use]
pub fn task(list_id: &str, id: &str, title: &str, status: TaskStatus) -> Task {
    Task {
        id: id.to_string(),
        todo_list_id: list_id.to_string(),
        title: title.to_string(),
        description: None,
        completed: status == TaskStatus::Completed,
        status,
        priority: 0,
        start_date: None,
        deadline: None,
        order: 0,
        added_date: ADDED_DATE.to_string(),
    }
}

fn rejected(message: &str) -> ApiError {
    ApiError::Rejected {
        result_code: 1,
        messages: vec![message.to_string()],
    }
}

impl TodoApi for MockTodoApi {
    async fn fetch_lists(&self) -> Result<Vec<TodoList>, ApiError> {
        self.handle(ApiCall::FetchLists, |state| Ok(state.lists.clone()))
            .await
    }

    async fn create_list(&self, title: &str) -> Result<TodoList, ApiError> {
        let call = ApiCall::CreateList {
            title: title.to_string(),
        };
        self.handle(call, |state| {
            if title.trim().is_empty() {
                return Err(rejected("Title is required"));
            }
            let list = TodoList {
                id: state.allocate_id(),
                title: title.to_string(),
                order: 0,
                added_date: ADDED_DATE.to_string(),
            };
            state.lists.insert(0, list.clone());
            Ok(list)
        })
        .await
    }

    async fn delete_list(&self, list_id: &str) -> Result<(), ApiError> {
        let call = ApiCall::DeleteList {
            list_id: list_id.to_string(),
        };
        self.handle(call, |state| {
            state.lists.retain(|list| list.id != list_id);
            state.tasks.remove(list_id);
            Ok(())
        })
        .await
    }

    async fn rename_list(&self, list_id: &str, title: &str) -> Result<(), ApiError> {
        let call = ApiCall::RenameList {
            list_id: list_id.to_string(),
            title: title.to_string(),
        };
        self.handle(call, |state| {
            if let Some(list) = state.lists.iter_mut().find(|list| list.id == list_id) {
                list.title = title.to_string();
            }
            Ok(())
        })
        .await
    }

    async fn fetch_tasks(&self, list_id: &str) -> Result<Vec<Task>, ApiError> {
        let call = ApiCall::FetchTasks {
            list_id: list_id.to_string(),
        };
        self.handle(call, |state| {
            Ok(state.tasks.get(list_id).cloned().unwrap_or_default())
        })
        .await
    }

    async fn create_task(&self, list_id: &str, title: &str) -> Result<Task, ApiError> {
        let call = ApiCall::CreateTask {
            list_id: list_id.to_string(),
            title: title.to_string(),
        };
        self.handle(call, |state| {
            if title.trim().is_empty() {
                return Err(rejected("Title is required"));
            }
            let created = task(list_id, &state.allocate_id(), title, TaskStatus::Active);
            state
                .tasks
                .entry(list_id.to_string())
                .or_default()
                .insert(0, created.clone());
            Ok(created)
        })
        .await
    }

    async fn delete_task(&self, list_id: &str, task_id: &str) -> Result<(), ApiError> {
        let call = ApiCall::DeleteTask {
            list_id: list_id.to_string(),
            task_id: task_id.to_string(),
        };
        self.handle(call, |state| {
            if let Some(tasks) = state.tasks.get_mut(list_id) {
                tasks.retain(|task| task.id != task_id);
            }
            Ok(())
        })
        .await
    }

    async fn update_task(
        &self,
        list_id: &str,
        task_id: &str,
        patch: &UpdateTaskRequest,
    ) -> Result<(), ApiError> {
        let call = ApiCall::UpdateTask {
            list_id: list_id.to_string(),
            task_id: task_id.to_string(),
            patch: patch.clone(),
        };
        self.handle(call, |state| {
            if let Some(stored) = state
                .tasks
                .get_mut(list_id)
                .and_then(|tasks| tasks.iter_mut().find(|task| task.id == task_id))
            {
                *stored = patch.apply_to(stored);
            }
            Ok(())
        })
        .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<u64, ApiError> {
        let call = ApiCall::Login {
            email: request.email.clone(),
        };
        self.handle(call, |state| match &state.account {
            Some((email, password, profile))
                if *email == request.email && *password == request.password =>
            {
                let user_id = profile.id;
                state.authenticated = true;
                Ok(user_id)
            },
            _ => Err(rejected("Incorrect Email or Password")),
        })
        .await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        self.handle(ApiCall::Logout, |state| {
            state.authenticated = false;
            Ok(())
        })
        .await
    }

    async fn me(&self) -> Result<MeResponse, ApiError> {
        self.handle(ApiCall::Me, |state| match (&state.account, state.authenticated) {
            (Some((_, _, profile)), true) => Ok(profile.clone()),
            _ => Err(rejected("You are not authorized")),
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_prepends_and_allocates_ids() {
        let api = MockTodoApi::new().with_list("1", "Seed");

        let first = api.create_list("A").await.unwrap();
        let second = api.create_list("B").await.unwrap();

        assert_eq!(first.id, "2");
        assert_eq!(second.id, "3");
        let titles: Vec<_> = api.server_lists().into_iter().map(|l| l.title).collect();
        assert_eq!(titles, vec!["B", "A", "Seed"]);
    }

    #[tokio::test]
    async fn test_failure_injection_is_one_shot() {
        let api = MockTodoApi::new();
        api.fail_next(ApiOperation::FetchLists, ApiError::Transport("offline".into()));

        assert!(api.fetch_lists().await.is_err());
        assert!(api.fetch_lists().await.is_ok());
        assert_eq!(api.call_count(ApiOperation::FetchLists), 2);
    }

    #[tokio::test]
    async fn test_update_applies_patch_server_side() {
        let api = MockTodoApi::new().with_task("1", "9", "X", TaskStatus::Active);

        api.update_task("1", "9", &UpdateTaskRequest::status(TaskStatus::Completed))
            .await
            .unwrap();

        assert_eq!(api.server_tasks("1")[0].status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_session_flow() {
        let api = MockTodoApi::new().with_account("a@b.c", "pw", "alice");
        assert!(api.me().await.is_err());

        let bad = LoginRequest {
            email: "a@b.c".to_string(),
            password: "wrong".to_string(),
            remember_me: false,
            captcha: None,
        };
        assert_eq!(
            api.login(&bad).await.unwrap_err().user_message(),
            "Incorrect Email or Password"
        );

        let good = LoginRequest {
            password: "pw".to_string(),
            ..bad
        };
        assert_eq!(api.login(&good).await.unwrap(), 1);
        assert_eq!(api.me().await.unwrap().login, "alice");

        api.logout().await.unwrap();
        assert!(api.me().await.is_err());
    }
}
