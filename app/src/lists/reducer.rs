//! Reducer logic for the list store.
//!
//! Intents start exactly one request; outcomes patch the cache. A failure
//! outcome never touches state, so the previous snapshot stays published.

use super::types::{DomainList, ListAction, ListState};
use crate::effects::Request;
use crate::environment::{AppEnvironment, Notifier};
use std::marker::PhantomData;
use std::sync::Arc;
use todolists_api::TodoApi;
use todolists_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Tag carried by every log line of the list store
pub const FEATURE: &str = "lists";

/// Reducer for the list store
pub struct ListReducer<A, N> {
    _environment: PhantomData<fn() -> (A, N)>,
}

impl<A, N> ListReducer<A, N> {
    /// Creates a new `ListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _environment: PhantomData,
        }
    }
}

impl<A, N> Default for ListReducer<A, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, N> Clone for ListReducer<A, N> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<A, N> std::fmt::Debug for ListReducer<A, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ListReducer")
    }
}

impl<A, N> Reducer for ListReducer<A, N>
where
    A: TodoApi + 'static,
    N: Notifier + 'static,
{
    type State = ListState;
    type Action = ListAction;
    type Environment = AppEnvironment<A, N>;

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
            ListAction::Fetch => {
                let request = env.next_request();
                let span = tracing::info_span!("request", feature = FEATURE, operation = "fetch", request);

                smallvec![Request::new(span, notifier).run(
                    async move { api.fetch_lists().await },
                    move |lists| ListAction::Fetched { request, lists },
                    move |error| ListAction::FetchFailed { request, error },
                )]
            },

            ListAction::Create { title } => {
                let span = tracing::info_span!("request", feature = FEATURE, operation = "create", %title);
                let requested = title.clone();

                smallvec![Request::new(span, notifier).run(
                    async move { api.create_list(&requested).await },
                    |list| ListAction::Created { list },
                    move |error| ListAction::CreateFailed { title, error },
                )]
            },

            ListAction::Delete { id } => {
                let span = tracing::info_span!("request", feature = FEATURE, operation = "delete", %id);
                let target = id.clone();
                let failed = id.clone();

                smallvec![Request::new(span, notifier).run(
                    async move { api.delete_list(&target).await },
                    move |()| ListAction::Deleted { id },
                    move |error| ListAction::DeleteFailed { id: failed, error },
                )]
            },

            ListAction::Rename { id, title } => {
                let span = tracing::info_span!(
                    "request",
                    feature = FEATURE,
                    operation = "rename",
                    %id,
                    %title
                );
                let (target, new_title) = (id.clone(), title.clone());
                let failed = id.clone();

                smallvec![Request::new(span, notifier).run(
                    async move { api.rename_list(&target, &new_title).await },
                    move |()| ListAction::Renamed { id, title },
                    move |error| ListAction::RenameFailed { id: failed, error },
                )]
            },

            // ========== Outcomes ==========
            ListAction::Fetched { request, lists } => {
                if request < state.last_applied_fetch {
                    tracing::warn!(
                        feature = FEATURE,
                        request,
                        applied = state.last_applied_fetch,
                        "Discarding stale lists response"
                    );
                    return SmallVec::new();
                }

                state.lists = lists.into_iter().map(DomainList::from).collect();
                state.last_applied_fetch = request;
                tracing::info!(feature = FEATURE, count = state.lists.len(), "Lists data updated");
                SmallVec::new()
            },

            ListAction::Created { list } => {
                tracing::info!(feature = FEATURE, id = %list.id, "List added");
                state.prepend(DomainList::from(list));
                SmallVec::new()
            },

            ListAction::Deleted { id } => {
                state.lists.retain(|list| list.id != id);
                tracing::info!(feature = FEATURE, %id, "List deleted");
                SmallVec::new()
            },

            ListAction::Renamed { id, title } => {
                state.rename(&id, title);
                tracing::info!(feature = FEATURE, %id, "List title updated");
                SmallVec::new()
            },

            // Already logged and notified by the request effect
            ListAction::FetchFailed { .. }
            | ListAction::CreateFailed { .. }
            | ListAction::DeleteFailed { .. }
            | ListAction::RenameFailed { .. } => SmallVec::new(),

            // ========== Local ==========
            ListAction::SetFilter { id, filter } => {
                state.set_filter(&id, filter);
                tracing::info!(feature = FEATURE, %id, %filter, "Filter changed");
                SmallVec::new()
            },
        }
    }
}
