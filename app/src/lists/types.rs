//! Domain types for the list store.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use todolists_api::{ApiError, TaskStatus, TodoList};
use todolists_macros::Action;

/// Which tasks of a list are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks still to do
    Active,
    /// Tasks done
    Completed,
}

impl Filter {
    /// Whether a task with `status` is shown under this filter
    ///
    /// Reserved statuses only show under [`Filter::All`].
    #[must_use]
    pub fn matches(self, status: TaskStatus) -> bool {
        match self {
            Self::All => true,
            Self::Active => status == TaskStatus::Active,
            Self::Completed => status == TaskStatus::Completed,
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Text that names no [`Filter`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown filter '{0}'")]
pub struct ParseFilterError(String);

impl std::str::FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(ParseFilterError(other.to_string())),
        }
    }
}

/// A list as held in the local cache
///
/// The server fields plus the display filter, which never leaves the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainList {
    /// Server-assigned identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Server ordering key
    pub order: i64,
    /// Creation date as sent by the server
    pub added_date: String,
    /// Display filter
    pub filter: Filter,
}

impl From<TodoList> for DomainList {
    fn from(list: TodoList) -> Self {
        Self {
            id: list.id,
            title: list.title,
            order: list.order,
            added_date: list.added_date,
            filter: Filter::All,
        }
    }
}

/// State of the list store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListState {
    /// Cached lists: server order, newly created lists first
    pub lists: Vec<DomainList>,
    /// Request number of the fetch currently reflected in `lists`
    pub last_applied_fetch: u64,
}

impl ListState {
    /// Creates an empty cache
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lists: Vec::new(),
            last_applied_fetch: 0,
        }
    }

    /// Finds a cached list
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&DomainList> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Filter of a list, [`Filter::All`] when the list is not cached
    #[must_use]
    pub fn filter_of(&self, id: &str) -> Filter {
        self.get(id).map_or(Filter::All, |list| list.filter)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut DomainList> {
        self.lists.iter_mut().find(|list| list.id == id)
    }

    /// Replaces the title of a cached list
    pub(crate) fn rename(&mut self, id: &str, title: String) {
        if let Some(list) = self.get_mut(id) {
            list.title = title;
        }
    }

    /// Replaces the filter of a cached list
    pub(crate) fn set_filter(&mut self, id: &str, filter: Filter) {
        if let Some(list) = self.get_mut(id) {
            list.filter = filter;
        }
    }

    /// Prepends a list, dropping any stale entry with the same id
    pub(crate) fn prepend(&mut self, list: DomainList) {
        self.lists.retain(|existing| existing.id != list.id);
        self.lists.insert(0, list);
    }
}

/// Actions for the list store
#[derive(Action, Clone, Debug, PartialEq)]
pub enum ListAction {
    // Fetch
    /// Fetch every list
    Fetch,

    /// Lists fetched
    Fetched {
        /// Request number of the fetch
        request: u64,
        /// Lists in server order
        lists: Vec<TodoList>,
    },

    /// Fetch failed
    FetchFailed {
        /// Request number of the fetch
        request: u64,
        /// Cause
        error: ApiError,
    },

    // Create
    /// Create a list
    Create {
        /// Title of the new list
        title: String,
    },

    /// List created
    Created {
        /// The list as stored by the server
        list: TodoList,
    },

    /// Create failed
    CreateFailed {
        /// Requested title
        title: String,
        /// Cause
        error: ApiError,
    },

    // Delete
    /// Delete a list
    Delete {
        /// List to delete
        id: String,
    },

    /// List deleted
    Deleted {
        /// Deleted list
        id: String,
    },

    /// Delete failed
    DeleteFailed {
        /// List that was not deleted
        id: String,
        /// Cause
        error: ApiError,
    },

    // Rename
    /// Rename a list
    Rename {
        /// List to rename
        id: String,
        /// New title
        title: String,
    },

    /// List renamed
    Renamed {
        /// Renamed list
        id: String,
        /// New title
        title: String,
    },

    /// Rename failed
    RenameFailed {
        /// List that was not renamed
        id: String,
        /// Cause
        error: ApiError,
    },

    // Local only
    /// Change the display filter of a list, without a request
    SetFilter {
        /// List to change
        id: String,
        /// New filter
        filter: Filter,
    },
}
