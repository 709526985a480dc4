//! Tasks feature: per-list task caches.

pub mod reducer;
pub mod store;
pub mod types;

pub use reducer::TaskReducer;
pub use store::TaskStore;
pub use types::{TaskAction, TaskState};
