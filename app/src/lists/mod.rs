//! Lists feature: the cache of the user's todo lists and their filters.

pub mod reducer;
pub mod store;
pub mod types;

pub use reducer::ListReducer;
pub use store::ListStore;
pub use types::{DomainList, Filter, ListAction, ListState, ParseFilterError};
