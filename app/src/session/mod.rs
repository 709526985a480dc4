//! Session feature: authentication state and the initial `me` check.

pub mod reducer;
pub mod store;
pub mod types;

pub use reducer::SessionReducer;
pub use store::SessionStore;
pub use types::{SessionAction, SessionState};
