//! Logged-in account tracking and its persistence.

pub(crate) mod account;
pub(crate) mod session_store;

pub use account::AccountSession;
pub use session_store::{JsonFileSessionStore, MemorySessionStore, SessionStore};
