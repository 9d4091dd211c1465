//! Relay list resolution.
//!
//! Unlike profile metadata, relay lists are fetched one key at a time and
//! cached for the lifetime of the process.

pub(crate) mod classification;
pub(crate) mod relay_list_cache;

pub use classification::RelayList;
pub use relay_list_cache::RelayListCache;
