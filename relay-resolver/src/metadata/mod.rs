//! Profile metadata resolution.
//!
//! Lookups are coalesced per tick by [`MetadataLoader`]; each batch keeps its
//! callers in an open state until dispatch, then tracks relays still
//! streaming until all of them signalled end of stored events.

pub(crate) mod batch_state;
pub(crate) mod metadata_loader;
pub(crate) mod profile;

pub use metadata_loader::MetadataLoader;
pub use profile::ProfileMetadata;
