//! Signing and fan-out publishing.

pub(crate) mod publisher;
pub(crate) mod signer;

pub use publisher::{PublishTarget, Publisher};
pub use signer::{GatedSigner, Signer};
