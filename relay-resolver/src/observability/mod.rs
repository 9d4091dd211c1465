//! Structured logging vocabulary shared by the resolver components.

pub mod events;
pub mod fields;
