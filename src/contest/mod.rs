//! Contest tree access and collaborators
//!
//! Entry enumeration plus the metadata parser and package oracle the
//! validator delegates to.

pub mod metadata;
pub mod packages;
pub mod provider;
