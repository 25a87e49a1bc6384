//! Shared call registry for boundary-call stub generation.
//!
//! Both sides of the boundary link against one [`CallRegistry`]: the
//! canonical enumeration of call identifiers and their fixed signatures.
//! The registry is built once, checked for consistency, and read-only for
//! the lifetime of every generation pass.

mod registry;

pub use registry::{CallRegistry, CallRegistryBuilder};
