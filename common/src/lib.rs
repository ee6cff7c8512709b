//! Shared vocabulary of the `oucount` workspace.
//!
//! Everything that more than one crate needs to agree on lives here: the
//! immutable run [`config`], the directory models and the [`directory::DirectoryClient`]
//! port, the aggregation records and the error taxonomy.

pub mod aggregation;
pub mod config;
pub mod directory;
pub mod error;
pub mod log;

#[doc(hidden)]
pub use tracing as __tracing;
