//! Purpose: Define the public Rust API boundary for recsearch.
//! Exports: Core types and operations needed by the CLI and integration tests.
//! Role: Additive-only surface; internal module paths may move.
//! Invariants: Callers import from here rather than from `core` submodules.

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::config::{Catalog, CollectionKind, DatasetConfig, default_data_dir};
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::handle::Database;
pub use crate::core::store::{JsonStore, Record, RecordStore, Source, matches};
pub use crate::core::value::{FieldValue, ScalarRef, ScalarValue};
