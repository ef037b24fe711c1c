//! Purpose: Library crate backing the `recsearch` CLI and its tests.
//! Exports: `api` (stable surface), `core` (store, handle, values, errors), `config`, `json`.
//! Role: Everything that is not terminal presentation lives here.
//! Invariants: The core holds no global state; sources and paths are passed in explicitly.
pub mod api;
pub mod config;
pub mod core;
pub mod json;
