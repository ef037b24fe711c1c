//! Purpose: Internal JSON parsing boundary shared by dataset loading and tests.
//! Exports: `parse` module with decode helpers and failure categorization.
//! Invariants: Dataset decoding goes through this module.

pub mod parse;
