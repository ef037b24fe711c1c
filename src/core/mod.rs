// Core modules: record storage, the connection handle, value tags and errors.
pub mod error;
pub mod handle;
pub mod store;
pub mod value;
