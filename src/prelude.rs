//! Imports for syntax extensions.

pub use crate::IntoFetchInput as _;
