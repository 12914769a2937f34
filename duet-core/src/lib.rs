//! Core utilities for the duet code generator framework.
//!
//! This crate provides the file emission primitives and string helpers
//! shared by the engine and the front ends.

mod file;
mod utils;

// File operations
pub use file::{File, FileRules, Overwrite, WriteResult};
// String utilities
pub use utils::{
    is_identifier, lower_first, split_words, to_camel_case, to_pascal_case, upper_first,
};
