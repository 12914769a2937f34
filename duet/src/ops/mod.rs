//! Core operations.
//!
//! This module contains the business logic for duet commands,
//! separated from CLI argument parsing and output rendering.

pub mod check;
pub mod generate;
pub mod inputs;

pub use check::check;
pub use generate::{generate, preview};
pub use inputs::expand_inputs;
