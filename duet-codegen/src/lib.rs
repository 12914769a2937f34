//! Generation engine for the duet code generator framework.
//!
//! A front end turns one input file into [`UnitModel`]s; this crate turns
//! those into a declaration artifact and a definition artifact per unit (or
//! one aggregated pair) and writes them to disk.
//!
//! # Module Organization
//!
//! - [`naming`] - Deterministic identifier derivation ([`NamingPolicy`])
//! - [`buffers`] - Per-unit content buffers ([`GenerationUnit`], [`ImportSet`])
//! - [`substitution`] - Target-mode rule table for constructs
//! - [`language`] - Target language syntax ([`TargetLanguage`])
//! - [`engine`] - Assembly of units into artifact text ([`Engine`])
//! - [`writer`] - Persisting a [`GenerationResult`] ([`OutputWriter`])
//! - [`driver`] - One run from input file to completion callback ([`Driver`])

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

pub mod buffers;
pub mod builder;
pub mod config;
pub mod driver;
pub mod engine;
mod error;
pub mod language;
pub mod model;
pub mod naming;
pub mod substitution;
pub mod writer;

pub use buffers::{Fragment, GenerationUnit, ImportSet};
pub use builder::{CodeBuilder, Indent};
pub use config::GenerationConfig;
pub use driver::{Driver, RunReport};
pub use engine::{Artifact, ArtifactKind, ArtifactPair, Engine, GenerationResult};
pub use error::{Error, Result};
pub use language::{OBJECTIVE_C, TargetLanguage};
pub use model::{
    FragmentRenderer, InputSource, Member, MemberContext, ModelBuilder, UnitContext, UnitModel,
};
pub use naming::{NamingPolicy, OBJC_NAMING, Rejection};
pub use substitution::{Construct, ConstructKind, SubstitutionTable, TargetMode};
pub use writer::{OutputWriter, WriteOutcome};
