//! TOML unit manifests for the duet code generator.
//!
//! A manifest lists units and their members:
//!
//! ```toml
//! include = ["shared/palette.toml"]
//!
//! [units.widget]
//! imports = ["<QuartzCore/QuartzCore.h>"]
//!
//! [units.widget.identifiers]
//! "cell identifier" = "WidgetCell"
//!
//! [units.widget.colors]
//! "primary tint" = "#FF8800"
//! ```
//!
//! [`ManifestFrontend`] plugs this format into [`duet_codegen::Driver`];
//! [`substitutions`] supplies the rules for the constructs it emits.

mod color;
mod frontend;
mod include;
mod manifest;
mod objc;
mod source;

pub use color::{Color, ParseColorError};
pub use frontend::ManifestFrontend;
pub use manifest::{Entry, Manifest, UnitSpec};
pub use objc::{
    ALL_COLORS_DECLARATION, ALL_COLORS_DEFINITION, COLOR_ACCESSOR, ObjcRenderer, substitutions,
};
pub use source::SourceContext;

/// File extension of unit manifests.
pub const INPUT_EXTENSION: &str = "toml";
