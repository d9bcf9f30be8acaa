//! Contract traits and shared records for the stylesheet transform engine.
//!
//! This crate defines the seams between the transform-engine core and its
//! external collaborators: the stylesheet compiler, the compiled transform
//! it produces, URI resolution for includes/imports, and the callable
//! extension objects a stylesheet may invoke.

pub mod bindings;
pub mod compiler;
pub mod error;

pub use bindings::{Arguments, ExtensionBinding, ExtensionObject, Param, ParamValue};
pub use compiler::{CompiledTransform, OutputMethod, OutputSettings, StylesheetCompiler, UriResolver};
pub use error::{Error, Result};
