//! Compiler and execution seams for the external XSLT engine

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::bindings::Arguments;
use crate::error::Result;

/// Output method declared by a compiled transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMethod {
    Xml,
    Html,
    Text,
}

/// Output-format settings declared by a compiled transform.
///
/// These are a pass-through read of whatever the external compiler
/// derived from the stylesheet's output declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    pub method: OutputMethod,
    pub encoding: String,
    pub indent: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            method: OutputMethod::Xml,
            encoding: "utf-8".to_string(),
            indent: false,
        }
    }
}

/// Resolver for URIs referenced by a stylesheet (includes, imports).
///
/// Handed through to the compiler unchanged; the core never resolves
/// anything itself.
pub trait UriResolver: Send + Sync {
    /// Fetch the bytes behind a URI
    fn resolve(&self, uri: &str) -> Result<Vec<u8>>;
}

/// Trait for external stylesheet compilers.
///
/// The compiler consumes the serialized stylesheet as a readable stream
/// and produces an opaque, runnable transform. Malformed stylesheets fail
/// with [`crate::Error::Compilation`]; compilation is never retried.
pub trait StylesheetCompiler: Send + Sync {
    fn compile(
        &self,
        xslt: &mut dyn Read,
        enable_debug: bool,
        resolver: Option<&dyn UriResolver>,
    ) -> Result<Box<dyn CompiledTransform>>;
}

/// An opaque, externally-produced runnable transformation.
///
/// Immutable once produced. Implementations must be safe to `run`
/// concurrently provided each call gets its own input/output streams and
/// argument list; the core performs no locking around them.
pub trait CompiledTransform: Send + Sync {
    /// Execute the transform against an input stream, writing to the
    /// output stream. All transformation semantics (template matching,
    /// output serialization, duplicate-argument handling) live here.
    fn run(
        &self,
        input: &mut dyn Read,
        arguments: &Arguments,
        output: &mut dyn Write,
    ) -> Result<()>;

    /// The output-format settings this transform declares
    fn output_settings(&self) -> &OutputSettings;
}
