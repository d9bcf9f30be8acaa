//! Stylesheet preprocessing pipeline and transform-engine lifecycle.
//!
//! The flow: a raw stylesheet is deep-copied, an ordered chain of
//! preprocessors observes the copy and registers parameters, extension
//! objects and deletion requests through an accumulator, the collected
//! deletions are applied, the cleaned document is serialized and handed
//! to the external compiler, and the result is wrapped into a reusable,
//! thread-safe [`TransformEngine`] that injects the collected bindings
//! into every run.

pub mod engine;
pub mod factory;
pub mod preprocess;
pub mod stylesheet;

pub use engine::TransformEngine;
pub use factory::TransformEngineFactory;
pub use preprocess::{PreprocessingResult, Registrations, StylesheetPreprocessor};
pub use stylesheet::{NodeKind, Stylesheet};

// Re-export the contract crate so callers need a single dependency.
pub use xform_engine_traits as traits;
pub use xform_engine_traits::{Arguments, Error, Result};
