//! Compiled-engine factory

use std::io::{Cursor, Read};
use std::sync::Arc;

use tracing::debug;

use xform_engine_traits::compiler::{StylesheetCompiler, UriResolver};
use xform_engine_traits::error::Result;

use crate::engine::TransformEngine;
use crate::preprocess::{self, StylesheetPreprocessor};
use crate::stylesheet::Stylesheet;

/// Factory turning raw stylesheets into ready-to-run [`TransformEngine`]s.
///
/// Holds the external compiler and the ordered preprocessor chain, both
/// shared and immutable, so concurrent
/// [`create_engine`](TransformEngineFactory::create_engine) calls are
/// fully independent.
pub struct TransformEngineFactory {
    compiler: Arc<dyn StylesheetCompiler>,
    preprocessors: Vec<Arc<dyn StylesheetPreprocessor>>,
}

impl TransformEngineFactory {
    pub fn new(
        compiler: Arc<dyn StylesheetCompiler>,
        preprocessors: Vec<Arc<dyn StylesheetPreprocessor>>,
    ) -> Self {
        Self {
            compiler,
            preprocessors,
        }
    }

    /// Compile a stylesheet read from `xslt` into a reusable engine.
    ///
    /// Runs the preprocessing pipeline over a working copy, serializes the
    /// cleaned document, hands it to the compiler as a readable stream
    /// (the compiler consumes a stream, not a live tree), and wraps the
    /// compiled transform together with the captured bindings. Exactly one
    /// of an initialized engine or a propagated error comes back; there is
    /// no partial success and nothing is retried.
    pub async fn create_engine(
        &self,
        xslt: &mut (dyn Read + Send),
        enable_debug: bool,
        resolver: Option<&dyn UriResolver>,
    ) -> Result<TransformEngine> {
        let stylesheet = Stylesheet::from_reader(xslt)?;
        self.create_engine_from_doc(stylesheet, enable_debug, resolver)
            .await
    }

    /// Convenience wrapper compiling directly from a string source
    pub async fn create_engine_from_str(
        &self,
        xslt: &str,
        enable_debug: bool,
        resolver: Option<&dyn UriResolver>,
    ) -> Result<TransformEngine> {
        let stylesheet = Stylesheet::parse(xslt)?;
        self.create_engine_from_doc(stylesheet, enable_debug, resolver)
            .await
    }

    async fn create_engine_from_doc(
        &self,
        stylesheet: Stylesheet,
        enable_debug: bool,
        resolver: Option<&dyn UriResolver>,
    ) -> Result<TransformEngine> {
        let result = preprocess::process(&stylesheet, &self.preprocessors).await?;

        let serialized = result.stylesheet.to_xml()?;
        debug!(
            bytes = serialized.len(),
            enable_debug, "compiling preprocessed stylesheet"
        );
        let mut reader = Cursor::new(serialized.into_bytes());
        let compiled = self.compiler.compile(&mut reader, enable_debug, resolver)?;

        let engine = TransformEngine::new();
        engine.init(compiled, result.params, result.extensions)?;
        Ok(engine)
    }
}
