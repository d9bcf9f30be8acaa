//! Reusable, thread-safe transform execution handle

use std::fmt;
use std::io::{Read, Write};
use std::sync::OnceLock;

use xform_engine_traits::bindings::{Arguments, ExtensionBinding, Param};
use xform_engine_traits::compiler::{CompiledTransform, OutputSettings};
use xform_engine_traits::error::{Error, Result};

struct EngineState {
    compiled: Box<dyn CompiledTransform>,
    params: Vec<Param>,
    extensions: Vec<ExtensionBinding>,
}

/// A reusable handle over one compiled transform.
///
/// Initialized exactly once with the compiled transform and the bindings
/// captured during preprocessing; immutable afterwards, so arbitrarily
/// many concurrent [`transform`](TransformEngine::transform) calls on the
/// same handle are safe, provided each call supplies its own input/output
/// streams and argument list. Obtain one through
/// [`TransformEngineFactory::create_engine`](crate::TransformEngineFactory::create_engine).
#[derive(Default)]
pub struct TransformEngine {
    state: OnceLock<EngineState>,
}

impl fmt::Debug for TransformEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformEngine")
            .field("initialized", &self.state.get().is_some())
            .finish_non_exhaustive()
    }
}

impl TransformEngine {
    /// Create an uninitialized handle
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot initialization with a compiled transform and the captured
    /// bindings. Fails with [`Error::Initialization`] if the handle was
    /// already initialized.
    pub fn init(
        &self,
        compiled: Box<dyn CompiledTransform>,
        params: Vec<Param>,
        extensions: Vec<ExtensionBinding>,
    ) -> Result<()> {
        let state = EngineState {
            compiled,
            params,
            extensions,
        };
        self.state
            .set(state)
            .map_err(|_| Error::initialization("engine already initialized"))
    }

    fn state(&self) -> Result<&EngineState> {
        self.state
            .get()
            .ok_or_else(|| Error::not_initialized("transform engine"))
    }

    /// Output-format settings declared by the compiled transform.
    ///
    /// Fails with [`Error::NotInitialized`] before initialization.
    pub fn output_settings(&self) -> Result<&OutputSettings> {
        Ok(self.state()?.compiled.output_settings())
    }

    /// Execute the transform.
    ///
    /// Starts from the caller's argument list (or an empty one), appends
    /// every captured parameter and then every captured extension object
    /// in capture order, and delegates to the compiled transform. Nothing
    /// is deduplicated; collisions with caller-supplied arguments are
    /// handled by the execution engine itself.
    pub fn transform(
        &self,
        input: &mut dyn Read,
        arguments: Option<&Arguments>,
        output: &mut dyn Write,
    ) -> Result<()> {
        let state = self.state()?;

        let mut merged = arguments.cloned().unwrap_or_default();
        for param in &state.params {
            merged.add_param(
                param.namespace.clone(),
                param.name.clone(),
                param.value.clone(),
            );
        }
        for extension in &state.extensions {
            merged.add_extension_object(extension.namespace.clone(), extension.object.clone());
        }

        state.compiled.run(input, &merged, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct Discard(OutputSettings);

    impl CompiledTransform for Discard {
        fn run(
            &self,
            _input: &mut dyn Read,
            _arguments: &Arguments,
            _output: &mut dyn Write,
        ) -> Result<()> {
            Ok(())
        }

        fn output_settings(&self) -> &OutputSettings {
            &self.0
        }
    }

    #[test]
    fn uninitialized_handle_rejects_operations() {
        let engine = TransformEngine::new();
        assert!(matches!(
            engine.output_settings().unwrap_err(),
            Error::NotInitialized(_)
        ));

        let mut output = Vec::new();
        let err = engine
            .transform(&mut Cursor::new(b"<x/>".to_vec()), None, &mut output)
            .unwrap_err();
        assert!(matches!(err, Error::NotInitialized(_)));
    }

    #[test]
    fn second_init_is_rejected() {
        let engine = TransformEngine::new();
        engine
            .init(Box::new(Discard(OutputSettings::default())), vec![], vec![])
            .unwrap();
        let err = engine
            .init(Box::new(Discard(OutputSettings::default())), vec![], vec![])
            .unwrap_err();
        assert!(matches!(err, Error::Initialization(_)));
    }

    #[test]
    fn output_settings_pass_through() {
        let declared = OutputSettings {
            encoding: "iso-8859-1".to_string(),
            indent: true,
            ..OutputSettings::default()
        };
        let engine = TransformEngine::new();
        engine
            .init(Box::new(Discard(declared.clone())), vec![], vec![])
            .unwrap();
        assert_eq!(engine.output_settings().unwrap(), &declared);
    }
}
