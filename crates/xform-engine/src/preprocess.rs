//! Preprocessor contract and the preprocessing pipeline

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace};

use xform_engine_traits::bindings::{ExtensionBinding, ExtensionObject, Param, ParamValue};
use xform_engine_traits::error::Result;

use crate::stylesheet::{Node, Stylesheet};

/// The accumulator a preprocessor registers its effects into.
///
/// This is the only mutation surface a preprocessor is offered: the
/// stylesheet itself is handed out behind a shared reference, so
/// structural changes can only be declared here and are applied by the
/// pipeline after every preprocessor has finished. All three collections
/// preserve registration order.
#[derive(Default)]
pub struct Registrations {
    params: Vec<Param>,
    extensions: Vec<ExtensionBinding>,
    deletions: Vec<Node>,
}

impl Registrations {
    /// Register a parameter to inject into every transform run
    pub fn register_param<N, M, V>(&mut self, namespace: N, name: M, value: V)
    where
        N: Into<String>,
        M: Into<String>,
        V: Into<ParamValue>,
    {
        self.params.push(Param::new(namespace, name, value));
    }

    /// Register an extension object to expose under a namespace
    pub fn register_extension<N: Into<String>>(
        &mut self,
        namespace: N,
        object: Arc<dyn ExtensionObject>,
    ) {
        self.extensions
            .push(ExtensionBinding::new(namespace, object));
    }

    /// Request deletion of a node from the working copy.
    ///
    /// The node must belong to the working copy the preprocessor was
    /// given. Deletions are applied after all preprocessors complete;
    /// requesting a node whose ancestor is also requested is harmless.
    pub fn request_delete(&mut self, node: Node) {
        self.deletions.push(node);
    }
}

/// A pluggable stylesheet rewriter, invoked once per compilation.
///
/// Implementations inspect the working copy and declare their effects
/// through [`Registrations`]. The visit is asynchronous so preprocessors
/// may perform I/O (compile embedded code, fetch remote includes) before
/// returning. Preprocessors run strictly in list order; a later
/// preprocessor observes the same tree shape as an earlier one, never its
/// pending deletions.
#[async_trait]
pub trait StylesheetPreprocessor: Send + Sync {
    async fn visit(
        &self,
        stylesheet: &Stylesheet,
        registrations: &mut Registrations,
    ) -> Result<()>;
}

/// The output of the preprocessing pipeline.
///
/// Owns the cleaned working copy; the binding collections are ordered by
/// registration and read-only from here on.
#[derive(Debug)]
pub struct PreprocessingResult {
    pub stylesheet: Stylesheet,
    pub params: Vec<Param>,
    pub extensions: Vec<ExtensionBinding>,
}

/// Run the ordered preprocessor chain over a working copy of `stylesheet`.
///
/// The caller's document is deep-copied up front and never observed
/// again, so it is guaranteed to come out structurally unchanged. Each
/// preprocessor is awaited before the next is invoked; registration side
/// effects are the only channel between them. Deletions are applied after
/// the chain completes, in registration order, skipping nodes that are
/// already detached (e.g. because an ancestor was removed first).
///
/// If any preprocessor fails the pipeline aborts immediately: no
/// deletions are applied, no partial result is returned, and the error
/// propagates unchanged.
pub async fn process(
    stylesheet: &Stylesheet,
    preprocessors: &[Arc<dyn StylesheetPreprocessor>],
) -> Result<PreprocessingResult> {
    let mut working = stylesheet.deep_copy()?;
    let mut registrations = Registrations::default();

    debug!(preprocessors = preprocessors.len(), "running preprocessing pipeline");
    for (index, preprocessor) in preprocessors.iter().enumerate() {
        trace!(index, "visiting preprocessor");
        preprocessor.visit(&working, &mut registrations).await?;
    }

    // No destructive mutation happened during the visits, so an aborted
    // pipeline never needs rollback. Only now are deletions committed.
    let Registrations {
        params,
        extensions,
        deletions,
    } = registrations;

    debug!(
        params = params.len(),
        extensions = extensions.len(),
        deletions = deletions.len(),
        "applying registered effects"
    );
    for node in deletions {
        working.remove_if_attached(node)?;
    }

    Ok(PreprocessingResult {
        stylesheet: working,
        params,
        extensions,
    })
}
