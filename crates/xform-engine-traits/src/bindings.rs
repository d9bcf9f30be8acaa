//! Parameter and extension-object bindings injected into transform runs

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A typed parameter value passed into a transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    String(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
}

impl ParamValue {
    pub fn as_string(&self) -> String {
        match self {
            ParamValue::String(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Double(d) => d.to_string(),
            ParamValue::Boolean(b) => b.to_string(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::String(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::String(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Boolean(value)
    }
}

/// A named value injected into every run of a compiled transform.
///
/// The namespace may be empty; the name may not. Duplicate
/// (namespace, name) pairs are legal — nothing here deduplicates,
/// duplicate handling is the execution engine's own behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub namespace: String,
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    pub fn new<N, M, V>(namespace: N, name: M, value: V) -> Self
    where
        N: Into<String>,
        M: Into<String>,
        V: Into<ParamValue>,
    {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A callable surface exposed to the stylesheet under a namespace.
///
/// This is the type-erased seam for extension objects: the execution
/// engine dispatches stylesheet calls to `invoke` by method name. A bound
/// object is shared across every call site within a run, and across runs
/// on the same engine handle, so implementations holding state must be
/// internally synchronized.
pub trait ExtensionObject: Send + Sync {
    /// Invoke a named operation with the given arguments
    fn invoke(&self, method: &str, args: &[ParamValue]) -> Result<ParamValue>;
}

/// An extension object bound under a non-empty namespace
#[derive(Clone)]
pub struct ExtensionBinding {
    pub namespace: String,
    pub object: Arc<dyn ExtensionObject>,
}

impl ExtensionBinding {
    pub fn new<N: Into<String>>(namespace: N, object: Arc<dyn ExtensionObject>) -> Self {
        Self {
            namespace: namespace.into(),
            object,
        }
    }
}

impl fmt::Debug for ExtensionBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionBinding")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// The per-call argument list handed to a compiled transform.
///
/// Both collections are ordered and append-only; a name/namespace
/// collision with something already present is passed through to the
/// execution engine, whose own duplicate handling applies.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    params: Vec<Param>,
    extensions: Vec<ExtensionBinding>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn add_param<N, M, V>(&mut self, namespace: N, name: M, value: V)
    where
        N: Into<String>,
        M: Into<String>,
        V: Into<ParamValue>,
    {
        self.params.push(Param::new(namespace, name, value));
    }

    /// Append an extension object bound under a namespace
    pub fn add_extension_object<N: Into<String>>(
        &mut self,
        namespace: N,
        object: Arc<dyn ExtensionObject>,
    ) {
        self.extensions.push(ExtensionBinding::new(namespace, object));
    }

    pub fn params(&self) -> &[Param] {
        &self.params
    }

    pub fn extensions(&self) -> &[ExtensionBinding] {
        &self.extensions
    }

    /// Look up the first parameter matching the namespace and name
    pub fn param(&self, namespace: &str, name: &str) -> Option<&Param> {
        self.params
            .iter()
            .find(|p| p.namespace == namespace && p.name == name)
    }

    /// Look up the first extension object bound under the namespace
    pub fn extension_object(&self, namespace: &str) -> Option<&Arc<dyn ExtensionObject>> {
        self.extensions
            .iter()
            .find(|e| e.namespace == namespace)
            .map(|e| &e.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Upper;

    impl ExtensionObject for Upper {
        fn invoke(&self, method: &str, args: &[ParamValue]) -> Result<ParamValue> {
            match method {
                "to-upper" => Ok(ParamValue::String(
                    args.first().map(|a| a.as_string().to_uppercase()).unwrap_or_default(),
                )),
                other => Err(Error::extension(format!("unknown method: {other}"))),
            }
        }
    }

    #[test]
    fn arguments_preserve_insertion_order() {
        let mut args = Arguments::new();
        args.add_param("", "first", "1");
        args.add_param("urn:a", "second", 2i64);
        args.add_param("", "first", "shadow");

        let names: Vec<&str> = args.params().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "first"]);
        // first match wins on lookup; the duplicate is still carried
        assert_eq!(
            args.param("", "first").unwrap().value,
            ParamValue::String("1".to_string())
        );
    }

    #[test]
    fn extension_object_dispatch() {
        let mut args = Arguments::new();
        args.add_extension_object("ext", std::sync::Arc::new(Upper));

        let obj = args.extension_object("ext").unwrap();
        let result = obj
            .invoke("to-upper", &[ParamValue::String("hi".into())])
            .unwrap();
        assert_eq!(result, ParamValue::String("HI".to_string()));
        assert!(obj.invoke("missing", &[]).is_err());
    }

    #[test]
    fn param_value_as_string() {
        assert_eq!(ParamValue::Integer(42).as_string(), "42");
        assert_eq!(ParamValue::Boolean(true).as_string(), "true");
        assert_eq!(ParamValue::from("x").as_string(), "x");
    }
}
