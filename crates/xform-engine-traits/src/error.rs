//! Error types for transform-engine operations


/// Result type for transform-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all transform-engine operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A preprocessor failed while visiting the stylesheet
    #[error("Preprocessing error: {0}")]
    Preprocessing(String),

    /// The external compiler rejected the stylesheet
    #[error("Compilation error: {0}")]
    Compilation(String),

    /// An engine handle was initialized twice, or with no compiled transform
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// An operation was attempted on an engine handle before initialization
    #[error("Engine not initialized: {0}")]
    NotInitialized(String),

    /// Malformed caller input (e.g. an unreadable stylesheet source)
    #[error("Argument error: {0}")]
    Argument(String),

    /// The stylesheet source is not well-formed XML
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// The stylesheet document could not be serialized
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// An extension object rejected an invocation
    #[error("Extension error: {0}")]
    Extension(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a new preprocessing error
    pub fn preprocessing<S: Into<String>>(msg: S) -> Self {
        Error::Preprocessing(msg.into())
    }

    /// Create a new compilation error
    pub fn compilation<S: Into<String>>(msg: S) -> Self {
        Error::Compilation(msg.into())
    }

    /// Create a new initialization error
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Error::Initialization(msg.into())
    }

    /// Create a new not-initialized error
    pub fn not_initialized<S: Into<String>>(msg: S) -> Self {
        Error::NotInitialized(msg.into())
    }

    /// Create a new argument error
    pub fn argument<S: Into<String>>(msg: S) -> Self {
        Error::Argument(msg.into())
    }

    /// Create a new XML parsing error
    pub fn xml_parse<S: Into<String>>(msg: S) -> Self {
        Error::XmlParse(msg.into())
    }

    /// Create a new extension error
    pub fn extension<S: Into<String>>(msg: S) -> Self {
        Error::Extension(msg.into())
    }
}
