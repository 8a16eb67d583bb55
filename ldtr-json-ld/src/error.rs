use serde_json::Value as JsonValue;
use std::fmt;
use thiserror::Error;

/// The kind of failure raised by context processing or expansion.
///
/// `code()` returns the JSON-LD 1.0 error code for each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    CyclicContext,
    CyclicIriMapping,
    InvalidLocalContext,
    KeywordRedefinition,
    InvalidBaseIri,
    InvalidVocabMapping,
    InvalidDefaultLanguage,
    InvalidTypeMapping,
    InvalidReverseProperty,
    InvalidIriMapping,
    InvalidContainerMapping,
    InvalidLanguageMapping,
    InvalidTermDefinition,
    InvalidIdValue,
    InvalidTypeValue,
    ListOfLists,
    InvalidValueObject,
    InvalidLanguageTaggedValue,
    InvalidLanguageTaggedString,
    InvalidIndexValue,
    InvalidReverseValue,
    InvalidReversePropertyValue,
    InvalidReversePropertyMap,
    CollidingKeywords,
    InvalidSetOrListObject,
    InvalidLanguageMapValue,
    InvalidTypedValue,
    InvalidKeywordAlias,
    LoadingRemoteContextFailed,
    InvalidRemoteContext,
    RecursionLimitExceeded,
}

impl ErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::CyclicContext => "recursive context inclusion",
            ErrorKind::CyclicIriMapping => "cyclic IRI mapping",
            ErrorKind::InvalidLocalContext => "invalid local context",
            ErrorKind::KeywordRedefinition => "keyword redefinition",
            ErrorKind::InvalidBaseIri => "invalid base IRI",
            ErrorKind::InvalidVocabMapping => "invalid vocab mapping",
            ErrorKind::InvalidDefaultLanguage => "invalid default language",
            ErrorKind::InvalidTypeMapping => "invalid type mapping",
            ErrorKind::InvalidReverseProperty => "invalid reverse property",
            ErrorKind::InvalidIriMapping => "invalid IRI mapping",
            ErrorKind::InvalidContainerMapping => "invalid container mapping",
            ErrorKind::InvalidLanguageMapping => "invalid language mapping",
            ErrorKind::InvalidTermDefinition => "invalid term definition",
            ErrorKind::InvalidIdValue => "invalid @id value",
            ErrorKind::InvalidTypeValue => "invalid type value",
            ErrorKind::ListOfLists => "list of lists",
            ErrorKind::InvalidValueObject => "invalid value object",
            ErrorKind::InvalidLanguageTaggedValue => "invalid language-tagged value",
            ErrorKind::InvalidLanguageTaggedString => "invalid language-tagged string",
            ErrorKind::InvalidIndexValue => "invalid @index value",
            ErrorKind::InvalidReverseValue => "invalid @reverse value",
            ErrorKind::InvalidReversePropertyValue => "invalid reverse property value",
            ErrorKind::InvalidReversePropertyMap => "invalid reverse property map",
            ErrorKind::CollidingKeywords => "colliding keywords",
            ErrorKind::InvalidSetOrListObject => "invalid set or list object",
            ErrorKind::InvalidLanguageMapValue => "invalid language map value",
            ErrorKind::InvalidTypedValue => "invalid typed value",
            ErrorKind::InvalidKeywordAlias => "invalid keyword alias",
            ErrorKind::LoadingRemoteContextFailed => "loading remote context failed",
            ErrorKind::InvalidRemoteContext => "invalid remote context",
            ErrorKind::RecursionLimitExceeded => "recursion limit exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error raised by context processing and expansion.
///
/// Aborts the current call; no partial result is returned.
#[derive(Error, Debug, Clone)]
#[error("{kind}: {message}")]
pub struct JsonLdError {
    pub kind: ErrorKind,
    pub message: String,
    /// The offending input fragment, when one is useful for diagnostics
    pub data: Option<JsonValue>,
}

impl JsonLdError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            data: None,
        }
    }

    /// Attach the offending value
    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.data = Some(data);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub type Result<T> = std::result::Result<T, JsonLdError>;
