//! Error types for the generation pipeline.
//!
//! Only failures that make a whole pass impossible (bad configuration,
//! unparsable source, I/O) surface as `Err`. Failures scoped to one candidate
//! or one unit become [`Diagnostic`](crate::diagnostics::Diagnostic)s instead.

use std::path::PathBuf;

use thiserror::Error;

/// Invalid generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid marker reference '{0}': expected `namespace::name` with an identifier name")]
    InvalidMarker(String),

    #[error("Invalid {field} path '{value}': {source}")]
    InvalidPath {
        field: &'static str,
        value: String,
        #[source]
        source: syn::Error,
    },

    #[error("Invalid implementation suffix '{0}': it must continue a Rust identifier")]
    InvalidSuffix(String),

    #[error("Failed to compile placeholder pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A template that exceeds the tokenizer limits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template too long ({len} bytes). Maximum allowed: {max} bytes")]
    TooLong { len: usize, max: usize },

    #[error("Too many distinct placeholders in template. Maximum allowed: {max}")]
    TooManyPlaceholders { max: usize },

    #[error("Placeholder '{name}' too long (>{max} characters)")]
    NameTooLong { name: String, max: usize },
}

/// A generation unit that cannot be rendered.
#[derive(Debug, Error)]
pub enum EmissionError {
    #[error("Members of namespace '{namespace}' have no containing type")]
    MissingContainingType { namespace: String },

    #[error("Type '{containing_type}' has no containing namespace")]
    MissingNamespace { containing_type: String },

    #[error("Containing type '{0}' is not a valid identifier")]
    InvalidTypeName(String),

    #[error("Generated type name '{name}' is not a valid identifier: {source}")]
    InvalidImplName {
        name: String,
        #[source]
        source: syn::Error,
    },

    #[error("Namespace '{namespace}' is not a valid path: {source}")]
    InvalidNamespace {
        namespace: String,
        #[source]
        source: syn::Error,
    },

    #[error("Member '{member}': {what} '{text}' does not parse: {source}")]
    InvalidSignature {
        member: String,
        what: &'static str,
        text: String,
        #[source]
        source: syn::Error,
    },

    #[error("Generated code does not parse: {0}")]
    Format(#[source] syn::Error),
}

/// Rust source that cannot be turned into declaration records.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to parse Rust source: {0}")]
    Parse(#[from] syn::Error),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to load or persist the unit cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt cache file: {0}")]
    Json(#[from] serde_json::Error),
}
