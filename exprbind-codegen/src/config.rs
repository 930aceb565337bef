//! Generator configuration.
//!
//! A [`GeneratorConfig`] is supplied once, at generator construction, either
//! built in code, deserialized from TOML, or assembled from attribute macro
//! arguments.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_EVALUATOR_PATH, DEFAULT_IMPL_SUFFIX, DEFAULT_MARKER_NAME, DEFAULT_MARKER_NAMESPACE,
    DEFAULT_RUNTIME_PATH,
};
use crate::diagnostics::Severity;
use crate::error::ConfigError;
use crate::validation::is_valid_identifier;

/// Identity of the marker annotation: its namespace and name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MarkerReference {
    namespace: String,
    name: String,
}

impl MarkerReference {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Result<Self, ConfigError> {
        let namespace = namespace.into();
        let name = name.into();
        let namespace_ok = namespace.is_empty()
            || namespace
                .split("::")
                .all(|segment| is_valid_identifier(segment) || segment == "crate");
        if !is_valid_identifier(&name) || !namespace_ok {
            return Err(ConfigError::InvalidMarker(join_path(&namespace, &name)));
        }
        Ok(Self { namespace, name })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether an annotation with this resolved identity is the marker.
    pub fn matches(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace == namespace
    }
}

impl Default for MarkerReference {
    fn default() -> Self {
        Self {
            namespace: DEFAULT_MARKER_NAMESPACE.to_owned(),
            name: DEFAULT_MARKER_NAME.to_owned(),
        }
    }
}

impl FromStr for MarkerReference {
    type Err = ConfigError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let path = path.trim().trim_start_matches("::");
        match path.rsplit_once("::") {
            Some((namespace, name)) => Self::new(namespace, name),
            None => Self::new("", path),
        }
    }
}

impl TryFrom<String> for MarkerReference {
    type Error = ConfigError;

    fn try_from(path: String) -> Result<Self, Self::Error> {
        path.parse()
    }
}

impl From<MarkerReference> for String {
    fn from(marker: MarkerReference) -> Self {
        marker.to_string()
    }
}

impl fmt::Display for MarkerReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_path(&self.namespace, &self.name))
    }
}

fn join_path(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}::{name}")
    }
}

/// How parameter/placeholder mismatches are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Mismatches are warnings.
    #[default]
    Lenient,
    /// Mismatches are errors.
    Strict,
}

impl ValidationPolicy {
    pub fn severity(self) -> Severity {
        match self {
            Self::Lenient => Severity::Warning,
            Self::Strict => Severity::Error,
        }
    }
}

/// Everything a generation run is parameterized by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    #[serde(default)]
    pub marker: MarkerReference,

    #[serde(default)]
    pub enclosure: crate::enclosure::EnclosureScheme,

    /// Type implementing the runtime `Evaluator` contract.
    #[serde(default = "default_evaluator")]
    pub evaluator: String,

    /// Module path of the runtime contract.
    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default)]
    pub validation: ValidationPolicy,

    /// Appended to the trait name to name the generated type.
    #[serde(default = "default_impl_suffix")]
    pub impl_suffix: String,
}

fn default_evaluator() -> String {
    DEFAULT_EVALUATOR_PATH.to_owned()
}

fn default_runtime() -> String {
    DEFAULT_RUNTIME_PATH.to_owned()
}

fn default_impl_suffix() -> String {
    DEFAULT_IMPL_SUFFIX.to_owned()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            marker: MarkerReference::default(),
            enclosure: Default::default(),
            evaluator: default_evaluator(),
            runtime: default_runtime(),
            validation: ValidationPolicy::default(),
            impl_suffix: default_impl_suffix(),
        }
    }
}

impl GeneratorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.evaluator_path()?;
        self.runtime_path()?;
        // The suffix has to continue an identifier, so check it behind a letter.
        if !self.impl_suffix.is_empty()
            && syn::parse_str::<syn::Ident>(&format!("X{}", self.impl_suffix)).is_err()
        {
            return Err(ConfigError::InvalidSuffix(self.impl_suffix.clone()));
        }
        Ok(())
    }

    pub fn evaluator_path(&self) -> Result<syn::Path, ConfigError> {
        parse_path("evaluator", &self.evaluator)
    }

    pub fn runtime_path(&self) -> Result<syn::Path, ConfigError> {
        parse_path("runtime", &self.runtime)
    }
}

fn parse_path(field: &'static str, value: &str) -> Result<syn::Path, ConfigError> {
    syn::parse_str(value).map_err(|source| ConfigError::InvalidPath {
        field,
        value: value.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enclosure::EnclosureScheme;

    #[test]
    fn test_marker_parsing() {
        let marker: MarkerReference = "exprbind::expression".parse().unwrap();
        assert_eq!(marker.namespace(), "exprbind");
        assert_eq!(marker.name(), "expression");

        let nested: MarkerReference = "::my_crate::attrs::formula".parse().unwrap();
        assert_eq!(nested.namespace(), "my_crate::attrs");
        assert_eq!(nested.to_string(), "my_crate::attrs::formula");

        let local: MarkerReference = "formula".parse().unwrap();
        assert_eq!(local.namespace(), "");
    }

    #[test]
    fn test_invalid_markers() {
        assert!("exprbind::".parse::<MarkerReference>().is_err());
        assert!("exprbind::fn".parse::<MarkerReference>().is_err());
        assert!("my-crate::expression".parse::<MarkerReference>().is_err());
    }

    #[test]
    fn test_marker_requires_namespace_match() {
        let marker = MarkerReference::default();
        assert!(marker.matches("exprbind", "expression"));
        assert!(!marker.matches("other", "expression"));
        assert!(!marker.matches("exprbind", "formula"));
    }

    #[test]
    fn test_toml_defaults() {
        let config = GeneratorConfig::from_toml_str("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_toml_overrides() {
        let config = GeneratorConfig::from_toml_str(
            r#"
            marker = "calc::formula"
            enclosure = "double_curly"
            evaluator = "calc::Engine"
            validation = "strict"
            impl_suffix = "Impl"
            "#,
        )
        .unwrap();
        assert_eq!(config.marker.to_string(), "calc::formula");
        assert_eq!(config.enclosure, EnclosureScheme::DoubleCurly);
        assert_eq!(config.validation, ValidationPolicy::Strict);
        assert_eq!(config.validation.severity(), Severity::Error);
        assert_eq!(config.impl_suffix, "Impl");
    }

    #[test]
    fn test_invalid_paths_rejected() {
        let result = GeneratorConfig::from_toml_str(r#"evaluator = "not a path""#);
        assert!(matches!(result, Err(ConfigError::InvalidPath { field: "evaluator", .. })));

        let result = GeneratorConfig::from_toml_str(r#"impl_suffix = "-x""#);
        assert!(matches!(result, Err(ConfigError::InvalidSuffix(_))));
    }

    #[test]
    fn test_suffix_must_continue_an_identifier() {
        let config = GeneratorConfig {
            impl_suffix: "\u{b2}".into(),
            ..GeneratorConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSuffix(_))));

        let config = GeneratorConfig {
            impl_suffix: "Impl2".into(),
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_rejected() {
        assert!(GeneratorConfig::from_toml_str("colour = 1").is_err());
    }
}
