//! Raw declaration records handed over by the host adapter.
//!
//! The pipeline never inspects host syntax itself: an adapter (see
//! [`source`](crate::source)) maps whatever the host has into these records.

use serde::{Deserialize, Serialize};

use crate::config::MarkerReference;
use crate::types::{Parameter, Receiver};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    /// `pub(crate)`, `pub(super)`, `pub(in path)`
    Restricted,
    #[default]
    Private,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modifiers {
    pub visibility: Visibility,
    /// The body is expected to come from somewhere else (a trait method).
    pub is_virtual: bool,
    /// The body can only come from a foreign definition (an `extern` block).
    pub is_abstract: bool,
}

/// One argument of an applied annotation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnnotationArgument {
    /// A string literal, unescaped.
    Literal(String),
    /// `name = value`; never positional.
    Named { name: String, value: String },
    /// Any other expression, as token text.
    Expression(String),
}

/// An applied annotation with its resolved identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub namespace: String,
    pub name: String,
    pub arguments: Vec<AnnotationArgument>,
}

impl Annotation {
    pub fn is_marker(&self, marker: &MarkerReference) -> bool {
        marker.matches(&self.namespace, &self.name)
    }
}

/// A host declaration, eligible or not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeclarationRecord {
    pub name: String,
    pub containing_type: String,
    pub containing_namespace: String,
    pub receiver: Option<Receiver>,
    pub parameters: Vec<Parameter>,
    /// Token text of the declared return type; empty for `()`.
    pub return_type: String,
    pub modifiers: Modifiers,
    pub annotations: Vec<Annotation>,
    pub has_body: bool,
    /// The signature stays within the shape the emitter can reproduce: no
    /// generics, no `async`/`unsafe`/`const`, plain identifier parameters.
    pub fixed_shape: bool,
}

impl DeclarationRecord {
    pub fn qualified_name(&self) -> String {
        [
            self.containing_namespace.as_str(),
            self.containing_type.as_str(),
            self.name.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("::")
    }

    /// The first applied annotation that is the marker.
    pub fn marker<'a>(&'a self, marker: &MarkerReference) -> Option<&'a Annotation> {
        self.annotations.iter().find(|a| a.is_marker(marker))
    }
}
