//! Core types shared by the pipeline stages.
//!
//! Everything here is plain data: created by one stage, read by the next, never
//! mutated in between.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::Statement;

/// A declared parameter: its name and the token text of its type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// The `self` receiver of a method, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Receiver {
    /// `&self`
    Shared,
    /// `&mut self`
    Exclusive,
    /// `self`
    Owned,
}

/// A declaration that passed the scanner, ready for the rest of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateDeclaration {
    pub containing_type: String,
    pub containing_namespace: String,
    pub name: String,
    pub receiver: Option<Receiver>,
    pub parameters: Vec<Parameter>,
    pub raw_template: Option<String>,
    pub is_eligible_shape: bool,
}

impl CandidateDeclaration {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            containing_namespace: self.containing_namespace.clone(),
            containing_type: self.containing_type.clone(),
        }
    }

    /// `namespace::Type::name`, used to attach diagnostics.
    pub fn qualified_name(&self) -> String {
        format!("{}::{}", self.group_key(), self.name)
    }
}

/// A placeholder found in a template.
///
/// `raw` keeps the enclosure literals (`[a]`), `name` does not (`a`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderToken {
    pub raw: String,
    pub name: String,
}

/// Result of reconciling placeholders with declared parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub matched_parameters: BTreeSet<String>,
    pub unused_parameters: BTreeSet<String>,
    pub undeclared_placeholders: BTreeSet<String>,
}

impl ValidationOutcome {
    /// No unused parameter and no undeclared placeholder.
    pub fn is_success(&self) -> bool {
        self.unused_parameters.is_empty() && self.undeclared_placeholders.is_empty()
    }
}

/// Grouping key of generation units.
///
/// Field order makes units sort by namespace, then type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub containing_namespace: String,
    pub containing_type: String,
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.containing_namespace.is_empty(),
            self.containing_type.is_empty(),
        ) {
            (true, _) => f.write_str(&self.containing_type),
            (false, true) => f.write_str(&self.containing_namespace),
            (false, false) => write!(f, "{}::{}", self.containing_namespace, self.containing_type),
        }
    }
}

/// Signature of a generated member. The return type is always `f64`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberSignature {
    pub name: String,
    pub receiver: Option<Receiver>,
    pub parameters: Vec<Parameter>,
}

/// One generated method, before rendering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratedMember {
    pub containing_type: String,
    pub containing_namespace: String,
    pub signature: MemberSignature,
    pub body: Vec<Statement>,
}

impl GeneratedMember {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            containing_namespace: self.containing_namespace.clone(),
            containing_type: self.containing_type.clone(),
        }
    }
}

/// One emitted artifact: every member of a single containing type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationUnit {
    pub key: GroupKey,
    /// Deterministic artifact name, e.g. `crate.geometry.Shapes.generated.rs`.
    pub file_name: String,
    /// Fingerprint of the candidate set this unit was generated from.
    pub fingerprint: String,
    pub members: Vec<GeneratedMember>,
    /// Pretty-printed Rust source.
    pub source: String,
}
