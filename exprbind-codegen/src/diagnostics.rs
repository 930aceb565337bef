//! Structured diagnostics, reported alongside the generated units.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::DIAGNOSTIC_PREFIX;
use crate::error::{EmissionError, TemplateError};
use crate::types::{CandidateDeclaration, GeneratedMember, GroupKey, ValidationOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticId {
    /// No declaration in the whole run is eligible.
    NoCandidatesFound,
    /// The marker has no usable template argument.
    MissingTemplate,
    /// Parameters and placeholders disagree.
    ValidationError,
    /// A unit could not be rendered and was skipped.
    EmissionError,
    /// The template exceeds the tokenizer limits.
    InvalidTemplate,
}

impl DiagnosticId {
    pub const fn number(self) -> u16 {
        match self {
            Self::NoCandidatesFound => 1,
            Self::MissingTemplate => 2,
            Self::ValidationError => 3,
            Self::EmissionError => 4,
            Self::InvalidTemplate => 5,
        }
    }

    /// `EXB0003` and friends.
    pub fn code(self) -> String {
        format!("{DIAGNOSTIC_PREFIX}{:04}", self.number())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    pub message: String,
    /// Qualified name of the candidate (or unit) this is about.
    pub related_candidate: Option<String>,
}

impl Diagnostic {
    pub fn no_candidates(marker: &str) -> Self {
        Self {
            id: DiagnosticId::NoCandidatesFound,
            severity: Severity::Warning,
            message: format!(
                "No eligible declarations found: expected public or extensible bodiless methods \
                 returning f64 and marked with #[{marker}]"
            ),
            related_candidate: None,
        }
    }

    pub fn missing_template(candidate: &CandidateDeclaration) -> Self {
        Self {
            id: DiagnosticId::MissingTemplate,
            severity: Severity::Warning,
            message: format!(
                "`{}` has no expression template; a stub returning NaN was generated",
                candidate.name
            ),
            related_candidate: Some(candidate.qualified_name()),
        }
    }

    pub fn validation(
        candidate: &CandidateDeclaration,
        outcome: &ValidationOutcome,
        severity: Severity,
    ) -> Self {
        let mut problems = Vec::with_capacity(2);
        if !outcome.unused_parameters.is_empty() {
            problems.push(format!(
                "parameter(s) not used by the template: {}",
                join(&outcome.unused_parameters)
            ));
        }
        if !outcome.undeclared_placeholders.is_empty() {
            problems.push(format!(
                "placeholder(s) without a matching parameter: {}",
                join(&outcome.undeclared_placeholders)
            ));
        }
        Self {
            id: DiagnosticId::ValidationError,
            severity,
            message: format!("`{}`: {}", candidate.name, problems.join("; ")),
            related_candidate: Some(candidate.qualified_name()),
        }
    }

    pub fn invalid_template(candidate: &CandidateDeclaration, error: &TemplateError) -> Self {
        Self {
            id: DiagnosticId::InvalidTemplate,
            severity: Severity::Error,
            message: format!("`{}`: {error}", candidate.name),
            related_candidate: Some(candidate.qualified_name()),
        }
    }

    pub fn emission(key: &GroupKey, error: &EmissionError) -> Self {
        Self {
            id: DiagnosticId::EmissionError,
            severity: Severity::Error,
            message: format!("Skipped generation unit: {error}"),
            related_candidate: Some(key.to_string()),
        }
    }

    /// A member whose signature could not be rendered; its unit goes on without it.
    pub fn member_emission(member: &GeneratedMember, error: &EmissionError) -> Self {
        Self {
            id: DiagnosticId::EmissionError,
            severity: Severity::Error,
            message: format!("Skipped member `{}`: {error}", member.signature.name),
            related_candidate: Some(format!("{}::{}", member.group_key(), member.signature.name)),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(|name| format!("`{name}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id.code(), self.message)?;
        if let Some(candidate) = &self.related_candidate {
            write!(f, " (candidate: {candidate})")?;
        }
        Ok(())
    }
}
