//! Declaration scanning: which host records receive generated bodies.

use std::fmt;

use tracing::debug;

use crate::config::MarkerReference;
use crate::constants::NUMERIC_RETURN_TYPE;
use crate::declaration::{DeclarationRecord, Visibility};
use crate::extraction::extract_template;
use crate::types::CandidateDeclaration;

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    NoMarker,
    NotVisible,
    Abstract,
    ReturnType,
    HasBody,
    UnsupportedShape,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NoMarker => "not marked",
            Self::NotVisible => "neither public nor extensible",
            Self::Abstract => "abstract",
            Self::ReturnType => "return type is not f64",
            Self::HasBody => "already has a body",
            Self::UnsupportedShape => "signature shape not supported",
        })
    }
}

/// Checks every eligibility rule, in order.
pub fn check_eligibility(
    record: &DeclarationRecord,
    marker: &MarkerReference,
) -> Result<(), Rejection> {
    if record.marker(marker).is_none() {
        return Err(Rejection::NoMarker);
    }
    let modifiers = &record.modifiers;
    if modifiers.is_abstract {
        return Err(Rejection::Abstract);
    }
    if modifiers.visibility != Visibility::Public && !modifiers.is_virtual {
        return Err(Rejection::NotVisible);
    }
    if record.return_type != NUMERIC_RETURN_TYPE {
        return Err(Rejection::ReturnType);
    }
    if record.has_body {
        return Err(Rejection::HasBody);
    }
    if !record.fixed_shape {
        return Err(Rejection::UnsupportedShape);
    }
    Ok(())
}

/// Filters records down to candidates, extracting each template on the way.
///
/// Dropped records are not errors; an empty result is reported once by the caller.
pub fn scan(records: &[DeclarationRecord], marker: &MarkerReference) -> Vec<CandidateDeclaration> {
    records
        .iter()
        .filter_map(|record| match check_eligibility(record, marker) {
            Ok(()) => Some(candidate(record, marker)),
            Err(Rejection::NoMarker) => None,
            Err(reason) => {
                debug!(declaration = %record.qualified_name(), %reason, "skipping marked declaration");
                None
            }
        })
        .collect()
}

/// Marked records that fail eligibility, paired with the rule they broke.
///
/// Unmarked records are left out; they were never meant to be generated.
pub fn marked_rejections<'a>(
    records: &'a [DeclarationRecord],
    marker: &MarkerReference,
) -> Vec<(&'a DeclarationRecord, Rejection)> {
    records
        .iter()
        .filter_map(|record| match check_eligibility(record, marker) {
            Ok(()) | Err(Rejection::NoMarker) => None,
            Err(reason) => Some((record, reason)),
        })
        .collect()
}

fn candidate(record: &DeclarationRecord, marker: &MarkerReference) -> CandidateDeclaration {
    let raw_template = record
        .marker(marker)
        .and_then(|annotation| extract_template(&annotation.arguments));

    CandidateDeclaration {
        containing_type: record.containing_type.clone(),
        containing_namespace: record.containing_namespace.clone(),
        name: record.name.clone(),
        receiver: record.receiver,
        parameters: record.parameters.clone(),
        raw_template,
        is_eligible_shape: true,
    }
}
