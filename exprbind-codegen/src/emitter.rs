//! Member construction and unit emission.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::builder::{BodyBuilder, evaluation_body};
use crate::codegen::{RenderContext, format_tokens, unit_file_name};
use crate::config::ValidationPolicy;
use crate::diagnostics::Diagnostic;
use crate::enclosure::Enclosure;
use crate::error::EmissionError;
use crate::tokenization::tokenize_template;
use crate::types::{CandidateDeclaration, GeneratedMember, GenerationUnit, GroupKey, MemberSignature};
use crate::validation::cross_validate;

/// A built member and whatever went wrong building it.
#[derive(Debug, Clone)]
pub struct MemberOutput {
    pub member: GeneratedMember,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenizes, validates and builds the body of one candidate.
///
/// Never fails: a missing or oversized template yields the NaN stub, a
/// parameter mismatch yields a body binding only the matching names.
pub fn build_member(
    candidate: &CandidateDeclaration,
    enclosure: &Enclosure,
    policy: ValidationPolicy,
) -> MemberOutput {
    let mut diagnostics = Vec::new();
    let builder = BodyBuilder::new(&candidate.parameters);

    let body = match candidate.raw_template.as_deref() {
        None => {
            diagnostics.push(Diagnostic::missing_template(candidate));
            builder.no_expression()
        }
        Some(template) => match tokenize_template(template, enclosure) {
            Err(error) => {
                diagnostics.push(Diagnostic::invalid_template(candidate, &error));
                builder.no_expression()
            }
            Ok(tokens) => {
                let outcome = cross_validate(&candidate.parameters, &tokens);
                if !outcome.is_success() {
                    diagnostics.push(Diagnostic::validation(
                        candidate,
                        &outcome,
                        policy.severity(),
                    ));
                }
                evaluation_body(&candidate.parameters, template, &tokens, &outcome)
            }
        },
    };

    MemberOutput {
        member: GeneratedMember {
            containing_type: candidate.containing_type.clone(),
            containing_namespace: candidate.containing_namespace.clone(),
            signature: MemberSignature {
                name: candidate.name.clone(),
                receiver: candidate.receiver,
                parameters: candidate.parameters.clone(),
            },
            body,
        },
        diagnostics,
    }
}

/// Groups candidates by containing type, keeping declaration order inside
/// each group. Groups iterate in key order.
pub fn group_candidates(
    candidates: Vec<CandidateDeclaration>,
) -> BTreeMap<GroupKey, Vec<CandidateDeclaration>> {
    let mut groups: BTreeMap<GroupKey, Vec<CandidateDeclaration>> = BTreeMap::new();
    for candidate in candidates {
        groups.entry(candidate.group_key()).or_default().push(candidate);
    }
    groups
}

/// Renders the members of one group into a unit.
///
/// A member whose signature does not render is left out with an error
/// diagnostic; the rest of the unit is still emitted. Only a key that cannot
/// name a type fails the whole unit.
pub fn emit_unit(
    context: &RenderContext,
    key: GroupKey,
    members: Vec<GeneratedMember>,
    fingerprint: String,
) -> Result<(GenerationUnit, Vec<Diagnostic>), EmissionError> {
    let mut diagnostics = Vec::new();
    let mut rendered = Vec::with_capacity(members.len());
    let mut kept = Vec::with_capacity(members.len());

    for member in members {
        match context.member(&member) {
            Ok(tokens) => {
                rendered.push(tokens);
                kept.push(member);
            }
            Err(error) => {
                warn!(member = %member.signature.name, %error, "failed to render member");
                diagnostics.push(Diagnostic::member_emission(&member, &error));
            }
        }
    }

    let tokens = context.unit(&key, &rendered)?;
    let source = format_tokens(tokens)?;
    debug!(unit = %key, members = kept.len(), "emitted generation unit");

    let unit = GenerationUnit {
        file_name: unit_file_name(&key),
        key,
        fingerprint,
        members: kept,
        source,
    };
    Ok((unit, diagnostics))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Statement;
    use crate::diagnostics::{DiagnosticId, Severity};
    use crate::enclosure::EnclosureScheme;
    use crate::types::Parameter;

    fn candidate(type_name: &str, name: &str, template: Option<&str>) -> CandidateDeclaration {
        CandidateDeclaration {
            containing_type: type_name.into(),
            containing_namespace: "crate".into(),
            name: name.into(),
            receiver: None,
            parameters: vec![Parameter::new("a", "i32"), Parameter::new("b", "i32")],
            raw_template: template.map(str::to_owned),
            is_eligible_shape: true,
        }
    }

    fn square() -> Enclosure {
        Enclosure::resolve(EnclosureScheme::Square).unwrap()
    }

    #[test]
    fn test_clean_member_has_no_diagnostics() {
        let output = build_member(
            &candidate("Math", "product", Some("[a]*[b]")),
            &square(),
            ValidationPolicy::Lenient,
        );
        assert!(output.diagnostics.is_empty());
        assert_eq!(output.member.body.len(), 5);
    }

    #[test]
    fn test_missing_template_yields_stub() {
        let output = build_member(
            &candidate("Math", "stub", None),
            &square(),
            ValidationPolicy::Lenient,
        );
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].id, DiagnosticId::MissingTemplate);
        assert_eq!(output.member.body.last(), Some(&Statement::NoExpression));
    }

    #[test]
    fn test_mismatch_severity_follows_policy() {
        let mismatched = candidate("Math", "partial", Some("[a]*[c]"));

        let lenient = build_member(&mismatched, &square(), ValidationPolicy::Lenient);
        assert_eq!(lenient.diagnostics[0].id, DiagnosticId::ValidationError);
        assert_eq!(lenient.diagnostics[0].severity, Severity::Warning);

        let strict = build_member(&mismatched, &square(), ValidationPolicy::Strict);
        assert_eq!(strict.diagnostics[0].severity, Severity::Error);
        assert!(strict.member.body.contains(&Statement::Discard {
            parameter: "b".into()
        }));
    }

    #[test]
    fn test_grouping_keeps_declaration_order() {
        let groups = group_candidates(vec![
            candidate("Zeta", "z1", Some("[a]")),
            candidate("Alpha", "a1", Some("[a]")),
            candidate("Zeta", "z2", Some("[b]")),
        ]);
        let keys: Vec<_> = groups.keys().map(|k| k.containing_type.as_str()).collect();
        assert_eq!(keys, ["Alpha", "Zeta"]);

        let zeta = groups.values().nth(1).unwrap();
        let names: Vec<_> = zeta.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["z1", "z2"]);
    }

    fn context() -> RenderContext {
        RenderContext {
            evaluator: syn::parse_quote!(Engine),
            runtime: syn::parse_quote!(::exprbind::runtime),
            impl_suffix: "Expressions".into(),
        }
    }

    #[test]
    fn test_bad_member_does_not_sink_the_unit() {
        let good = build_member(
            &candidate("Math", "good", Some("[a]+[b]")),
            &square(),
            ValidationPolicy::Lenient,
        );
        let mut bad = build_member(
            &candidate("Math", "bad", Some("[a]+[b]")),
            &square(),
            ValidationPolicy::Lenient,
        );
        bad.member.signature.parameters[0].ty = "not a type".into();

        let key = good.member.group_key();
        let (unit, diagnostics) =
            emit_unit(&context(), key, vec![good.member, bad.member], "f".into()).unwrap();

        assert_eq!(unit.members.len(), 1);
        assert_eq!(unit.members[0].signature.name, "good");
        assert!(unit.source.contains("fn good("));
        assert!(!unit.source.contains("fn bad("));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, DiagnosticId::EmissionError);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].related_candidate.as_deref(),
            Some("crate::Math::bad")
        );
    }
}
