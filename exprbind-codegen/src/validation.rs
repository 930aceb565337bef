//! Identifier checks and parameter/placeholder cross-validation.

use std::collections::BTreeSet;

use crate::types::{Parameter, PlaceholderToken, ValidationOutcome};

/// Rust keywords (current + reserved for future).
const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for",
    "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return",
    "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where",
    "while", "async", "await", "dyn", "abstract", "become", "box", "do", "final", "macro",
    "override", "priv", "typeof", "unsized", "virtual", "yield", "try", "gen",
];

/// Check if string is valid Rust identifier.
#[inline]
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if RUST_KEYWORDS.contains(&s) || s == "_" {
        return false;
    }

    if !first.is_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_alphanumeric() || c == '_') && syn::parse_str::<syn::Ident>(s).is_ok()
}

/// Reconciles declared parameters with the placeholders of their template.
///
/// Matching is exact and case-sensitive. Every parameter should be used by
/// exactly one placeholder and every placeholder should name a parameter;
/// whatever falls outside the intersection is reported.
pub fn cross_validate(parameters: &[Parameter], tokens: &[PlaceholderToken]) -> ValidationOutcome {
    let declared: BTreeSet<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
    let referenced: BTreeSet<&str> = tokens.iter().map(|t| t.name.as_str()).collect();

    ValidationOutcome {
        matched_parameters: owned(declared.intersection(&referenced)),
        unused_parameters: owned(declared.difference(&referenced)),
        undeclared_placeholders: owned(referenced.difference(&declared)),
    }
}

fn owned<'a, 'b: 'a>(names: impl Iterator<Item = &'a &'b str>) -> BTreeSet<String> {
    names.map(|name| (*name).to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(names: &[&str]) -> Vec<Parameter> {
        names.iter().map(|n| Parameter::new(*n, "i32")).collect()
    }

    fn tokens(names: &[&str]) -> Vec<PlaceholderToken> {
        names
            .iter()
            .map(|n| PlaceholderToken {
                raw: format!("[{n}]"),
                name: (*n).to_owned(),
            })
            .collect()
    }

    #[test]
    fn test_valid_identifiers() {
        assert!(is_valid_identifier("variable"));
        assert!(is_valid_identifier("var_123"));
        assert!(is_valid_identifier("_private"));
        assert!(is_valid_identifier("número"));
        assert!(is_valid_identifier("VarName"));
        assert!(is_valid_identifier("x"));
    }

    #[test]
    fn test_invalid_identifiers() {
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("_"));
        assert!(!is_valid_identifier("123var"));
        assert!(!is_valid_identifier("var-name"));
        assert!(!is_valid_identifier("var.name"));
        assert!(!is_valid_identifier("var name"));
    }

    #[test]
    fn test_alphanumeric_but_not_xid() {
        // U+00B2 SUPERSCRIPT TWO is numeric but cannot continue an identifier.
        assert!(!is_valid_identifier("area\u{b2}"));
        assert!(!is_valid_identifier("x\u{bd}"));
    }

    #[test]
    fn test_keywords_rejected() {
        assert!(!is_valid_identifier("let"));
        assert!(!is_valid_identifier("fn"));
        assert!(!is_valid_identifier("self"));
        assert!(!is_valid_identifier("Self"));
        assert!(!is_valid_identifier("gen"));
    }

    #[test]
    fn test_exact_match_succeeds() {
        let outcome = cross_validate(&params(&["a", "b"]), &tokens(&["a", "b"]));
        assert!(outcome.is_success());
        assert_eq!(outcome.matched_parameters.len(), 2);
    }

    #[test]
    fn test_undeclared_placeholder_reported() {
        let outcome = cross_validate(&params(&["a"]), &tokens(&["a", "b"]));
        assert!(outcome.unused_parameters.is_empty());
        assert_eq!(outcome.undeclared_placeholders, BTreeSet::from(["b".to_string()]));
        assert_eq!(outcome.matched_parameters, BTreeSet::from(["a".to_string()]));
        assert!(!outcome.is_success());
    }

    #[test]
    fn test_unused_parameter_reported() {
        let outcome = cross_validate(&params(&["a", "scale"]), &tokens(&["a"]));
        assert_eq!(outcome.unused_parameters, BTreeSet::from(["scale".to_string()]));
        assert!(outcome.undeclared_placeholders.is_empty());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let outcome = cross_validate(&params(&["Rate"]), &tokens(&["rate"]));
        assert!(outcome.matched_parameters.is_empty());
        assert_eq!(outcome.unused_parameters.len(), 1);
        assert_eq!(outcome.undeclared_placeholders.len(), 1);
    }

    #[test]
    fn test_no_parameters_no_placeholders() {
        assert!(cross_validate(&[], &[]).is_success());
    }
}
