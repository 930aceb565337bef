//! Template extraction from marker arguments.

use crate::declaration::AnnotationArgument;

/// The first positional argument's literal text, or `None` when it is absent,
/// empty, or not a string literal.
///
/// Only the first positional argument is consulted. Named arguments are skipped.
pub fn extract_template(arguments: &[AnnotationArgument]) -> Option<String> {
    let first = arguments
        .iter()
        .find(|argument| !matches!(argument, AnnotationArgument::Named { .. }))?;

    match first {
        AnnotationArgument::Literal(text) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}
