//! Placeholder tokenization of expression templates.

use std::collections::HashSet;

use crate::constants::{
    MAX_PLACEHOLDER_NAME_LEN, MAX_PLACEHOLDERS, MAX_TEMPLATE_LEN, PLACEHOLDERS_INITIAL_CAPACITY,
};
use crate::enclosure::Enclosure;
use crate::error::TemplateError;
use crate::types::PlaceholderToken;

/// Scan a template for enclosed placeholders.
///
/// Matches are found left to right without overlap; each distinct name is kept
/// once, in order of first appearance. Unbalanced enclosure literals are not
/// matched at all. Enforces `MAX_TEMPLATE_LEN`, `MAX_PLACEHOLDERS` and
/// `MAX_PLACEHOLDER_NAME_LEN`.
pub fn tokenize_template(
    template: &str,
    enclosure: &Enclosure,
) -> Result<Vec<PlaceholderToken>, TemplateError> {
    if template.len() > MAX_TEMPLATE_LEN {
        return Err(TemplateError::TooLong {
            len: template.len(),
            max: MAX_TEMPLATE_LEN,
        });
    }

    let mut tokens = Vec::with_capacity(PLACEHOLDERS_INITIAL_CAPACITY);
    let mut seen = HashSet::with_capacity(PLACEHOLDERS_INITIAL_CAPACITY);

    for found in enclosure.pattern().find_iter(template) {
        let raw = found.as_str();
        let name = enclosure.strip(raw);

        if name.chars().count() > MAX_PLACEHOLDER_NAME_LEN {
            return Err(TemplateError::NameTooLong {
                name: name.chars().take(16).collect::<String>() + "...",
                max: MAX_PLACEHOLDER_NAME_LEN,
            });
        }

        if !seen.insert(name) {
            continue;
        }

        if tokens.len() >= MAX_PLACEHOLDERS {
            return Err(TemplateError::TooManyPlaceholders {
                max: MAX_PLACEHOLDERS,
            });
        }

        tokens.push(PlaceholderToken {
            raw: raw.to_owned(),
            name: name.to_owned(),
        });
    }

    Ok(tokens)
}
