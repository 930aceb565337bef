//! Placeholder enclosure schemes and their compiled patterns.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// The literal delimiters that mark a placeholder inside a template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EnclosureScheme {
    /// `[name]`
    #[default]
    Square,
    /// `{name}`
    Curly,
    /// `{{name}}`
    DoubleCurly,
}

impl EnclosureScheme {
    /// Left and right literals of this scheme.
    pub const fn literals(self) -> (&'static str, &'static str) {
        match self {
            Self::Square => ("[", "]"),
            Self::Curly => ("{", "}"),
            Self::DoubleCurly => ("{{", "}}"),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Curly => "curly",
            Self::DoubleCurly => "double_curly",
        }
    }

    /// Looks a scheme up by name. Unknown names fall back to [`Square`](Self::Square).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "square" | "square_brackets" | "[]" => Self::Square,
            "curly" | "curly_braces" | "{}" => Self::Curly,
            "double_curly" | "double_curly_braces" | "{{}}" => Self::DoubleCurly,
            other => {
                warn!(scheme = other, "unknown enclosure scheme, falling back to square");
                Self::Square
            }
        }
    }
}

impl From<String> for EnclosureScheme {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<EnclosureScheme> for String {
    fn from(scheme: EnclosureScheme) -> Self {
        scheme.name().to_owned()
    }
}

impl fmt::Display for EnclosureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved scheme: its literals plus the pattern that finds
/// `left + one-or-more non-right characters + right`.
///
/// Built once per generator and shared read-only by every stage.
#[derive(Debug, Clone)]
pub struct Enclosure {
    scheme: EnclosureScheme,
    left: &'static str,
    right: &'static str,
    pattern: Regex,
}

impl Enclosure {
    pub fn resolve(scheme: EnclosureScheme) -> Result<Self, regex::Error> {
        let (left, right) = scheme.literals();

        // Brackets and braces are pattern metacharacters: escape everything.
        let mut excluded = String::new();
        for ch in right.chars() {
            if !excluded.contains(ch) {
                excluded.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4])));
            }
        }
        let pattern = format!(
            "{}([^{}]+){}",
            regex::escape(left),
            excluded,
            regex::escape(right)
        );

        Ok(Self {
            scheme,
            left,
            right,
            pattern: Regex::new(&pattern)?,
        })
    }

    pub fn scheme(&self) -> EnclosureScheme {
        self.scheme
    }

    pub fn left(&self) -> &'static str {
        self.left
    }

    pub fn right(&self) -> &'static str {
        self.right
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }

    /// Removes the enclosure literals from a matched placeholder.
    pub fn strip<'a>(&self, raw: &'a str) -> &'a str {
        raw.strip_prefix(self.left)
            .and_then(|inner| inner.strip_suffix(self.right))
            .unwrap_or(raw)
    }
}
