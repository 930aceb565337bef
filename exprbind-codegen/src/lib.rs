//! Generation pipeline for expression bindings.
//!
//! Stub methods carry a marker attribute holding an arithmetic template whose
//! placeholders name the method's parameters:
//!
//! ```ignore
//! #[exprbind::expression("2 * ([a] + [b])")]
//! fn sum_doubled(a: i32, b: i32) -> f64;
//! ```
//!
//! For every such method this crate emits a body that hands the template to an
//! evaluator, binds each placeholder to its parameter and returns the result as
//! `f64`.
//!
//! # Architecture
//!
//! A pass runs in stages, each in its own module:
//! 1. **Enclosure** (`enclosure`): resolves the placeholder delimiters
//! 2. **Scanning** (`scanner`): filters declaration records down to candidates
//! 3. **Extraction** (`extraction`): pulls the template out of the marker
//! 4. **Tokenization** (`tokenization`): finds the placeholders in a template
//! 5. **Validation** (`validation`): cross-checks placeholders and parameters
//! 6. **Emission** (`builder`, `codegen`, `emitter`): builds and renders units
//!
//! [`Generator`] drives the stages. Host syntax only enters through
//! [`source`], which maps `syn` items to [`DeclarationRecord`]s; everything
//! downstream of it works on plain data.
//!
//! # Determinism
//!
//! Units are ordered by containing type and members by declaration order, so
//! the same input always yields byte-identical output. Groups and members are
//! built in parallel with `rayon`, but results are collected in order.
//!
//! # Limits
//!
//! - **Templates**: Maximum 10,000 bytes
//! - **Placeholders**: Maximum 256 distinct names per template
//! - **Placeholder names**: Maximum 128 characters
//!
//! A template beyond these limits produces a diagnostic and a stub body, never
//! a failed pass.

#![forbid(unsafe_code)]

pub mod builder;
pub mod cache;
pub mod codegen;
pub mod config;
pub mod constants;
pub mod declaration;
pub mod diagnostics;
pub mod emitter;
pub mod enclosure;
pub mod error;
pub mod extraction;
pub mod generator;
pub mod output;
pub mod scanner;
pub mod source;
pub mod tokenization;
pub mod types;
pub mod validation;

pub use cache::UnitCache;
pub use config::{GeneratorConfig, MarkerReference, ValidationPolicy};
pub use declaration::DeclarationRecord;
pub use diagnostics::{Diagnostic, DiagnosticId, Severity};
pub use enclosure::{Enclosure, EnclosureScheme};
pub use error::{CacheError, ConfigError, EmissionError, SourceError, TemplateError};
pub use generator::{GenerationOutput, Generator};
pub use output::write_units;
pub use types::{CandidateDeclaration, GenerationUnit, GroupKey, PlaceholderToken};
