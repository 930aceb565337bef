//! Limits, defaults and capacity hints for the generation pipeline.
//!
//! This module centralizes the template limits that protect a build from
//! pathological inputs, together with the naming defaults every stage shares.

// ============================================================================
// Security Limits (Build-Time DoS Protection)
// ============================================================================

/// Maximum length of an expression template in bytes.
pub const MAX_TEMPLATE_LEN: usize = 10_000;

/// Maximum number of distinct placeholders in a single template.
pub const MAX_PLACEHOLDERS: usize = 256;

/// Maximum length of a placeholder name, in characters.
pub const MAX_PLACEHOLDER_NAME_LEN: usize = 128;

// ============================================================================
// Memory Pre-Allocation Hints
// ============================================================================

/// Initial capacity hint for the placeholder vector.
///
/// Most expressions reference two or three parameters.
pub const PLACEHOLDERS_INITIAL_CAPACITY: usize = 4;

/// Initial capacity hint for a generated body: declare, invoke, return plus a few binds.
pub const BODY_INITIAL_CAPACITY: usize = 6;

// ============================================================================
// Shape Contract and Naming Defaults
// ============================================================================

/// The only return type a candidate may declare.
pub const NUMERIC_RETURN_TYPE: &str = "f64";

/// Namespace of the default marker attribute.
pub const DEFAULT_MARKER_NAMESPACE: &str = "exprbind";

/// Name of the default marker attribute.
pub const DEFAULT_MARKER_NAME: &str = "expression";

/// Path of the evaluator contract referenced by generated code.
pub const DEFAULT_RUNTIME_PATH: &str = "::exprbind::runtime";

/// Evaluator type referenced by generated code unless configured otherwise.
pub const DEFAULT_EVALUATOR_PATH: &str = "Evaluator";

/// Appended to the trait name to name the generated implementing type.
pub const DEFAULT_IMPL_SUFFIX: &str = "Expressions";

/// Extension of every generated artifact.
pub const GENERATED_FILE_SUFFIX: &str = ".generated.rs";

/// Prefix of every diagnostic identifier.
pub const DIAGNOSTIC_PREFIX: &str = "EXB";

/// Preferred name of the evaluator local in generated bodies.
pub const EVALUATOR_BINDING: &str = "evaluator";

/// Preferred name of the evaluation result local in generated bodies.
pub const RESULT_BINDING: &str = "result";
