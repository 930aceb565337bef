//! Compile-time binding of arithmetic expression templates to trait methods.
//!
//! Mark bodiless trait methods with `#[expression("...")]` and put
//! `#[expression_binding]` on the trait. The macro generates a unit struct
//! named `<Trait>Expressions` whose methods evaluate the templates:
//!
//! ```ignore
//! use exprbind::{expression, expression_binding};
//!
//! #[expression_binding(evaluator = my_math::Calculator)]
//! pub trait Geometry {
//!     #[expression("2 * ([a] + [b])")]
//!     fn sum_doubled(a: i32, b: i32) -> f64;
//! }
//!
//! assert_eq!(<GeometryExpressions as Geometry>::sum_doubled(1, 2), 6.0);
//! ```
//!
//! # Placeholders
//!
//! - **Square** (default): `[name]`
//! - **Curly**: `{name}`
//! - **Double curly**: `{{name}}`
//!
//! Every placeholder name must match a parameter of the method and every
//! parameter should be used. A mismatch is reported as a warning, or as an
//! error with `#[expression_binding(strict)]`.
//!
//! # Trait shape
//!
//! The trait may only contain marked methods and methods with a default
//! body. A marked method has to return `f64` and have no body; otherwise the
//! macro reports an error at that method and emits no implementation.
//!
//! # Evaluators
//!
//! This crate ships no expression language. The generated code drives any
//! type implementing [`runtime::Evaluator`]: construct it from the template,
//! bind each placeholder, evaluate, convert with [`runtime::NumericResult`].
//!
//! # Limits
//!
//! - **Templates**: Maximum 10,000 bytes
//! - **Placeholders**: Maximum 256 per template
//! - **Placeholder names**: Maximum 128 characters
//!
//! # Build-time generation
//!
//! The same pipeline is available outside the macro as `exprbind-codegen`,
//! which writes one `.generated.rs` file per trait.

#![forbid(unsafe_code)]

pub mod runtime;

pub use exprbind_proc_macro::{expression, expression_binding};
