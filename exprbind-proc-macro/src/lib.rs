//! Procedural macros for binding expression templates to trait methods.
//!
//! This crate provides two attributes:
//! - `#[expression_binding]`: Generates an implementation of the annotated trait
//! - `#[expression]`: Marks a method and carries its template
//!
//! The actual work happens in `exprbind-codegen`; this crate only adapts the
//! macro input to declaration records and reports diagnostics back to rustc.
//!
//! # Diagnostics
//!
//! Error diagnostics become `compile_error!` at the offending method. Stable
//! proc macros cannot emit warnings, so warnings are surfaced through a
//! deprecated item that the expansion uses at the method's span.
//!
//! The annotated trait may only contain marked methods and methods with a
//! default body. A marked method that cannot receive a generated body (say,
//! one returning `f32`) is an error at that method, and no implementation is
//! emitted for the trait.

#![forbid(unsafe_code)]

// ============================================================================
// Module Organization
// ============================================================================

mod parsing;

use exprbind_codegen::{
    Diagnostic, GenerationOutput, Generator, MarkerReference, Severity,
    scanner::marked_rejections,
    source::{Imports, annotations, records_from_trait},
};
use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::{quote, quote_spanned};
use syn::{ItemTrait, TraitItem, ext::IdentExt, parse_macro_input};

use parsing::BindingArgs;

// ============================================================================
// Public Macros
// ============================================================================

/// Generates `<Trait>Expressions`, a unit struct implementing the trait with a
/// body for every method marked with `#[expression("...")]`.
///
/// Each body constructs the configured evaluator from the template, binds
/// every placeholder to the parameter of the same name, evaluates and
/// converts the result to `f64`.
///
/// Every other method of the trait needs a default body. Marked methods must
/// return `f64` and have no body of their own; breaking either rule is a
/// compile error at the method.
///
/// # Arguments
///
/// - `evaluator = Path`: Type implementing `exprbind::runtime::Evaluator` (default: `Evaluator`)
/// - `runtime = Path`: Where the runtime contract lives (default: `::exprbind::runtime`)
/// - `enclosure = "square" | "curly" | "double_curly"`: Placeholder delimiters (default: square)
/// - `namespace = "..."`: Path the trait is reachable through from the expansion (default: `self`)
/// - `suffix = "..."`: Appended to the trait name for the generated type (default: `Expressions`)
/// - `marker = "..."`: Path of the marker attribute (default: `exprbind::expression`)
/// - `strict`: Turn parameter/placeholder mismatches into errors
///
/// # Example
///
/// ```ignore
/// use exprbind::{expression, expression_binding};
///
/// #[expression_binding(evaluator = my_math::Calculator)]
/// pub trait Geometry {
///     #[expression("2 * ([a] + [b])")]
///     fn sum_doubled(a: i32, b: i32) -> f64;
/// }
///
/// assert_eq!(<GeometryExpressions as Geometry>::sum_doubled(1, 2), 6.0);
/// ```
#[proc_macro_attribute]
pub fn expression_binding(args: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(args as BindingArgs);
    let mut item = parse_macro_input!(item as ItemTrait);

    match expand(&args, &mut item) {
        Ok(tokens) => tokens.into(),
        Err(error) => {
            let error = error.to_compile_error();
            quote!(#item #error).into()
        }
    }
}

/// Marks a trait method for `#[expression_binding]`. Inert on its own.
#[proc_macro_attribute]
pub fn expression(_args: TokenStream, item: TokenStream) -> TokenStream {
    item
}

// ============================================================================
// Expansion
// ============================================================================

fn expand(args: &BindingArgs, item: &mut ItemTrait) -> syn::Result<proc_macro2::TokenStream> {
    let config = args.to_config()?;
    let marker = config.marker.clone();
    let generator =
        Generator::new(config).map_err(|error| syn::Error::new(Span::call_site(), error))?;

    let imports = Imports::prelude(&marker);
    let records = records_from_trait(item, &args.namespace(), &imports);

    let rejections: Vec<_> = marked_rejections(&records, &marker)
        .into_iter()
        .map(|(record, reason)| {
            syn::Error::new(
                method_span(item, &record.name).unwrap_or_else(|| item.ident.span()),
                format!("`{}` cannot receive a generated body: {reason}", record.name),
            )
            .to_compile_error()
        })
        .collect();
    if !rejections.is_empty() {
        strip_markers(item, &marker, &imports);
        return Ok(quote! {
            #item
            #(#rejections)*
        });
    }

    let output = generator.generate(&records);

    let reports = report(&output, item);
    strip_markers(item, &marker, &imports);

    let units = output
        .units
        .iter()
        .map(|unit| {
            unit.source.parse::<proc_macro2::TokenStream>().map_err(|error| {
                syn::Error::new(
                    item.ident.span(),
                    format!("generated unit `{}` does not lex: {error}", unit.file_name),
                )
            })
        })
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        #item
        #(#units)*
        #(#reports)*
    })
}

/// Removes the marker attributes so the re-emitted trait does not depend on
/// the marker being in scope.
fn strip_markers(item: &mut ItemTrait, marker: &MarkerReference, imports: &Imports) {
    for trait_item in &mut item.items {
        if let TraitItem::Fn(method) = trait_item {
            method.attrs.retain(|attr| {
                !annotations(std::slice::from_ref(attr), imports)
                    .iter()
                    .any(|annotation| annotation.is_marker(marker))
            });
        }
    }
}

fn report(output: &GenerationOutput, item: &ItemTrait) -> Vec<proc_macro2::TokenStream> {
    output
        .diagnostics
        .iter()
        .map(|diagnostic| {
            let span = diagnostic_span(diagnostic, item);
            match diagnostic.severity {
                Severity::Error => syn::Error::new(span, diagnostic).to_compile_error(),
                Severity::Warning => warning(span, &diagnostic.to_string()),
            }
        })
        .collect()
}

/// Span of the method a diagnostic is about, else of the trait name.
fn diagnostic_span(diagnostic: &Diagnostic, item: &ItemTrait) -> Span {
    diagnostic
        .related_candidate
        .as_deref()
        .and_then(|qualified| qualified.rsplit("::").next())
        .and_then(|method| method_span(item, method))
        .unwrap_or_else(|| item.ident.span())
}

/// Span of the name of method `name`; names compare unraw.
fn method_span(item: &ItemTrait, name: &str) -> Option<Span> {
    item.items.iter().find_map(|trait_item| match trait_item {
        TraitItem::Fn(f) if f.sig.ident.unraw() == name => Some(f.sig.ident.span()),
        _ => None,
    })
}

fn warning(span: Span, message: &str) -> proc_macro2::TokenStream {
    quote_spanned! {span=>
        const _: () = {
            #[deprecated(note = #message)]
            #[allow(non_upper_case_globals)]
            const exprbind_warning: () = ();
            let _ = exprbind_warning;
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand_str(args: &str, mut item: ItemTrait) -> String {
        let args: BindingArgs = syn::parse_str(args).unwrap();
        expand(&args, &mut item).unwrap().to_string()
    }

    #[test]
    fn test_expansion_emits_trait_and_impl() {
        let expanded = expand_str(
            "evaluator = Engine",
            parse_quote! {
                pub trait Geometry {
                    #[expression("2 * [a]")]
                    fn double(a: f64) -> f64;
                }
            },
        );
        assert!(expanded.contains("pub trait Geometry"));
        assert!(expanded.contains("pub struct GeometryExpressions"));
        assert!(expanded.contains("impl self :: Geometry for GeometryExpressions"));
        assert!(!expanded.contains("# [expression"));
    }

    #[test]
    fn test_rejected_marked_method_is_named() {
        let expanded = expand_str(
            "",
            parse_quote! {
                pub trait Scaling {
                    #[expression("[a] * 2")]
                    fn double(a: f64) -> f64;

                    #[expression("[a] * 3")]
                    fn triple(a: f64) -> f32;
                }
            },
        );
        assert!(expanded.contains("compile_error"));
        assert!(expanded.contains("`triple` cannot receive a generated body: return type is not f64"));
        assert!(!expanded.contains("ScalingExpressions"));
        assert!(!expanded.contains("# [expression"));
    }

    #[test]
    fn test_marked_method_with_body_is_rejected() {
        let expanded = expand_str(
            "",
            parse_quote! {
                pub trait Defaults {
                    #[expression("[a]")]
                    fn same(a: f64) -> f64 { a }
                }
            },
        );
        assert!(expanded.contains("`same` cannot receive a generated body: already has a body"));
    }

    #[test]
    fn test_strict_mismatch_is_a_compile_error() {
        let expanded = expand_str(
            "strict",
            parse_quote! {
                trait Loose {
                    #[expression("[x] + [y]")]
                    fn f(x: f64) -> f64;
                }
            },
        );
        assert!(expanded.contains("compile_error"));
        assert!(expanded.contains("EXB0003"));
    }

    #[test]
    fn test_warning_is_a_deprecated_use() {
        let tokens = warning(Span::call_site(), "heads up").to_string();
        assert!(tokens.contains("deprecated"));
        assert!(tokens.contains("\"heads up\""));
        assert!(tokens.contains("let _ = exprbind_warning"));
    }

    #[test]
    fn test_missing_template_warns() {
        let expanded = expand_str(
            "",
            parse_quote! {
                trait Stub {
                    #[expression]
                    fn nothing(a: f64) -> f64;
                }
            },
        );
        assert!(expanded.contains("deprecated"));
        assert!(expanded.contains("NAN"));
    }
}
