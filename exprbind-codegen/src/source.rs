//! Rust source adapter: maps `syn` items to [`DeclarationRecord`]s.
//!
//! Traits are the containing types; their bodiless methods are the stubs.
//! Functions in `extern` blocks are recorded as abstract so the scanner can
//! turn them down. Attribute paths are resolved through the `use` declarations
//! of the module they appear in.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use quote::ToTokens;
use syn::ext::IdentExt;
use syn::punctuated::Punctuated;
use syn::{
    Attribute, Expr, ExprLit, FnArg, ForeignItem, Item, ItemForeignMod, ItemTrait, Lit, Pat,
    ReturnType, Signature, Token, TraitItem, UseTree,
};

use crate::config::MarkerReference;
use crate::declaration::{Annotation, AnnotationArgument, DeclarationRecord, Modifiers, Visibility};
use crate::error::SourceError;
use crate::types::{Parameter, Receiver};

/// Names brought into scope by `use` declarations: local name → full path.
#[derive(Debug, Clone, Default)]
pub struct Imports {
    names: HashMap<String, String>,
}

impl Imports {
    /// Collects the imports declared directly among `items`.
    pub fn from_items(items: &[Item]) -> Self {
        let mut imports = Self::default();
        for item in items {
            if let Item::Use(item_use) = item {
                imports.collect(&item_use.tree, String::new());
            }
        }
        imports
    }

    /// Imports in which the bare marker name resolves to the marker.
    pub fn prelude(marker: &MarkerReference) -> Self {
        let mut imports = Self::default();
        imports.insert(marker.name().to_owned(), marker.to_string());
        imports
    }

    pub fn insert(&mut self, local: String, path: String) {
        self.names.insert(local, path);
    }

    fn collect(&mut self, tree: &UseTree, prefix: String) {
        let join = |name: &str| {
            if prefix.is_empty() {
                name.to_owned()
            } else {
                format!("{prefix}::{name}")
            }
        };
        match tree {
            UseTree::Path(path) => self.collect(&path.tree, join(&path.ident.to_string())),
            UseTree::Name(name) => {
                let name = name.ident.to_string();
                if name != "self" {
                    self.names.insert(name.clone(), join(&name));
                }
            }
            UseTree::Rename(rename) => {
                self.names
                    .insert(rename.rename.to_string(), join(&rename.ident.to_string()));
            }
            UseTree::Group(group) => {
                for tree in &group.items {
                    self.collect(tree, prefix.clone());
                }
            }
            UseTree::Glob(_) => {}
        }
    }

    /// Resolves an attribute path to `(namespace, name)`.
    fn resolve(&self, path: &syn::Path) -> (String, String) {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let full = match segments.split_first() {
            Some((first, rest)) => match self.names.get(first) {
                Some(imported) => std::iter::once(imported.clone())
                    .chain(rest.iter().cloned())
                    .collect::<Vec<_>>()
                    .join("::"),
                None => segments.join("::"),
            },
            None => String::new(),
        };
        match full.rsplit_once("::") {
            Some((namespace, name)) => (namespace.to_owned(), name.to_owned()),
            None => (String::new(), full),
        }
    }
}

/// Parses a whole source file. `root_namespace` is the module path of the file
/// itself, usually `crate`.
pub fn parse_source(source: &str, root_namespace: &str) -> Result<Vec<DeclarationRecord>, SourceError> {
    let file = syn::parse_file(source)?;
    let mut records = Vec::new();
    collect_items(&file.items, root_namespace, &mut records);
    Ok(records)
}

pub fn parse_file(path: &Path, root_namespace: &str) -> Result<Vec<DeclarationRecord>, SourceError> {
    let source = fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_source(&source, root_namespace)
}

fn collect_items(items: &[Item], namespace: &str, records: &mut Vec<DeclarationRecord>) {
    let imports = Imports::from_items(items);
    for item in items {
        match item {
            Item::Trait(item_trait) => {
                records.extend(records_from_trait(item_trait, namespace, &imports));
            }
            Item::ForeignMod(foreign) => {
                records.extend(records_from_foreign_mod(foreign, namespace, &imports));
            }
            Item::Mod(module) => {
                if let Some((_, items)) = &module.content {
                    let nested = format!("{namespace}::{}", module.ident);
                    collect_items(items, &nested, records);
                }
            }
            _ => {}
        }
    }
}

/// One record per method of the trait.
pub fn records_from_trait(
    item: &ItemTrait,
    namespace: &str,
    imports: &Imports,
) -> Vec<DeclarationRecord> {
    let trait_is_plain = item.generics.params.is_empty() && item.generics.where_clause.is_none();
    let visibility = visibility(&item.vis);

    item.items
        .iter()
        .filter_map(|trait_item| match trait_item {
            TraitItem::Fn(method) => Some(method),
            _ => None,
        })
        .map(|method| {
            let shape = SignatureShape::of(&method.sig);
            DeclarationRecord {
                name: method.sig.ident.unraw().to_string(),
                containing_type: item.ident.to_string(),
                containing_namespace: namespace.to_owned(),
                receiver: shape.receiver,
                parameters: shape.parameters,
                return_type: return_type(&method.sig.output),
                modifiers: Modifiers {
                    visibility,
                    is_virtual: true,
                    is_abstract: false,
                },
                annotations: annotations(&method.attrs, imports),
                has_body: method.default.is_some(),
                fixed_shape: trait_is_plain && shape.plain,
            }
        })
        .collect()
}

fn records_from_foreign_mod(
    foreign: &ItemForeignMod,
    namespace: &str,
    imports: &Imports,
) -> Vec<DeclarationRecord> {
    foreign
        .items
        .iter()
        .filter_map(|item| match item {
            ForeignItem::Fn(function) => Some(function),
            _ => None,
        })
        .map(|function| {
            let shape = SignatureShape::of(&function.sig);
            DeclarationRecord {
                name: function.sig.ident.unraw().to_string(),
                containing_type: String::new(),
                containing_namespace: namespace.to_owned(),
                receiver: shape.receiver,
                parameters: shape.parameters,
                return_type: return_type(&function.sig.output),
                modifiers: Modifiers {
                    visibility: visibility(&function.vis),
                    is_virtual: false,
                    is_abstract: true,
                },
                annotations: annotations(&function.attrs, imports),
                has_body: false,
                fixed_shape: shape.plain,
            }
        })
        .collect()
}

struct SignatureShape {
    receiver: Option<Receiver>,
    parameters: Vec<Parameter>,
    plain: bool,
}

impl SignatureShape {
    fn of(sig: &Signature) -> Self {
        let mut plain = sig.generics.params.is_empty()
            && sig.generics.where_clause.is_none()
            && sig.asyncness.is_none()
            && sig.unsafety.is_none()
            && sig.constness.is_none()
            && sig.abi.is_none()
            && sig.variadic.is_none();
        let mut receiver = None;
        let mut parameters = Vec::with_capacity(sig.inputs.len());

        for input in &sig.inputs {
            match input {
                FnArg::Receiver(recv) => {
                    if recv.colon_token.is_some() {
                        plain = false;
                    }
                    receiver = Some(match (&recv.reference, recv.mutability) {
                        (Some(_), Some(_)) => Receiver::Exclusive,
                        (Some(_), None) => Receiver::Shared,
                        (None, _) => Receiver::Owned,
                    });
                }
                FnArg::Typed(typed) => match &*typed.pat {
                    Pat::Ident(ident) if ident.subpat.is_none() && ident.by_ref.is_none() => {
                        parameters.push(Parameter::new(
                            ident.ident.unraw().to_string(),
                            typed.ty.to_token_stream().to_string(),
                        ));
                    }
                    _ => plain = false,
                },
            }
        }

        Self {
            receiver,
            parameters,
            plain,
        }
    }
}

fn visibility(vis: &syn::Visibility) -> Visibility {
    match vis {
        syn::Visibility::Public(_) => Visibility::Public,
        syn::Visibility::Restricted(_) => Visibility::Restricted,
        syn::Visibility::Inherited => Visibility::Private,
    }
}

fn return_type(output: &ReturnType) -> String {
    match output {
        ReturnType::Default => String::new(),
        ReturnType::Type(_, ty) => ty.to_token_stream().to_string(),
    }
}

/// Resolves every outer attribute into an [`Annotation`].
pub fn annotations(attrs: &[Attribute], imports: &Imports) -> Vec<Annotation> {
    attrs
        .iter()
        .map(|attr| {
            let (namespace, name) = imports.resolve(attr.path());
            Annotation {
                namespace,
                name,
                arguments: arguments(attr),
            }
        })
        .collect()
}

fn arguments(attr: &Attribute) -> Vec<AnnotationArgument> {
    let syn::Meta::List(list) = &attr.meta else {
        return Vec::new();
    };
    match list.parse_args_with(Punctuated::<Expr, Token![,]>::parse_terminated) {
        Ok(exprs) => exprs.iter().map(argument).collect(),
        Err(_) => vec![AnnotationArgument::Expression(list.tokens.to_string())],
    }
}

fn argument(expr: &Expr) -> AnnotationArgument {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(text),
            ..
        }) => AnnotationArgument::Literal(text.value()),
        Expr::Assign(assign) => AnnotationArgument::Named {
            name: assign.left.to_token_stream().to_string(),
            value: assign.right.to_token_stream().to_string(),
        },
        other => AnnotationArgument::Expression(other.to_token_stream().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn find<'a>(records: &'a [DeclarationRecord], name: &str) -> &'a DeclarationRecord {
        records.iter().find(|r| r.name == name).unwrap()
    }

    #[test]
    fn test_trait_methods_become_records() {
        let records = parse_source(
            indoc! {r#"
                pub trait Shapes {
                    #[exprbind::expression("[w]*[h]")]
                    fn area(&self, w: f64, h: f64) -> f64;

                    fn helper(&self) -> f64 { 1.0 }
                }
            "#},
            "crate",
        )
        .unwrap();

        assert_eq!(records.len(), 2);
        let area = find(&records, "area");
        assert_eq!(area.containing_type, "Shapes");
        assert_eq!(area.containing_namespace, "crate");
        assert_eq!(area.receiver, Some(Receiver::Shared));
        assert_eq!(area.parameters, [Parameter::new("w", "f64"), Parameter::new("h", "f64")]);
        assert_eq!(area.return_type, "f64");
        assert_eq!(area.modifiers.visibility, Visibility::Public);
        assert!(!area.has_body);
        assert!(area.fixed_shape);
        assert_eq!(area.annotations[0].namespace, "exprbind");
        assert_eq!(area.annotations[0].name, "expression");
        assert_eq!(
            area.annotations[0].arguments,
            [AnnotationArgument::Literal("[w]*[h]".into())]
        );

        assert!(find(&records, "helper").has_body);
    }

    #[test]
    fn test_use_declarations_resolve_bare_attributes() {
        let records = parse_source(
            indoc! {r#"
                mod geometry {
                    use exprbind::expression;
                    use other::{expression as formula};

                    pub trait Solids {
                        #[expression("[r]*[r]*[r]")]
                        fn cube(r: f64) -> f64;

                        #[formula("[r]")]
                        fn other(r: f64) -> f64;
                    }
                }
            "#},
            "crate",
        )
        .unwrap();

        let cube = find(&records, "cube");
        assert_eq!(cube.containing_namespace, "crate::geometry");
        assert_eq!(cube.annotations[0].namespace, "exprbind");

        let other = find(&records, "other");
        assert_eq!(other.annotations[0].namespace, "other");
        assert_eq!(other.annotations[0].name, "expression");
    }

    #[test]
    fn test_unresolved_bare_attribute_has_empty_namespace() {
        let records = parse_source(
            "trait Local { #[expression(\"[a]\")] fn f(a: i32) -> f64; }",
            "crate",
        )
        .unwrap();
        assert_eq!(records[0].annotations[0].namespace, "");
        assert_eq!(records[0].modifiers.visibility, Visibility::Private);
    }

    #[test]
    fn test_shapes_outside_the_contract() {
        let records = parse_source(
            indoc! {r#"
                pub trait Odd {
                    fn generic<T>(a: T) -> f64;
                    async fn later(a: f64) -> f64;
                    unsafe fn risky(a: f64) -> f64;
                    fn destructured((a, b): (f64, f64)) -> f64;
                    fn boxed(self: Box<Self>, a: f64) -> f64;
                    fn fine(mut self, a: f64) -> f64;
                }
                pub trait Wrapper<T> {
                    fn wrapped(a: f64) -> f64;
                }
            "#},
            "crate",
        )
        .unwrap();

        for name in ["generic", "later", "risky", "destructured", "boxed", "wrapped"] {
            assert!(!find(&records, name).fixed_shape, "{name} should not be plain");
        }
        let fine = find(&records, "fine");
        assert!(fine.fixed_shape);
        assert_eq!(fine.receiver, Some(Receiver::Owned));
    }

    #[test]
    fn test_extern_functions_are_abstract() {
        let records = parse_source(
            indoc! {r#"
                extern "C" {
                    #[exprbind::expression("[a]")]
                    pub fn external(a: f64) -> f64;
                }
            "#},
            "crate",
        )
        .unwrap();
        assert!(records[0].modifiers.is_abstract);
    }

    #[test]
    fn test_argument_kinds() {
        let records = parse_source(
            indoc! {r#"
                pub trait Args {
                    #[exprbind::expression(FORMULA, note = "x", "[a]")]
                    fn f(a: f64) -> f64;
                }
            "#},
            "crate",
        )
        .unwrap();
        assert_eq!(
            records[0].annotations[0].arguments,
            [
                AnnotationArgument::Expression("FORMULA".into()),
                AnnotationArgument::Named {
                    name: "note".into(),
                    value: "\"x\"".into()
                },
                AnnotationArgument::Literal("[a]".into()),
            ]
        );
    }

    #[test]
    fn test_prelude_resolves_marker_name() {
        let marker = MarkerReference::default();
        let imports = Imports::prelude(&marker);
        let attr: Attribute = syn::parse_quote!(#[expression("[a]")]);
        let annotations = annotations(&[attr], &imports);
        assert!(annotations[0].is_marker(&marker));
    }

    #[test]
    fn test_raw_identifiers_are_unraw() {
        let records = parse_source(
            "pub trait Kinds { #[exprbind::expression(\"[type] * 2\")] fn r#match(r#type: f64) -> f64; }",
            "crate",
        )
        .unwrap();
        assert_eq!(records[0].name, "match");
        assert_eq!(records[0].parameters, [Parameter::new("type", "f64")]);
    }

    #[test]
    fn test_invalid_source() {
        assert!(matches!(parse_source("trait {", "crate"), Err(SourceError::Parse(_))));
    }
}
