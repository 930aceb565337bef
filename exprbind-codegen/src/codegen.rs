//! Rendering of generated members and units to Rust tokens and source text.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{Ident, LitStr, Path, Type};

use crate::builder::Statement;
use crate::constants::GENERATED_FILE_SUFFIX;
use crate::error::EmissionError;
use crate::types::{GeneratedMember, GroupKey, Receiver};
use crate::validation::is_valid_identifier;

/// Paths generated code refers to, parsed once from the configuration.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub evaluator: Path,
    pub runtime: Path,
    pub impl_suffix: String,
}

impl RenderContext {
    /// Renders one statement of a body.
    pub fn statement(&self, statement: &Statement) -> Result<TokenStream, syn::Error> {
        let evaluator = &self.evaluator;
        let runtime = &self.runtime;

        let tokens = match statement {
            Statement::DeclareEvaluator {
                binding,
                template,
                mutable,
            } => {
                let binding = local(binding)?;
                let template = LitStr::new(template, Span::call_site());
                let mutability = mutable.then(|| quote!(mut));
                quote! {
                    let #mutability #binding = <#evaluator as #runtime::Evaluator>::construct(#template);
                }
            }
            Statement::BindParameter {
                binding,
                placeholder,
                parameter,
            } => {
                let binding = local(binding)?;
                let parameter = local(parameter)?;
                let placeholder = LitStr::new(placeholder, Span::call_site());
                quote! {
                    #runtime::Evaluator::bind(&mut #binding, #placeholder, #runtime::Value::from(#parameter));
                }
            }
            Statement::Invoke { binding, result } => {
                let binding = local(binding)?;
                let result = local(result)?;
                quote! {
                    let #result = #runtime::Evaluator::evaluate(&#binding);
                }
            }
            Statement::Return { result } => {
                let result = local(result)?;
                quote! {
                    #runtime::NumericResult::into_f64(#result)
                }
            }
            Statement::Discard { parameter } => {
                let parameter = local(parameter)?;
                quote! {
                    let _ = &#parameter;
                }
            }
            Statement::NoExpression => quote! {
                <f64>::NAN
            },
        };
        Ok(tokens)
    }

    /// Renders a member as an associated function of the trait impl.
    pub fn member(&self, member: &GeneratedMember) -> Result<TokenStream, EmissionError> {
        let signature = &member.signature;
        let invalid = |what: &'static str, text: &str, source: syn::Error| {
            EmissionError::InvalidSignature {
                member: signature.name.clone(),
                what,
                text: text.to_owned(),
                source,
            }
        };

        let name = local(&signature.name).map_err(|e| invalid("name", &signature.name, e))?;
        let receiver = signature.receiver.map(|receiver| match receiver {
            Receiver::Shared => quote!(&self,),
            Receiver::Exclusive => quote!(&mut self,),
            Receiver::Owned => quote!(self,),
        });
        let parameters = signature
            .parameters
            .iter()
            .map(|p| {
                let ident = local(&p.name).map_err(|e| invalid("parameter", &p.name, e))?;
                let ty: Type = syn::parse_str(&p.ty).map_err(|e| invalid("type", &p.ty, e))?;
                Ok(quote!(#ident: #ty))
            })
            .collect::<Result<Vec<_>, EmissionError>>()?;
        let statements = member
            .body
            .iter()
            .map(|statement| self.statement(statement))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| invalid("body", &signature.name, e))?;

        Ok(quote! {
            fn #name(#receiver #(#parameters),*) -> f64 {
                #(#statements)*
            }
        })
    }

    /// Renders a whole unit around already rendered members: the implementing
    /// type and its trait impl.
    pub fn unit(&self, key: &GroupKey, members: &[TokenStream]) -> Result<TokenStream, EmissionError> {
        let trait_path = trait_path(key)?;
        let name = format!("{}{}", key.containing_type, self.impl_suffix);
        let impl_ident: Ident = syn::parse_str(&name)
            .map_err(|source| EmissionError::InvalidImplName { name, source })?;
        let doc = format!("Expression bindings generated for `{key}`.");

        Ok(quote! {
            #[doc = #doc]
            #[derive(Debug, Clone, Copy, Default)]
            pub struct #impl_ident;

            impl #trait_path for #impl_ident {
                #(#members)*
            }
        })
    }
}

/// `namespace::Type`, validated.
fn trait_path(key: &GroupKey) -> Result<Path, EmissionError> {
    if key.containing_type.is_empty() {
        return Err(EmissionError::MissingContainingType {
            namespace: key.containing_namespace.clone(),
        });
    }
    if key.containing_namespace.is_empty() {
        return Err(EmissionError::MissingNamespace {
            containing_type: key.containing_type.clone(),
        });
    }
    if !is_valid_identifier(&key.containing_type) {
        return Err(EmissionError::InvalidTypeName(key.containing_type.clone()));
    }
    let text = format!("{}::{}", key.containing_namespace, key.containing_type);
    syn::parse_str(&text).map_err(|source| EmissionError::InvalidNamespace {
        namespace: key.containing_namespace.clone(),
        source,
    })
}

/// Names are stored unraw; keywords come back as raw identifiers.
fn local(name: &str) -> Result<Ident, syn::Error> {
    syn::parse_str(name).or_else(|error| {
        if is_valid_identifier(name) {
            return Err(error);
        }
        syn::parse_str(&format!("r#{name}")).map_err(|_| error)
    })
}

/// Pretty-prints generated tokens.
pub fn format_tokens(tokens: TokenStream) -> Result<String, EmissionError> {
    let file = syn::parse2::<syn::File>(tokens).map_err(EmissionError::Format)?;
    Ok(prettyplease::unparse(&file))
}

/// `crate.geometry.Shapes.generated.rs`
pub fn unit_file_name(key: &GroupKey) -> String {
    let mut segments: Vec<&str> = key
        .containing_namespace
        .split("::")
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect();
    segments.push(&key.containing_type);
    format!("{}{GENERATED_FILE_SUFFIX}", segments.join("."))
}
