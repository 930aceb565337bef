//! Argument parsing for `#[expression_binding(...)]`.

use exprbind_codegen::{EnclosureScheme, GeneratorConfig, MarkerReference, ValidationPolicy};
use quote::ToTokens;
use syn::{
    Ident, LitStr, Path, Token,
    parse::{Parse, ParseStream},
};

/// Parsed attribute arguments, all optional.
///
/// ```ignore
/// #[expression_binding(
///     evaluator = my::Engine,
///     runtime = ::exprbind::runtime,
///     enclosure = "curly",
///     namespace = "self",
///     suffix = "Impl",
///     marker = "exprbind::expression",
///     strict,
/// )]
/// ```
pub struct BindingArgs {
    pub evaluator: Option<Path>,
    pub runtime: Option<Path>,
    pub enclosure: Option<LitStr>,
    pub namespace: Option<LitStr>,
    pub suffix: Option<LitStr>,
    pub marker: Option<LitStr>,
    pub strict: bool,
}

impl Parse for BindingArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut args = BindingArgs {
            evaluator: None,
            runtime: None,
            enclosure: None,
            namespace: None,
            suffix: None,
            marker: None,
            strict: false,
        };

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            if key == "strict" {
                args.strict = true;
            } else {
                input.parse::<Token![=]>()?;
                match key.to_string().as_str() {
                    "evaluator" => set(&mut args.evaluator, &key, input.parse()?)?,
                    "runtime" => set(&mut args.runtime, &key, input.parse()?)?,
                    "enclosure" => set(&mut args.enclosure, &key, input.parse()?)?,
                    "namespace" => set(&mut args.namespace, &key, input.parse()?)?,
                    "suffix" => set(&mut args.suffix, &key, input.parse()?)?,
                    "marker" => set(&mut args.marker, &key, input.parse()?)?,
                    other => {
                        return Err(syn::Error::new(
                            key.span(),
                            format!(
                                "unknown argument `{other}`; expected one of: evaluator, runtime, \
                                 enclosure, namespace, suffix, marker, strict"
                            ),
                        ));
                    }
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        Ok(args)
    }
}

fn set<T>(slot: &mut Option<T>, key: &Ident, value: T) -> syn::Result<()> {
    if slot.is_some() {
        return Err(syn::Error::new(
            key.span(),
            format!("duplicate argument `{key}`"),
        ));
    }
    *slot = Some(value);
    Ok(())
}

impl BindingArgs {
    /// Module path the generated `impl` names the trait through.
    pub fn namespace(&self) -> String {
        self.namespace
            .as_ref()
            .map_or_else(|| "self".to_owned(), LitStr::value)
    }

    /// Overlays the arguments on the default configuration.
    pub fn to_config(&self) -> syn::Result<GeneratorConfig> {
        let mut config = GeneratorConfig::default();
        if let Some(evaluator) = &self.evaluator {
            config.evaluator = evaluator.to_token_stream().to_string();
        }
        if let Some(runtime) = &self.runtime {
            config.runtime = runtime.to_token_stream().to_string();
        }
        if let Some(enclosure) = &self.enclosure {
            config.enclosure = EnclosureScheme::from_name(&enclosure.value());
        }
        if let Some(suffix) = &self.suffix {
            config.impl_suffix = suffix.value();
        }
        if let Some(marker) = &self.marker {
            config.marker = marker
                .value()
                .parse::<MarkerReference>()
                .map_err(|error| syn::Error::new(marker.span(), error.to_string()))?;
        }
        if self.strict {
            config.validation = ValidationPolicy::Strict;
        }
        Ok(config)
    }
}
