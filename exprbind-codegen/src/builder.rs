//! Structured construction of generated method bodies.
//!
//! Bodies are sequences of [`Statement`]s. They are rendered to tokens once, at
//! the end, by [`codegen`](crate::codegen), so what a body does can be checked
//! without looking at its formatting.

use serde::{Deserialize, Serialize};

use crate::constants::{BODY_INITIAL_CAPACITY, EVALUATOR_BINDING, RESULT_BINDING};
use crate::types::{Parameter, PlaceholderToken, ValidationOutcome};

/// One statement of a generated body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    /// `let [mut] <binding> = <Evaluator>::construct(<template>);`
    DeclareEvaluator {
        binding: String,
        template: String,
        mutable: bool,
    },
    /// `Evaluator::bind(&mut <binding>, <placeholder>, Value::from(<parameter>));`
    BindParameter {
        binding: String,
        placeholder: String,
        parameter: String,
    },
    /// `let <result> = Evaluator::evaluate(&<binding>);`
    Invoke { binding: String, result: String },
    /// Coerces `<result>` to `f64` and returns it.
    Return { result: String },
    /// A parameter the body does not bind: `let _ = &<parameter>;`
    Discard { parameter: String },
    /// Stub for a member without a usable template: returns NaN.
    NoExpression,
}

/// Builds the body of one member.
///
/// Local names avoid every parameter name, so a parameter called `evaluator`
/// is never shadowed before it is bound.
#[derive(Debug)]
pub struct BodyBuilder<'a> {
    parameters: &'a [Parameter],
    evaluator: String,
    result: String,
    statements: Vec<Statement>,
}

impl<'a> BodyBuilder<'a> {
    pub fn new(parameters: &'a [Parameter]) -> Self {
        Self {
            parameters,
            evaluator: unique_local(EVALUATOR_BINDING, parameters),
            result: unique_local(RESULT_BINDING, parameters),
            statements: Vec::with_capacity(BODY_INITIAL_CAPACITY),
        }
    }

    pub fn declare_evaluator(mut self, template: &str) -> Self {
        self.statements.push(Statement::DeclareEvaluator {
            binding: self.evaluator.clone(),
            template: template.to_owned(),
            mutable: false,
        });
        self
    }

    pub fn bind(mut self, placeholder: &str, parameter: &str) -> Self {
        if let Some(Statement::DeclareEvaluator { mutable, .. }) = self.statements.first_mut() {
            *mutable = true;
        }
        self.statements.push(Statement::BindParameter {
            binding: self.evaluator.clone(),
            placeholder: placeholder.to_owned(),
            parameter: parameter.to_owned(),
        });
        self
    }

    pub fn invoke(mut self) -> Self {
        self.statements.push(Statement::Invoke {
            binding: self.evaluator.clone(),
            result: self.result.clone(),
        });
        self
    }

    /// Discards every parameter that no statement binds, then returns the result.
    pub fn returning(mut self) -> Vec<Statement> {
        self.discard_unbound();
        self.statements.push(Statement::Return {
            result: self.result.clone(),
        });
        self.statements
    }

    /// The "no valid expression" body.
    pub fn no_expression(mut self) -> Vec<Statement> {
        self.statements.clear();
        self.discard_unbound();
        self.statements.push(Statement::NoExpression);
        self.statements
    }

    fn discard_unbound(&mut self) {
        let bound: Vec<&str> = self
            .statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::BindParameter { parameter, .. } => Some(parameter.as_str()),
                _ => None,
            })
            .collect();
        let discards: Vec<Statement> = self
            .parameters
            .iter()
            .filter(|p| !bound.contains(&p.name.as_str()))
            .map(|p| Statement::Discard {
                parameter: p.name.clone(),
            })
            .collect();
        self.statements.extend(discards);
    }
}

/// The full evaluate-and-return body for a template.
///
/// Binds, in first-occurrence order, every placeholder that names a declared
/// parameter; when validation found mismatches only the intersection is bound.
pub fn evaluation_body(
    parameters: &[Parameter],
    template: &str,
    tokens: &[PlaceholderToken],
    outcome: &ValidationOutcome,
) -> Vec<Statement> {
    tokens
        .iter()
        .filter(|token| outcome.matched_parameters.contains(&token.name))
        .fold(
            BodyBuilder::new(parameters).declare_evaluator(template),
            |builder, token| builder.bind(&token.name, &token.name),
        )
        .invoke()
        .returning()
}

fn unique_local(base: &str, parameters: &[Parameter]) -> String {
    let mut name = base.to_owned();
    while parameters.iter().any(|p| p.name == name) {
        name.push('_');
    }
    name
}
