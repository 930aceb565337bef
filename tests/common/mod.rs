//! A small arithmetic evaluator backing the bindings under test.
//!
//! Grammar: `+ - * /`, unary minus, parentheses, numbers and variables.
//! Variables may be written bare or in any of the three enclosures.

use std::collections::HashMap;

use exprbind::runtime::{Evaluator, Value};
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0, one_of},
    combinator::{all_consuming, map, recognize},
    multi::{fold_many0, many0_count},
    number::complete::double,
    sequence::{delimited, pair, preceded},
};

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(f64),
    Variable(String),
    Negate(Box<Expr>),
    Binary(char, Box<Expr>, Box<Expr>),
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0_count(alt((alphanumeric1, tag("_")))),
    ))
    .parse(input)
}

fn variable(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(tag("{{"), identifier, tag("}}")),
            delimited(char('['), identifier, char(']')),
            delimited(char('{'), identifier, char('}')),
            identifier,
        )),
        |name: &str| Expr::Variable(name.to_owned()),
    )
    .parse(input)
}

fn factor(input: &str) -> IResult<&str, Expr> {
    delimited(
        multispace0,
        alt((
            delimited(char('('), expression, char(')')),
            variable,
            map(double, Expr::Number),
            map(preceded(char('-'), factor), |inner| {
                Expr::Negate(Box::new(inner))
            }),
        )),
        multispace0,
    )
    .parse(input)
}

fn binary<'a>(
    input: &'a str,
    operators: &'static str,
    operand: fn(&'a str) -> IResult<&'a str, Expr>,
) -> IResult<&'a str, Expr> {
    let (input, first) = operand(input)?;
    fold_many0(
        pair(one_of(operators), operand),
        move || first.clone(),
        |lhs, (op, rhs)| Expr::Binary(op, Box::new(lhs), Box::new(rhs)),
    )
    .parse(input)
}

fn term(input: &str) -> IResult<&str, Expr> {
    binary(input, "*/", factor)
}

fn expression(input: &str) -> IResult<&str, Expr> {
    binary(input, "+-", term)
}

fn eval(expr: &Expr, variables: &HashMap<String, f64>) -> Result<f64, String> {
    Ok(match expr {
        Expr::Number(n) => *n,
        Expr::Variable(name) => *variables
            .get(name)
            .ok_or_else(|| format!("unbound variable `{name}`"))?,
        Expr::Negate(inner) => -eval(inner, variables)?,
        Expr::Binary(op, lhs, rhs) => {
            let (lhs, rhs) = (eval(lhs, variables)?, eval(rhs, variables)?);
            match op {
                '+' => lhs + rhs,
                '-' => lhs - rhs,
                '*' => lhs * rhs,
                '/' if rhs == 0.0 => return Err("division by zero".to_owned()),
                _ => lhs / rhs,
            }
        }
    })
}

#[derive(Debug)]
pub struct Calculator {
    parsed: Result<Expr, String>,
    variables: HashMap<String, f64>,
}

impl Evaluator for Calculator {
    type Output = Result<f64, String>;

    fn construct(template: &str) -> Self {
        let parsed = all_consuming(expression)
            .parse(template)
            .map(|(_, expr)| expr)
            .map_err(|error| error.to_string());
        Self {
            parsed,
            variables: HashMap::new(),
        }
    }

    fn bind(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_owned(), value.as_f64());
    }

    fn evaluate(&self) -> Self::Output {
        let expr = self.parsed.as_ref().map_err(Clone::clone)?;
        eval(expr, &self.variables)
    }
}

/// Sums whatever gets bound; ignores the template.
#[derive(Debug, Default)]
pub struct Summing {
    total: f64,
}

impl Evaluator for Summing {
    type Output = f64;

    fn construct(_template: &str) -> Self {
        Self::default()
    }

    fn bind(&mut self, _name: &str, value: Value) {
        self.total += value.as_f64();
    }

    fn evaluate(&self) -> f64 {
        self.total
    }
}
