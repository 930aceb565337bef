#![allow(dead_code)]
use exprbind::expression_binding;
use exprbind::runtime::{Evaluator, Value};

#[expression_binding(evaluator = Constant, strict)]
trait Loose {
    #[exprbind::expression("[x] + [y]")]
    fn f(x: f64) -> f64;
}

pub struct Constant;

impl Evaluator for Constant {
    type Output = f64;

    fn construct(_template: &str) -> Self {
        Constant
    }

    fn bind(&mut self, _name: &str, _value: Value) {}

    fn evaluate(&self) -> f64 {
        0.0
    }
}

fn main() {}
