#![allow(dead_code)]
use exprbind::expression_binding;

#[expression_binding]
pub trait Scaling {
    #[exprbind::expression("[a] * 2")]
    fn double(a: f64) -> f64;
    #[exprbind::expression("[a] * 3")]
    fn triple(a: f64) -> f32;
}

fn main() {}
