use exprbind::expression_binding;

#[expression_binding(evaluatr = Engine)]
pub trait Geometry {
    #[exprbind::expression("2 * [a]")]
    fn double(a: f64) -> f64;
}

fn main() {}
