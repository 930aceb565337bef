//! Contract between generated bodies and the expression evaluator.
//!
//! Generated code only ever talks to these items, through fully qualified
//! paths, so any type implementing [`Evaluator`] can back a binding.

/// A parameter value handed to the evaluator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Value {
    /// Numeric view of the value; `true` is `1.0`.
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Integer(i) => i as f64,
            Value::Float(f) => f,
            Value::Boolean(b) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

macro_rules! value_from {
    ($variant:ident as $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(value: $source) -> Self {
                    Value::$variant(<$target>::from(value))
                }
            }
        )+
    };
}

value_from!(Integer as i64: i8, i16, i32, i64, u8, u16, u32);
value_from!(Float as f64: f32, f64);
value_from!(Boolean as bool: bool);

/// An expression evaluator as generated bodies drive it:
/// construct from the template, bind every placeholder, evaluate once.
pub trait Evaluator: Sized {
    type Output: NumericResult;

    fn construct(template: &str) -> Self;

    /// `name` is the placeholder name without its delimiters.
    fn bind(&mut self, name: &str, value: Value);

    fn evaluate(&self) -> Self::Output;
}

/// Conversion of an evaluation result to the declared `f64` return type.
///
/// Failed evaluations convert to NaN.
pub trait NumericResult {
    fn into_f64(self) -> f64;
}

impl NumericResult for f64 {
    fn into_f64(self) -> f64 {
        self
    }
}

impl NumericResult for f32 {
    fn into_f64(self) -> f64 {
        f64::from(self)
    }
}

impl NumericResult for i64 {
    fn into_f64(self) -> f64 {
        self as f64
    }
}

impl NumericResult for i32 {
    fn into_f64(self) -> f64 {
        f64::from(self)
    }
}

impl NumericResult for Value {
    fn into_f64(self) -> f64 {
        self.as_f64()
    }
}

impl<T: NumericResult> NumericResult for Option<T> {
    fn into_f64(self) -> f64 {
        self.map_or(f64::NAN, NumericResult::into_f64)
    }
}

impl<T: NumericResult, E> NumericResult for Result<T, E> {
    fn into_f64(self) -> f64 {
        self.map_or(f64::NAN, NumericResult::into_f64)
    }
}
