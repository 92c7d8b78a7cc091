//! Arithmetic behind the operator and function keys.

use serde::Serialize;

use crate::error::CalcError;

/// Tolerance used to treat `cos(angle)` as zero when computing `tan`.
pub const TAN_COS_TOLERANCE: f64 = 1e-9;

/// Largest n for which n! fits in an `f64`.
const MAX_FACTORIAL: i64 = 170;

/// Binary operators that wait for a second operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl BinaryOp {
    /// Button label for this operator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "x^y",
        }
    }

    /// Compute `lhs op rhs`.
    pub fn apply(self, lhs: f64, rhs: f64) -> Result<f64, CalcError> {
        let value = match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => {
                if rhs == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                lhs / rhs
            }
            Self::Power => {
                if lhs == 0.0 && rhs < 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                if lhs < 0.0 && rhs.fract() != 0.0 {
                    return Err(CalcError::domain(
                        "fractional power of a negative number",
                    ));
                }
                lhs.powf(rhs)
            }
        };
        finite(value)
    }
}

/// Functions applied immediately to the displayed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Factorial,
}

impl UnaryFn {
    /// Button label for this function.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Sqrt => "√",
            Self::Factorial => "!",
        }
    }

    /// Evaluate the function. Trigonometric arguments are in degrees.
    pub fn apply(self, x: f64) -> Result<f64, CalcError> {
        let value = match self {
            Self::Sin => x.to_radians().sin(),
            Self::Cos => x.to_radians().cos(),
            Self::Tan => {
                let angle = x.to_radians();
                if angle.cos().abs() < TAN_COS_TOLERANCE {
                    return Err(CalcError::domain("tangent undefined at this angle"));
                }
                angle.tan()
            }
            Self::Sqrt => {
                if x < 0.0 {
                    return Err(CalcError::domain("square root of a negative number"));
                }
                x.sqrt()
            }
            Self::Factorial => factorial(x)?,
        };
        finite(value)
    }
}

/// Factorial of the integer truncation of `x`.
fn factorial(x: f64) -> Result<f64, CalcError> {
    let n = x.trunc();
    if n < 0.0 {
        return Err(CalcError::domain("factorial of a negative number"));
    }
    if n > MAX_FACTORIAL as f64 {
        return Err(CalcError::domain("factorial result out of range"));
    }

    Ok((2..=n as i64).fold(1.0, |acc, k| acc * k as f64))
}

fn finite(value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::domain("result out of range"))
    }
}
