//! Button-press tokens.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CalcError;
use crate::ops::{BinaryOp, UnaryFn};

/// One button press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum Token {
    /// A digit `0`-`9` or the decimal point.
    Digit(char),
    Operator(BinaryOp),
    Equals,
    Clear,
    ToggleSign,
    Percent,
    Function(UnaryFn),
}

impl Token {
    /// Canonical button label.
    pub fn label(&self) -> String {
        match self {
            Self::Digit(c) => c.to_string(),
            Self::Operator(op) => op.label().to_string(),
            Self::Equals => "=".to_string(),
            Self::Clear => "AC".to_string(),
            Self::ToggleSign => "+/-".to_string(),
            Self::Percent => "%".to_string(),
            Self::Function(f) => f.label().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl FromStr for Token {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = match s {
            "+" => Self::Operator(BinaryOp::Add),
            "-" => Self::Operator(BinaryOp::Subtract),
            "*" => Self::Operator(BinaryOp::Multiply),
            "/" => Self::Operator(BinaryOp::Divide),
            "x^y" | "^" | "**" => Self::Operator(BinaryOp::Power),
            "=" => Self::Equals,
            "AC" | "ac" | "C" => Self::Clear,
            "+/-" => Self::ToggleSign,
            "%" => Self::Percent,
            "sin" => Self::Function(UnaryFn::Sin),
            "cos" => Self::Function(UnaryFn::Cos),
            "tan" => Self::Function(UnaryFn::Tan),
            "√" | "sqrt" => Self::Function(UnaryFn::Sqrt),
            "!" => Self::Function(UnaryFn::Factorial),
            _ => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if is_digit_key(c) => Self::Digit(c),
                    _ => return Err(CalcError::UnknownToken(s.to_string())),
                }
            }
        };
        Ok(token)
    }
}

fn is_digit_key(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

/// Split typed input into tokens.
///
/// Words are separated by whitespace. A word is either a button label or a
/// run of digits and decimal points, which becomes one digit token per
/// character (`"10"` presses `1` then `0`).
pub fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();

    for word in input.split_whitespace() {
        if let Ok(token) = word.parse::<Token>() {
            tokens.push(token);
        } else if word.chars().all(is_digit_key) {
            tokens.extend(word.chars().map(Token::Digit));
        } else {
            return Err(CalcError::UnknownToken(word.to_string()));
        }
    }

    Ok(tokens)
}
