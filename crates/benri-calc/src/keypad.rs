//! Keypad layout as data.
//!
//! Buttons differ only in label, kind and width; the kind decides the colors.
//! A rendering surface walks `KEYPAD` row by row and feeds each pressed
//! label back through [`crate::Calculator::press`].

use serde::Serialize;

use crate::error::CalcError;
use crate::token::Token;

/// Button category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonKind {
    /// Digits and the decimal point
    Digit,
    /// Binary operators and `=`
    Action,
    /// Clear, sign, percent and scientific functions
    Extra,
}

/// Background and text colors, named after the toolkit palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonStyle {
    pub background: &'static str,
    pub foreground: &'static str,
}

impl ButtonKind {
    pub const fn style(self) -> ButtonStyle {
        match self {
            Self::Digit => ButtonStyle {
                background: "white24",
                foreground: "white",
            },
            Self::Action => ButtonStyle {
                background: "orange",
                foreground: "white",
            },
            Self::Extra => ButtonStyle {
                background: "blue_grey_100",
                foreground: "black",
            },
        }
    }
}

/// One button on the keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ButtonSpec {
    pub label: &'static str,
    pub kind: ButtonKind,
    /// Relative width within its row
    pub span: u8,
    pub style: ButtonStyle,
}

impl ButtonSpec {
    const fn new(label: &'static str, kind: ButtonKind, span: u8) -> Self {
        Self {
            label,
            kind,
            span,
            style: kind.style(),
        }
    }

    const fn digit(label: &'static str) -> Self {
        Self::new(label, ButtonKind::Digit, 1)
    }

    const fn action(label: &'static str) -> Self {
        Self::new(label, ButtonKind::Action, 1)
    }

    const fn extra(label: &'static str) -> Self {
        Self::new(label, ButtonKind::Extra, 1)
    }

    /// Token sent when this button is pressed.
    pub fn token(&self) -> Result<Token, CalcError> {
        self.label.parse()
    }
}

/// Rows of the calculator keypad, top to bottom.
pub const KEYPAD: &[&[ButtonSpec]] = &[
    &[
        ButtonSpec::extra("AC"),
        ButtonSpec::extra("+/-"),
        ButtonSpec::extra("%"),
        ButtonSpec::action("/"),
    ],
    &[
        ButtonSpec::digit("7"),
        ButtonSpec::digit("8"),
        ButtonSpec::digit("9"),
        ButtonSpec::action("*"),
    ],
    &[
        ButtonSpec::digit("4"),
        ButtonSpec::digit("5"),
        ButtonSpec::digit("6"),
        ButtonSpec::action("-"),
    ],
    &[
        ButtonSpec::digit("1"),
        ButtonSpec::digit("2"),
        ButtonSpec::digit("3"),
        ButtonSpec::action("+"),
    ],
    &[
        ButtonSpec::new("0", ButtonKind::Digit, 2),
        ButtonSpec::digit("."),
        ButtonSpec::action("="),
    ],
    &[
        ButtonSpec::extra("sin"),
        ButtonSpec::extra("cos"),
        ButtonSpec::extra("tan"),
        ButtonSpec::extra("x^y"),
        ButtonSpec::extra("√"),
    ],
    &[ButtonSpec::extra("!")],
];

/// Every button, row by row.
pub fn buttons() -> impl Iterator<Item = &'static ButtonSpec> {
    KEYPAD.iter().flat_map(|row| row.iter())
}
