//! Calculator input state machine.
//!
//! `CalcState::apply` is a pure transition: it consumes the current state and
//! one token and returns the next state. `Calculator` owns a state for
//! callers that want a mutable handle and logs every press.

use crate::error::CalcError;
use crate::format::{format_with_places, DEFAULT_DECIMAL_PLACES};
use crate::ops::BinaryOp;
use crate::token::Token;

/// Display text shown after any failed computation.
pub const ERROR_DISPLAY: &str = "Error";

const ZERO_DISPLAY: &str = "0";

/// Where the machine is in the input cycle, derived from the state value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Showing `0` or a previous result; the next digit starts a number.
    Idle,
    /// Digits are being appended to the display.
    Entering,
    /// An operator was just pressed; the next digit starts the right operand.
    OperatorPending,
    /// Showing `Error`; the next token of any kind resets.
    ErrorState,
}

/// The captured left operand and operator awaiting `=`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pending {
    pub operator: BinaryOp,
    pub operand: f64,
}

impl Pending {
    /// What `=` uses when no operator was pressed: `0 + display`.
    const IDENTITY: Pending = Pending {
        operator: BinaryOp::Add,
        operand: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalcState {
    display: String,
    pending: Option<Pending>,
    new_operand: bool,
    last_error: Option<CalcError>,
    decimal_places: u32,
}

impl Default for CalcState {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_PLACES)
    }
}

impl CalcState {
    /// Fresh state showing `0`.
    pub fn new(decimal_places: u32) -> Self {
        Self {
            display: ZERO_DISPLAY.to_string(),
            pending: None,
            new_operand: true,
            last_error: None,
            decimal_places,
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// True when the next digit replaces the display.
    pub fn is_new_operand(&self) -> bool {
        self.new_operand
    }

    /// Why the display shows `Error`, if the last token caused it.
    pub fn last_error(&self) -> Option<&CalcError> {
        self.last_error.as_ref()
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    pub fn phase(&self) -> Phase {
        if self.display == ERROR_DISPLAY {
            Phase::ErrorState
        } else if !self.new_operand {
            Phase::Entering
        } else if self.pending.is_some() {
            Phase::OperatorPending
        } else {
            Phase::Idle
        }
    }

    /// Process one token and return the next state.
    pub fn apply(self, token: Token) -> Self {
        if token == Token::Clear || self.display == ERROR_DISPLAY {
            return Self::new(self.decimal_places);
        }

        let mut next = Self {
            last_error: None,
            ..self
        };

        match token {
            Token::Digit(c) => {
                if next.new_operand || next.display == ZERO_DISPLAY {
                    next.display = c.to_string();
                    next.new_operand = false;
                } else {
                    next.display.push(c);
                }
                next
            }
            Token::Operator(operator) => match next.value() {
                Ok(operand) => {
                    next.pending = Some(Pending { operator, operand });
                    next.new_operand = true;
                    next
                }
                Err(e) => next.fail(e),
            },
            Token::Equals => {
                let Pending { operator, operand } = next.pending.unwrap_or(Pending::IDENTITY);
                let result = next.value().and_then(|rhs| operator.apply(operand, rhs));
                next.finish(result)
            }
            Token::Percent => {
                let result = next.value().map(|v| v / 100.0);
                next.finish(result)
            }
            Token::ToggleSign => next.toggle_sign(),
            Token::Function(f) => {
                let result = next.value().and_then(|v| f.apply(v));
                next.finish(result)
            }
            Token::Clear => Self::new(next.decimal_places),
        }
    }

    /// Numeric value of the display.
    fn value(&self) -> Result<f64, CalcError> {
        parse_display(&self.display)
    }

    /// Show a computed result (or `Error`) and return to `Idle`.
    fn finish(self, result: Result<f64, CalcError>) -> Self {
        match result {
            Ok(value) => Self {
                display: format_with_places(value, self.decimal_places),
                ..Self::new(self.decimal_places)
            },
            Err(e) => self.fail(e),
        }
    }

    fn fail(self, error: CalcError) -> Self {
        Self {
            display: ERROR_DISPLAY.to_string(),
            last_error: Some(error),
            ..Self::new(self.decimal_places)
        }
    }

    /// Flip the sign in place without touching the pending operation.
    fn toggle_sign(mut self) -> Self {
        match self.value() {
            Ok(v) if v > 0.0 => {
                self.display.insert(0, '-');
                self
            }
            Ok(v) if v < 0.0 => {
                self.display = format_with_places(v.abs(), self.decimal_places);
                self
            }
            Ok(_) => self,
            Err(e) => self.fail(e),
        }
    }
}

/// Parse display text entered through digit keys.
fn parse_display(display: &str) -> Result<f64, CalcError> {
    // Rust's float parser also accepts "inf"/"nan"; digit keys never produce them
    match display.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::MalformedNumber(display.to_string())),
    }
}

/// Mutable owner of one `CalcState`.
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalcState,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator rounding fractional results to `decimal_places`.
    pub fn with_decimal_places(decimal_places: u32) -> Self {
        Self {
            state: CalcState::new(decimal_places),
        }
    }

    /// Press the button with `label`. Unknown labels leave the state untouched.
    pub fn press(&mut self, label: &str) -> Result<&str, CalcError> {
        let token = label.parse::<Token>()?;
        Ok(self.press_token(token))
    }

    /// Apply one token and return the new display.
    pub fn press_token(&mut self, token: Token) -> &str {
        let state = std::mem::take(&mut self.state);
        self.state = state.apply(token);

        tracing::debug!(
            token = %token,
            display = %self.state.display(),
            phase = ?self.state.phase(),
            "Button pressed"
        );
        if let Some(error) = self.state.last_error() {
            tracing::debug!(%error, "Calculation failed");
        }

        self.state.display()
    }

    /// Apply tokens in order and return the final display.
    pub fn press_all<I>(&mut self, tokens: I) -> &str
    where
        I: IntoIterator<Item = Token>,
    {
        for token in tokens {
            self.press_token(token);
        }
        self.state.display()
    }

    pub fn display(&self) -> &str {
        self.state.display()
    }

    pub fn state(&self) -> &CalcState {
        &self.state
    }

    /// Back to a fresh `0`, keeping the configured precision.
    pub fn reset(&mut self) {
        self.state = CalcState::new(self.state.decimal_places());
    }
}
