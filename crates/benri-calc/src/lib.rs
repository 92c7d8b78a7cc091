//! Pocket calculator core.
//!
//! Interprets button-press tokens into a running computation with one
//! pending operator and operand at a time, the way a four-function
//! calculator does. Rendering is left to the caller: every step yields a
//! display string.

pub mod error;
pub mod format;
pub mod keypad;
pub mod ops;
pub mod state;
pub mod token;

pub use error::CalcError;
pub use format::{format_number, format_with_places, DEFAULT_DECIMAL_PLACES};
pub use keypad::{buttons, ButtonKind, ButtonSpec, ButtonStyle, KEYPAD};
pub use ops::{BinaryOp, UnaryFn};
pub use state::{CalcState, Calculator, Pending, Phase, ERROR_DISPLAY};
pub use token::{tokenize, Token};
