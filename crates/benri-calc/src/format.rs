//! Result formatting for the display.

/// Decimal places kept for fractional results unless configured otherwise.
pub const DEFAULT_DECIMAL_PLACES: u32 = 6;

/// Format a finite result with the default precision.
pub fn format_number(value: f64) -> String {
    format_with_places(value, DEFAULT_DECIMAL_PLACES)
}

/// Format a finite result: whole values without a decimal point, anything
/// else rounded to `places` decimals.
///
/// Rounding happens before the whole-number test, so values within rounding
/// distance of an integer (for example `cos 90°`) render as that integer.
/// Callers reject non-finite values before formatting.
pub fn format_with_places(value: f64, places: u32) -> String {
    let rounded = round_to(value, places);

    if rounded.fract() != 0.0 {
        return format!("{rounded}");
    }

    // -0 displays as 0
    if rounded == 0.0 {
        return "0".to_string();
    }

    format!("{rounded:.0}")
}

fn round_to(value: f64, places: u32) -> f64 {
    if value.fract() == 0.0 {
        return value;
    }

    let factor = 10f64.powi(places.min(i32::MAX as u32) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }

    scaled.round() / factor
}
