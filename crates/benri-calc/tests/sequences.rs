//! Button sequences run through the public `Calculator` API.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use benri_calc::{format_number, tokenize, Calculator, Phase, Token, ERROR_DISPLAY, KEYPAD};

fn display_after(input: &str) -> String {
    let mut calc = Calculator::new();
    let tokens = tokenize(input).expect("valid input");
    calc.press_all(tokens).to_string()
}

#[test]
fn digit_sequences_concatenate() {
    let cases = [
        ("1 2 3", "123"),
        ("0 4 2", "42"),
        ("9 0 0 1", "9001"),
        ("7", "7"),
        ("0", "0"),
        ("5 . 2 5", "5.25"),
    ];
    for (input, expected) in cases {
        assert_eq!(display_after(input), expected, "input {input:?}");
    }
}

#[test]
fn every_digit_string_round_trips() {
    for n in 1..=500u32 {
        let digits: Vec<String> = n.to_string().chars().map(String::from).collect();
        assert_eq!(display_after(&digits.join(" ")), n.to_string());
    }
}

#[test]
fn arithmetic_examples() {
    assert_eq!(display_after("5 + 3 ="), "8");
    assert_eq!(display_after("6 / 0 ="), ERROR_DISPLAY);
    assert_eq!(display_after("2 x^y 10 ="), "1024");
    assert_eq!(display_after("1 / 3 ="), "0.333333");
    assert_eq!(display_after("1.5 * 4 ="), "6");
    assert_eq!(display_after("3 - 10 ="), "-7");
}

#[test]
fn immediate_functions() {
    assert_eq!(display_after("9 √"), "3");
    assert_eq!(display_after("1 +/- √"), ERROR_DISPLAY);
    assert_eq!(display_after("5 !"), "120");
    assert_eq!(display_after("3 +/- !"), ERROR_DISPLAY);
    assert_eq!(display_after("90 cos"), "0");
    assert_eq!(display_after("90 sin"), "1");
    assert_eq!(display_after("180 cos"), "-1");
}

#[test]
fn clear_from_any_phase_behaves_like_fresh_start() {
    let prefixes = ["", "1 2", "1 2 +", "1 2 + 3", "6 / 0 =", "9 √", "4 +/-", "1 . 2 . 3"];
    for prefix in prefixes {
        let mut calc = Calculator::new();
        calc.press_all(tokenize(prefix).expect("valid prefix"));
        calc.press("AC").expect("AC parses");
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.state().phase(), Phase::Idle);
        assert_eq!(calc.state().pending(), None);

        calc.press_all(tokenize("7 + 1 =").expect("valid input"));
        assert_eq!(calc.display(), "8", "after prefix {prefix:?}");
    }
}

#[test]
fn error_recovery_swallows_the_token() {
    let mut calc = Calculator::new();
    calc.press_all(tokenize("6 / 0 =").expect("valid input"));
    assert_eq!(calc.state().phase(), Phase::ErrorState);

    assert_eq!(calc.press("5").expect("digit parses"), "0");
    assert_eq!(calc.press("5").expect("digit parses"), "5");
}

#[test]
fn format_is_idempotent_on_whole_values() {
    for value in [-1000.0, -1.0, 0.0, 1.0, 120.0, 1024.0, 1e12] {
        let once = format_number(value);
        let again = format_number(once.parse().expect("formatted number parses"));
        assert_eq!(once, again);
        assert!(!once.contains('.'));
    }
}

#[test]
fn keypad_buttons_drive_the_calculator() {
    let mut calc = Calculator::new();
    for label in ["7", "*", "6", "="] {
        let button = KEYPAD
            .iter()
            .flat_map(|row| row.iter())
            .find(|b| b.label == label)
            .expect("button on keypad");
        calc.press_token(button.token().expect("label parses"));
    }
    assert_eq!(calc.display(), "42");
}

#[test]
fn unknown_token_is_rejected_without_state_change() {
    let mut calc = Calculator::new();
    calc.press_all([Token::Digit('3')]);
    assert!(calc.press("ln").is_err());
    assert_eq!(calc.display(), "3");
}
