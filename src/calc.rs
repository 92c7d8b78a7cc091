//! `benri calc` handler.

use std::io::{self, BufRead, Write};

use benri_calc::{tokenize, CalcError, Calculator, Token, KEYPAD};
use benri_core::{AppError, Config};

use crate::commands::CalcArgs;

const QUIT_WORDS: &[&str] = &["quit", "exit"];

pub fn run(config: &Config, args: &CalcArgs) -> Result<(), AppError> {
    if args.keypad {
        let json = serde_json::to_string_pretty(KEYPAD).map_err(anyhow::Error::from)?;
        println!("{}", json);
        return Ok(());
    }

    let mut calculator = Calculator::with_decimal_places(config.calc.decimal_places);

    if args.tokens.is_empty() {
        return repl(&mut calculator);
    }

    let tokens = tokenize(&args.tokens.join(" ")).map_err(input_error)?;
    press(&mut calculator, tokens, args.trace);
    if !args.trace {
        println!("{}", calculator.display());
    }
    Ok(())
}

fn press(calculator: &mut Calculator, tokens: Vec<Token>, trace: bool) {
    for token in tokens {
        let display = calculator.press_token(token);
        if trace {
            println!("{} -> {}", token, display);
        }
    }
}

/// One line of buttons per prompt; the display is printed after each line.
fn repl(calculator: &mut Calculator) -> Result<(), AppError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", calculator.display());
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();

        if QUIT_WORDS.contains(&line) {
            break;
        }
        if line.is_empty() {
            continue;
        }

        match tokenize(line) {
            Ok(tokens) => {
                press(calculator, tokens, false);
                writeln!(stdout, "{}", calculator.display())?;
            }
            Err(e) => {
                tracing::debug!("Rejected input {:?}: {}", line, e);
                let err = input_error(e);
                eprintln!("{} ({})", err.user_message(), err);
            }
        }
        stdout.flush()?;
    }

    Ok(())
}

fn input_error(e: CalcError) -> AppError {
    AppError::Calc(benri_core::CalcError::UnknownInput(e.to_string()))
}
