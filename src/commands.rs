//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Benri: pocket calculator and JMA regional weather lookup
#[derive(Parser, Debug)]
#[command(name = "benri")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Press calculator buttons, or start an interactive session
    Calc(CalcArgs),

    /// Look up regional forecasts
    #[command(subcommand)]
    Weather(WeatherCommand),
}

/// Arguments for the calc command
#[derive(Args, Debug)]
pub struct CalcArgs {
    /// Button labels to press in order (digit runs like `12.5` are split)
    pub tokens: Vec<String>,

    /// Print the display after every button
    #[arg(long)]
    pub trace: bool,

    /// Print the keypad layout as JSON and exit
    #[arg(long, conflicts_with_all = ["tokens", "trace"])]
    pub keypad: bool,
}

#[derive(Subcommand, Debug)]
pub enum WeatherCommand {
    /// List forecast regions
    Regions {
        /// Only use the local cache
        #[arg(long)]
        offline: bool,
    },

    /// Show the forecast for a region
    Show {
        /// Region (forecast office) code, e.g. 130000
        region_id: String,

        /// Fetch even when a cached forecast exists
        #[arg(long)]
        refresh: bool,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_calc_accepts_operator_tokens() {
        let cli = Cli::try_parse_from(["benri", "calc", "12", "-", "5", "="]).unwrap();
        match cli.command {
            Commands::Calc(args) => {
                assert_eq!(args.tokens, vec!["12", "-", "5", "="]);
                assert!(!args.trace);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_weather_show_with_global_config() {
        let cli = Cli::try_parse_from([
            "benri",
            "weather",
            "show",
            "130000",
            "--refresh",
            "--config",
            "/tmp/benri.toml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/benri.toml")));
        match cli.command {
            Commands::Weather(WeatherCommand::Show { region_id, refresh }) => {
                assert_eq!(region_id, "130000");
                assert!(refresh);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_trace_flag_after_tokens() {
        let cli = Cli::try_parse_from(["benri", "calc", "5", "+", "3", "=", "--trace"]).unwrap();
        match cli.command {
            Commands::Calc(args) => {
                assert_eq!(args.tokens, vec!["5", "+", "3", "="]);
                assert!(args.trace);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_keypad_conflicts_with_tokens() {
        assert!(Cli::try_parse_from(["benri", "calc", "--keypad", "1"]).is_err());
        assert!(Cli::try_parse_from(["benri", "calc", "5", "--keypad"]).is_err());
    }
}
