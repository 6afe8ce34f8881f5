mod cli;
mod dispatch;
mod output;
mod stdout_io;

use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use segmint_engine::EngineError;
use stdout_io::write_stdout_text;

const ROOT_HELP: &str = "Segmint - RFM customer segmentation for transaction tables

Usage:
  segmint <command>

Start here:
  segmint template
  segmint score --help
";

const TOP_LEVEL_HELP: &str = "Segmint - RFM customer segmentation for transaction tables

USAGE: segmint <command>

Score your customers:
  1. segmint template                                     Print an example transaction file
  2. segmint score <path>                                 Score customers and assign segments
  3. segmint score <path> --out results.csv               Also export the full scored table

Useful variations:
  segmint score <path> --as-of 2026-06-01                 Pin the recency evaluation date
  segmint score <path> --policy range                     Classify by composite-score ranges
  segmint score <path> --segment \"Best Customers\"         Show one segment only
  segmint score <path> --customer cust_1                  Find customers by id
  cat transactions.csv | segmint score -                  Read the table from stdin

Machine output:
  Add --json to any command for structured JSON.

Having issues or errors?
  Run `segmint score --help` for the input schema and scoring rules,
  or `segmint <command> --help` for command usage.
";

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let raw_args = std::env::args().collect::<Vec<String>>();
    if raw_args.len() == 1 {
        if write_stdout_text(ROOT_HELP).is_err() {
            return Err(ExitCode::from(2));
        }
        return Ok(ExitCode::SUCCESS);
    }

    let parsed = cli::Cli::try_parse();
    let cli = match parsed {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                let body = if is_top_level_help_request(&raw_args) {
                    TOP_LEVEL_HELP.to_string()
                } else {
                    err.to_string()
                };
                if write_stdout_text(&body).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }

            let clean_message = strip_clap_boilerplate(&err.to_string());
            let command_hint = command_path_from_args(&raw_args);
            let parse_error = parse_error_with_command_hint(&clean_message, command_hint);
            let mode = infer_requested_output_mode(&raw_args);
            if output::print_failure(&parse_error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            return Err(ExitCode::from(1));
        }
    };
    let mode = output::mode_for_command(&cli.command);

    let dispatched = dispatch::dispatch(&cli);
    match dispatched {
        Ok(success) => {
            if output::print_success(&success, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if output::print_failure(&error, mode).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(exit_code_for_error(&error))
        }
    }
}

fn is_top_level_help_request(raw_args: &[String]) -> bool {
    raw_args.len() == 2 && matches!(raw_args[1].as_str(), "--help" | "-h")
}

/// Strips clap's trailing boilerplate (Usage line, "For more information"
/// hint) so the recovery steps are the single source of guidance.
fn strip_clap_boilerplate(message: &str) -> String {
    let trimmed = if let Some(pos) = message.find("\n\nUsage:") {
        &message[..pos]
    } else if let Some(pos) = message.find("\nFor more information") {
        &message[..pos]
    } else {
        message
    };
    trimmed.trim_end().to_string()
}

fn command_path_from_args(raw_args: &[String]) -> Option<&'static str> {
    let first_non_flag = raw_args
        .iter()
        .skip(1)
        .find(|value| !value.starts_with('-'))?;

    match first_non_flag.as_str() {
        "score" => Some("score"),
        "template" => Some("template"),
        _ => None,
    }
}

fn parse_error_with_command_hint(
    clean_message: &str,
    command_hint: Option<&str>,
) -> EngineError {
    let help_target = command_hint.unwrap_or("<command>");
    EngineError::invalid_argument_with_recovery(
        clean_message,
        vec![format!("Run `segmint {help_target} --help` for usage.")],
    )
}

fn exit_code_for_error(error: &EngineError) -> ExitCode {
    if error.code.starts_with("internal_") {
        ExitCode::from(2)
    } else {
        ExitCode::from(1)
    }
}

fn infer_requested_output_mode(raw_args: &[String]) -> output::OutputMode {
    if raw_args.iter().skip(1).any(|value| value == "--json") {
        return output::OutputMode::Json;
    }
    output::OutputMode::Text
}
