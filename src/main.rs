//! cellcalc - named-cell sheets with arithmetic formulas

mod config;
mod error;

use anyhow::Context;
use cellcalc_core::{CellResponse, MemoryStore, SheetError, Workbook};
use error::CliError;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const EXIT_OK: i32 = 0;
const EXIT_REJECTED: i32 = 1;
const EXIT_NOT_FOUND: i32 = 2;
const EXIT_FAILURE: i32 = 3;
const EXIT_USAGE: i32 = 64;

fn print_usage() {
    eprintln!("Usage: cellcalc [OPTIONS] <COMMAND>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  set <SHEET> <CELL> <VALUE>  Write a cell and print its result");
    eprintln!("  get <SHEET> <CELL>          Print a cell's value and result");
    eprintln!("  sheet <SHEET>               Print every cell of a sheet");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --store <FILE>          Sheet file to read and update (.cells)");
    eprintln!("  --config <FILE>             Load settings from TOML file");
    eprintln!("  -h, --help                  Print help");
}

#[derive(Debug, PartialEq)]
enum Command {
    Set {
        sheet: String,
        name: String,
        value: String,
    },
    Get {
        sheet: String,
        name: String,
    },
    Sheet {
        sheet: String,
    },
}

#[derive(Debug, PartialEq)]
struct Args {
    store: Option<PathBuf>,
    config: Option<PathBuf>,
    command: Command,
}

/// Parse arguments (without the program name). `None` means help was requested.
fn parse_args(args: &[String]) -> Result<Option<Args>, CliError> {
    let mut store: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(None),
            "-s" | "--store" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--store"))?;
                store = Some(PathBuf::from(value));
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or(CliError::MissingValue("--config"))?;
                config = Some(PathBuf::from(value));
            }
            // Everything after `--` is positional, so values may start with '-'.
            "--" => {
                positional.extend(args[i + 1..].iter().cloned());
                break;
            }
            // Negative numbers are values, not options.
            arg if arg.starts_with('-') && !positional.is_empty() => {
                positional.push(arg.to_string());
            }
            arg if arg.starts_with('-') => {
                return Err(CliError::UnknownOption(arg.to_string()));
            }
            arg => positional.push(arg.to_string()),
        }
        i += 1;
    }

    let mut positional = positional.into_iter();
    let Some(name) = positional.next() else {
        return Err(CliError::NoCommand);
    };
    let rest: Vec<String> = positional.collect();

    let command = match name.as_str() {
        "set" => match <[String; 3]>::try_from(rest) {
            Ok([sheet, name, value]) => Command::Set { sheet, name, value },
            Err(rest) => return Err(argument_count("set", 3, rest.len())),
        },
        "get" => match <[String; 2]>::try_from(rest) {
            Ok([sheet, name]) => Command::Get { sheet, name },
            Err(rest) => return Err(argument_count("get", 2, rest.len())),
        },
        "sheet" => match <[String; 1]>::try_from(rest) {
            Ok([sheet]) => Command::Sheet { sheet },
            Err(rest) => return Err(argument_count("sheet", 1, rest.len())),
        },
        other => return Err(CliError::UnknownCommand(other.to_string())),
    };

    Ok(Some(Args {
        store,
        config,
        command,
    }))
}

fn argument_count(command: &'static str, expected: usize, got: usize) -> CliError {
    CliError::ArgumentCount {
        command,
        expected,
        got,
    }
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn run(args: Args, config: config::Config) -> anyhow::Result<i32> {
    let store_path = args.store.or(config.store);
    let mut workbook = match &store_path {
        Some(path) => Workbook::open(path, config.options)
            .with_context(|| format!("Failed to open {}", path.display()))?,
        None => Workbook::with_store(MemoryStore::new(), config.options),
    };

    match args.command {
        Command::Set { sheet, name, value } => match workbook.write_cell(&sheet, &name, &value) {
            Ok(outcome) => {
                if workbook.modified {
                    match workbook.save_file() {
                        Ok(path) => tracing::debug!("Saved {}", path.display()),
                        Err(SheetError::NoFilePath) => {
                            eprintln!(
                                "Warning: no store file given, {}!{} was not saved",
                                sheet, name
                            );
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                if let Some(report) = &outcome.cascade
                    && !report.is_clean()
                {
                    eprintln!(
                        "Warning: {} dependent cell(s) no longer calculate",
                        report.failures.len()
                    );
                }
                print_json(&outcome.response)?;
                Ok(EXIT_OK)
            }
            Err(SheetError::Calculation(_)) => {
                print_json(&CellResponse::rejected(&value))?;
                Ok(EXIT_REJECTED)
            }
            Err(e) => Err(e.into()),
        },
        Command::Get { sheet, name } => match workbook.get_cell(&sheet, &name) {
            Ok(response) => {
                print_json(&response)?;
                Ok(EXIT_OK)
            }
            Err(SheetError::NotFound(what)) => {
                eprintln!("Error: {} not found", what);
                Ok(EXIT_NOT_FOUND)
            }
            Err(e) => Err(e.into()),
        },
        Command::Sheet { sheet } => match workbook.get_sheet(&sheet) {
            Ok(cells) => {
                print_json(&cells)?;
                Ok(EXIT_OK)
            }
            Err(SheetError::NotFound(what)) => {
                eprintln!("Error: {} not found", what);
                Ok(EXIT_NOT_FOUND)
            }
            Err(e) => Err(e.into()),
        },
    }
}

fn main() {
    let argv: Vec<String> = env::args().skip(1).collect();

    let args = match parse_args(&argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(EXIT_USAGE);
        }
    };

    let (config, warnings) = config::load_config(args.config.as_ref());
    init_logging(&config.log_level);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    match run(args, config) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_FAILURE);
        }
    }
}
