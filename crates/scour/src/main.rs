//! Scour - strip unwanted markup from HTML and XML
//!
//! Usage: scour [OPTIONS] [FILE]

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use thiserror::Error;

use scour_markup::Tokenizer;
use scour_sanitize::{sanitize, RemovalConfig, SanitizeError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Errors reported by the command line tool
#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Write(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] SanitizeError),

    #[error("Failed to serialize event: {0}")]
    Json(#[from] serde_json::Error),
}

type CliResult<T> = Result<T, CliError>;

/// What to do with the input
#[derive(Debug, Default, PartialEq)]
struct Options {
    /// Input file, stdin when absent or `-`
    input: Option<String>,
    config_path: Option<String>,
    /// Removals given as flags, merged over the config file
    removals: RemovalConfig,
    events: bool,
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    Version,
    Run(Options),
}

fn main() -> ExitCode {
    // Logs go to stderr, stdout carries only the result
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("scour");

    let command = match parse_args(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Try '{} --help' for more information.", program);
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            print_usage(program);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("Scour {}", VERSION);
            ExitCode::SUCCESS
        }
        Command::Run(options) => {
            if let Err(e) = run(&options) {
                eprintln!("Error: {}", e);
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
    }
}

fn print_usage(program: &str) {
    println!(
        r#"Scour {} - Strip unwanted markup from HTML and XML

USAGE:
    {} [OPTIONS] [FILE]

Reads FILE, or stdin when FILE is absent or '-', and writes the sanitized
markup to stdout.

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    --elements <A,B>        Remove these elements and their content
    --attributes <X,Y>      Remove these attributes
    --strip-comments        Remove comments
    --strip-doctypes        Remove doctype declarations
    --config <PATH>         Read removals from a JSON file (flags add to it)
    --events                Print tokenizer events as JSON lines instead

EXAMPLES:
    {} --elements script,style --attributes onclick page.html
    {} --config removals.json < page.html
    {} --events page.html
"#,
        VERSION, program, program, program, program
    );
}

fn parse_args(args: &[String]) -> CliResult<Command> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "-V" | "--version" => return Ok(Command::Version),
            "--elements" => {
                let value = option_value(arg, iter.next())?;
                options.removals.elements.extend(split_names(value));
            }
            "--attributes" => {
                let value = option_value(arg, iter.next())?;
                options.removals.attributes.extend(split_names(value));
            }
            "--strip-comments" => options.removals.comments = true,
            "--strip-doctypes" => options.removals.doc_types = true,
            "--config" => {
                options.config_path = Some(option_value(arg, iter.next())?.to_string());
            }
            "--events" => options.events = true,
            flag if flag.len() > 1 && flag.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option: {}", flag)));
            }
            path => {
                if let Some(previous) = &options.input {
                    return Err(CliError::Usage(format!(
                        "Only one input file is accepted, got {} and {}",
                        previous, path
                    )));
                }
                options.input = Some(path.to_string());
            }
        }
    }

    Ok(Command::Run(options))
}

fn option_value<'a>(flag: &str, value: Option<&'a String>) -> CliResult<&'a str> {
    value
        .map(String::as_str)
        .ok_or_else(|| CliError::Usage(format!("{} requires a value", flag)))
}

/// Split a comma separated name list, skipping empty entries
fn split_names(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

fn run(options: &Options) -> CliResult<()> {
    let input = read_input(options.input.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if options.events {
        if options.removals != RemovalConfig::default() || options.config_path.is_some() {
            log::warn!("Removal options are ignored with --events");
        }
        for event in Tokenizer::new(&input) {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        }
        out.flush()?;
        return Ok(());
    }

    let config = load_config(options)?;
    let policy = config.to_policy();
    log::debug!("Sanitizing with {:?}", policy);

    out.write_all(sanitize(&input, &policy).as_bytes())?;
    out.flush()?;
    Ok(())
}

fn read_input(path: Option<&str>) -> CliResult<String> {
    match path {
        None | Some("-") => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            Ok(input)
        }
        Some(path) => fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_string(),
            source,
        }),
    }
}

/// Load the config file, if any, with the command line removals on top
fn load_config(options: &Options) -> CliResult<RemovalConfig> {
    let mut config = match &options.config_path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            RemovalConfig::from_json(&json)?
        }
        None => RemovalConfig::default(),
    };

    let mut flags = options.removals.clone();
    flags.normalize()?;
    config.merge(flags);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn run_options(list: &[&str]) -> Options {
        match parse_args(&args(list)).unwrap() {
            Command::Run(options) => options,
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn test_no_args_reads_stdin() {
        assert_eq!(run_options(&[]), Options::default());
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse_args(&args(&["-h"])).unwrap(), Command::Help);
        assert_eq!(parse_args(&args(&["page.html", "--version"])).unwrap(), Command::Version);
    }

    #[test]
    fn test_removal_flags() {
        let options = run_options(&[
            "--elements",
            "script, style,,",
            "--attributes",
            "onclick",
            "--elements",
            "font",
            "--strip-comments",
            "--strip-doctypes",
            "page.html",
        ]);

        assert_eq!(options.input.as_deref(), Some("page.html"));
        assert_eq!(options.removals.elements, vec!["script", "style", "font"]);
        assert_eq!(options.removals.attributes, vec!["onclick"]);
        assert!(options.removals.comments);
        assert!(options.removals.doc_types);
        assert!(!options.events);
    }

    #[test]
    fn test_dash_is_stdin() {
        let options = run_options(&["--events", "-"]);
        assert_eq!(options.input.as_deref(), Some("-"));
        assert!(options.events);
    }

    #[test]
    fn test_missing_value() {
        let err = parse_args(&args(&["--config"])).unwrap_err();
        assert_eq!(err.to_string(), "--config requires a value");
    }

    #[test]
    fn test_unknown_option() {
        let err = parse_args(&args(&["--strip-everything"])).unwrap_err();
        assert_eq!(err.to_string(), "Unknown option: --strip-everything");
    }

    #[test]
    fn test_second_input_rejected() {
        let err = parse_args(&args(&["a.html", "b.html"])).unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
    }

    #[test]
    fn test_flags_merge_over_config_file() {
        let path = env::temp_dir().join(format!("scour-config-{}.json", std::process::id()));
        fs::write(&path, r#"{ "elements": ["style"], "comments": true }"#).unwrap();

        let mut options = run_options(&["--elements", "STYLE,font", "--attributes", "Style"]);
        options.config_path = Some(path.to_string_lossy().into_owned());
        let config = load_config(&options);
        fs::remove_file(&path).unwrap();

        let config = config.unwrap();
        assert_eq!(config.elements, vec!["style", "font"]);
        assert_eq!(config.attributes, vec!["style"]);
        assert!(config.comments);
        assert!(!config.doc_types);
    }

    #[test]
    fn test_invalid_flag_name() {
        let options = run_options(&["--attributes", "on click"]);
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, CliError::Config(SanitizeError::InvalidName { .. })));
    }

    #[test]
    fn test_missing_config_file() {
        let options = run_options(&["--config", "/nonexistent/scour.json"]);
        let err = load_config(&options).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read /nonexistent/scour.json"));
    }
}
