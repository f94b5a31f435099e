//! Command-line parsing.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{CompilerConfig, OptLevel};

pub const USAGE: &str = "\
Usage: mlc [compile] [options] <input.ml>
       mlc run <input.ml>

Options:
  -o <file>     Output file (default: a.out)
  -c            Generate C source only, do not build
  -O<level>     Optimization level, 0 to 3
  -g            Emit debug information
  -I<path>      Add an include path
  -L<path>      Add a library path
  -l<name>      Link against a library
  -h, --help    Show this help";

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Compile {
        input: PathBuf,
        config: CompilerConfig,
    },
    Run {
        input: PathBuf,
    },
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CliError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' requires an argument")]
    MissingArgument(&'static str),

    #[error("invalid optimization level '{0}', expected 0 to 3")]
    InvalidOptLevel(String),

    #[error("no input file")]
    MissingInput,

    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),
}

/// Parse the arguments after the program name. `base` supplies the
/// defaults options override.
pub fn parse_args<I>(args: I, base: CompilerConfig) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        return Ok(Command::Help);
    }
    match args.first().map(String::as_str) {
        Some("run") => parse_run(&args[1..]),
        Some("compile") => parse_compile(&args[1..], base),
        _ => parse_compile(&args, base),
    }
}

fn parse_run(args: &[String]) -> Result<Command, CliError> {
    match args {
        [] => Err(CliError::MissingInput),
        [option, ..] if option.starts_with('-') => Err(CliError::UnknownOption(option.clone())),
        [input] => Ok(Command::Run {
            input: PathBuf::from(input),
        }),
        [_, extra, ..] => Err(CliError::UnexpectedArgument(extra.clone())),
    }
}

fn parse_compile(args: &[String], base: CompilerConfig) -> Result<Command, CliError> {
    let mut config = base;
    let mut input: Option<PathBuf> = None;
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-o" => {
                let output = args.next().ok_or(CliError::MissingArgument("-o"))?;
                config.output = PathBuf::from(output);
            }
            "-c" => config.compile_only = true,
            "-g" => config.debug_info = true,
            _ if arg.starts_with("-O") => {
                config.opt_level = OptLevel::parse(&arg[2..])
                    .ok_or_else(|| CliError::InvalidOptLevel(arg[2..].to_string()))?;
            }
            _ if arg.starts_with("-I") => {
                config.include_paths.push(PathBuf::from(attached(arg, "-I", &mut args)?));
            }
            _ if arg.starts_with("-L") => {
                config.library_paths.push(PathBuf::from(attached(arg, "-L", &mut args)?));
            }
            _ if arg.starts_with("-l") => {
                config.libraries.push(attached(arg, "-l", &mut args)?.to_string());
            }
            _ if arg.starts_with('-') => return Err(CliError::UnknownOption(arg.clone())),
            _ if input.is_some() => return Err(CliError::UnexpectedArgument(arg.clone())),
            _ => input = Some(PathBuf::from(arg)),
        }
    }

    let input = input.ok_or(CliError::MissingInput)?;
    Ok(Command::Compile { input, config })
}

/// The value of `-Xvalue`, or of `-X value`.
fn attached<'a>(
    arg: &'a str,
    flag: &'static str,
    rest: &mut impl Iterator<Item = &'a String>,
) -> Result<&'a str, CliError> {
    match &arg[flag.len()..] {
        "" => rest
            .next()
            .map(String::as_str)
            .ok_or(CliError::MissingArgument(flag)),
        value => Ok(value),
    }
}
