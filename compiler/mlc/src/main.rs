//! ML Compiler CLI

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;

use ml_eval::Machine;
use ml_ir::SharedInterner;
use mlc::{diagnostics, interpret, parse_args, read_source, Command, CompilerConfig, Driver, USAGE};

fn main() -> ExitCode {
    mlc::init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    let command = match parse_args(args, CompilerConfig::from_env()) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Command::Compile { input, config } => compile(&input, config),
        Command::Run { input } => run(&input),
    }
}

fn compile(input: &Path, config: CompilerConfig) -> ExitCode {
    let source = match read_source(input) {
        Ok(source) => source,
        Err(err) => return report(&err, input, ""),
    };
    let mut driver = Driver::with_cc(config);
    match driver.compile(&source) {
        Ok(output) => {
            println!("Compilation successful: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(err) => report(&err, input, &source),
    }
}

fn run(input: &Path) -> ExitCode {
    let source = match read_source(input) {
        Ok(source) => source,
        Err(err) => return report(&err, input, ""),
    };
    let mut machine = Machine::new(SharedInterner::new());
    match interpret(&source, &mut machine) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report(&err, input, &source),
    }
}

fn report(err: &mlc::DriverError, input: &Path, source: &str) -> ExitCode {
    let _ = std::io::stdout().flush();
    let color = std::io::stderr().is_terminal();
    let path = input.display().to_string();
    eprint!("{}", diagnostics::render(err, &path, source, color));
    ExitCode::FAILURE
}
