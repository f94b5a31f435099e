//! ML compiler driver.
//!
//! Reads ML source, lowers it to C with `ml_codegen` and hands the result
//! to a C toolchain that links it against `ml_rt`. `mlc run` interprets the
//! program with `ml_eval` instead.
//!
//! # Debugging
//!
//! Set `RUST_LOG` to see driver stages and toolchain commands, e.g.
//! `RUST_LOG=mlc=debug,ml_codegen=debug`.

pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod driver;
pub mod toolchain;

use std::sync::Once;

pub use cli::{parse_args, CliError, Command, USAGE};
pub use config::{CompilerConfig, OptLevel};
pub use driver::{interpret, read_source, Driver, DriverError, DriverState};
pub use toolchain::{CcToolchain, Toolchain, ToolchainError};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call more than once. Does nothing unless `RUST_LOG` is set, so
/// normal output stays clean. Logs go to stderr.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
