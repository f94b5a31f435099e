//! The external C toolchain.
//!
//! The driver hands a generated C file and the accumulated configuration to
//! a [`Toolchain`], which produces the executable or reports why it could
//! not. [`CcToolchain`] runs a `cc`-compatible compiler driver.

use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

use thiserror::Error;
use tracing::debug;

use crate::config::CompilerConfig;

/// Libraries the runtime itself needs, linked after it.
const SYSTEM_LIBS: [&str; 3] = ["pthread", "dl", "m"];

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("C compiler '{program}' could not be started: {source}")]
    NotFound {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("building with '{program}' failed{}{}", exit_code(.code), stderr_section(.stderr))]
    BuildFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" (exit code {code})"),
        None => String::new(),
    }
}

fn stderr_section(stderr: &str) -> String {
    if stderr.trim().is_empty() {
        String::new()
    } else {
        format!("\n\n{}", stderr.trim_end())
    }
}

/// Something that turns a C file into an executable.
pub trait Toolchain {
    fn build(&self, source: &Path, config: &CompilerConfig) -> Result<(), ToolchainError>;
}

/// A `cc`-compatible compiler driver, found on `PATH`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CcToolchain {
    program: String,
}

impl CcToolchain {
    pub fn new(program: impl Into<String>) -> Self {
        CcToolchain {
            program: program.into(),
        }
    }

    /// The compiler named by `config.cc`.
    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.cc.clone())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// The full compile-and-link command for `source`.
    ///
    /// Generated code uses statement expressions, so the GNU dialect is
    /// requested explicitly.
    pub fn command(&self, source: &Path, config: &CompilerConfig) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-std=gnu11").arg(config.opt_level.flag());
        if config.debug_info {
            cmd.arg("-g");
        }
        for dir in &config.include_paths {
            cmd.arg(format!("-I{}", dir.display()));
        }
        cmd.arg(source).arg("-o").arg(&config.output);
        if let Some(dir) = &config.runtime_dir {
            cmd.arg(format!("-L{}", dir.display()));
        }
        for dir in &config.library_paths {
            cmd.arg(format!("-L{}", dir.display()));
        }
        cmd.arg("-lml_rt");
        for lib in config.libraries.iter().map(String::as_str).chain(SYSTEM_LIBS) {
            cmd.arg(format!("-l{lib}"));
        }
        cmd
    }
}

impl Default for CcToolchain {
    fn default() -> Self {
        Self::new("cc")
    }
}

impl Toolchain for CcToolchain {
    fn build(&self, source: &Path, config: &CompilerConfig) -> Result<(), ToolchainError> {
        let mut cmd = self.command(source, config);
        debug!(command = %CommandLine(&cmd), "invoking C toolchain");

        let output = cmd.output().map_err(|source| ToolchainError::NotFound {
            program: self.program.clone(),
            source,
        })?;
        check_status(&self.program, output.status, &output.stderr)
    }
}

fn check_status(program: &str, status: ExitStatus, stderr: &[u8]) -> Result<(), ToolchainError> {
    if status.success() {
        return Ok(());
    }
    Err(ToolchainError::BuildFailed {
        program: program.to_string(),
        code: status.code(),
        stderr: String::from_utf8_lossy(stderr).into_owned(),
    })
}

/// Shell-like rendering of a command for logs.
struct CommandLine<'a>(&'a Command);

impl fmt::Display for CommandLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.get_program().to_string_lossy())?;
        for arg in self.0.get_args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
