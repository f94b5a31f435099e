//! The compiler driver.
//!
//! Orchestrates read, lower, assemble and (optionally) build:
//!
//! ```text
//! Idle -> Lowering -> Assembling -> Building -> Done
//!                                            \-> Failed
//! ```
//!
//! Any stage can fail. A failure before the source is written leaves no
//! output file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ml_eval::{run_module, Machine, RuntimeError, Value};
use ml_ir::{CompilationError, StringInterner};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::CompilerConfig;
use crate::toolchain::{CcToolchain, Toolchain, ToolchainError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Lowering,
    Assembling,
    Building,
    Done,
    Failed,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compilation(#[from] CompilationError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl DriverError {
    fn io(path: &Path, source: io::Error) -> Self {
        DriverError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read a source file.
pub fn read_source(path: &Path) -> Result<String, DriverError> {
    fs::read_to_string(path).map_err(|err| DriverError::io(path, err))
}

pub struct Driver<T: Toolchain = CcToolchain> {
    config: CompilerConfig,
    toolchain: T,
    state: DriverState,
}

impl Driver<CcToolchain> {
    /// A driver building with the C compiler `config` names.
    pub fn with_cc(config: CompilerConfig) -> Self {
        let toolchain = CcToolchain::from_config(&config);
        Driver::new(config, toolchain)
    }
}

impl<T: Toolchain> Driver<T> {
    pub fn new(config: CompilerConfig, toolchain: T) -> Self {
        Driver {
            config,
            toolchain,
            state: DriverState::Idle,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    fn transition(&mut self, next: DriverState) {
        debug!(from = ?self.state, to = ?next, "driver state");
        self.state = next;
    }

    /// Record the outcome of a pipeline run.
    fn finish<R>(&mut self, result: Result<R, DriverError>) -> Result<R, DriverError> {
        let next = if result.is_ok() {
            DriverState::Done
        } else {
            DriverState::Failed
        };
        self.transition(next);
        result
    }

    /// Compile as the configuration asks: source only with `compile_only`,
    /// an executable otherwise. Returns the path written.
    pub fn compile(&mut self, source: &str) -> Result<PathBuf, DriverError> {
        if self.config.compile_only {
            self.compile_to_source(source)
        } else {
            self.compile_to_executable(source)
        }
    }

    /// Generate C for `source` and write it to the output path.
    #[tracing::instrument(level = "debug", skip_all, fields(output = %self.config.output.display()))]
    pub fn compile_to_source(&mut self, source: &str) -> Result<PathBuf, DriverError> {
        let result = self.write_source(source, self.config.output.clone());
        self.finish(result)
    }

    /// Generate C for `source`, write it to `<output>.c` and build the
    /// executable from it.
    #[tracing::instrument(level = "debug", skip_all, fields(output = %self.config.output.display()))]
    pub fn compile_to_executable(&mut self, source: &str) -> Result<PathBuf, DriverError> {
        let result = self
            .write_source(source, self.config.build_source_path())
            .and_then(|c_file| self.build(&c_file));
        self.finish(result)
    }

    /// Lower and assemble `source`.
    pub fn generate(&mut self, source: &str) -> Result<String, DriverError> {
        self.transition(DriverState::Lowering);
        let interner = StringInterner::new();
        let module = ml_parse::parse(source, &interner)?;
        let program = ml_codegen::lower(&module, &interner)?;

        self.transition(DriverState::Assembling);
        Ok(program.assemble())
    }

    fn write_source(&mut self, source: &str, path: PathBuf) -> Result<PathBuf, DriverError> {
        let code = self.generate(source)?;
        fs::write(&path, code).map_err(|err| DriverError::io(&path, err))?;
        info!(path = %path.display(), "wrote generated source");
        Ok(path)
    }

    fn build(&mut self, c_file: &Path) -> Result<PathBuf, DriverError> {
        self.transition(DriverState::Building);
        self.toolchain.build(c_file, &self.config)?;
        Ok(self.config.output.clone())
    }
}

/// Run `source` with the interpreter on `machine`.
///
/// The program is checked by the lowering first, so misplaced `BREAK`,
/// `CONTINUE` and `RETURN` are rejected the same way as when compiling.
#[tracing::instrument(level = "debug", skip_all)]
pub fn interpret(source: &str, machine: &mut Machine) -> Result<Value, DriverError> {
    let interner = machine.interner().clone();
    let module = ml_parse::parse(source, &interner)?;
    ml_codegen::lower(&module, &interner)?;
    Ok(run_module(machine, module)?)
}
