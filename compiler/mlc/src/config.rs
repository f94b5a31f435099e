//! Compiler configuration.
//!
//! Filled by the command line, read by the driver and the toolchain.
//! Tests construct it directly.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Environment variable naming the C compiler.
pub const CC_ENV: &str = "ML_CC";

/// Environment variable naming the directory holding `libml_rt.a`.
pub const RUNTIME_DIR_ENV: &str = "ML_RUNTIME_DIR";

/// File name of the static runtime library.
pub const RUNTIME_LIB: &str = "libml_rt.a";

/// Optimization level passed through to the C compiler.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum OptLevel {
    #[default]
    O0,
    O1,
    O2,
    O3,
}

impl OptLevel {
    /// Parse the digits after `-O`. Anything but `0`..`3` is rejected.
    pub fn parse(level: &str) -> Option<Self> {
        match level {
            "0" => Some(OptLevel::O0),
            "1" => Some(OptLevel::O1),
            "2" => Some(OptLevel::O2),
            "3" => Some(OptLevel::O3),
            _ => None,
        }
    }

    /// The compiler flag for this level.
    pub fn flag(self) -> &'static str {
        match self {
            OptLevel::O0 => "-O0",
            OptLevel::O1 => "-O1",
            OptLevel::O2 => "-O2",
            OptLevel::O3 => "-O3",
        }
    }
}

impl fmt::Display for OptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.flag())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Executable path, or the C file path with `compile_only`.
    pub output: PathBuf,
    /// Stop after writing the generated C source.
    pub compile_only: bool,
    pub opt_level: OptLevel,
    pub debug_info: bool,
    pub include_paths: Vec<PathBuf>,
    pub library_paths: Vec<PathBuf>,
    pub libraries: Vec<String>,
    /// C compiler command.
    pub cc: String,
    /// Directory searched for the runtime library at link time.
    pub runtime_dir: Option<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            output: PathBuf::from("a.out"),
            compile_only: false,
            opt_level: OptLevel::O0,
            debug_info: false,
            include_paths: Vec::new(),
            library_paths: Vec::new(),
            libraries: Vec::new(),
            cc: "cc".to_string(),
            runtime_dir: None,
        }
    }
}

impl CompilerConfig {
    /// Defaults, with the C compiler and runtime directory taken from the
    /// environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(cc) = env::var(CC_ENV) {
            if !cc.trim().is_empty() {
                config.cc = cc;
            }
        }
        config.runtime_dir = env::var_os(RUNTIME_DIR_ENV)
            .map(PathBuf::from)
            .or_else(runtime_dir_next_to_exe);
        config
    }

    /// Where the C source is kept when building an executable:
    /// `<output>.c`, next to it.
    pub fn build_source_path(&self) -> PathBuf {
        let mut path = self.output.clone().into_os_string();
        path.push(".c");
        PathBuf::from(path)
    }
}

/// The directory of the running executable, if the runtime library was
/// installed beside it.
fn runtime_dir_next_to_exe() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent()?;
    has_runtime(dir).then(|| dir.to_path_buf())
}

fn has_runtime(dir: &Path) -> bool {
    dir.join(RUNTIME_LIB).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn opt_levels_parse_zero_through_three() {
        assert_eq!(OptLevel::parse("0"), Some(OptLevel::O0));
        assert_eq!(OptLevel::parse("3"), Some(OptLevel::O3));
        assert_eq!(OptLevel::parse("4"), None);
        assert_eq!(OptLevel::parse(""), None);
        assert_eq!(OptLevel::O2.to_string(), "-O2");
    }

    #[test]
    fn build_source_sits_next_to_the_output() {
        let config = CompilerConfig {
            output: PathBuf::from("out/prog"),
            ..CompilerConfig::default()
        };
        assert_eq!(config.build_source_path(), PathBuf::from("out/prog.c"));
    }

    #[test]
    fn defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.output, PathBuf::from("a.out"));
        assert_eq!(config.cc, "cc");
        assert!(!config.compile_only);
        assert_eq!(config.opt_level, OptLevel::O0);
    }
}
