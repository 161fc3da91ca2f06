//! Display gamma backends.

use std::ffi::OsString;
use std::process::Command;
use std::sync::LazyLock;

use log::{debug, trace};
use regex::Regex;

use crate::error::BackendError;
use crate::gamma::GammaTriple;

// =============================================================================
// Gamma Backend Trait
// =============================================================================

/// Port to whatever actually sets the display's gamma.
///
/// This allows for mock implementations in tests.
pub trait GammaBackend: Send + Sync {
    /// Query the current gamma of `display`.
    fn get_gamma(&self, display: &str) -> Result<GammaTriple, BackendError>;

    /// Set the gamma of `display`.
    fn set_gamma(&self, display: &str, gamma: GammaTriple) -> Result<(), BackendError>;
}

// =============================================================================
// XrandrBackend
// =============================================================================

static GAMMA_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+Gamma:\s+([\d.]+:[\d.]+:[\d.]+)").expect("gamma pattern is valid")
});

/// Backend driving the `xrandr` utility.
///
/// Gamma is queried from `xrandr --verbose` and set with
/// `xrandr --output <display> --gamma r:g:b`.
#[derive(Debug, Clone)]
pub struct XrandrBackend {
    program: OsString,
}

impl XrandrBackend {
    /// Use `xrandr` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("xrandr")
    }

    /// Use a specific `xrandr` executable.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String, BackendError> {
        let command = format!("{} {}", self.program.to_string_lossy(), args.join(" "));
        debug!("running `{}`", command);

        let output = Command::new(&self.program).args(args).output()?;
        if !output.status.success() {
            return Err(BackendError::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for XrandrBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GammaBackend for XrandrBackend {
    fn get_gamma(&self, display: &str) -> Result<GammaTriple, BackendError> {
        let stdout = self.run(&["--verbose"])?;
        trace!("xrandr --verbose output:\n{}", stdout);
        parse_verbose_gamma(&stdout, display)
    }

    fn set_gamma(&self, display: &str, gamma: GammaTriple) -> Result<(), BackendError> {
        self.run(&["--output", display, "--gamma", &gamma.to_xrandr_arg()])?;
        Ok(())
    }
}

/// Extract the gamma of `display` from `xrandr --verbose` output.
///
/// Each output starts with an unindented header line whose first word is the
/// output name; its properties follow on indented lines.
pub fn parse_verbose_gamma(output: &str, display: &str) -> Result<GammaTriple, BackendError> {
    let mut lines = output.lines();

    lines
        .by_ref()
        .find(|line| is_header(line) && line.split_whitespace().next() == Some(display))
        .ok_or_else(|| BackendError::DisplayNotFound(display.to_string()))?;

    let raw = lines
        .take_while(|line| !is_header(line))
        .find_map(|line| GAMMA_LINE.captures(line))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| BackendError::GammaNotReported(display.to_string()))?;

    GammaTriple::parse_with(&raw, ':').map_err(|_| BackendError::InvalidGamma(raw))
}

fn is_header(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(char::is_whitespace)
}
