use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Result};

use crate::manifest::ManifestRow;

pub const DEFAULT_TOOL: &str = "cmp_two_rsem_results_files.py";

/// The comparison program plus any leading arguments, e.g.
/// `python3 /opt/bin/cmp_two_rsem_results_files.py`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tool {
    program: String,
    args: Vec<String>,
}

impl Tool {
    /// Splits on whitespace; the first word is the program. A program path
    /// containing spaces can't be given this way.
    pub fn parse(spec: &str) -> Result<Self> {
        let mut words = spec.split_whitespace();
        let program = words
            .next()
            .ok_or_else(|| anyhow!("empty comparison tool command {:?}", spec))?;
        Ok(Tool {
            program: program.to_string(),
            args: words.map(str::to_string).collect(),
        })
    }

    pub fn program(&self) -> &str { &self.program }
    pub fn args(&self) -> &[String] { &self.args }
}

impl Default for Tool {
    fn default() -> Self {
        Tool {
            program: DEFAULT_TOOL.to_string(),
            args: Vec::new(),
        }
    }
}

/// One invocation of the comparison tool for a manifest row.
#[derive(Debug, Clone)]
pub struct CompareCommand {
    tool: Tool,
    control: String,
    sample: String,
    feature: String,
    output: PathBuf,
    by_name: bool,
}

impl CompareCommand {
    pub fn new(tool: &Tool, row: &ManifestRow, output_dir: &Path, by_name: bool) -> Self {
        CompareCommand {
            tool: tool.clone(),
            control: row.control_path().to_string(),
            sample: row.sample_path().to_string(),
            feature: row.feature().to_string(),
            output: Self::output_filename(output_dir, row),
            by_name,
        }
    }

    /// `<output_dir>/<basename of sample>_<feature>.txt`
    ///
    /// The basename is whatever follows the last `/`, so `a/b/` gives an
    /// empty basename and `x/.` gives `.`.
    pub fn output_filename(output_dir: &Path, row: &ManifestRow) -> PathBuf {
        let basename = row.sample_path().rsplit('/').next().unwrap_or("");
        output_dir.join(format!("{}_{}.txt", basename, row.feature()))
    }

    pub fn output(&self) -> &Path { &self.output }

    /// Arguments following the program name.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.tool.args().iter().map(OsString::from).collect();
        args.extend(
            [
                "-c",
                self.control.as_str(),
                "-s",
                self.sample.as_str(),
                "-f",
                self.feature.as_str(),
                "--plot",
                "-o",
            ]
                .iter()
                .map(OsString::from),
        );
        args.push(self.output.clone().into_os_string());
        if self.by_name {
            args.push(OsString::from("--by-name"));
        }
        args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.tool.program());
        cmd.args(self.args());
        cmd
    }

    /// Runs the tool to completion with stdout and stderr captured.
    pub fn run(&self) -> CompareOutcome {
        match self.command().output() {
            Ok(output) if output.status.success() => CompareOutcome::Succeeded,
            Ok(output) => CompareOutcome::Failed {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            },
            Err(err) => CompareOutcome::SpawnFailed(err),
        }
    }
}

impl fmt::Display for CompareCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool.program())?;
        for arg in self.args() {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub enum CompareOutcome {
    Succeeded,
    /// Non-zero exit; `code` is `None` when the tool was killed by a signal.
    Failed {
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    SpawnFailed(io::Error),
    /// Not run because an input file is missing.
    Skipped,
}

impl CompareOutcome {
    pub fn is_failure(&self) -> bool {
        match self {
            CompareOutcome::Failed { .. } | CompareOutcome::SpawnFailed(_) => true,
            _ => false,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            CompareOutcome::Succeeded => "ok",
            CompareOutcome::Failed { .. } => "failed",
            CompareOutcome::SpawnFailed(_) => "spawn-failed",
            CompareOutcome::Skipped => "skipped",
        }
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CompareOutcome::Succeeded => Some(0),
            CompareOutcome::Failed { code, .. } => *code,
            _ => None,
        }
    }

    /// Single-line report for a failed invocation. Captured output is
    /// escaped so embedded newlines stay on the one line.
    pub fn diagnostic(&self, cmd: &CompareCommand) -> Option<String> {
        match self {
            CompareOutcome::Failed { code, stdout, stderr } => {
                let code = code.map_or_else(|| "signal".to_string(), |c| c.to_string());
                Some(format!(
                    "Command {} failed with return code {}. Stdout is {:?}. Stderr is {:?}.",
                    cmd, code, stdout, stderr
                ))
            }
            CompareOutcome::SpawnFailed(err) => {
                Some(format!("Command {} could not be started: {}.", cmd, err))
            }
            _ => None,
        }
    }
}
