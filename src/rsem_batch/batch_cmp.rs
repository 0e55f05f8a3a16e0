use std::fmt;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::compare::{CompareCommand, CompareOutcome, Tool};
use crate::errors::BatchError;
use crate::manifest::{Manifest, ManifestRow};

#[derive(Debug)]
pub struct CLI {
    pub input: String,
    pub output_dir: String,
    pub continue_on: bool,
    pub by_name: bool,
    pub tool: Tool,
    pub summary: Option<String>,
}

impl CLI {
    /// Failure diagnostics go to stdout, skipped and malformed rows to
    /// stderr.
    pub fn run(&self) -> Result<BatchSummary> {
        let stdout = io::stdout();
        let stderr = io::stderr();
        self.run_with(&mut stdout.lock(), &mut stderr.lock())
    }

    pub fn run_with<O: Write, E: Write>(&self, diag_out: &mut O, log_out: &mut E) -> Result<BatchSummary> {
        let output_dir: &Path = self.output_dir.as_ref();
        create_output_dir(output_dir)?;

        let manifest = Manifest::from_file(&self.input)?;

        let mut table_out = match &self.summary {
            Some(f) => Some(
                csv::WriterBuilder::new()
                    .delimiter(b'\t')
                    .from_path(f)
                    .with_context(|| format!("creating summary table {:?}", f))?,
            ),
            None => None,
        };

        let mut summary = BatchSummary::default();

        for row_res in manifest {
            let row = match row_res {
                Ok(row) => row,
                Err(e) if e.is_fatal() => {
                    return Err(e).with_context(|| format!("reading manifest {:?}", self.input));
                }
                Err(e) => {
                    writeln!(log_out, "{}", e)?;
                    summary.malformed += 1;
                    continue;
                }
            };

            let cmd = CompareCommand::new(&self.tool, &row, output_dir, self.by_name);

            let outcome = match self.missing_input(&row) {
                Some((which, path)) => {
                    writeln!(
                        log_out,
                        "Skipping manifest line {}: {} file {:?} does not exist",
                        row.line(),
                        which,
                        path
                    )?;
                    CompareOutcome::Skipped
                }
                None => cmd.run(),
            };

            if let Some(diagnostic) = outcome.diagnostic(&cmd) {
                writeln!(diag_out, "{}", diagnostic)?;
                diag_out.flush()?;
            }

            if let Some(table) = table_out.as_mut() {
                table.serialize(SummaryRecord::new(&row, &cmd, &outcome))?;
            }

            summary.record(&outcome);
        }

        if let Some(mut table) = table_out {
            table.flush()?;
        }

        Ok(summary)
    }

    /// Only checked with `--continue-on`; otherwise the comparison tool
    /// deals with missing inputs itself.
    fn missing_input<'a>(&self, row: &'a ManifestRow) -> Option<(&'static str, &'a str)> {
        if !self.continue_on {
            return None;
        }

        if !Path::new(row.sample_path()).exists() {
            Some(("sample", row.sample_path()))
        } else if !Path::new(row.control_path()).exists() {
            Some(("control", row.control_path()))
        } else {
            None
        }
    }
}

/// Exit status for setup errors that stop the batch before it starts.
pub const FATAL_EXIT: i32 = 1;

/// Creates the output directory if needed, but never its parents.
pub fn create_output_dir(path: &Path) -> Result<(), BatchError> {
    if !path.is_dir() {
        std::fs::create_dir(path).map_err(|source| BatchError::DirectoryCreation {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub malformed: usize,
}

impl BatchSummary {
    pub fn record(&mut self, outcome: &CompareOutcome) {
        match outcome {
            CompareOutcome::Succeeded => self.succeeded += 1,
            CompareOutcome::Skipped => self.skipped += 1,
            CompareOutcome::Failed { .. } | CompareOutcome::SpawnFailed(_) => self.failed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped + self.malformed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0 || self.malformed > 0
    }

    /// Row failures only change the exit status with `--fail-on-error`.
    pub fn exit_status(&self, fail_on_error: bool) -> i32 {
        if fail_on_error && self.has_failures() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} rows: {} succeeded, {} failed, {} skipped, {} malformed",
            self.total(),
            self.succeeded,
            self.failed,
            self.skipped,
            self.malformed
        )
    }
}

#[derive(Debug, Serialize)]
struct SummaryRecord<'a> {
    line: u64,
    sample: &'a str,
    control: &'a str,
    feature: &'a str,
    output: String,
    status: &'static str,
    exit_code: Option<i32>,
}

impl<'a> SummaryRecord<'a> {
    fn new(row: &'a ManifestRow, cmd: &CompareCommand, outcome: &CompareOutcome) -> Self {
        SummaryRecord {
            line: row.line(),
            sample: row.sample_path(),
            control: row.control_path(),
            feature: row.feature(),
            output: cmd.output().to_string_lossy().into_owned(),
            status: outcome.status(),
            exit_code: outcome.exit_code(),
        }
    }
}
