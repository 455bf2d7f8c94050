use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use thiserror::Error;

use crate::config::ScancodeConfig;
use crate::models::{Category, RawFileScan};

/// First scancode-toolkit major version that reports licenses as
/// `license_detections[].matches[]` instead of a per-file `licenses` list.
const DETECTIONS_MAJOR_VERSION: u32 = 32;

/// Failures raised while running the ScanCode toolkit.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("not a regular file: {path}")]
    NotAFile { path: PathBuf },

    #[error("cannot access {path}")]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch {program}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status} while scanning {category}\n{details}")]
    Failed {
        program: PathBuf,
        category: Category,
        status: ExitStatus,
        details: String,
    },

    #[error("scancode reported errors while scanning {category}\n{errors}")]
    FileErrors { category: Category, errors: String },

    #[error("scancode-toolkit {version} reports licenses as `license_detections`, which is not supported; use scancode-toolkit 31.x or earlier")]
    UnsupportedVersion { version: String },

    #[error("unreadable scancode output: {details}")]
    MalformedOutput { details: String },

    #[error("scancode output contains no file entry")]
    NoFileEntry,
}

/// Top level of `scancode --json` output. Summaries are ignored.
#[derive(Debug, Deserialize)]
struct ScancodeOutput {
    #[serde(default)]
    headers: Vec<ScancodeHeader>,
    #[serde(default)]
    files: Vec<ScancodeFile>,
}

#[derive(Debug, Deserialize)]
struct ScancodeHeader {
    tool_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScancodeFile {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    scan_errors: Vec<String>,
    /// Only present in the 32.x layout.
    license_detections: Option<serde_json::Value>,
    #[serde(flatten)]
    scan: RawFileScan,
}

impl ScancodeOutput {
    fn tool_version(&self) -> Option<&str> {
        self.headers.iter().find_map(|h| h.tool_version.as_deref())
    }
}

/// [`Scanner`](super::Scanner) backed by the `scancode` command line tool.
///
/// Each call runs one scancode process on one file and reads its JSON
/// report from standard output. License scans need scancode-toolkit 31.x
/// or earlier, the releases that still report a per-file `licenses` list.
pub struct ScancodeCli {
    config: ScancodeConfig,
    verbose: bool,
    quiet: bool,
}

impl ScancodeCli {
    pub fn new(config: ScancodeConfig) -> Self {
        Self {
            config,
            verbose: false,
            quiet: false,
        }
    }

    /// Echo every scancode command line on stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Suppress the progress spinner.
    pub fn quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    fn run(&self, path: &Path, category: Category, options: &[&str]) -> Result<RawFileScan> {
        check_target(path)?;

        let args = build_args(&self.config, options, path);

        if self.verbose {
            eprintln!(
                "  {} {} {}",
                "→".cyan(),
                self.config.program.display(),
                args.iter()
                    .map(|a| a.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(" ")
            );
        }

        let spinner = if !self.quiet {
            let pb = ProgressBar::new_spinner();
            pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
            pb.set_message(format!("Scanning {} in {}", category, path.display()));
            pb.enable_steady_tick(Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let output = Command::new(&self.config.program).args(&args).output();

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let output = output.map_err(|source| ScanError::Launch {
            program: self.config.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(ScanError::Failed {
                program: self.config.program.clone(),
                category,
                status: output.status,
                details: failure_details(&output.stderr, &output.stdout),
            }
            .into());
        }

        Ok(parse_output(&output.stdout, category)?)
    }
}

impl super::Scanner for ScancodeCli {
    fn get_copyrights(&self, path: &Path) -> Result<RawFileScan> {
        self.run(path, Category::Copyrights, &["--copyright"])
    }

    fn get_licenses(&self, path: &Path, include_text: bool) -> Result<RawFileScan> {
        if include_text {
            self.run(path, Category::Licenses, &["--license", "--license-text"])
        } else {
            self.run(path, Category::Licenses, &["--license"])
        }
    }

    fn get_emails(&self, path: &Path) -> Result<RawFileScan> {
        self.run(path, Category::Emails, &["--email"])
    }

    fn get_urls(&self, path: &Path) -> Result<RawFileScan> {
        self.run(path, Category::Urls, &["--url"])
    }
}

/// The path must name a readable regular file.
fn check_target(path: &Path) -> Result<(), ScanError> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(ScanError::NotAFile {
            path: path.to_path_buf(),
        }),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(ScanError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(source) => Err(ScanError::Inaccessible {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// `<configured args> <options> [--processes N] [--timeout S] --quiet --json - <path>`
fn build_args(config: &ScancodeConfig, options: &[&str], path: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = config.args.iter().map(OsString::from).collect();
    args.extend(options.iter().map(OsString::from));

    if let Some(processes) = config.processes {
        args.push("--processes".into());
        args.push(processes.to_string().into());
    }
    if let Some(timeout) = config.timeout {
        args.push("--timeout".into());
        args.push(timeout.to_string().into());
    }

    args.push("--quiet".into());
    args.push("--json".into());
    args.push("-".into());
    args.push(path.as_os_str().to_os_string());
    args
}

fn read_report(stdout: &[u8]) -> Result<ScancodeOutput, ScanError> {
    serde_json::from_slice(stdout).map_err(|e| ScanError::MalformedOutput {
        details: e.to_string(),
    })
}

/// Stderr of a failed run followed by any `scan_errors` its report still carries.
fn failure_details(stderr: &[u8], stdout: &[u8]) -> String {
    let mut lines: Vec<String> = Vec::new();

    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if !stderr.is_empty() {
        lines.push(stderr);
    }

    if let Ok(report) = read_report(stdout) {
        lines.extend(report.files.into_iter().flat_map(|f| f.scan_errors));
    }

    lines.join("\n")
}

fn major_version(version: &str) -> Option<u32> {
    version.trim().trim_start_matches('v').split('.').next()?.parse().ok()
}

/// Pick the scanned file's entry out of a scancode JSON report.
///
/// Per-file `scan_errors` fail the scan even when scancode exited with 0.
/// A license scan from a scancode release that no longer reports `licenses`
/// is rejected rather than read as "no licenses".
fn parse_output(stdout: &[u8], category: Category) -> Result<RawFileScan, ScanError> {
    let report = read_report(stdout)?;
    let version = report.tool_version().map(str::to_string);

    let file = report
        .files
        .into_iter()
        .find(|f| f.kind.as_deref().map_or(true, |k| k == "file"))
        .ok_or(ScanError::NoFileEntry)?;

    if !file.scan_errors.is_empty() {
        return Err(ScanError::FileErrors {
            category,
            errors: file.scan_errors.join("\n"),
        });
    }

    if category == Category::Licenses {
        let too_new = version
            .as_deref()
            .and_then(major_version)
            .is_some_and(|major| major >= DETECTIONS_MAJOR_VERSION);
        let detections_only = file.scan.licenses.is_none() && file.license_detections.is_some();

        if too_new || detections_only {
            return Err(ScanError::UnsupportedVersion {
                version: version.unwrap_or_else(|| "(unknown version)".to_string()),
            });
        }
    }

    Ok(file.scan)
}
