use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.scansinglefile/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// How to run the ScanCode toolkit.
    #[serde(default)]
    pub scancode: ScancodeConfig,
}

/// Settings for the `scancode` executable.
#[derive(Debug, Clone, Deserialize)]
pub struct ScancodeConfig {
    /// Executable to run. Defaults to `scancode` looked up on `PATH`.
    ///
    /// License scans need scancode-toolkit 31.x or earlier; 32.x and later
    /// report `license_detections` and are rejected.
    #[serde(default = "default_program")]
    pub program: PathBuf,
    /// Extra arguments placed before the scan options, e.g. a wrapper script
    /// when `program` is an interpreter.
    #[serde(default)]
    pub args: Vec<String>,
    /// Forwarded as `--processes`.
    #[serde(default)]
    pub processes: Option<u32>,
    /// Per-file timeout in seconds, forwarded as `--timeout`.
    #[serde(default)]
    pub timeout: Option<f64>,
}

fn default_program() -> PathBuf {
    PathBuf::from("scancode")
}

impl Default for ScancodeConfig {
    fn default() -> Self {
        ScancodeConfig {
            program: default_program(),
            args: Vec::new(),
            processes: None,
            timeout: None,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<work_dir>/.scansinglefile/config.toml`
/// 3. `~/.config/scansinglefile/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(work_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = work_dir.join(".scansinglefile").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("scansinglefile")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.scancode.program, PathBuf::from("scancode"));
        assert!(cfg.scancode.args.is_empty());
        assert!(cfg.scancode.processes.is_none());
        assert!(cfg.scancode.timeout.is_none());
    }

    #[test]
    fn test_parse_full_config() {
        let cfg: Config = toml::from_str(
            r#"
[scancode]
program = "/opt/scancode-toolkit/scancode"
args = ["--strip-root"]
processes = 2
timeout = 30.5
"#,
        )
        .unwrap();

        assert_eq!(
            cfg.scancode.program,
            PathBuf::from("/opt/scancode-toolkit/scancode")
        );
        assert_eq!(cfg.scancode.args, vec!["--strip-root"]);
        assert_eq!(cfg.scancode.processes, Some(2));
        assert_eq!(cfg.scancode.timeout, Some(30.5));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg: Config = toml::from_str("[scancode]\nprocesses = 4\n").unwrap();
        assert_eq!(cfg.scancode.program, PathBuf::from("scancode"));
        assert_eq!(cfg.scancode.processes, Some(4));

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty.scancode.program, PathBuf::from("scancode"));
    }

    #[test]
    fn test_override_wins() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[scancode]").unwrap();
        writeln!(f, "program = \"my-scancode\"").unwrap();

        let dir = TempDir::new().unwrap();
        let cfg = load_config(dir.path(), Some(f.path())).unwrap();
        assert_eq!(cfg.scancode.program, PathBuf::from("my-scancode"));
    }

    #[test]
    fn test_local_config_is_found() {
        let dir = TempDir::new().unwrap();
        let cfg_dir = dir.path().join(".scansinglefile");
        std::fs::create_dir(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[scancode]\nargs = [\"wrapper.py\"]\n",
        )
        .unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.scancode.args, vec!["wrapper.py"]);
    }

    #[test]
    fn test_missing_override_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(dir.path(), Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("failed to read config file"));
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "[scancode]\nprocesses = \"many\"").unwrap();

        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(f.path())).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
