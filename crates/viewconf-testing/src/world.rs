//! TestWorld pattern for declarative integration test setup.
//!
//! Provides a fluent interface for:
//! - Creating an isolated data directory
//! - Seeding it with the sample catalog
//! - Opening the workspace in-process or executing CLI commands against it

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use viewconf_runtime::{Config, ViewConf};
use viewconf_types::UserId;

use crate::fixtures;

/// Declarative test environment builder.
///
/// # Example
/// ```no_run
/// use viewconf_testing::TestWorld;
///
/// let world = TestWorld::new().with_sample_catalog().unwrap();
///
/// let result = world.run(&["custom-view", "list"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    user: Option<UserId>,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    /// Create a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".viewconf");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            user: None,
            env_vars: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Act as `user` in CLI commands (`--user`).
    pub fn as_user(mut self, user: i64) -> Self {
        self.user = Some(UserId::new(user));
        self
    }

    pub fn set_user(&mut self, user: Option<i64>) {
        self.user = user.map(UserId::new);
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Write `config.toml` into the data directory.
    pub fn with_config(self, config: &Config) -> Result<Self> {
        config.save_to(&self.data_dir.join("config.toml"))?;
        Ok(self)
    }

    /// Import the sample catalog into the data directory's database.
    pub fn with_sample_catalog(self) -> Result<Self> {
        let workspace = self.open()?;
        workspace.import_catalog(&fixtures::sample_catalog()?)?;
        Ok(self)
    }

    /// Write the sample catalog JSON next to the data directory and return
    /// its path.
    pub fn write_sample_catalog(&self) -> Result<PathBuf> {
        let path = self.temp_dir.path().join("catalog.json");
        fixtures::write_sample_catalog(&path)?;
        Ok(path)
    }

    /// Open the workspace in-process.
    ///
    /// Each call opens a fresh connection, so a CLI run in between is
    /// visible to the next `open`.
    pub fn open(&self) -> Result<ViewConf> {
        Ok(ViewConf::open(self.data_dir.clone())?)
    }

    /// Configure a CLI command with this test environment's settings.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        if let Some(user) = self.user {
            cmd.arg("--user").arg(user.to_string());
        }

        cmd.current_dir(self.temp_dir.path());
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Execute the `viewconf` binary with plain output.
    ///
    /// # Note
    /// Uses `Command::cargo_bin()`, which only resolves inside `cargo test`
    /// of a crate that builds the binary.
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_format("plain", args)
    }

    /// Execute the `viewconf` binary with JSON output.
    pub fn run_json(&self, args: &[&str]) -> Result<CliResult> {
        self.run_with_format("json", args)
    }

    #[allow(deprecated)]
    fn run_with_format(&self, format: &str, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("viewconf")
            .map_err(|e| anyhow::anyhow!("Failed to find viewconf binary: {}", e))?;

        self.configure_command(&mut cmd);
        cmd.arg("--format").arg(format);
        cmd.args(args);

        let output = cmd.output()?;

        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
