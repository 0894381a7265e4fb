use anyhow::Result;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use viewconf_runtime::{RequestContext, ViewConf, resolve_workspace_path};
use viewconf_types::UserId;

use crate::presentation::ConsoleRenderer;
use crate::types::OutputFormat;

/// Per-invocation state; the workspace is opened on first use.
pub struct ExecutionContext {
    data_dir: PathBuf,
    user: Option<UserId>,
    format: OutputFormat,
    workspace: OnceCell<ViewConf>,
}

impl ExecutionContext {
    pub fn new(data_dir: Option<&str>, user: Option<i64>, format: OutputFormat) -> Result<Self> {
        let data_dir = resolve_workspace_path(data_dir)?;

        Ok(Self {
            data_dir,
            user: user.map(UserId::new),
            format,
            workspace: OnceCell::new(),
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn workspace(&self) -> Result<&ViewConf> {
        self.workspace.get_or_try_init(|| {
            tracing::debug!(data_dir = %self.data_dir.display(), "opening workspace");
            Ok(ViewConf::open(self.data_dir.clone())?)
        })
    }

    /// `--user` wins over the configured user.
    pub fn user(&self) -> Result<Option<UserId>> {
        match self.user {
            Some(user) => Ok(Some(user)),
            None => Ok(self.workspace()?.config().user),
        }
    }

    pub fn request(&self) -> Result<RequestContext> {
        Ok(RequestContext::new(self.user()?))
    }

    pub fn renderer(&self) -> ConsoleRenderer {
        ConsoleRenderer::new(self.format == OutputFormat::Json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use viewconf_runtime::Config;

    #[test]
    fn test_cli_user_overrides_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config {
            user: Some(UserId::new(4)),
            ..Config::default()
        };
        config.save_to(&temp_dir.path().join("config.toml"))?;
        let data_dir = temp_dir.path().to_string_lossy().to_string();

        let ctx = ExecutionContext::new(Some(&data_dir), None, OutputFormat::Plain)?;
        assert_eq!(ctx.user()?, Some(UserId::new(4)));

        let ctx = ExecutionContext::new(Some(&data_dir), Some(9), OutputFormat::Plain)?;
        assert_eq!(ctx.user()?, Some(UserId::new(9)));
        assert_eq!(ctx.data_dir(), temp_dir.path());
        Ok(())
    }
}
