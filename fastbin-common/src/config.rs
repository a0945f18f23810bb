// fastbin-common/src/config.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::{BaseDirs, ProjectDirs};
use tracing::debug;

use super::error::{FastbinError, Result};

const APP_NAME: &str = "fastbin";
const DB_FILENAME: &str = "fastbin.db";
const DEFAULT_DB_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct Config {
    pub bin_home: PathBuf,
    pub staging_dir: PathBuf,
    pub data_dir: PathBuf,
    pub db_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        debug!("Loading fastbin configuration");

        let bin_home = match non_empty_env("FASTBIN_BIN_HOME") {
            Some(dir) => PathBuf::from(dir),
            None => default_bin_home()?,
        };
        debug!("Effective bin home: {}", bin_home.display());

        let staging_dir = non_empty_env("FASTBIN_STAGING_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(APP_NAME));

        let data_dir = match non_empty_env("FASTBIN_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| {
                    FastbinError::Config("could not determine a data directory".to_string())
                })?,
        };

        let db_timeout = match non_empty_env("FASTBIN_DB_TIMEOUT") {
            Some(raw) => humantime::parse_duration(&raw).map_err(|e| {
                FastbinError::Config(format!("invalid FASTBIN_DB_TIMEOUT '{raw}': {e}"))
            })?,
            None => DEFAULT_DB_TIMEOUT,
        };

        debug!("Configuration loaded successfully.");
        Ok(Self {
            bin_home,
            staging_dir,
            data_dir,
            db_timeout,
        })
    }

    /// Lays every location out beneath `root`. Used for sandboxed runs and tests.
    pub fn with_root(root: &Path) -> Self {
        Self {
            bin_home: root.join("bin"),
            staging_dir: root.join("staging"),
            data_dir: root.join("data"),
            db_timeout: DEFAULT_DB_TIMEOUT,
        }
    }

    pub fn bin_home(&self) -> &Path {
        &self.bin_home
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILENAME)
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }

    pub fn bin_path(&self, name: &str) -> PathBuf {
        self.bin_home.join(name)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

// XDG_BIN_HOME, then ~/.local/bin
fn default_bin_home() -> Result<PathBuf> {
    let base = BaseDirs::new()
        .ok_or_else(|| FastbinError::Config("could not determine home directory".to_string()))?;
    if let Some(dir) = base.executable_dir() {
        return Ok(dir.to_path_buf());
    }
    Ok(base.home_dir().join(".local").join("bin"))
}
