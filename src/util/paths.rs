//! On-disk layout under the algotrace data directory
//!
//! ```text
//! <root>/config.toml
//! <root>/logs/algotrace.log
//! <root>/tapes/<family>-<algorithm>-<ms>.jsonl
//! ```

use std::path::{Path, PathBuf};

const DIR_NAME: &str = ".algotrace";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    root: PathBuf,
}

impl DataPaths {
    /// `root` if given, else `~/.algotrace`. Without a home directory the
    /// layout falls back to `./.algotrace`.
    pub fn resolve(root: Option<PathBuf>) -> Self {
        let root = root.unwrap_or_else(|| match dirs::home_dir() {
            Some(home) => home.join(DIR_NAME),
            None => {
                tracing::warn!("No home directory, keeping data in the working directory");
                PathBuf::from(DIR_NAME)
            }
        });
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("logs").join("algotrace.log")
    }

    pub fn tapes_dir(&self) -> PathBuf {
        self.root.join("tapes")
    }

    /// Fresh tape location for one run, named after what produced it.
    pub fn tape_for(&self, family: &str, algorithm: &str, created_at_ms: u64) -> PathBuf {
        self.tapes_dir()
            .join(format!("{family}-{algorithm}-{created_at_ms}.jsonl"))
    }
}
