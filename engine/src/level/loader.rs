//! Level location and loading.
//!
//! [`LevelSource`] is the seam to the editor's asset manager: resolve a
//! level name to a path, load a level from a path. [`JsonLevelSource`] is
//! the stock implementation over a directory of `<name>.json` files.
//!
//! [`LevelLoadJob`] runs one load on a named background thread so the
//! simulation tick never blocks on disk. The thread publishes exactly one
//! `Result` through an mpsc channel; the tick thread polls it with
//! [`LevelLoadJob::poll`] once per frame. There is no cancellation: the
//! transition controller keeps at most one job in flight and ignores new
//! exit triggers until it returns to idle.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use log::error;
use thiserror::Error;

use super::Level;

/// Why a level failed to load.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("no level named `{0}`")]
    Missing(String),
    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse `{}`: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Locates and loads levels. Safe to call from a background thread.
pub trait LevelSource: Send + Sync {
    /// Resolve a level name to a loadable path, or `None` if no such level
    /// exists.
    fn resolve(&self, name: &str) -> Option<PathBuf>;

    /// Load a level from a resolved path.
    fn load(&self, path: &Path) -> Result<Level, LevelError>;
}

/// Stock [`LevelSource`] over a directory of `<name>.json` level files.
#[derive(Debug, Clone)]
pub struct JsonLevelSource {
    root: PathBuf,
}

impl JsonLevelSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve + load in one step, for session startup.
    pub fn load_by_name(&self, name: &str) -> Result<Level, LevelError> {
        let path = self
            .resolve(name)
            .ok_or_else(|| LevelError::Missing(name.to_string()))?;
        self.load(&path)
    }
}

impl LevelSource for JsonLevelSource {
    fn resolve(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.join(name).with_extension("json");
        path.is_file().then_some(path)
    }

    fn load(&self, path: &Path) -> Result<Level, LevelError> {
        let text = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| LevelError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// One in-flight background level load.
///
/// Single producer (the load thread), single reader (the tick thread). The
/// result is handed over through the channel; the `JoinHandle` is only used
/// to reap the thread on drop, never to wait for the result.
pub struct LevelLoadJob {
    rx: Receiver<Result<Level, LevelError>>,
    thread: Option<JoinHandle<()>>,
}

impl LevelLoadJob {
    /// Spawn a load of `path` on a background thread.
    pub fn spawn(source: Arc<dyn LevelSource>, path: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("level-load-worker".to_string())
            .spawn(move || {
                let result = source.load(&path);
                if let Err(err) = &result {
                    error!("level load failed: {err}");
                }
                // The receiver may already be gone if play mode ended.
                let _ = tx.send(result);
            })
            .expect("failed to spawn level load worker");

        Self {
            rx,
            thread: Some(thread),
        }
    }

    /// Non-blocking poll for the load result. Returns `None` while the load
    /// is still running; returns the result exactly once.
    pub fn poll(&mut self) -> Option<Result<Level, LevelError>> {
        self.rx.try_recv().ok()
    }
}

impl Drop for LevelLoadJob {
    fn drop(&mut self) {
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
