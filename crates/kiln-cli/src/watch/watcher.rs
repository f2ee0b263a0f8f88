//! Recursive project watcher with debouncing and ignore rules.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

/// Decides which changed paths the watcher drops.
///
/// Paths outside the root, under the distribution directory, or with a
/// hidden component are ignored unless explicitly kept. Each configured entry
/// is either a glob (`*.log`) matched against the file name and the relative
/// path, or a plain name (`node_modules`) matched against every component.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    root: PathBuf,
    dist: PathBuf,
    globs: Vec<glob::Pattern>,
    names: Vec<String>,
    keep: Vec<PathBuf>,
}

impl IgnoreRules {
    pub fn new(root: impl Into<PathBuf>, dist: impl Into<PathBuf>, entries: &[String]) -> Self {
        let mut globs = Vec::new();
        let mut names = Vec::new();
        for entry in entries {
            let is_glob = entry.contains(['*', '?', '[']);
            match glob::Pattern::new(entry) {
                Ok(pattern) if is_glob => globs.push(pattern),
                Ok(_) => names.push(entry.trim_matches('/').to_string()),
                Err(e) => tracing::warn!(pattern = %entry, error = %e, "ignoring invalid ignore pattern"),
            }
        }

        Self {
            root: root.into(),
            dist: dist.into(),
            globs,
            names,
            keep: Vec::new(),
        }
    }

    /// Always report these files, even when hidden (`.mocharc.yml`).
    pub fn keep(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.keep.extend(paths);
        self
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.keep.iter().any(|kept| kept == path) {
            return false;
        }
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return true;
        };
        if path.starts_with(&self.dist) {
            return true;
        }

        let hidden_or_named = relative.components().any(|component| match component {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                name.starts_with('.') || self.names.iter().any(|n| n.as_str() == name)
            }
            _ => false,
        });
        if hidden_or_named {
            return true;
        }

        let file_name = relative.file_name().map(|n| n.to_string_lossy());
        self.globs.iter().any(|pattern| {
            pattern.matches_path(relative)
                || file_name.as_deref().is_some_and(|name| pattern.matches(name))
        })
    }
}

/// Same-path events inside the window are dropped.
struct Debouncer {
    window: Duration,
    seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            seen: HashMap::new(),
        }
    }

    fn admit(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.seen.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.seen.insert(path.to_path_buf(), now);
        // keep the map from growing for the life of the watch process
        if self.seen.len() > 1024 {
            let window = self.window;
            self.seen.retain(|_, at| now.duration_since(*at) < window);
        }
        true
    }
}

/// Watches the project root and sends batches of changed paths.
///
/// Each notify event becomes at most one batch: the event's paths minus the
/// ignored and debounced ones. Empty batches are not sent.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    pub fn new(
        root: PathBuf,
        rules: IgnoreRules,
        debounce_ms: u64,
    ) -> Result<(Self, mpsc::Receiver<Vec<PathBuf>>)> {
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let mut debouncer = Debouncer::new(Duration::from_millis(debounce_ms));

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::warn!(error = %e, "file watcher error");
                    return;
                }
            };
            if !matches!(
                event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                return;
            }

            let now = Instant::now();
            let batch: Vec<PathBuf> = event
                .paths
                .into_iter()
                .filter(|path| !rules.is_ignored(path))
                .filter(|path| debouncer.admit(path, now))
                .collect();

            if !batch.is_empty() {
                tracing::debug!(paths = batch.len(), "change batch");
                // runs on notify's thread, outside the runtime
                let _ = tx.blocking_send(batch);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
