use std::path::{Component, Path};

use crate::config::Config;
use crate::error::{ConfigError, Result};

impl Config {
    /// Check the record for values that would make a task misbehave.
    ///
    /// Filesystem existence is not checked here: a missing source directory
    /// simply yields an empty stage.
    pub fn validate(&self) -> Result<()> {
        validate_glob("paths.styles", &self.paths.styles)?;
        validate_glob("paths.scripts", &self.paths.scripts)?;
        validate_glob("paths.pages", &self.paths.pages)?;
        if let Some(partials) = &self.paths.partials {
            validate_glob("paths.partials", partials)?;
        }

        validate_bundle_name("paths.style_bundle", &self.paths.style_bundle)?;
        validate_bundle_name("paths.script_bundle", &self.paths.script_bundle)?;
        validate_dist(&self.paths.dist)?;

        self.server_addr()?;
        self.livereload_addr()?;

        if let Some(test) = &self.test {
            validate_glob("test.files", &test.files)?;
            if test.command.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "test.command",
                    "",
                    "name the test runner executable, e.g. \"mocha\"",
                ));
            }
        }

        Ok(())
    }
}

/// Validate a glob pattern is non-empty and well formed.
pub fn validate_glob(field: &str, pattern: &str) -> Result<()> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::invalid(field, "", "glob pattern cannot be empty"));
    }

    glob::Pattern::new(pattern)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(field, pattern, e.msg))
}

/// Validate a bundle file name is a single path component.
pub fn validate_bundle_name(field: &str, name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." {
        return Err(ConfigError::invalid(field, name, "bundle name must be a file name"));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(ConfigError::invalid(
            field,
            name,
            "bundle name cannot contain path separators",
        ));
    }

    Ok(())
}

/// Validate the distribution root stays inside the project.
///
/// `clean` removes this directory recursively, so the root itself, absolute
/// paths and parent traversals are refused.
pub fn validate_dist(dist: &Path) -> Result<()> {
    let shown = dist.display().to_string();

    if dist.as_os_str().is_empty() {
        return Err(ConfigError::invalid("paths.dist", shown, "cannot be empty"));
    }

    if dist.is_absolute() {
        return Err(ConfigError::invalid(
            "paths.dist",
            shown,
            "must be relative to the project root",
        ));
    }

    let mut depth = 0usize;
    for component in dist.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            _ => {
                return Err(ConfigError::invalid(
                    "paths.dist",
                    shown,
                    "cannot leave the project root",
                ));
            }
        }
    }

    if depth == 0 {
        return Err(ConfigError::invalid(
            "paths.dist",
            shown,
            "cannot be the project root itself",
        ));
    }

    Ok(())
}
